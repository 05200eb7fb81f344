//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde_json::json;

use crate::commands::list::ListingRow;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the entry listing
    pub fn print_listing(&self, rows: &[ListingRow]) {
        match self.format {
            OutputFormat::Human => {
                if rows.is_empty() {
                    println!("Store is empty.");
                    return;
                }
                let size_width = rows
                    .iter()
                    .map(|row| row.size.to_string().len())
                    .max()
                    .unwrap_or(1);
                for row in rows {
                    println!("{}", format_row(row, size_width));
                }
            }
            OutputFormat::Json => {
                let entries: Vec<_> = rows
                    .iter()
                    .map(|row| {
                        json!({
                            "name": row.name,
                            "is_dir": row.is_dir,
                            "is_encoded": row.is_encoded,
                            "size": row.size,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&entries).unwrap_or_default()
                );
            }
            OutputFormat::Quiet => {
                for row in rows {
                    println!("{}", row.name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!("{}", json!({"status": "success", "message": message}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Format one `ls -l` style line
fn format_row(row: &ListingRow, size_width: usize) -> String {
    format!(
        "{}{} {} {} {} {:>width$} {} {}",
        if row.is_dir { 'd' } else { '-' },
        row.permissions,
        row.links,
        row.owner,
        row.group,
        row.size,
        row.modified,
        row.name,
        width = size_width
    )
}
