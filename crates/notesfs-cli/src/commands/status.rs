//! Status command handler

use anyhow::Result;
use serde_json::json;

use notesfs_core::{Config, Store};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, config: &Config, output: &Output) -> Result<()> {
    let stats = store.stats()?;
    let warnings = store.warnings();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "store": store.path(),
                    "size": stats.size,
                    "counts": {
                        "entries": stats.entries,
                        "directories": stats.directories,
                        "files": stats.files,
                        "encoded": stats.encoded,
                    },
                    "tombstoned_lines": stats.tombstoned_lines,
                    "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", stats.entries);
        }
        OutputFormat::Human => {
            println!("notesfs Status");
            println!("==============");
            println!();
            println!("Store:");
            println!("  Location: {}", store.path().display());
            println!("  Size:     {}", stats.size_human());
            println!("  Data dir: {}", config.data_dir.display());
            println!();
            println!("Contents:");
            println!("  Directories: {}", stats.directories);
            println!("  Files:       {}", stats.files);
            println!("  Encoded:     {}", stats.encoded);
            println!();
            println!("Maintenance:");
            println!("  Deleted lines: {}", stats.tombstoned_lines);
            if stats.tombstoned_lines > 0 {
                println!("  Run `notesfs defrag` to reclaim them.");
            }
            if !warnings.is_empty() {
                println!();
                println!("Skipped lines ({}):", warnings.len());
                for warning in warnings {
                    println!("  {}", warning);
                }
            }
        }
    }

    Ok(())
}
