//! Logging setup
//!
//! Logs go to stderr, or to the configured log file without ANSI colors.
//! `RUST_LOG` overrides the computed filter.

use std::fs::OpenOptions;

use notesfs_core::Config;
use tracing_subscriber::EnvFilter;

/// Pick the log level from -v flags, falling back to the configured level
pub fn level_for(config: &Config, verbosity: u8) -> &str {
    match verbosity {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global tracing subscriber
pub fn init(config: &Config, verbosity: u8) {
    let level = level_for(config, verbosity);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("notesfs_core={},notesfs={}", level, level))
    });

    if let Some(log_path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(log_file) => {
                // Ignore error if already initialized
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(log_file)
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        let config = Config {
            log_level: "error".to_string(),
            ..Config::default()
        };
        assert_eq!(level_for(&config, 0), "error");
        assert_eq!(level_for(&config, 1), "info");
        assert_eq!(level_for(&config, 2), "debug");
        assert_eq!(level_for(&config, 5), "trace");
    }
}
