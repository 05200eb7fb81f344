//! notesfs CLI
//!
//! Command-line interface for notesfs - a file system kept in a single
//! notes file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;

use notesfs_core::{Config, StorageError, Store};

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "notesfs")]
#[command(about = "notesfs - A file system kept in a single notes file")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Store file to use (".notes" is added when missing)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Config file to use instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty store
    Init,
    /// List every entry in the store
    #[command(alias = "ls")]
    List,
    /// Copy an external file or directory into the store
    #[command(name = "copyin", alias = "cp-in")]
    CopyIn {
        /// External file to read
        external: PathBuf,
        /// Name to store it under (missing parent directories are created)
        name: String,
    },
    /// Copy an entry out of the store
    #[command(name = "copyout", alias = "cp-out")]
    CopyOut {
        /// Entry name
        name: String,
        /// External file to write
        external: PathBuf,
    },
    /// Create a directory
    Mkdir {
        /// Directory name ("/" is added when missing)
        name: String,
    },
    /// Delete an entry (directories are deleted with their contents)
    #[command(alias = "remove")]
    Rm {
        /// Entry name
        name: String,
    },
    /// Drop deleted entries and put the store back into tree order
    Defrag,
    /// Drop deleted entries, keeping the current order
    Index,
    /// Show store status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, store_name, log_level, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let result = run(cli);

    if let Err(ref e) = result {
        if let Some(hint) = e
            .downcast_ref::<StorageError>()
            .and_then(StorageError::recovery_suggestion)
        {
            eprintln!("hint: {}", hint);
        }
    }

    result
}

fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;

    logging::init(&config, cli.verbose);

    // Config commands don't need a store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let store_path = match cli.store {
        Some(path) => path,
        None => {
            config.ensure_data_dir()?;
            config.store_path()
        }
    };
    debug!("Using store {:?}", store_path);

    match cli.command {
        Commands::Init => commands::store::init(&store_path, &output),
        Commands::List => commands::list::list(&open_store(&store_path)?, &output),
        Commands::CopyIn { external, name } => {
            let mut store = Store::open_or_create(&store_path)
                .with_context(|| format!("Failed to open store {:?}", store_path))?;
            commands::copy::copy_in(&mut store, external, name, &output)
        }
        Commands::CopyOut { name, external } => {
            commands::copy::copy_out(&open_store(&store_path)?, name, external, &output)
        }
        Commands::Mkdir { name } => {
            let mut store = Store::open_or_create(&store_path)
                .with_context(|| format!("Failed to open store {:?}", store_path))?;
            commands::entry::mkdir(&mut store, name, &output)
        }
        Commands::Rm { name } => commands::entry::remove(&mut open_store(&store_path)?, name, &output),
        Commands::Defrag => commands::store::defrag(&mut open_store(&store_path)?, &output),
        Commands::Index => commands::store::reindex(&mut open_store(&store_path)?, &output),
        Commands::Status => commands::status::show(&open_store(&store_path)?, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn open_store(path: &Path) -> Result<Store> {
    Store::open(path).with_context(|| format!("Failed to open store {:?}", path))
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_copyin() {
        let cli = Cli::parse_from(["notesfs", "--store", "fs", "copyin", "notes.txt", "a/notes.txt"]);
        assert_eq!(cli.store, Some(PathBuf::from("fs")));
        match cli.command {
            Commands::CopyIn { external, name } => {
                assert_eq!(external, PathBuf::from("notes.txt"));
                assert_eq!(name, "a/notes.txt");
            }
            _ => panic!("expected copyin"),
        }
    }

    #[test]
    fn test_parse_aliases_and_verbosity() {
        let cli = Cli::parse_from(["notesfs", "ls", "-vv"]);
        assert!(matches!(cli.command, Commands::List));
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["notesfs", "remove", "a/"]);
        assert!(matches!(cli.command, Commands::Rm { .. }));
    }
}
