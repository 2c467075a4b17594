//! flowboard-cli - Script and inspect a flowboard session
//!
//! The board lives in memory only, so every invocation starts from the
//! configured seed and applies whatever the command asks for.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flowboard_core::Config;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "flowboard-cli")]
#[command(about = "Script and inspect a flowboard kanban board")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to the XDG config location)
    #[arg(short, long, global = true, env = "FLOWBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Start from an empty board instead of the sample data
    #[arg(long, global = true)]
    empty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the starting board
    Show {
        /// Apply the configured view (hide archived items)
        #[arg(long)]
        filtered: bool,
    },

    /// Apply a JSON-lines command script and print the result
    Replay {
        /// Script file, one command object per line
        file: PathBuf,

        /// Print only what the filters let through
        #[arg(long)]
        filtered: bool,
    },

    /// List board members
    Users,

    /// Show or write configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the config file location
    Path,
    /// Get a config value (dotted key, e.g. display.date_format)
    Get { key: String },
    /// Set a config value and save the file
    Set { key: String, value: String },
    /// Write a commented default config if none exists
    Init,
    /// Reset to default configuration
    Reset,
}

fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    if cli.empty {
        config.seed_sample_data = false;
    }
    init_logging(&config.log_level);
    if !config.display.colors {
        colored::control::set_override(false);
    }

    let config_path = cli.config.clone().or_else(Config::default_path);

    match cli.command {
        Commands::Show { filtered } => commands::show(&config, filtered, cli.json),
        Commands::Replay { file, filtered } => commands::replay(&config, &file, filtered, cli.json),
        Commands::Users => commands::users(&config, cli.json),
        Commands::Config { command } => {
            let path = config_path.context("no config directory available")?;
            match command {
                Some(ConfigCommands::Show) | None => commands::config_show(&config, cli.json),
                Some(ConfigCommands::Path) => commands::config_path(&path),
                Some(ConfigCommands::Get { key }) => commands::config_get(&config, &key, cli.json),
                Some(ConfigCommands::Set { key, value }) => {
                    commands::config_set(&path, &key, &value)
                }
                Some(ConfigCommands::Init) => commands::config_init(&path),
                Some(ConfigCommands::Reset) => commands::config_reset(&path),
            }
        }
    }
}
