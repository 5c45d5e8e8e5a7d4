//! CLI definitions and entry point

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::commands;
use shopping_list::config::ServerConfig;

/// shopping-list - A minimal shopping-list REST service
#[derive(Parser, Debug)]
#[command(
    name = "shopping-list",
    version,
    about = "A minimal shopping-list REST service",
    long_about = "Serve a shopping list over HTTP.\n\n\
                  Items are stored in a document store named by the database URL \
                  (memory:, file://path, or a bare path)."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to ./shopping-list.toml if present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags that override the config file and environment
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Interface to listen on
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Store connection string
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Number of request worker threads
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Directory of static files to serve
    #[arg(long, global = true, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = self.database_url {
            config.database_url = url;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(dir) = self.static_dir {
            config.static_dir = Some(dir);
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Add items directly to the store
    Seed {
        /// Item names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List the items in the store
    List,

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Some(Command::Version) = cli.command {
        if cli.json {
            println!("{}", serde_json::json!({ "version": shopping_list::VERSION }));
        } else {
            println!("shopping-list v{}", shopping_list::VERSION);
        }
        return Ok(());
    }

    let config = load_config(cli.config.as_deref(), cli.overrides)?;

    match cli.command {
        None | Some(Command::Serve) => commands::serve(&config),
        Some(Command::Seed { names }) => commands::seed(&config, &names, cli.json),
        Some(Command::List) => commands::list(&config, cli.json),
        Some(Command::Version) => Ok(()),
    }
}

/// Build the effective config from file, environment and flags
fn load_config(
    path: Option<&Path>,
    overrides: Overrides,
) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::discover(path).context("Failed to load configuration")?;
    config
        .apply_process_env()
        .context("Failed to apply environment overrides")?;
    overrides.apply(&mut config);
    config.validate()?;
    log::debug!("Effective config: {config:?}");
    Ok(config)
}
