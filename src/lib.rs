//! TimeSpent library root.
//! Exposes the CLI parser, the high-level `run()` function and the history
//! service with its stores and HTTP surface.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;
pub mod web;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::{Backend, Config};
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg).await,
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg).await,
        Commands::Add { .. } => cli::commands::add::handle(&cli.command, cfg).await,
        Commands::Del { .. } => cli::commands::del::handle(&cli.command, cfg).await,
    }
}

/// Install the global `tracing` subscriber (stderr, filtered by `level`).
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // a `.env` next to the app fills in variables the shell did not set
    dotenvy::dotenv().ok();

    // config is loaded once; CLI flags win over file and environment
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
        cfg.backend = Backend::Sqlite;
    }
    if let Some(backend) = cli.backend {
        cfg.backend = backend;
    }

    // one-shot commands stay quiet unless asked
    let level = match (&cli.log_level, &cli.command) {
        (Some(level), _) => level.clone(),
        (None, Commands::Serve { .. }) => cfg.log_level.clone(),
        (None, _) => "warn".to_string(),
    };
    init_tracing(&level);

    dispatch(&cli, &cfg).await
}
