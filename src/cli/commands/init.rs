use crate::cli::parser::Cli;
use crate::config::{Backend, Config};
use crate::errors::AppResult;
use crate::store::SqliteStore;
use crate::ui::messages::{info, success, warning};
use std::fs;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the local SQLite database and its `history` table
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database_path();

    info("Initializing TimeSpent…");
    info(format!("Config file : {}", Config::config_file().display()));
    info(format!("Database    : {}", db_path.display()));

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    SqliteStore::open(&db_path.to_string_lossy())?;
    success(format!("Database initialized at {}", db_path.display()));

    if cfg.backend == Backend::Remote && cfg.remote_credentials().is_err() {
        warning("Backend is `remote` but SUPABASE_URL / SUPABASE_KEY are not set yet.");
    }

    Ok(())
}
