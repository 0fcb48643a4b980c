pub mod add;
pub mod config;
pub mod del;
pub mod init;
pub mod list;
pub mod serve;

use crate::config::Config;
use crate::core::history::HistoryService;
use crate::errors::AppResult;
use crate::store::open_store;

/// History service over the configured backend and table.
pub fn history_service(cfg: &Config) -> AppResult<HistoryService> {
    let store = open_store(cfg)?;
    Ok(HistoryService::with_table(store, cfg.table.clone()))
}
