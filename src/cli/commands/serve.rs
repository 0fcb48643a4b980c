use crate::cli::commands::history_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::path::expand_tilde;
use crate::web::{self, AppState};
use tokio::net::TcpListener;
use tracing::info;

/// Handle the `serve` command: bind and run until Ctrl-C.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve {
        host,
        port,
        web_root,
    } = cmd
    {
        let history = history_service(cfg)?;

        let host = host.as_deref().unwrap_or(&cfg.host);
        let port = port.unwrap_or(cfg.port);
        let root = expand_tilde(web_root.as_deref().unwrap_or(&cfg.web_root));

        info!(backend = ?cfg.backend, web_root = %root.display(), "starting TimeSpent");
        let listener = TcpListener::bind((host, port)).await?;
        web::serve(listener, AppState::new(history, root)).await?;
    }
    Ok(())
}
