use crate::cli::commands::history_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, all, yes } = cmd {
        let prompt = match id {
            Some(id) if !*all => format!("Delete history entry #{id}? This action is irreversible."),
            _ => "Delete ALL history entries? This action is irreversible.".to_string(),
        };

        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        let service = history_service(cfg)?;
        let ack = match id {
            Some(id) if !*all => service.delete_one(*id).await?,
            _ => service.delete_all().await?,
        };
        success(ack.message);
    }

    Ok(())
}
