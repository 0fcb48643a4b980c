use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config } = cmd {
        if *print_config {
            info(format!(
                "Current configuration ({}):\n",
                Config::config_file().display()
            ));
            println!("{}", serde_yaml::to_string(&redacted(cfg))?);
        } else {
            info(format!("Config file: {}", Config::config_file().display()));
        }
    }
    Ok(())
}

/// Copy of `cfg` safe to show on screen.
fn redacted(cfg: &Config) -> Config {
    let mut shown = cfg.clone();
    if shown.supabase_key.is_some() {
        shown.supabase_key = Some("********".to_string());
    }
    shown
}
