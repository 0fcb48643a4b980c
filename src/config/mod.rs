use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where history rows live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Hosted PostgREST/Supabase table
    #[default]
    Remote,
    /// Local SQLite file
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_key: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_web_root")]
    pub web_root: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_table() -> String {
    "history".to_string()
}
fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_web_root() -> String {
    ".".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            supabase_url: None,
            supabase_key: None,
            table: default_table(),
            database: default_database(),
            host: default_host(),
            port: default_port(),
            web_root: default_web_root(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.timespent`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".timespent")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timespent.conf")
    }

    /// Return the default path of the local SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timespent.sqlite")
    }

    /// Load the config file (defaults when absent), then apply environment overrides.
    pub fn load() -> AppResult<Self> {
        let mut cfg = Self::load_file(&Self::config_file())?;
        cfg.apply_overrides(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn load_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Apply `SUPABASE_URL`, `SUPABASE_KEY` and `PORT` from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SUPABASE_URL").filter(|v| !v.is_empty()) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_KEY").filter(|v| !v.is_empty()) {
            self.supabase_key = Some(key);
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("PORT is not a valid port: {port}")))?;
        }
        Ok(())
    }

    /// Credentials of the hosted backend; both are mandatory for it.
    pub fn remote_credentials(&self) -> AppResult<(&str, &str)> {
        match (self.supabase_url.as_deref(), self.supabase_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Ok((url, key)),
            _ => Err(AppError::Config(
                "Supabase URL and Key must be set in environment variables or the configuration file."
                    .into(),
            )),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Write a default configuration file (unless `is_test`) and return it.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let mut config = Self::load_file(&Self::config_file())?;
        if let Some(name) = custom_db {
            config.database = if Path::new(&name).is_absolute() {
                name
            } else {
                dir.join(&name).to_string_lossy().to_string()
            };
        }

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        Ok(config)
    }
}
