use crate::config::Backend;
use clap::{Parser, Subcommand};

/// Command-line interface definition for TimeSpent
#[derive(Parser)]
#[command(
    name = "timespent",
    version = env!("CARGO_PKG_VERSION"),
    about = "TimeSpent timer history: web backend and CLI over a hosted history table",
    long_about = None
)]
pub struct Cli {
    /// Override the local database path (implies `--backend sqlite`)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Storage backend to use instead of the configured one
    #[arg(global = true, long = "backend", value_enum)]
    pub backend: Option<Backend>,

    /// Log filter, e.g. `debug` or `timespent=trace`
    #[arg(global = true, long = "log-level")]
    pub log_level: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and the local database
    Init,

    /// Show the configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,
    },

    /// Serve the web page and the history API
    Serve {
        /// Address to bind (default from config: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (default from config or $PORT: 5000)
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Directory holding templates/, static/ and .version
        #[arg(long = "web-root")]
        web_root: Option<String>,
    },

    /// List history entries, newest first
    List {
        /// Only entries whose tags contain this text
        #[arg(long)]
        tag: Option<String>,

        /// Print the API's JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Record a finished timer session
    Add {
        /// What the session was about
        #[arg(long, short = 'd')]
        description: String,

        /// Length in seconds
        #[arg(long = "duration", short = 's')]
        duration: String,

        /// Comma-separated tags
        #[arg(long, short = 't')]
        tags: Option<String>,

        /// Start time, RFC 3339 (default: end minus duration)
        #[arg(long)]
        start: Option<String>,

        /// End time, RFC 3339 (default: now)
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete one entry or the whole history
    Del {
        /// Id of the entry to delete
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        id: Option<i64>,

        /// Delete every entry
        #[arg(long)]
        all: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
