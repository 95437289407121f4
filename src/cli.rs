use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// qerota - on-call rota card and contact dialer
#[derive(Debug, Parser)]
#[command(name = "qerota")]
#[command(about = "On-call rota card and contact dialer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the on-call rota card
    #[command(alias = "rota")]
    Widget {
        /// Day to show: 0 for today, 1 for tomorrow
        #[arg(long, short = 'p')]
        parameter: Option<String>,

        /// Card width in columns
        #[arg(long, default_value_t = crate::widget::DEFAULT_WIDTH)]
        width: usize,

        /// Skip the silent update check
        #[arg(long)]
        no_update_check: bool,
    },

    /// Call, message or WhatsApp someone on call today
    #[command(alias = "dial")]
    Call {
        /// Skip the silent update check
        #[arg(long)]
        no_update_check: bool,
    },

    /// Look up a contact by first and last name
    #[command(alias = "find")]
    Lookup {
        #[arg(required = true)]
        first_name: String,

        #[arg(required = true)]
        last_name: String,
    },

    /// Open the monthly rota in the browser
    Open,

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigActions {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,
}
