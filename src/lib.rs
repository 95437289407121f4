pub mod cli;
pub mod commands;
pub mod config;
pub mod contacts;
pub mod dialer;
pub mod rota;
pub mod ui;
pub mod update;
pub mod widget;

use anyhow::Result;
use log::*;

pub async fn run(cli: cli::Cli) -> Result<()> {
    debug!("Running command: {:?}", cli.command);
    commands::run(cli).await
}

/// Debug-level logger without timestamps; safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .is_test(true)
        .try_init();
}

// Re-export commonly used types
pub use config::Config;
pub use contacts::{Contact, NameResolver, NicknameMap, Resolution};
pub use rota::{RotaDay, RotaSheet};
