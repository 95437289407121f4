use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use qerota::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with custom format
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();
    info!("Starting qerota");

    if let Err(err) = qerota::run(cli).await {
        error!("Failed to process command: {:?}", err);
        return Err(err);
    }
    Ok(())
}
