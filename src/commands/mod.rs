use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::update::{JsonFlagStore, UpdateChecker, UpdateStatus};
use anyhow::{Result, anyhow};
use log::{debug, info};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

pub mod call;
pub mod config;
pub mod lookup;
pub mod widget;

/// Everything a command needs from the environment.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
}

impl AppContext {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => crate::config::get_config_path()?,
        };
        debug!("Loading config from {}", config_path.display());
        let config = Config::load_from(&config_path)?;
        Ok(Self { config, config_path })
    }

    pub fn flag_store(&self) -> Result<JsonFlagStore> {
        Ok(JsonFlagStore::new(self.config.flags_path()?))
    }

    /// Silent update check, or `Unavailable` when skipped.
    pub async fn update_status(&self, skip: bool) -> Result<UpdateStatus> {
        if skip {
            debug!("Update check skipped");
            return Ok(UpdateStatus::Unavailable);
        }
        let flags = self.flag_store()?;
        let checker = UpdateChecker::new(self.config.update.installer.clone(), &flags);
        Ok(checker.check().await)
    }
}

// Command executor trait for handling commands
pub trait CommandExecutor {
    fn execute<'a>(
        &'a self,
        ctx: &'a AppContext,
        command: &'a Commands,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>>;
    fn can_handle(&self, command: &Commands) -> bool;
}

pub struct CommandProcessor {
    executors: Vec<Box<dyn CommandExecutor>>,
}

impl CommandProcessor {
    pub fn new() -> Self {
        let executors: Vec<Box<dyn CommandExecutor>> = vec![
            Box::new(widget::WidgetCommand),
            Box::new(call::CallCommand),
            Box::new(lookup::LookupCommand),
            Box::new(config::ConfigCommand),
        ];
        Self { executors }
    }

    pub async fn execute(&self, ctx: &AppContext, command: &Commands) -> Result<()> {
        for executor in &self.executors {
            if executor.can_handle(command) {
                debug!("Executing command: {:?}", command);
                return executor.execute(ctx, command).await;
            }
        }
        Err(anyhow!("No handler for command {:?}", command))
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::load(cli.config)?;
    info!("qerota {}", env!("CARGO_PKG_VERSION"));
    CommandProcessor::new().execute(&ctx, &cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigActions;
    use tempfile::tempdir;

    #[test]
    fn test_every_command_has_an_executor() {
        let processor = CommandProcessor::new();
        let commands = [
            Commands::Widget { parameter: None, width: 32, no_update_check: true },
            Commands::Call { no_update_check: true },
            Commands::Lookup { first_name: "Jane".into(), last_name: "Doe".into() },
            Commands::Open,
            Commands::Config { action: ConfigActions::Path },
        ];
        for command in &commands {
            let handlers = processor.executors.iter().filter(|e| e.can_handle(command)).count();
            assert_eq!(handlers, 1, "expected one executor for {:?}", command);
        }
    }

    #[tokio::test]
    async fn test_skipped_update_check() -> Result<()> {
        let dir = tempdir()?;
        let ctx = AppContext::load(Some(dir.path().join("config.toml")))?;
        assert_eq!(ctx.update_status(true).await?, UpdateStatus::Unavailable);
        Ok(())
    }
}
