use crate::cli::{Commands, ConfigActions};
use crate::commands::{AppContext, CommandExecutor};
use anyhow::Result;
use std::future::Future;
use std::pin::Pin;

pub struct ConfigCommand;

impl CommandExecutor for ConfigCommand {
    fn execute<'a>(
        &'a self,
        ctx: &'a AppContext,
        command: &'a Commands,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            match command {
                Commands::Config { action } => handle_config_command(ctx, action),
                _ => Ok(()),
            }
        })
    }

    fn can_handle(&self, command: &Commands) -> bool {
        matches!(command, Commands::Config { .. })
    }
}

fn handle_config_command(ctx: &AppContext, action: &ConfigActions) -> Result<()> {
    match action {
        ConfigActions::Show => {
            let config = &ctx.config;
            println!("\nCurrent Configuration ({}):", ctx.config_path.display());
            println!("\nRota:");
            println!("  CSV URL: {}", config.rota.csv_url);
            println!("  Monthly Rota: {}", config.rota.open_url.as_deref().unwrap_or("None"));
            println!("  Dialer: {}", config.rota.dialer_url.as_deref().unwrap_or("None"));
            println!("\nContacts:");
            println!("  Address Book: {}", config.address_book_path()?.display());
            println!("  Country Code: +{}", config.contacts.country_code);
            println!("  Nicknames: {} name(s)", config.nickname_map().len());
            println!("\nUpdates:");
            if config.update.installer.is_empty() {
                println!("  Installer: None");
            } else {
                println!("  Installer: {}", config.update.installer.join(" "));
            }
            println!("  Flags File: {}", config.flags_path()?.display());
        }
        ConfigActions::Path => {
            println!("{}", ctx.config_path.display());
        }
    }
    Ok(())
}
