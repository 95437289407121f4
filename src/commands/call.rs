use crate::cli::Commands;
use crate::commands::{AppContext, CommandExecutor};
use crate::contacts::{JsonContactSource, NameResolver};
use crate::dialer::{CallOutcome, OnCallDialer, SystemOpener};
use crate::rota;
use crate::ui::TerminalUi;
use crate::update::UpdateChecker;
use anyhow::Result;
use log::{debug, info};
use std::future::Future;
use std::pin::Pin;

pub struct CallCommand;

impl CommandExecutor for CallCommand {
    fn execute<'a>(
        &'a self,
        ctx: &'a AppContext,
        command: &'a Commands,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            match command {
                Commands::Call { no_update_check } => handle_call(ctx, *no_update_check).await,
                _ => Ok(()),
            }
        })
    }

    fn can_handle(&self, command: &Commands) -> bool {
        matches!(command, Commands::Call { .. })
    }
}

async fn handle_call(ctx: &AppContext, skip_update_check: bool) -> Result<()> {
    let sheet = rota::load(&ctx.config.rota.csv_url).await?;
    let today = sheet.day(0)?;
    let update = ctx.update_status(skip_update_check).await?;

    let source = JsonContactSource::new(ctx.config.address_book_path()?);
    let nicknames = ctx.config.nickname_map();
    let ui = TerminalUi::new();
    let resolver = NameResolver::new(&source, &ui, &nicknames);
    let opener = SystemOpener;
    let country_code = ctx.config.contacts.country_code.as_str();
    let dialer = OnCallDialer::new(&ui, &resolver, &opener, country_code);

    match dialer.run(&today, update).await? {
        CallOutcome::UpdateRequested => {
            info!("Update option selected. Launching installer...");
            let flags = ctx.flag_store()?;
            UpdateChecker::new(ctx.config.update.installer.clone(), &flags)
                .launch_interactive()
                .await?;
        }
        outcome => debug!("Dialer finished: {:?}", outcome),
    }
    Ok(())
}
