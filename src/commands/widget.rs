use crate::cli::Commands;
use crate::commands::{AppContext, CommandExecutor};
use crate::dialer::{SystemOpener, UrlOpener};
use crate::rota::{self, WidgetParameter};
use crate::widget::WidgetView;
use anyhow::{Result, anyhow};
use log::{info, warn};
use std::future::Future;
use std::pin::Pin;

pub struct WidgetCommand;

impl CommandExecutor for WidgetCommand {
    fn execute<'a>(
        &'a self,
        ctx: &'a AppContext,
        command: &'a Commands,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            match command {
                Commands::Widget { parameter, width, no_update_check } => {
                    show_widget(ctx, parameter.as_deref(), *width, *no_update_check).await
                }
                Commands::Open => open_rota(ctx).await,
                _ => Ok(()),
            }
        })
    }

    fn can_handle(&self, command: &Commands) -> bool {
        matches!(command, Commands::Widget { .. } | Commands::Open)
    }
}

async fn show_widget(
    ctx: &AppContext,
    parameter: Option<&str>,
    width: usize,
    skip_update_check: bool,
) -> Result<()> {
    let parameter = WidgetParameter::parse(parameter);
    if parameter.invalid {
        warn!("Invalid widget parameter, showing today");
    }

    let sheet = rota::load(&ctx.config.rota.csv_url).await?;
    let day = sheet.day(parameter.offset)?;
    let update = ctx.update_status(skip_update_check).await?;

    let mut view = WidgetView::new(day);
    view.tap_url = ctx.config.rota.dialer_url.clone();
    view.invalid_parameter = parameter.invalid;
    view.update_available = update.is_available();

    print!("{}", view.render(width));
    Ok(())
}

async fn open_rota(ctx: &AppContext) -> Result<()> {
    let url = ctx
        .config
        .rota
        .open_url
        .as_deref()
        .ok_or_else(|| anyhow!("No monthly rota URL configured"))?;
    info!("Opening monthly rota: {}", url);
    SystemOpener.open(url).await
}
