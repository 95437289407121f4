use crate::cli::Commands;
use crate::commands::{AppContext, CommandExecutor};
use crate::contacts::{Contact, JsonContactSource, NameResolver, Resolution};
use crate::ui::TerminalUi;
use anyhow::{Result, anyhow};
use std::future::Future;
use std::pin::Pin;

pub struct LookupCommand;

impl CommandExecutor for LookupCommand {
    fn execute<'a>(
        &'a self,
        ctx: &'a AppContext,
        command: &'a Commands,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            match command {
                Commands::Lookup { first_name, last_name } => {
                    handle_lookup(ctx, first_name, last_name).await
                }
                _ => Ok(()),
            }
        })
    }

    fn can_handle(&self, command: &Commands) -> bool {
        matches!(command, Commands::Lookup { .. })
    }
}

async fn handle_lookup(ctx: &AppContext, first_name: &str, last_name: &str) -> Result<()> {
    let source = JsonContactSource::new(ctx.config.address_book_path()?);
    let nicknames = ctx.config.nickname_map();
    let ui = TerminalUi::new();
    let resolver = NameResolver::new(&source, &ui, &nicknames);

    let resolution = resolver.resolve_outcome(first_name, last_name).await;
    if let Resolution::SourceUnavailable(reason) = &resolution {
        return Err(anyhow!("Could not read contacts from {}: {}", source.path().display(), reason));
    }

    let contacts = resolution.into_contacts();
    if contacts.is_empty() {
        println!("No contact found for {} {}", first_name, last_name);
        return Ok(());
    }
    for contact in &contacts {
        print_contact(contact);
    }
    Ok(())
}

fn print_contact(contact: &Contact) {
    println!("{}", contact.full_name());
    if contact.phone_numbers.is_empty() {
        println!("  (no phone number listed)");
    }
    for phone in &contact.phone_numbers {
        match &phone.label {
            Some(label) => println!("  {}: {}", label, phone.value),
            None => println!("  {}", phone.value),
        }
    }
}
