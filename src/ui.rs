//! Terminal presentation: alert menus and the contact picker.
//
// Both collaborators block the calling flow until the user answers. The
// terminal versions read a number with rustyline; empty input, `q`, CTRL-C
// and CTRL-D all cancel.

use crate::contacts::Contact;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::debug;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// One selectable row in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub payload: Contact,
}

impl Choice {
    pub fn for_contact(contact: &Contact) -> Self {
        Self { label: contact.full_name(), payload: contact.clone() }
    }
}

/// Modal list of contacts; returns the selected one or `None` when dismissed.
#[async_trait]
pub trait Picker: Send + Sync {
    async fn present(&self, choices: Vec<Choice>) -> Result<Option<Contact>>;
}

/// A titled menu of actions with an optional cancel entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub actions: Vec<String>,
    pub cancel: Option<String>,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into(), ..Default::default() }
    }

    pub fn add_action(&mut self, label: impl Into<String>) -> usize {
        self.actions.push(label.into());
        self.actions.len() - 1
    }

    pub fn add_cancel_action(&mut self, label: impl Into<String>) {
        self.cancel = Some(label.into());
    }
}

/// Presents alerts. `Ok(None)` means the cancel action (or no answer).
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn present_alert(&self, alert: &Alert) -> Result<Option<usize>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Index(usize),
    Cancel,
    Invalid,
}

/// Interprets a typed answer against a 1-based list of `count` entries.
pub fn parse_selection(input: &str, count: usize) -> Selection {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("q") || trimmed == "0" {
        return Selection::Cancel;
    }
    match trimmed.parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Selection::Index(n - 1),
        _ => Selection::Invalid,
    }
}

/// Renders a numbered list, one entry per line.
pub fn render_menu(title: &str, message: &str, entries: &[String], cancel: Option<&str>) -> String {
    let mut out = String::new();
    if !title.is_empty() {
        out.push_str(title);
        out.push('\n');
    }
    if !message.is_empty() {
        out.push_str(message);
        out.push('\n');
    }
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, entry));
    }
    if let Some(cancel) = cancel {
        out.push_str(&format!("  0. {}\n", cancel));
    }
    out
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        Self
    }

    async fn ask(&self, menu: String, count: usize) -> Result<Option<usize>> {
        tokio::task::spawn_blocking(move || read_selection(&menu, count))
            .await
            .map_err(|e| anyhow!("Prompt task failed: {}", e))?
    }
}

fn read_selection(menu: &str, count: usize) -> Result<Option<usize>> {
    print!("{}", menu);
    let mut rl = DefaultEditor::new()?;
    if count == 0 {
        // Nothing to choose; wait for acknowledgement.
        return match rl.readline("Press Enter to continue ") {
            Ok(_) | Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow!("Failed to read input: {}", err)),
        };
    }
    let prompt = format!("Select [1-{}]: ", count);
    loop {
        match rl.readline(&prompt) {
            Ok(line) => match parse_selection(&line, count) {
                Selection::Index(i) => return Ok(Some(i)),
                Selection::Cancel => return Ok(None),
                Selection::Invalid => println!("Please enter a number between 1 and {}.", count),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(anyhow!("Failed to read selection: {}", err)),
        }
    }
}

#[async_trait]
impl Prompter for TerminalUi {
    async fn present_alert(&self, alert: &Alert) -> Result<Option<usize>> {
        let cancel = if alert.actions.is_empty() {
            None
        } else {
            alert.cancel.as_deref()
        };
        let menu = render_menu(&alert.title, &alert.message, &alert.actions, cancel);
        self.ask(menu, alert.actions.len()).await
    }
}

#[async_trait]
impl Picker for TerminalUi {
    async fn present(&self, choices: Vec<Choice>) -> Result<Option<Contact>> {
        let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
        let menu = render_menu("Matching contacts", "", &labels, Some("Dismiss"));
        let selected = self.ask(menu, labels.len()).await?;
        Ok(selected.and_then(|i| {
            let choice = choices.into_iter().nth(i)?;
            debug!("Selected: {}", choice.label);
            Some(choice.payload)
        }))
    }
}
