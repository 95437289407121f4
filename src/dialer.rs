//! On-call dialer: pick a person from today's rota, find them in the address
//! book and hand a `tel:`, `sms:` or WhatsApp URL to the system.

use crate::contacts::NameResolver;
use crate::rota::RotaDay;
use crate::ui::{Alert, Prompter};
use crate::update::UpdateStatus;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, error, info};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_COUNTRY_CODE: &str = "44";
pub const UPDATE_ACTION_LABEL: &str = "Update Available ⬇️";

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid regex"));

/// Digits only, with a leading trunk `0` replaced by the country code.
pub fn format_for_whatsapp(number: &str, country_code: &str) -> String {
    let cleaned = NON_DIGITS.replace_all(number, "");
    match cleaned.strip_prefix('0') {
        Some(rest) => format!("{}{}", country_code, rest),
        None => cleaned.into_owned(),
    }
}

/// First and last name from a rota cell such as "Jane Doe".
pub fn split_name(full_name: &str) -> Option<(&str, &str)> {
    let mut parts = full_name.split_whitespace();
    let first = parts.next()?;
    let last = parts.next()?;
    Some((first, last))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    Call,
    Message,
    WhatsApp,
}

impl ContactAction {
    pub const ALL: [ContactAction; 3] =
        [ContactAction::Call, ContactAction::Message, ContactAction::WhatsApp];

    pub fn label(self) -> &'static str {
        match self {
            ContactAction::Call => "Call",
            ContactAction::Message => "Message",
            ContactAction::WhatsApp => "WhatsApp",
        }
    }

    pub fn url(self, phone_number: &str, country_code: &str) -> String {
        match self {
            ContactAction::Call => format!("tel:{}", phone_number),
            ContactAction::Message => format!("sms:{}", phone_number),
            ContactAction::WhatsApp => {
                format!("https://wa.me/{}", format_for_whatsapp(phone_number, country_code))
            }
        }
    }
}

/// Opens a URL with whatever handles it on this machine.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

#[async_trait]
impl UrlOpener for SystemOpener {
    async fn open(&self, url: &str) -> Result<()> {
        let program = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        debug!("Opening {} with {}", url, program);
        let output = tokio::process::Command::new(program)
            .arg(url)
            .output()
            .await
            .map_err(|e| anyhow!("Failed to execute {}: {}", program, e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{} failed: {}", program, stderr.trim()));
        }
        Ok(())
    }
}

/// How a dialer run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Cancelled,
    UpdateRequested,
    NotFound(String),
    NoPhoneNumber(String),
    Opened(String),
}

pub struct OnCallDialer<'a> {
    prompter: &'a dyn Prompter,
    resolver: &'a NameResolver<'a>,
    opener: &'a dyn UrlOpener,
    country_code: String,
}

impl<'a> OnCallDialer<'a> {
    pub fn new(
        prompter: &'a dyn Prompter,
        resolver: &'a NameResolver<'a>,
        opener: &'a dyn UrlOpener,
        country_code: impl Into<String>,
    ) -> Self {
        Self { prompter, resolver, opener, country_code: country_code.into() }
    }

    pub async fn run(&self, day: &RotaDay, update: UpdateStatus) -> Result<CallOutcome> {
        let mut menu = Alert::new("Select Contact", "Who would you like to contact?");
        for entry in &day.entries {
            menu.add_action(format!("{}: {}", entry.role, entry.name));
        }
        let update_index = update.is_available().then(|| menu.add_action(UPDATE_ACTION_LABEL));
        menu.add_cancel_action("Cancel");

        let Some(response) = self.prompter.present_alert(&menu).await? else {
            return Ok(CallOutcome::Cancelled);
        };
        if Some(response) == update_index {
            info!("Update option selected");
            return Ok(CallOutcome::UpdateRequested);
        }
        let selected_name = day
            .entries
            .get(response)
            .map(|e| e.name.trim().to_string())
            .ok_or_else(|| anyhow!("Invalid menu selection {}", response))?;

        let found = match split_name(&selected_name) {
            Some((first, last)) => self.resolver.resolve(first, last).await,
            None => {
                error!("Cannot split '{}' into first and last name", selected_name);
                Vec::new()
            }
        };

        let Some(contact) = found.into_iter().next() else {
            self.notify("Contact Not Found", format!("No contact found for {}", selected_name))
                .await?;
            return Ok(CallOutcome::NotFound(selected_name));
        };

        let Some(phone_number) = contact.first_phone().map(str::to_string) else {
            self.notify("No Phone Number", format!("{} has no phone number listed.", selected_name))
                .await?;
            return Ok(CallOutcome::NoPhoneNumber(selected_name));
        };

        let mut actions = Alert::new(
            format!("Contact {}", selected_name),
            format!("What would you like to do with {}?", phone_number),
        );
        for action in ContactAction::ALL {
            actions.add_action(action.label());
        }
        actions.add_cancel_action("Cancel");

        let chosen = self
            .prompter
            .present_alert(&actions)
            .await?
            .and_then(|i| ContactAction::ALL.get(i).copied());
        let Some(action) = chosen else {
            return Ok(CallOutcome::Cancelled);
        };

        let url = action.url(&phone_number, &self.country_code);
        info!("{} {} via {}", action.label(), selected_name, url);
        self.opener.open(&url).await?;
        Ok(CallOutcome::Opened(url))
    }

    async fn notify(&self, title: &str, message: String) -> Result<()> {
        let mut alert = Alert::new(title, message);
        alert.add_cancel_action("OK");
        self.prompter.present_alert(&alert).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::{Contact, MemoryContactSource, NicknameMap};
    use crate::rota::RotaEntry;
    use crate::ui::{Choice, Picker};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use test_case::test_case;

    #[test_case("07700 900123" => "447700900123"; "uk mobile")]
    #[test_case("+44 7700 900123" => "447700900123"; "already international")]
    #[test_case("(0161) 496-0000" => "441614960000"; "punctuation")]
    #[test_case("" => ""; "empty")]
    fn test_format_for_whatsapp(number: &str) -> String {
        format_for_whatsapp(number, DEFAULT_COUNTRY_CODE)
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("Jane Doe"), Some(("Jane", "Doe")));
        assert_eq!(split_name("  Jane   Doe  "), Some(("Jane", "Doe")));
        assert_eq!(split_name("Mary Ann Lee"), Some(("Mary", "Ann")));
        assert_eq!(split_name("Cher"), None);
        assert_eq!(split_name(""), None);
    }

    #[test]
    fn test_action_urls() {
        assert_eq!(ContactAction::Call.url("07700 900123", "44"), "tel:07700 900123");
        assert_eq!(ContactAction::Message.url("07700 900123", "44"), "sms:07700 900123");
        assert_eq!(ContactAction::WhatsApp.url("07700 900123", "44"), "https://wa.me/447700900123");
    }

    /// Answers alerts from a script and remembers what was shown.
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: Mutex<VecDeque<Option<usize>>>,
        shown: Mutex<Vec<Alert>>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[Option<usize>]) -> Self {
            Self { answers: Mutex::new(answers.iter().copied().collect()), ..Default::default() }
        }

        fn titles(&self) -> Vec<String> {
            self.shown.lock().unwrap().iter().map(|a| a.title.clone()).collect()
        }
    }

    #[async_trait]
    impl Prompter for ScriptedPrompter {
        async fn present_alert(&self, alert: &Alert) -> Result<Option<usize>> {
            self.shown.lock().unwrap().push(alert.clone());
            Ok(self.answers.lock().unwrap().pop_front().flatten())
        }
    }

    struct NeverPicked;

    #[async_trait]
    impl Picker for NeverPicked {
        async fn present(&self, _choices: Vec<Choice>) -> Result<Option<Contact>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UrlOpener for RecordingOpener {
        async fn open(&self, url: &str) -> Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn today() -> RotaDay {
        RotaDay {
            date: "Mon 14 Oct".into(),
            entries: vec![
                RotaEntry { role: "Consultant".into(), name: "Jane Doe".into() },
                RotaEntry { role: "Day SpR".into(), name: "William Jones".into() },
                RotaEntry { role: "Night SpR".into(), name: "Cher".into() },
            ],
        }
    }

    fn address_book() -> MemoryContactSource {
        MemoryContactSource::new(vec![
            Contact::new("Jane", "Doe").with_phone("07700 900123"),
            Contact::new("Bill", "Jones"),
        ])
    }

    async fn run_with(
        answers: &[Option<usize>],
        update: UpdateStatus,
    ) -> (CallOutcome, Vec<String>, Vec<String>) {
        let source = address_book();
        let nicknames = NicknameMap::with_defaults();
        let picker = NeverPicked;
        let resolver = NameResolver::new(&source, &picker, &nicknames);
        let prompter = ScriptedPrompter::new(answers);
        let opener = RecordingOpener::default();
        let dialer = OnCallDialer::new(&prompter, &resolver, &opener, DEFAULT_COUNTRY_CODE);

        let outcome = dialer.run(&today(), update).await.unwrap();
        let opened = opener.opened.lock().unwrap().clone();
        (outcome, prompter.titles(), opened)
    }

    #[tokio::test]
    async fn test_whatsapp_consultant() {
        let (outcome, titles, opened) = run_with(&[Some(0), Some(2)], UpdateStatus::UpToDate).await;
        assert_eq!(outcome, CallOutcome::Opened("https://wa.me/447700900123".into()));
        assert_eq!(titles, vec!["Select Contact", "Contact Jane Doe"]);
        assert_eq!(opened, vec!["https://wa.me/447700900123"]);
    }

    #[tokio::test]
    async fn test_cancel_first_menu() {
        let (outcome, _, opened) = run_with(&[None], UpdateStatus::UpToDate).await;
        assert_eq!(outcome, CallOutcome::Cancelled);
        assert!(opened.is_empty());
    }

    #[tokio::test]
    async fn test_contact_without_phone() {
        // "William" on the rota finds "Bill" through the nickname table.
        let (outcome, titles, _) = run_with(&[Some(1), None], UpdateStatus::UpToDate).await;
        assert_eq!(outcome, CallOutcome::NoPhoneNumber("William Jones".into()));
        assert_eq!(titles, vec!["Select Contact", "No Phone Number"]);
    }

    #[tokio::test]
    async fn test_single_word_name_not_found() {
        let (outcome, titles, _) = run_with(&[Some(2), None], UpdateStatus::UpToDate).await;
        assert_eq!(outcome, CallOutcome::NotFound("Cher".into()));
        assert_eq!(titles, vec!["Select Contact", "Contact Not Found"]);
    }

    #[tokio::test]
    async fn test_update_action_only_when_available() {
        let (outcome, _, _) = run_with(&[Some(3)], UpdateStatus::UpdateAvailable).await;
        assert_eq!(outcome, CallOutcome::UpdateRequested);

        let source = address_book();
        let nicknames = NicknameMap::new();
        let picker = NeverPicked;
        let resolver = NameResolver::new(&source, &picker, &nicknames);
        let prompter = ScriptedPrompter::new(&[None]);
        let opener = RecordingOpener::default();
        let dialer = OnCallDialer::new(&prompter, &resolver, &opener, "44");
        dialer.run(&today(), UpdateStatus::Unavailable).await.unwrap();
        let shown = prompter.shown.lock().unwrap();
        assert!(!shown[0].actions.iter().any(|a| a == UPDATE_ACTION_LABEL));
        assert_eq!(shown[0].actions[0], "Consultant: Jane Doe");
    }
}
