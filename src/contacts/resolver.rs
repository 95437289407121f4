//! Name resolution against the address book.
//!
//! A rota names people loosely ("Jon Smith", "bill jones"). Resolution keeps
//! contacts whose family name matches exactly, then narrows on the first name
//! in two tiers:
//!
//! 1. exact given name, or a nickname listed under the searched name;
//! 2. substring containment in either direction.
//!
//! Tier 2 only runs when tier 1 is empty, and its candidates always go
//! through the [`Picker`], even when there is only one.

use super::nicknames::{NicknameMap, normalize};
use super::{Contact, ContactSource};
use crate::ui::{Choice, Picker};
use anyhow::Result;
use log::{debug, error, info, warn};

/// First-name matching outcome over a last-name-filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tiered {
    /// Exact or nickname matches.
    Exact(Vec<Contact>),
    /// Substring matches, pending disambiguation.
    Partial(Vec<Contact>),
    None,
}

/// Pure matching step: no I/O, no user interaction. Input order is kept.
pub fn match_contacts(
    first_name: &str,
    last_name: &str,
    contacts: &[Contact],
    nicknames: &NicknameMap,
) -> Tiered {
    let search_first = normalize(first_name);
    let search_last = normalize(last_name);

    let same_family: Vec<&Contact> = contacts
        .iter()
        .filter(|c| normalize(c.family_name.as_deref().unwrap_or("")) == search_last)
        .collect();
    debug!("{} contact(s) with family name '{}'", same_family.len(), search_last);

    let exact: Vec<Contact> = same_family
        .iter()
        .filter(|c| {
            let given = normalize(c.given_name.as_deref().unwrap_or(""));
            given == search_first || nicknames.is_alias(&search_first, &given)
        })
        .map(|c| (*c).clone())
        .collect();
    if !exact.is_empty() {
        return Tiered::Exact(exact);
    }

    let partial: Vec<Contact> = same_family
        .iter()
        .filter(|c| {
            let given = normalize(c.given_name.as_deref().unwrap_or(""));
            given.contains(&search_first) || search_first.contains(&given)
        })
        .map(|c| (*c).clone())
        .collect();
    if partial.is_empty() {
        Tiered::None
    } else {
        Tiered::Partial(partial)
    }
}

/// How a lookup ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Tier 1 hit; returned without asking the user.
    Matched(Vec<Contact>),
    /// Tier 2 candidates and whatever the user picked from them.
    Picked { candidates: Vec<Contact>, selected: Option<Contact> },
    NoMatch,
    /// The address book could not be read.
    SourceUnavailable(String),
}

impl Resolution {
    /// Flattens to the contact list callers act on (they use element 0).
    ///
    /// A picked contact is returned alone; a dismissed picker returns all
    /// tier-2 candidates in address-book order.
    pub fn into_contacts(self) -> Vec<Contact> {
        match self {
            Resolution::Matched(contacts) => contacts,
            Resolution::Picked { selected: Some(contact), .. } => vec![contact],
            Resolution::Picked { candidates, selected: None } => candidates,
            Resolution::NoMatch | Resolution::SourceUnavailable(_) => Vec::new(),
        }
    }

    pub fn is_source_error(&self) -> bool {
        matches!(self, Resolution::SourceUnavailable(_))
    }
}

pub struct NameResolver<'a> {
    source: &'a dyn ContactSource,
    picker: &'a dyn Picker,
    nicknames: &'a NicknameMap,
}

impl<'a> NameResolver<'a> {
    pub fn new(
        source: &'a dyn ContactSource,
        picker: &'a dyn Picker,
        nicknames: &'a NicknameMap,
    ) -> Self {
        Self { source, picker, nicknames }
    }

    /// Contacts for the named person; empty when nothing matched or the
    /// address book was unreadable.
    pub async fn resolve(&self, first_name: &str, last_name: &str) -> Vec<Contact> {
        self.resolve_outcome(first_name, last_name).await.into_contacts()
    }

    pub async fn resolve_outcome(&self, first_name: &str, last_name: &str) -> Resolution {
        debug!("Resolving contact '{}' '{}'", first_name, last_name);

        let contacts = match self.load_contacts().await {
            Ok(contacts) => contacts,
            Err(e) => {
                error!("Error accessing contacts: {:#}", e);
                return Resolution::SourceUnavailable(e.to_string());
            }
        };

        match match_contacts(first_name, last_name, &contacts, self.nicknames) {
            Tiered::Exact(matches) => {
                info!("Found {} exact match(es) for '{} {}'", matches.len(), first_name, last_name);
                Resolution::Matched(matches)
            }
            Tiered::None => {
                info!("No contact found for '{} {}'", first_name, last_name);
                Resolution::NoMatch
            }
            Tiered::Partial(candidates) => {
                info!(
                    "Found {} partial match(es) for '{} {}', asking user",
                    candidates.len(),
                    first_name,
                    last_name
                );
                let choices = candidates.iter().map(Choice::for_contact).collect();
                let selected = match self.picker.present(choices).await {
                    Ok(selected) => selected,
                    Err(e) => {
                        warn!("Contact picker failed, treating as dismissed: {:#}", e);
                        None
                    }
                };
                if let Some(contact) = &selected {
                    info!("Selected: {}", contact.full_name());
                }
                Resolution::Picked { candidates, selected }
            }
        }
    }

    async fn load_contacts(&self) -> Result<Vec<Contact>> {
        let containers = self.source.list_containers().await?;
        let contacts = self.source.list_contacts(&containers).await?;
        debug!("Loaded {} contact(s) from {} container(s)", contacts.len(), containers.len());
        Ok(contacts)
    }
}
