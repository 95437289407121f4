//! Contact model and lookup for qerota.
//!
//! Contacts come from a [`ContactSource`]; the [`NameResolver`] narrows them
//! down to the person named on the rota.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod nicknames;
pub mod resolver;
pub mod source;

pub use nicknames::NicknameMap;
pub use resolver::{NameResolver, Resolution, Tiered};
pub use source::{ContactSource, JsonContactSource, MemoryContactSource};

#[derive(Debug, Error)]
pub enum ContactsError {
    #[error("Address book not found at {0}")]
    NotFound(String),

    #[error("Failed to read address book: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse address book: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown contact container: {0}")]
    UnknownContainer(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    #[serde(default)]
    pub label: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

impl Contact {
    pub fn new(given_name: &str, family_name: &str) -> Self {
        Self {
            given_name: Some(given_name.to_string()),
            family_name: Some(family_name.to_string()),
            phone_numbers: Vec::new(),
        }
    }

    pub fn with_phone(mut self, value: &str) -> Self {
        self.phone_numbers.push(PhoneNumber { label: None, value: value.to_string() });
        self
    }

    /// Display name: "given family", with missing parts left out.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.given_name.as_deref().unwrap_or(""),
            self.family_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    pub fn first_phone(&self) -> Option<&str> {
        self.phone_numbers.first().map(|p| p.value.as_str())
    }
}

/// A named group of contacts (an account or local store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    pub identifier: String,
    pub name: String,
}
