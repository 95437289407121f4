//! Contact sources: where the address book comes from.

use super::{Contact, ContactsError, ContainerRef};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Maximum allowed size for the address book file (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Read-only access to an address book split into containers.
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn list_containers(&self) -> Result<Vec<ContainerRef>>;

    /// Every contact in the given containers, in container order.
    async fn list_contacts(&self, containers: &[ContainerRef]) -> Result<Vec<Contact>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressBook {
    #[serde(default)]
    pub containers: Vec<AddressBookContainer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressBookContainer {
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl AddressBook {
    fn container_refs(&self) -> Vec<ContainerRef> {
        self.containers
            .iter()
            .map(|c| ContainerRef { identifier: c.identifier.clone(), name: c.name.clone() })
            .collect()
    }

    fn contacts_in(
        &self,
        containers: &[ContainerRef],
    ) -> std::result::Result<Vec<Contact>, ContactsError> {
        let mut contacts = Vec::new();
        for wanted in containers {
            let container = self
                .containers
                .iter()
                .find(|c| c.identifier == wanted.identifier)
                .ok_or_else(|| ContactsError::UnknownContainer(wanted.identifier.clone()))?;
            contacts.extend(container.contacts.iter().cloned());
        }
        Ok(contacts)
    }
}

/// Address book stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonContactSource {
    path: PathBuf,
}

impl JsonContactSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> std::result::Result<AddressBook, ContactsError> {
        if !self.path.exists() {
            return Err(ContactsError::NotFound(self.path.display().to_string()));
        }
        let metadata = tokio::fs::metadata(&self.path).await?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(ContactsError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "address book exceeds size limit",
            )));
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        let book: AddressBook = serde_json::from_str(&content)?;
        debug!("Loaded {} container(s) from {}", book.containers.len(), self.path.display());
        Ok(book)
    }
}

#[async_trait]
impl ContactSource for JsonContactSource {
    async fn list_containers(&self) -> Result<Vec<ContainerRef>> {
        Ok(self.load().await?.container_refs())
    }

    async fn list_contacts(&self, containers: &[ContainerRef]) -> Result<Vec<Contact>> {
        Ok(self.load().await?.contacts_in(containers)?)
    }
}

/// In-memory address book. `failing` builds one whose every call errors.
#[derive(Debug, Clone, Default)]
pub struct MemoryContactSource {
    book: AddressBook,
    failure: Option<String>,
}

impl MemoryContactSource {
    /// A single container holding `contacts`.
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            book: AddressBook {
                containers: vec![AddressBookContainer {
                    identifier: "local".to_string(),
                    name: "Local".to_string(),
                    contacts,
                }],
            },
            failure: None,
        }
    }

    pub fn from_book(book: AddressBook) -> Self {
        Self { book, failure: None }
    }

    pub fn failing(message: &str) -> Self {
        Self { book: AddressBook::default(), failure: Some(message.to_string()) }
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContactSource for MemoryContactSource {
    async fn list_containers(&self) -> Result<Vec<ContainerRef>> {
        self.check()?;
        Ok(self.book.container_refs())
    }

    async fn list_contacts(&self, containers: &[ContainerRef]) -> Result<Vec<Contact>> {
        self.check()?;
        Ok(self.book.contacts_in(containers)?)
    }
}
