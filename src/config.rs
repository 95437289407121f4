use crate::contacts::NicknameMap;
use crate::dialer::DEFAULT_COUNTRY_CODE;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/1vZYhWEk_30QCUfcT1TBXd_oT34nRc8YAUlytehfSfRk/export?format=csv&gid=1290877730";
pub const DEFAULT_OPEN_URL: &str = "https://tinyurl.com/QEENTMonthlyRota";
pub const DEFAULT_DIALER_URL: &str = "qerota call";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rota: RotaConfig,
    #[serde(default)]
    pub contacts: ContactsConfig,
    /// Extra nickname aliases, merged over the built-in table.
    #[serde(default)]
    pub nicknames: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub update: UpdateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotaConfig {
    pub csv_url: String,
    pub open_url: Option<String>,
    pub dialer_url: Option<String>,
}

impl Default for RotaConfig {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            open_url: Some(DEFAULT_OPEN_URL.to_string()),
            dialer_url: Some(DEFAULT_DIALER_URL.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsConfig {
    pub address_book: Option<PathBuf>,
    pub country_code: String,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self { address_book: None, country_code: DEFAULT_COUNTRY_CODE.to_string() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Installer program and arguments; no entry disables the update check.
    #[serde(default)]
    pub installer: Vec<String>,
    pub flags_file: Option<PathBuf>,
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        // If config doesn't exist, create default
        if !path.exists() {
            let default_config = Config::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Built-in aliases plus any configured ones.
    pub fn nickname_map(&self) -> NicknameMap {
        let mut map = NicknameMap::with_defaults();
        map.extend_from(&self.nicknames);
        map
    }

    pub fn address_book_path(&self) -> Result<PathBuf> {
        match &self.contacts.address_book {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("contacts.json")),
        }
    }

    pub fn flags_path(&self) -> Result<PathBuf> {
        match &self.update.flags_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("flags.json")),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "qerota", "qerota").context("Failed to determine config directory")
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}
