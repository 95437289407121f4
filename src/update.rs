//! Silent update check through an external installer.
//!
//! The installer is a separate program. We flag silent mode, run it, and read
//! back whether it found an update. Both sides talk through a small JSON flag
//! file whose path is passed in `QEROTA_FLAGS`.

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;

pub const SILENT_MODE_FLAG: &str = "qerota_silentmode";
pub const UPDATE_AVAILABLE_FLAG: &str = "qerota_updateAvailable";

/// Key-value flags shared with the installer.
pub trait FlagStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Where the installer can find the flags, if they live in a file.
    fn location(&self) -> Option<&Path> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct JsonFlagStore {
    path: PathBuf,
}

impl JsonFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read flags from {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| anyhow!("Failed to parse flags file: {}", e))
    }
}

impl FlagStore for JsonFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut flags = self.read_all()?;
        flags.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&flags)?;
        fs::write(&self.path, content).context("Failed to write flags file")?;
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// No installer configured or it could not be started.
    Unavailable,
    UpToDate,
    UpdateAvailable,
}

impl UpdateStatus {
    pub fn is_available(self) -> bool {
        self == UpdateStatus::UpdateAvailable
    }
}

pub struct UpdateChecker<'a> {
    /// Installer program followed by its arguments.
    command: Vec<String>,
    flags: &'a dyn FlagStore,
}

impl<'a> UpdateChecker<'a> {
    pub fn new(command: Vec<String>, flags: &'a dyn FlagStore) -> Self {
        Self { command, flags }
    }

    /// Run the installer silently and report whether it found an update.
    /// Silent mode is switched back off however the check ends.
    pub async fn check(&self) -> UpdateStatus {
        set_flag(self.flags, SILENT_MODE_FLAG, "true");
        info!("Silent mode set to 'true'.");
        let _reset = scopeguard::guard(self.flags, |flags| {
            set_flag(flags, SILENT_MODE_FLAG, "false");
            info!("Silent mode set to 'false'.");
        });

        let mut command = match self.build_command(true) {
            Some(command) => command,
            None => {
                info!("Update-checking module not available. Skipping update check.");
                return UpdateStatus::Unavailable;
            }
        };

        match command.stdin(Stdio::null()).status().await {
            Ok(status) if status.success() => debug!("Installer finished"),
            Ok(status) => {
                warn!("Installer exited with {}; treating as up to date", status);
                return UpdateStatus::UpToDate;
            }
            Err(e) => {
                info!("Update-checking module not available ({}). Skipping update check.", e);
                return UpdateStatus::Unavailable;
            }
        }

        match self.flags.get(UPDATE_AVAILABLE_FLAG) {
            Ok(value) => {
                info!("Update check result: {}", value.as_deref().unwrap_or("unset"));
                if value.as_deref() == Some("true") {
                    UpdateStatus::UpdateAvailable
                } else {
                    UpdateStatus::UpToDate
                }
            }
            Err(e) => {
                warn!("Failed to read update status: {:#}", e);
                UpdateStatus::UpToDate
            }
        }
    }

    /// Run the installer in the foreground so the user can update.
    pub async fn launch_interactive(&self) -> Result<()> {
        set_flag(self.flags, SILENT_MODE_FLAG, "false");
        let mut command =
            self.build_command(false).ok_or_else(|| anyhow!("No installer configured"))?;
        info!("Launching installer: {}", self.command.join(" "));
        let status = command.status().await.context("Failed to launch installer")?;
        if !status.success() {
            return Err(anyhow!("Installer exited with {}", status));
        }
        Ok(())
    }

    fn build_command(&self, silent: bool) -> Option<tokio::process::Command> {
        let (program, args) = self.command.split_first()?;
        let mut command = tokio::process::Command::new(program);
        command.args(args).env("QEROTA_SILENTMODE", if silent { "true" } else { "false" });
        if let Some(path) = self.flags.location() {
            command.env("QEROTA_FLAGS", path);
        }
        Some(command)
    }
}

fn set_flag(flags: &dyn FlagStore, key: &str, value: &str) {
    if let Err(e) = flags.set(key, value) {
        warn!("Failed to set {}: {:#}", key, e);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Flags held in memory; records every write.
    #[derive(Default)]
    pub(crate) struct MemoryFlagStore {
        pub values: Mutex<BTreeMap<String, String>>,
        pub writes: Mutex<Vec<(String, String)>>,
    }

    impl FlagStore for MemoryFlagStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.values.lock().unwrap().insert(key.to_string(), value.to_string());
            self.writes.lock().unwrap().push((key.to_string(), value.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_json_flag_store_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFlagStore::new(dir.path().join("nested").join("flags.json"));
        assert_eq!(store.get(UPDATE_AVAILABLE_FLAG)?, None);

        store.set(UPDATE_AVAILABLE_FLAG, "true")?;
        store.set(SILENT_MODE_FLAG, "false")?;
        assert_eq!(store.get(UPDATE_AVAILABLE_FLAG)?.as_deref(), Some("true"));
        assert_eq!(store.get(SILENT_MODE_FLAG)?.as_deref(), Some("false"));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_installer_is_unavailable_and_resets_silent_mode() {
        let flags = MemoryFlagStore::default();
        let checker = UpdateChecker::new(Vec::new(), &flags);

        assert_eq!(checker.check().await, UpdateStatus::Unavailable);

        let writes = flags.writes.lock().unwrap().clone();
        assert_eq!(
            writes,
            vec![
                (SILENT_MODE_FLAG.to_string(), "true".to_string()),
                (SILENT_MODE_FLAG.to_string(), "false".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_installer_program_is_unavailable() {
        let flags = MemoryFlagStore::default();
        let checker =
            UpdateChecker::new(vec!["/nonexistent/qerota-installer".to_string()], &flags);

        assert_eq!(checker.check().await, UpdateStatus::Unavailable);
        assert_eq!(flags.get(SILENT_MODE_FLAG).unwrap().as_deref(), Some("false"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_installer_reports_update_through_flags_file() -> Result<()> {
        let dir = tempdir()?;
        let script = dir.path().join("installer.sh");
        fs::write(
            &script,
            "printf '{\"qerota_updateAvailable\":\"true\",\"qerota_silentmode\":\"%s\"}' \"$QEROTA_SILENTMODE\" > \"$QEROTA_FLAGS\"\n",
        )?;
        let flags = JsonFlagStore::new(dir.path().join("flags.json"));
        let checker =
            UpdateChecker::new(vec!["sh".to_string(), script.display().to_string()], &flags);

        assert_eq!(checker.check().await, UpdateStatus::UpdateAvailable);
        assert_eq!(flags.get(SILENT_MODE_FLAG)?.as_deref(), Some("false"));
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_installer_without_update() -> Result<()> {
        let dir = tempdir()?;
        let flags = JsonFlagStore::new(dir.path().join("flags.json"));
        let checker = UpdateChecker::new(vec!["true".to_string()], &flags);

        assert_eq!(checker.check().await, UpdateStatus::UpToDate);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_installer_ignores_stale_update_flag() -> Result<()> {
        let dir = tempdir()?;
        let flags = JsonFlagStore::new(dir.path().join("flags.json"));
        flags.set(UPDATE_AVAILABLE_FLAG, "true")?;
        let checker = UpdateChecker::new(vec!["false".to_string()], &flags);

        assert_eq!(checker.check().await, UpdateStatus::UpToDate);
        assert_eq!(flags.get(SILENT_MODE_FLAG)?.as_deref(), Some("false"));
        Ok(())
    }

    #[tokio::test]
    async fn test_launch_without_installer_fails() {
        let flags = MemoryFlagStore::default();
        let checker = UpdateChecker::new(Vec::new(), &flags);
        assert!(checker.launch_interactive().await.is_err());
    }
}
