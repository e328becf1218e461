//! Settings persistence.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use super::model::Settings;
use crate::errors::SettingsError;

/// Loads and saves [`Settings`].
///
/// The provided methods read, modify and write back the whole settings value.
pub trait SettingsStore: Send + Sync {
    /// Loads settings, falling back to defaults if none were saved.
    fn load(&self) -> Result<Settings, SettingsError>;

    /// Saves settings.
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;

    /// Stores the service key and its expiry note.
    fn set_credentials(&self, api_key: &str, expired_date: &str) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        settings.api_key = api_key.trim().to_string();
        settings.expired_date = expired_date.trim().to_string();
        self.save(&settings)
    }

    /// Stores keyword input in a shortcut slot (0-9).
    fn set_shortcut(&self, index: usize, keywords: &str) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        settings.set_shortcut(index, keywords)?;
        self.save(&settings)
    }

    /// Turns the three-week default window on or off.
    fn set_three_weeks(&self, enabled: bool) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        settings.use_three_weeks = enabled;
        self.save(&settings)
    }

    /// Returns the keyword input in a shortcut slot (0-9).
    fn shortcut(&self, index: usize) -> Result<String, SettingsError> {
        Ok(self.load()?.shortcut(index)?.to_string())
    }
}

/// Settings stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// Creates a store backed by `path`. Nothing is read until [`load`](SettingsStore::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };
        let settings: Settings = serde_json::from_reader(BufReader::new(file))?;
        Ok(settings.normalized())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, settings)?;
        writer.flush()?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Settings kept in memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
}

impl MemorySettingsStore {
    /// Creates a store holding `settings`.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.settings.lock().clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.settings.lock() = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_slots_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = JsonSettingsStore::new(&path);

        store.set_credentials(" key%3D%3D ", "2026-12-31").unwrap();
        store.set_shortcut(0, "어린이 철도").unwrap();
        store.set_shortcut(9, "AI").unwrap();

        let reopened = JsonSettingsStore::new(&path);
        let settings = reopened.load().unwrap();
        assert_eq!(settings.api_key, "key%3D%3D");
        assert_eq!(settings.expired_date, "2026-12-31");
        assert_eq!(reopened.shortcut(0).unwrap(), "어린이 철도");
        assert_eq!(reopened.shortcut(9).unwrap(), "AI");
        assert_eq!(reopened.shortcut(5).unwrap(), "");
    }

    #[test]
    fn test_out_of_range_slot_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = JsonSettingsStore::new(&path);

        assert!(matches!(
            store.set_shortcut(10, "x"),
            Err(SettingsError::SlotOutOfRange { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonSettingsStore::new(&path).load(),
            Err(SettingsError::Serialization(_))
        ));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySettingsStore::default();
        store.set_shortcut(3, "축제").unwrap();
        assert_eq!(store.shortcut(3).unwrap(), "축제");
        assert!(store.shortcut(11).is_err());

        store.set_three_weeks(false).unwrap();
        assert_eq!(store.load().unwrap().default_weeks(), None);
        assert_eq!(store.shortcut(3).unwrap(), "축제");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_full_device() {
        let store = JsonSettingsStore::new("/dev/full");
        assert!(matches!(
            store.save(&Settings::default()),
            Err(SettingsError::Io(_))
        ));
    }
}
