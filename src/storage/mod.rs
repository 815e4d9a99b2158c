//! Local record storage for the settings and link records.

mod memory;
mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

use crate::config::{self, AppConfig};
use crate::links::LinkCollection;
use crate::settings::Settings;
use std::path::Path;

/// Error type for record storage
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Database(rusqlite::Error),
    Serialization(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "IO error: {}", e),
            StorageError::Database(e) => write!(f, "Database error: {}", e),
            StorageError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e)
    }
}

/// A string key-value store scoped to one profile
pub trait RecordStore {
    /// Read a record. Absent and expired records are `None`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a record, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Reads and writes the settings and links records.
///
/// Loading never fails: absent or corrupt records fall back to defaults.
pub struct Persistence {
    store: Box<dyn RecordStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    pub fn new(store: impl RecordStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Persistence backed by a throwaway in-memory store
    pub fn in_memory() -> Self {
        Self::new(MemoryRecordStore::new())
    }

    /// Open the store selected by `config`.
    ///
    /// Ephemeral profiles and unusable data directories get an in-memory
    /// store so the page still works for the session.
    pub fn for_config(config: &AppConfig, data_dir: Option<&Path>) -> Self {
        if config.ephemeral {
            log::info!("Ephemeral profile, records are kept in memory");
            return Self::in_memory();
        }

        let Some(data_dir) = data_dir else {
            log::warn!("No data directory available, records are kept in memory");
            return Self::in_memory();
        };

        match SqliteRecordStore::open(data_dir, config.retention_days) {
            Ok(store) => Self::new(store),
            Err(e) => {
                log::warn!("Failed to open record store: {}, using memory", e);
                Self::in_memory()
            }
        }
    }

    /// Load settings, merging the stored record over the defaults
    pub fn load_settings(&self) -> Settings {
        match self.read_json(config::SETTINGS_RECORD) {
            Some(value) => Settings::merged_with_defaults(&value),
            None => Settings::default(),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let contents = serde_json::to_string(settings)?;
        self.store.write(config::SETTINGS_RECORD, &contents)?;
        log::debug!("Settings saved");
        Ok(())
    }

    /// Load links. No record, or an unreadable one, yields the default links.
    pub fn load_links(&self) -> LinkCollection {
        let Some(value) = self.read_json(config::LINKS_RECORD) else {
            return LinkCollection::defaults();
        };

        match serde_json::from_value::<LinkCollection>(value) {
            Ok(mut links) => {
                links.normalize_icons();
                links
            }
            Err(e) => {
                log::warn!("Stored links are corrupt, using defaults: {}", e);
                LinkCollection::defaults()
            }
        }
    }

    pub fn save_links(&self, links: &LinkCollection) -> Result<(), StorageError> {
        let contents = serde_json::to_string(links)?;
        self.store.write(config::LINKS_RECORD, &contents)?;
        log::debug!("Saved {} links", links.len());
        Ok(())
    }

    fn read_json(&self, key: &str) -> Option<serde_json::Value> {
        let contents = match self.store.read(key) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read record '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Record '{}' is not valid JSON: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::Link;
    use crate::settings::{SettingChange, Theme};

    #[test]
    fn test_empty_store_yields_defaults() {
        let persistence = Persistence::in_memory();
        assert_eq!(persistence.load_settings(), Settings::default());
        assert_eq!(persistence.load_links(), LinkCollection::defaults());
    }

    #[test]
    fn test_settings_round_trip() {
        let persistence = Persistence::in_memory();
        let mut settings = Settings::default();
        settings.apply(SettingChange::Theme(Theme::Light));
        settings.apply(SettingChange::Opacity(0.4));
        settings.apply(SettingChange::BackgroundUrl("https://img.example/bg.jpg".into()));

        persistence.save_settings(&settings).unwrap();
        assert_eq!(persistence.load_settings(), settings);
    }

    #[test]
    fn test_links_round_trip() {
        let persistence = Persistence::in_memory();
        let links: LinkCollection = vec![
            Link::new("Docs", "https://docs.rs"),
            Link::new("Crates", "https://crates.io").with_icon("https://crates.io/favicon.ico"),
        ]
        .into_iter()
        .collect();

        persistence.save_links(&links).unwrap();
        assert_eq!(persistence.load_links(), links);
    }

    #[test]
    fn test_empty_link_list_is_kept() {
        let persistence = Persistence::in_memory();
        persistence.save_links(&LinkCollection::new()).unwrap();
        assert!(persistence.load_links().is_empty());
    }

    #[test]
    fn test_corrupt_records_fall_back() {
        let store = MemoryRecordStore::new();
        store.write(config::SETTINGS_RECORD, "{not json").unwrap();
        store.write(config::LINKS_RECORD, r#"{"name": "not a list"}"#).unwrap();

        let persistence = Persistence::new(store);
        assert_eq!(persistence.load_settings(), Settings::default());
        assert_eq!(persistence.load_links(), LinkCollection::defaults());
    }

    #[test]
    fn test_legacy_links_record() {
        let store = MemoryRecordStore::new();
        store
            .write(
                config::LINKS_RECORD,
                r#"[{"name":"Old","url":"https://old.example"},{"name":"Blank","url":"https://b.example","icon":""}]"#,
            )
            .unwrap();

        let links = Persistence::new(store).load_links();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|link| link.icon.is_none()));
    }

    #[test]
    fn test_ephemeral_config_keeps_records_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            ephemeral: true,
            ..AppConfig::default()
        };

        let persistence = Persistence::for_config(&config, Some(dir.path()));
        persistence.save_links(&LinkCollection::new()).unwrap();
        assert!(!dir.path().join(config::RECORDS_DB).exists());
    }

    #[test]
    fn test_config_opens_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();

        let persistence = Persistence::for_config(&config, Some(dir.path()));
        persistence.save_links(&LinkCollection::new()).unwrap();
        assert!(dir.path().join(config::RECORDS_DB).exists());

        let reopened = Persistence::for_config(&config, Some(dir.path()));
        assert!(reopened.load_links().is_empty());
    }
}
