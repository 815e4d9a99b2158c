use super::{RecordStore, StorageError};
use crate::config;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

const SECS_PER_DAY: i64 = 86400;

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// SQLite-backed record store. Records expire `retention_days` after their
/// last write.
pub struct SqliteRecordStore {
    conn: Connection,
    retention_secs: i64,
}

impl std::fmt::Debug for SqliteRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore")
            .field("retention_secs", &self.retention_secs)
            .finish_non_exhaustive()
    }
}

impl SqliteRecordStore {
    /// Create or open the record store in the given data directory
    pub fn open(data_dir: &Path, retention_days: u32) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join(config::RECORDS_DB);
        let conn = Connection::open(&db_path)?;
        let store = Self::with_connection(conn, retention_days)?;
        log::info!("Record store opened at {:?}", db_path);
        Ok(store)
    }

    fn with_connection(conn: Connection, retention_days: u32) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            );
            ",
        )?;

        let store = Self {
            conn,
            retention_secs: i64::from(retention_days) * SECS_PER_DAY,
        };
        store.purge_expired()?;
        Ok(store)
    }

    /// Delete every record whose retention has run out
    pub fn purge_expired(&self) -> Result<usize, StorageError> {
        let count = self
            .conn
            .execute("DELETE FROM records WHERE expires_at <= ?1", params![now()])?;
        if count > 0 {
            log::info!("Purged {} expired records", count);
        }
        Ok(count)
    }
}

impl RecordStore for SqliteRecordStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM records WHERE key = ?1 AND expires_at > ?2",
                params![key, now()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let expires_at = now() + self.retention_secs;
        self.conn.execute(
            "INSERT INTO records (key, value, expires_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                 value = ?2,
                 expires_at = ?3",
            params![key, value, expires_at],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkCollection;
    use crate::settings::{SettingChange, Settings};
    use crate::storage::Persistence;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let store = SqliteRecordStore::open(dir.path(), 365).unwrap();

        assert_eq!(store.read("settings").unwrap(), None);
        store.write("settings", "{}").unwrap();
        store.write("settings", r#"{"blur":2}"#).unwrap();
        assert_eq!(store.read("settings").unwrap().as_deref(), Some(r#"{"blur":2}"#));
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = SqliteRecordStore::open(dir.path(), 365).unwrap();
            store.write("links", "[]").unwrap();
        }
        let store = SqliteRecordStore::open(dir.path(), 365).unwrap();
        assert_eq!(store.read("links").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_expired_records_read_as_absent() {
        let dir = tempdir().unwrap();
        let store = SqliteRecordStore::open(dir.path(), 0).unwrap();
        store.write("links", "[]").unwrap();
        assert_eq!(store.read("links").unwrap(), None);
        assert_eq!(store.purge_expired().unwrap(), 1);
    }

    #[test]
    fn test_persistence_round_trip_on_disk() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.apply(SettingChange::Blur(22.0));
        let mut links = LinkCollection::defaults();
        links.append("Rust", "rust-lang.org", None);
        links.move_to(3, 0);

        {
            let persistence = Persistence::new(SqliteRecordStore::open(dir.path(), 365).unwrap());
            persistence.save_settings(&settings).unwrap();
            persistence.save_links(&links).unwrap();
        }

        let persistence = Persistence::new(SqliteRecordStore::open(dir.path(), 365).unwrap());
        assert_eq!(persistence.load_settings(), settings);
        assert_eq!(persistence.load_links(), links);
    }
}
