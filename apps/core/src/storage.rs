use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::hotkeys::HotkeyTable;
use crate::recency::RecencyList;

pub const HOTKEY_STORAGE_KEY: &str = "instant-application-switcher-hotkeys";
pub const RECENT_APPS_STORAGE_KEY: &str = "instant-application-switcher-recent-applications";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub struct SqliteStore {
    db: Connection,
}

impl SqliteStore {
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    pub fn open_file(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    fn with_connection(db: Connection) -> Result<Self, StoreError> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self { db })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn load_hotkeys<S: KeyValueStore>(store: &S) -> HotkeyTable {
    match read_json::<BTreeMap<String, String>, S>(store, HOTKEY_STORAGE_KEY) {
        Ok(assignments) => HotkeyTable::from_assignments(assignments.unwrap_or_default()),
        Err(error) => {
            warn!(%error, "failed to load hotkey assignments");
            HotkeyTable::default()
        }
    }
}

/// Hotkey writes are surfaced to the caller; a silent failure would leave a dead hotkey.
pub fn save_hotkeys<S: KeyValueStore>(store: &S, table: &HotkeyTable) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(table.assignments())?;
    store.set(HOTKEY_STORAGE_KEY, &encoded)
}

pub fn load_recency<S: KeyValueStore>(store: &S, capacity: usize) -> RecencyList {
    match read_json::<Vec<String>, S>(store, RECENT_APPS_STORAGE_KEY) {
        Ok(names) => RecencyList::from_names(names.unwrap_or_default(), capacity),
        Err(error) => {
            warn!(%error, "failed to load recent apps");
            RecencyList::with_capacity(capacity)
        }
    }
}

/// Recency is advisory; write failures are logged and dropped.
pub fn save_recency<S: KeyValueStore>(store: &S, recency: &RecencyList) {
    let result = serde_json::to_string(recency.names())
        .map_err(StoreError::from)
        .and_then(|encoded| store.set(RECENT_APPS_STORAGE_KEY, &encoded));
    if let Err(error) = result {
        warn!(%error, "failed to save recent apps");
    }
}

fn read_json<T: serde::de::DeserializeOwned, S: KeyValueStore>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}
