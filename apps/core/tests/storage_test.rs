use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use appswitch_core::hotkeys::HotkeyTable;
use appswitch_core::recency::RecencyList;
use appswitch_core::storage::{
    load_hotkeys, load_recency, save_hotkeys, save_recency, KeyValueStore, MemoryStore,
    SqliteStore, StoreError, HOTKEY_STORAGE_KEY, RECENT_APPS_STORAGE_KEY,
};

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }
}

fn hotkeys(pairs: &[(&str, &str)]) -> HotkeyTable {
    HotkeyTable::from_assignments(
        pairs
            .iter()
            .map(|(hotkey, app)| (hotkey.to_string(), app.to_string()))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn sqlite_store_upserts_values() {
    let store = SqliteStore::open_memory().unwrap();
    assert_eq!(store.get("missing").unwrap(), None);

    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();

    assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
}

#[test]
fn preferences_survive_reopening_the_database() {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("appswitch-store-{unique}"));
    let path = dir.join("nested").join("store.sqlite3");

    {
        let store = SqliteStore::open_file(&path).unwrap();
        save_hotkeys(&store, &hotkeys(&[("ff", "Firefox")])).unwrap();
        let mut recency = RecencyList::default();
        recency.touch("Mail");
        recency.touch("Safari");
        save_recency(&store, &recency);
    }

    let reopened = SqliteStore::open_file(&path).unwrap();
    assert_eq!(load_hotkeys(&reopened).lookup("ff"), Some("Firefox"));
    assert_eq!(load_recency(&reopened, 25).names(), ["Safari", "Mail"]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn records_are_plain_json_under_stable_keys() {
    let store = MemoryStore::default();
    save_hotkeys(&store, &hotkeys(&[("te", "Terminal")])).unwrap();
    let mut recency = RecencyList::default();
    recency.touch("Notes");
    save_recency(&store, &recency);

    assert_eq!(
        store.get(HOTKEY_STORAGE_KEY).unwrap().as_deref(),
        Some(r#"{"te":"Terminal"}"#)
    );
    assert_eq!(
        store.get(RECENT_APPS_STORAGE_KEY).unwrap().as_deref(),
        Some(r#"["Notes"]"#)
    );
}

#[test]
fn corrupt_records_load_as_empty() {
    let store = MemoryStore::default();
    store.set(HOTKEY_STORAGE_KEY, "{not json").unwrap();
    store.set(RECENT_APPS_STORAGE_KEY, "42").unwrap();

    assert!(load_hotkeys(&store).is_empty());
    assert!(load_recency(&store, 25).is_empty());
}

#[test]
fn missing_records_load_as_empty() {
    let store = MemoryStore::default();
    assert!(load_hotkeys(&store).is_empty());
    let recency = load_recency(&store, 10);
    assert!(recency.is_empty());
    assert_eq!(recency.capacity(), 10);
}

#[test]
fn stored_recency_is_truncated_to_capacity() {
    let store = MemoryStore::default();
    store
        .set(RECENT_APPS_STORAGE_KEY, r#"["A","B","C","D"]"#)
        .unwrap();

    assert_eq!(load_recency(&store, 2).names(), ["A", "B"]);
}

#[test]
fn hotkey_write_failure_is_reported_but_recency_failure_is_not() {
    let store = ReadOnlyStore;
    assert!(save_hotkeys(&store, &hotkeys(&[("f", "Finder")])).is_err());
    save_recency(&store, &RecencyList::default());
}
