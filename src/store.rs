use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::models::watchlist::NewWatchlistEntry;
use crate::models::{MediaType, WatchlistEntry};

/// Persisted watch-list
///
/// The single owner of watch-list state. Mutations are synchronous and
/// last-write-wins; each one rewrites the backing file in full. Entries are
/// kept most-recent-first and uniquely identified by (id, media_type).
pub struct WatchlistStore {
    path: Option<PathBuf>,
    items: RwLock<Vec<WatchlistEntry>>,
}

impl WatchlistStore {
    /// Rehydrates the store from `path`
    ///
    /// A missing file starts empty; an unreadable or corrupt file also starts
    /// empty with a warning, never an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<WatchlistEntry>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        path = %path.display(),
                        "Corrupt watch-list file, starting empty"
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Unreadable watch-list file, starting empty"
                );
                Vec::new()
            }
        };

        Self {
            path: Some(path),
            items: RwLock::new(items),
        }
    }

    /// A store with no backing file
    pub fn in_memory() -> Self {
        Self {
            path: None,
            items: RwLock::new(Vec::new()),
        }
    }

    /// Adds an entry stamped with `now`, inserting at the front
    ///
    /// Idempotent: returns `false` without touching anything when an entry
    /// with the same (id, media_type) already exists.
    pub fn add(&self, new: NewWatchlistEntry, now: DateTime<Utc>) -> bool {
        let mut items = self.write_items();
        let exists = items
            .iter()
            .any(|e| e.id == new.id && e.media_type == new.media_type);
        if exists {
            return false;
        }

        items.insert(0, new.into_entry(now));
        self.persist(&items);
        true
    }

    /// Removes the matching entry; a miss is a no-op
    pub fn remove(&self, id: u64, media_type: MediaType) -> bool {
        let mut items = self.write_items();
        let before = items.len();
        items.retain(|e| !(e.id == id && e.media_type == media_type));
        if items.len() == before {
            return false;
        }

        self.persist(&items);
        true
    }

    /// Empties the list unconditionally
    pub fn clear(&self) {
        let mut items = self.write_items();
        items.clear();
        self.persist(&items);
    }

    /// Membership by composite identity, driving toggle state
    pub fn contains(&self, id: u64, media_type: MediaType) -> bool {
        self.read_items()
            .iter()
            .any(|e| e.id == id && e.media_type == media_type)
    }

    /// Snapshot of the list, most-recent-first
    pub fn items(&self) -> Vec<WatchlistEntry> {
        self.read_items().clone()
    }

    pub fn len(&self) -> usize {
        self.read_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_items().is_empty()
    }

    /// Writes the full list to the backing file
    ///
    /// A write failure is logged; the in-memory list stays authoritative.
    fn persist(&self, items: &[WatchlistEntry]) {
        let Some(path) = &self.path else {
            return;
        };

        let json = match serde_json::to_string_pretty(items) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Watch-list serialization failed");
                return;
            }
        };

        if let Err(e) = std::fs::write(path, json) {
            tracing::error!(
                error = %e,
                path = %path.display(),
                "Watch-list write failed"
            );
        }
    }

    fn read_items(&self) -> RwLockReadGuard<'_, Vec<WatchlistEntry>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_items(&self) -> RwLockWriteGuard<'_, Vec<WatchlistEntry>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(id: u64, media_type: MediaType, title: &str) -> NewWatchlistEntry {
        NewWatchlistEntry {
            id,
            media_type,
            title: title.to_string(),
            poster_path: Some("/p.jpg".to_string()),
            vote_average: 8.0,
            release_date: "2010-07-15".to_string(),
            overview: "overview".to_string(),
            backdrop_path: None,
            genre_ids: Some(vec![28]),
        }
    }

    #[test]
    fn test_add_inserts_at_front_with_timestamp() {
        let store = WatchlistStore::in_memory();
        let now = Utc::now();

        assert!(store.add(new_entry(1, MediaType::Movie, "first"), now));
        assert!(store.add(new_entry(2, MediaType::Movie, "second"), now));

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "second");
        assert_eq!(items[1].title, "first");
        assert_eq!(items[0].added_at, now);
    }

    #[test]
    fn test_add_is_idempotent_per_composite_key() {
        let store = WatchlistStore::in_memory();
        let now = Utc::now();

        assert!(store.add(new_entry(550, MediaType::Movie, "Fight Club"), now));
        assert!(!store.add(new_entry(550, MediaType::Movie, "Fight Club again"), now));

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Fight Club");
    }

    #[test]
    fn test_same_id_across_namespaces_is_two_entries() {
        let store = WatchlistStore::in_memory();
        let now = Utc::now();

        assert!(store.add(new_entry(550, MediaType::Movie, "a movie"), now));
        assert!(store.add(new_entry(550, MediaType::Tv, "a show"), now));

        assert_eq!(store.len(), 2);
        assert!(store.contains(550, MediaType::Movie));
        assert!(store.contains(550, MediaType::Tv));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = WatchlistStore::in_memory();
        let now = Utc::now();
        store.add(new_entry(1, MediaType::Movie, "only"), now);

        assert!(!store.remove(999, MediaType::Movie));
        assert!(!store.remove(1, MediaType::Tv));
        assert_eq!(store.len(), 1);

        assert!(store.remove(1, MediaType::Movie));
        assert!(!store.remove(1, MediaType::Movie));
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_sequence_of_mutations_creates_duplicates() {
        let store = WatchlistStore::in_memory();
        let now = Utc::now();

        for _ in 0..3 {
            store.add(new_entry(1, MediaType::Movie, "m"), now);
            store.add(new_entry(1, MediaType::Tv, "t"), now);
            store.remove(1, MediaType::Movie);
            store.add(new_entry(1, MediaType::Movie, "m"), now);
        }

        let mut keys: Vec<(u64, MediaType)> =
            store.items().iter().map(|e| (e.id, e.media_type)).collect();
        keys.sort_by_key(|(id, mt)| (*id, format!("{}", mt)));
        keys.dedup();
        assert_eq!(keys.len(), store.len());
    }

    #[test]
    fn test_clear_empties_unconditionally() {
        let store = WatchlistStore::in_memory();
        let now = Utc::now();
        store.add(new_entry(1, MediaType::Movie, "a"), now);
        store.add(new_entry(2, MediaType::Tv, "b"), now);

        store.clear();
        assert!(store.is_empty());

        // Clearing an empty list is fine too.
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_mutations_persist_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        let now = Utc::now();

        {
            let store = WatchlistStore::load(&path);
            store.add(new_entry(550, MediaType::Movie, "Fight Club"), now);
            store.add(new_entry(1399, MediaType::Tv, "Game of Thrones"), now);
        }

        let reloaded = WatchlistStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(550, MediaType::Movie));
        assert!(reloaded.contains(1399, MediaType::Tv));
        assert_eq!(reloaded.items()[0].title, "Game of Thrones");
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = WatchlistStore::load(dir.path().join("nope.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_starts_empty_and_recovers_on_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        std::fs::write(&path, "{not json!").unwrap();

        let store = WatchlistStore::load(&path);
        assert!(store.is_empty());

        store.add(new_entry(1, MediaType::Movie, "fresh"), Utc::now());

        let reloaded = WatchlistStore::load(&path);
        assert_eq!(reloaded.len(), 1);
    }
}
