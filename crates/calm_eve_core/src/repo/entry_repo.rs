//! Entry list repository over the key-value capability.

use crate::model::entry::Entry;
use crate::storage::{keys, KeyValueStore, StorageResult};
use log::{debug, warn};

/// Whole-list entry persistence.
pub trait EntryRepository {
    /// Stored entries, in stored order.
    ///
    /// Missing or malformed data reads as an empty list. Only backend
    /// failures surface as errors.
    fn load(&self) -> StorageResult<Vec<Entry>>;

    /// Replaces the stored list with `entries` verbatim.
    ///
    /// Callers pass a list already deduplicated by date.
    fn save(&self, entries: &[Entry]) -> StorageResult<()>;
}

/// Entry list stored as a JSON array under [`keys::ENTRIES`].
pub struct KvEntryRepository<'store> {
    store: &'store dyn KeyValueStore,
}

impl<'store> KvEntryRepository<'store> {
    pub fn new(store: &'store dyn KeyValueStore) -> Self {
        Self { store }
    }
}

impl EntryRepository for KvEntryRepository<'_> {
    fn load(&self) -> StorageResult<Vec<Entry>> {
        let Some(raw) = self.store.get(keys::ENTRIES)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Entry>>(&raw) {
            Ok(entries) => {
                debug!(
                    "event=entries_load module=entry_repo status=ok count={}",
                    entries.len()
                );
                Ok(entries)
            }
            Err(err) => {
                warn!(
                    "event=entries_load module=entry_repo status=error error_code=storage_parse line={} column={}",
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, entries: &[Entry]) -> StorageResult<()> {
        let encoded = serde_json::to_string(entries)?;
        self.store.set(keys::ENTRIES, &encoded)?;
        debug!(
            "event=entries_save module=entry_repo status=ok count={}",
            entries.len()
        );
        Ok(())
    }
}
