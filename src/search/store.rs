// src/search/store.rs
// =============================================================================
// The shared result map: matched string -> URLs of the pages it was found on.
//
// Many tasks write at once, nobody reads until they have all finished. The
// only way in is `store`, which appends under a lock. The same URL can show
// up more than once for a key when different snapshots hit.
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct ResultStore {
    searches: Mutex<HashMap<String, Vec<String>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` under `key`, creating the entry if needed.
    pub fn store(&self, key: &str, url: &str) {
        self.lock()
            .entry(key.to_string())
            .or_default()
            .push(url.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current contents. Meant for after every writer joined.
    pub fn snapshot(&self) -> HashMap<String, Vec<String>> {
        self.lock().clone()
    }

    pub fn into_results(self) -> HashMap<String, Vec<String>> {
        self.searches
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // A panicking writer cannot leave a half-appended Vec behind, so a
    // poisoned lock still holds usable data.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        self.searches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
