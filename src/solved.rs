/**
 * The set of questions the user has ever answered correctly. This is the only durable
 * state: it is stored as a JSON array of ids under a single storage key.
 */
use std::collections::BTreeSet;

use super::common::{DrillError, Result};
use super::persistence::Storage;


pub const SOLVED_KEY: &str = "solvedQuestions";


pub struct SolvedSet<S: Storage> {
    storage: S,
    ids: BTreeSet<String>,
}


impl<S: Storage> SolvedSet<S> {
    /// Read the persisted set. Missing, unreadable or malformed data yields an empty
    /// set.
    pub fn load(storage: S) -> Self {
        let ids = match storage.get(SOLVED_KEY) {
            Ok(Some(data)) => {
                match serde_json::from_str::<Vec<String>>(&data) {
                    Ok(ids) => ids.into_iter().collect(),
                    Err(e) => {
                        log::warn!("ignoring malformed solved set ({})", e);
                        BTreeSet::new()
                    }
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                log::warn!("could not read solved set ({})", e);
                BTreeSet::new()
            }
        };
        log::debug!("loaded {} solved question(s)", ids.len());
        SolvedSet { storage, ids }
    }

    /// Add `id` and persist the whole set. Returns `true` if `id` was not already
    /// present; nothing is written otherwise.
    pub fn mark_solved(&mut self, id: &str) -> Result<bool> {
        if self.ids.contains(id) {
            return Ok(false);
        }

        // Only remember the id once it has been written.
        let mut ids = self.ids.clone();
        ids.insert(id.to_string());
        let serialized = serde_json::to_string(&ids).map_err(DrillError::Json)?;
        self.storage.set(SOLVED_KEY, &serialized)?;
        self.ids = ids;
        log::debug!("marked '{}' as solved ({} total)", id, self.ids.len());
        Ok(true)
    }

    /// Forget every solved question and erase the persisted entry.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(SOLVED_KEY)?;
        self.ids.clear();
        log::info!("cleared solved history");
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|s| s.as_str())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn stored(set: &SolvedSet<MemoryStorage>) -> Option<Vec<String>> {
        set.storage()
            .get(SOLVED_KEY)
            .unwrap()
            .map(|data| serde_json::from_str(&data).unwrap())
    }

    #[test]
    fn absent_key_loads_as_empty() {
        let set = SolvedSet::load(MemoryStorage::new());
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_data_loads_as_empty() {
        for bad in &["not json", "{\"a\": 1}", "[1, 2]", ""] {
            let mut storage = MemoryStorage::new();
            storage.set(SOLVED_KEY, bad).unwrap();
            let set = SolvedSet::load(storage);
            assert!(set.is_empty(), "{:?} should load as empty", bad);
        }
    }

    #[test]
    fn existing_data_is_loaded() {
        let mut storage = MemoryStorage::new();
        storage.set(SOLVED_KEY, "[\"Q1\",\"Q3\"]").unwrap();
        let set = SolvedSet::load(storage);
        assert_eq!(set.len(), 2);
        assert!(set.contains("Q1"));
        assert!(!set.contains("Q2"));
    }

    #[test]
    fn mark_solved_is_idempotent() {
        let mut set = SolvedSet::load(MemoryStorage::new());
        assert!(set.mark_solved("Q1").unwrap());
        let after_first = stored(&set);
        assert_eq!(after_first, Some(vec![String::from("Q1")]));

        assert!(!set.mark_solved("Q1").unwrap());
        assert_eq!(stored(&set), after_first);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn mark_solved_keeps_earlier_entries() {
        let mut storage = MemoryStorage::new();
        storage.set(SOLVED_KEY, "[\"Q2\"]").unwrap();
        let mut set = SolvedSet::load(storage);
        set.mark_solved("Q1").unwrap();
        assert_eq!(stored(&set), Some(vec![String::from("Q1"), String::from("Q2")]));
    }

    /// Fails every write until `broken` is cleared.
    struct FlakyStorage {
        inner: MemoryStorage,
        broken: bool,
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.broken {
                Err(DrillError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")))
            } else {
                self.inner.set(key, value)
            }
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_write_is_not_remembered() {
        let storage = FlakyStorage { inner: MemoryStorage::new(), broken: true };
        let mut set = SolvedSet::load(storage);

        assert!(set.mark_solved("Q1").is_err());
        assert!(!set.contains("Q1"));
        assert_eq!(set.storage().get(SOLVED_KEY).unwrap(), None);

        set.storage.broken = false;
        assert!(set.mark_solved("Q1").unwrap());
        assert!(set.contains("Q1"));
        assert_eq!(set.storage().get(SOLVED_KEY).unwrap(), Some(String::from("[\"Q1\"]")));
    }

    #[test]
    fn clear_erases_unreadable_entry() {
        let mut storage = MemoryStorage::new();
        storage.set(SOLVED_KEY, "not json").unwrap();
        let mut set = SolvedSet::load(storage);
        assert!(set.is_empty());
        set.clear().unwrap();
        assert_eq!(set.storage().get(SOLVED_KEY).unwrap(), None);
    }

    #[test]
    fn clear_erases_the_entry() {
        let mut set = SolvedSet::load(MemoryStorage::new());
        set.mark_solved("Q1").unwrap();
        set.mark_solved("Q2").unwrap();
        set.clear().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.storage().get(SOLVED_KEY).unwrap(), None);
    }
}
