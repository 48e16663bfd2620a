//! The mission log: an ordered task list persisted to the local store.
//!
//! Insertion order is display order. Every mutation rewrites the whole list
//! under [`TASKS_KEY`]; operations that change nothing write nothing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::storage::{KeyValueStore, TASKS_KEY};

/// Message shown for an empty log.
pub const EMPTY_LOG_MESSAGE: &str = "Orbit clear. No tasks assigned.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Task {
    fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
        }
    }
}

pub struct TaskStore<S: KeyValueStore> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Read the persisted list. An absent or unreadable record is an empty
    /// list; startup never fails on bad data.
    pub fn load(store: S) -> Self {
        let tasks = match store.get(TASKS_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<Task>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding malformed task list");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read task list");
                Vec::new()
            }
        };
        Self { store, tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Append a task with the trimmed text. Blank text is ignored.
    pub fn add(&mut self, text: &str) -> Result<Option<&Task>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let mut next = self.tasks.clone();
        next.push(Task::new(text));
        self.commit(next)?;
        Ok(self.tasks.last())
    }

    /// Flip `completed` on the matching task. Returns whether one matched.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let mut next = self.tasks.clone();
        let Some(task) = next.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        self.commit(next)?;
        Ok(true)
    }

    /// Delete the matching task. Returns whether one matched.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let mut next = self.tasks.clone();
        next.retain(|t| t.id != id);
        if next.len() == self.tasks.len() {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Write `next` to the store, then adopt it. A failed write leaves the
    /// in-memory list as it was.
    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.store.set(TASKS_KEY, &json)?;
        self.tasks = next;
        tracing::debug!(count = self.tasks.len(), "task list saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;

    /// Reads from an inner store; every write fails.
    struct ReadOnly(MemoryStore);

    impl KeyValueStore for ReadOnly {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Locked)
        }

        fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn failed_write_leaves_the_list_unchanged() {
        let seed = MemoryStore::new();
        let id = TaskStore::load(&seed).add("Dock").unwrap().unwrap().id.clone();
        let mut log = TaskStore::load(ReadOnly(seed));
        let before = log.tasks().to_vec();

        assert!(log.add("Undock").is_err());
        assert!(log.toggle(&id).is_err());
        assert!(log.remove(&id).is_err());
        assert_eq!(log.tasks(), before.as_slice());
        assert!(!log.tasks()[0].completed);
    }

    #[test]
    fn add_trims_and_appends() {
        let store = MemoryStore::new();
        let mut log = TaskStore::load(&store);
        log.add("  Calibrate sensors ").unwrap();
        log.add("Review telemetry").unwrap();
        let texts: Vec<_> = log.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["Calibrate sensors", "Review telemetry"]);
        assert!(log.tasks().iter().all(|t| !t.completed));
        assert_ne!(log.tasks()[0].id, log.tasks()[1].id);
    }

    #[test]
    fn blank_add_is_ignored_and_not_persisted() {
        let store = MemoryStore::new();
        let mut log = TaskStore::load(&store);
        assert!(log.add(" \t\n ").unwrap().is_none());
        assert!(log.is_empty());
        assert!(store.get(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn toggle_flips_and_persists() {
        let store = MemoryStore::new();
        let mut log = TaskStore::load(&store);
        let id = log.add("Dock").unwrap().unwrap().id.clone();
        assert!(log.toggle(&id).unwrap());
        assert!(log.get(&id).unwrap().completed);
        assert_eq!(log.remaining(), 0);
        assert!(TaskStore::load(&store).get(&id).unwrap().completed);
        assert!(log.toggle(&id).unwrap());
        assert!(!log.get(&id).unwrap().completed);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let store = MemoryStore::new();
        let mut log = TaskStore::load(&store);
        log.add("Plot course").unwrap();
        let before = store.get(TASKS_KEY).unwrap();
        assert!(!log.toggle("nope").unwrap());
        assert!(!log.remove("nope").unwrap());
        assert_eq!(store.get(TASKS_KEY).unwrap(), before);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn remove_deletes_only_the_match() {
        let store = MemoryStore::new();
        let mut log = TaskStore::load(&store);
        let a = log.add("a").unwrap().unwrap().id.clone();
        let b = log.add("b").unwrap().unwrap().id.clone();
        assert!(log.remove(&a).unwrap());
        assert_eq!(log.len(), 1);
        assert_eq!(log.tasks()[0].id, b);
        assert_eq!(TaskStore::load(&store).len(), 1);
    }

    #[test]
    fn corrupt_record_loads_empty() {
        let store = MemoryStore::with_entries([(TASKS_KEY, "[{\"id\":1}")]);
        let log = TaskStore::load(&store);
        assert!(log.is_empty());
    }

    #[test]
    fn persisted_shape_is_plain_json_array() {
        let store = MemoryStore::new();
        let mut log = TaskStore::load(&store);
        log.add("Launch").unwrap();
        let raw = store.get(TASKS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let obj = value[0].as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["completed", "id", "text"]);
    }
}
