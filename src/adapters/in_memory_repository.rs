//! In-memory implementation of the value-table repository.
//!
//! Keeps the last saved table and a save counter behind a shared handle so
//! tests can hand the repository to an agent and still inspect what was
//! persisted. No durability.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use crate::{Result, agent::QTable, ports::QTableRepository};

#[derive(Debug, Default)]
struct Store {
    saved: Option<HashMap<String, Vec<f64>>>,
    save_count: usize,
}

/// In-memory value-table repository for tests.
///
/// Clones share the same underlying store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<Store>>,
}

impl InMemoryRepository {
    /// Create an empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with raw entries, as if a previous
    /// run had saved them.
    pub fn with_entries(entries: HashMap<String, Vec<f64>>) -> Self {
        let repo = Self::new();
        repo.inner.lock().unwrap().saved = Some(entries);
        repo
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().save_count
    }

    /// The most recently saved entries, if any.
    pub fn saved_entries(&self) -> Option<HashMap<String, Vec<f64>>> {
        self.inner.lock().unwrap().saved.clone()
    }
}

impl QTableRepository for InMemoryRepository {
    fn save(&self, table: &QTable, _path: &Path) -> Result<()> {
        let entries = table
            .entries()
            .iter()
            .map(|(key, values)| (key.clone(), values.0.to_vec()))
            .collect();

        let mut store = self.inner.lock().unwrap();
        store.saved = Some(entries);
        store.save_count += 1;
        Ok(())
    }

    fn load_raw(&self, _path: &Path) -> Result<HashMap<String, Vec<f64>>> {
        let store = self.inner.lock().unwrap();
        store.saved.clone().ok_or_else(|| crate::Error::Io {
            operation: "load in-memory value table".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no table saved"),
        })
    }
}
