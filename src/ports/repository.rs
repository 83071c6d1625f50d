//! Repository port for value-table persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! storage layer for the durable value table.

use std::{collections::HashMap, path::Path};

use crate::{Result, agent::QTable};

/// Port for persisting and loading the agent's value table.
///
/// The save side works on the full table; the load side returns the raw
/// persisted entries so that the repair-on-read policy stays in one place
/// (the [`QTable::from_raw_entries`] boundary) instead of being re-implemented
/// per storage format.
pub trait QTableRepository: Send {
    /// Persist the full value table.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization fails.
    fn save(&self, table: &QTable, path: &Path) -> Result<()>;

    /// Load the raw persisted entries.
    ///
    /// Entries may have the wrong arity or non-finite values; callers repair
    /// them when rebuilding the table. A missing or unreadable file is an
    /// error here; the agent treats it as a cold start.
    fn load_raw(&self, path: &Path) -> Result<HashMap<String, Vec<f64>>>;
}
