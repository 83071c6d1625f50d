//! JSON implementation of the value-table repository.
//!
//! The durable artifact is a flat JSON object mapping composite state keys to
//! two-element value arrays, e.g. `{"420_240_0": [0.0, 0.0]}`. This is the
//! format the trained table round-trips through between runs.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::{Result, agent::QTable, error::Error, ports::QTableRepository};

/// JSON-backed value-table repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
    /// Create a new JSON repository.
    pub fn new() -> Self {
        Self
    }
}

impl QTableRepository for JsonRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let writer = BufWriter::new(file);

        serde_json::to_writer(writer, table.entries()).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize value table to JSON".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(())
    }

    fn load_raw(&self, path: &Path) -> Result<HashMap<String, Vec<f64>>> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader).map_err(|e| Error::SerializationContext {
            operation: "deserialize value table from JSON".to_string(),
            message: e.to_string(),
        })
    }
}
