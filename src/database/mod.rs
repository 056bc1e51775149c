//! tabkeeper storage layer.
//!
//! Saved layouts live in a key-value namespace behind [`KeyValueStorage`].
//! Two backends exist: an SQLite file ([`Database`]) and an in-process map
//! ([`MemoryStorage`]).
//!
//! # Usage
//!
//! ```no_run
//! use tabkeeper::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("tabkeeper.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! ```

pub mod connection;
pub mod migrations;
pub mod storage;

use std::sync::Arc;

pub use connection::Database;
pub use storage::{KeyValueStorage, MemoryStorage};

use crate::platform;
use crate::types::errors::StorageError;
use crate::types::settings::{StorageBackend, StorageSettings};

/// Opens the backend named in settings.
pub fn open_storage(settings: &StorageSettings) -> Result<Arc<dyn KeyValueStorage>, StorageError> {
    match settings.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::Sqlite => {
            let path = match &settings.path {
                Some(p) => std::path::PathBuf::from(p),
                None => {
                    let dir = platform::get_data_dir();
                    std::fs::create_dir_all(&dir).map_err(|e| {
                        StorageError::Unavailable(format!("{}: {}", dir.display(), e))
                    })?;
                    dir.join("tabkeeper.db")
                }
            };
            Ok(Arc::new(Database::open(path)?))
        }
    }
}
