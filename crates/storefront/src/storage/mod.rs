//! Key-value persistence for the cart.
//!
//! The cart lives in a single string slot, the same way a browser keeps it
//! under one `localStorage` key. Two backends are provided:
//!
//! - **File**: one file per key under a directory ([`FileStorage`])
//! - **Memory**: process-local map, nothing survives a restart ([`MemoryStorage`])

mod file;
mod memory;

use std::future::Future;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the slot failed.
    #[error("Storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The value could not be serialized before writing.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend refused the write.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// String-keyed string slots.
pub trait CartStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if the slot is empty.
    fn get_item(&self, key: &str)
    -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Overwrite the slot under `key`.
    fn set_item(&self, key: &str, value: &str)
    -> impl Future<Output = Result<(), StorageError>> + Send;
}
