//! Client-side state storage for the Meridian client.
//!
//! Two storage scopes back the auth layer:
//! - **Durable** ([`FileStore`]): the session token pair, surviving client
//!   restarts
//! - **Ephemeral** ([`MemoryStore`]): per-session flow context that must
//!   not survive a restart

mod file;
mod keys;
mod memory;
mod traits;

pub use file::FileStore;
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use traits::StateStore;

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Key not found
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the ephemeral per-session store.
pub fn create_ephemeral_store() -> Arc<dyn StateStore> {
    Arc::new(MemoryStore::new())
}

/// Create the durable store under the given directory.
///
/// Fails when the directory cannot be used, in which case callers treat
/// stored values as absent.
pub fn create_durable_store(dir: &Path) -> StorageResult<Arc<dyn StateStore>> {
    Ok(Arc::new(FileStore::open(dir.join("session.json"))?))
}
