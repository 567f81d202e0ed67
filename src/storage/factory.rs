//! Storage backend factory.
//!
//! Creates the appropriate storage backend based on configuration.

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::AppError;
use crate::storage::file::FileStorage;
use crate::storage::memory::MemoryStorage;
use crate::storage::traits::DynStorage;

/// Create a storage backend based on configuration.
///
/// The backend is health-checked before it is handed out.
///
/// # Errors
///
/// Returns an error if the storage backend cannot be initialized.
pub async fn create_storage(config: &StorageConfig) -> Result<Arc<DynStorage>, AppError> {
    let storage: Arc<DynStorage> = match config.backend {
        StorageBackend::File => Arc::new(FileStorage::new(&config.file)?),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    };

    storage.health_check().await?;

    Ok(storage)
}
