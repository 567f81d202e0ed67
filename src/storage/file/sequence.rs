//! File-based sequence storage.

use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use fs2::FileExt;
use tokio::sync::Mutex;

use crate::domain::SequenceState;
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::SequenceStorage;

/// File-based sequence storage implementation.
pub struct FileSequenceStorage {
    /// Directory for sequence files.
    sequences_dir: PathBuf,
    /// Mutex for coordinating file operations within this process.
    lock: Mutex<()>,
}

impl FileSequenceStorage {
    /// Create a new file sequence storage.
    #[must_use]
    pub fn new(sequences_dir: PathBuf) -> Self {
        Self {
            sequences_dir,
            lock: Mutex::new(()),
        }
    }

    /// Get the file path for a sequence.
    fn sequence_path(&self, name: &str) -> PathBuf {
        self.sequences_dir
            .join(format!("{}.json", sanitize_name(name)))
    }

    /// Write sequence state to file with exclusive lock.
    fn write_state_locked(&self, state: &SequenceState) -> StorageResult<()> {
        let path = self.sequence_path(&state.name);

        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        file.lock_exclusive()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        serde_json::to_writer_pretty(&file, state)?;
        file.sync_all()?;
        file.unlock()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        Ok(())
    }

    /// Atomically update sequence state.
    fn update_state<F, R>(&self, name: &str, update_fn: F) -> StorageResult<R>
    where
        F: FnOnce(&mut SequenceState) -> StorageResult<R>,
    {
        let path = self.sequence_path(name);

        if !path.exists() {
            return Err(StorageError::NotFound(format!("Sequence '{name}' not found")));
        }

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)?;

        file.lock_exclusive()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        let result = (|| -> StorageResult<R> {
            let mut state: SequenceState = serde_json::from_reader(&file)?;
            let output = update_fn(&mut state)?;

            // Rewrite from the start; the new JSON may be shorter
            file.seek(SeekFrom::Start(0))?;
            file.set_len(0)?;
            let json = serde_json::to_string_pretty(&state)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;

            Ok(output)
        })();

        file.unlock()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        result
    }
}

#[async_trait]
impl SequenceStorage for FileSequenceStorage {
    async fn next_value(&self, name: &str) -> StorageResult<u64> {
        let _guard = self.lock.lock().await;

        self.update_state(name, |state| {
            state
                .allocate()
                .ok_or_else(|| StorageError::SequenceExhausted(name.to_string()))
        })
    }

    async fn advance_to(&self, name: &str, floor: u64) -> StorageResult<u64> {
        let _guard = self.lock.lock().await;

        if !self.sequence_path(name).exists() {
            let state = SequenceState::new(name.to_string(), floor);
            self.write_state_locked(&state)?;
            return Ok(state.current_value);
        }

        self.update_state(name, |state| {
            state.advance_to(floor);
            Ok(state.current_value)
        })
    }
}

/// Sanitize a name for use as a filename.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
