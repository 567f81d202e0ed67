//! A document collection stored as one JSON array file.
//!
//! Writes go to a temporary sibling that is renamed over the data file, so a
//! crash mid-write leaves the previous contents intact. The `flock` is held on
//! a separate `.lock` sibling because the rename replaces the data file.

use std::ffi::OsString;
use std::fs::File;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::error::{StorageError, StorageResult};

/// JSON array of documents guarded by a process mutex and an `flock`.
pub struct FileCollection<T> {
    /// Collection file.
    path: PathBuf,
    /// Serializes access within this process.
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FileCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a collection backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Read every document.
    pub async fn read_all(&self) -> StorageResult<Vec<T>> {
        let _guard = self.lock.lock().await;

        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let lock_file = self.open_lock_file()?;
        lock_file
            .lock_shared()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        let documents = read_documents(&self.path);
        lock_file
            .unlock()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        documents
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// The file is replaced only when `update_fn` succeeds.
    pub async fn update<F, R>(&self, update_fn: F) -> StorageResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> StorageResult<R>,
    {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock_file = self.open_lock_file()?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        let result = (|| -> StorageResult<R> {
            let mut documents = if self.path.exists() {
                read_documents(&self.path)?
            } else {
                Vec::new()
            };
            let output = update_fn(&mut documents)?;

            let json = serde_json::to_string_pretty(&documents)?;
            replace_file(&self.path, json.as_bytes())?;

            Ok(output)
        })();

        lock_file
            .unlock()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        result
    }

    fn open_lock_file(&self) -> StorageResult<File> {
        Ok(std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(sibling(&self.path, ".lock"))?)
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `contents` to a temporary sibling, then rename it over `path`.
fn replace_file(path: &Path, contents: &[u8]) -> StorageResult<()> {
    let tmp_path = sibling(path, ".tmp");

    let mut tmp = File::create(&tmp_path)?;
    tmp.write_all(contents)?;
    tmp.sync_all()?;
    drop(tmp);

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Parse the collection file; an empty file is an empty collection.
fn read_documents<T: DeserializeOwned>(path: &Path) -> StorageResult<Vec<T>> {
    let mut raw = String::new();
    File::open(path)?.read_to_string(&mut raw)?;

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let collection: FileCollection<String> = FileCollection::new(temp.path().join("c.json"));
        assert!(collection.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/c.json");
        let collection: FileCollection<u32> = FileCollection::new(path.clone());

        let len = collection
            .update(|docs| {
                docs.extend([1, 2, 3]);
                Ok(docs.len())
            })
            .await
            .unwrap();
        assert_eq!(len, 3);

        let reopened: FileCollection<u32> = FileCollection::new(path);
        assert_eq!(reopened.read_all().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let collection: FileCollection<u32> = FileCollection::new(temp.path().join("c.json"));

        collection
            .update(|docs| {
                docs.push(7);
                Ok(())
            })
            .await
            .unwrap();

        let result: StorageResult<()> = collection
            .update(|docs| {
                docs.push(8);
                Err(StorageError::Duplicate {
                    field: "value",
                    value: "8".to_string(),
                })
            })
            .await;
        assert!(result.is_err());
        assert_eq!(collection.read_all().await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_update_replaces_file_without_leftovers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("c.json");
        let tmp_path = temp.path().join("c.json.tmp");
        let collection: FileCollection<u32> = FileCollection::new(path.clone());

        collection
            .update(|docs| {
                docs.extend([1, 2]);
                Ok(())
            })
            .await
            .unwrap();
        assert!(!tmp_path.exists());

        // A half-written temp file from an interrupted write is ignored
        std::fs::write(&tmp_path, "[1, 2, 3").unwrap();
        assert_eq!(collection.read_all().await.unwrap(), vec![1, 2]);

        collection
            .update(|docs| {
                docs.push(3);
                Ok(())
            })
            .await
            .unwrap();
        assert!(!tmp_path.exists());

        let raw = std::fs::read_to_string(&path).unwrap();
        let stored: Vec<u32> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vec![1, 2, 3]);
    }
}
