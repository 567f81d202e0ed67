//! File-based storage backend.
//!
//! This backend stores data as JSON files with file locking for atomic operations.
//! Suitable for development and single-node deployments.
//!
//! Directory structure:
//! ```text
//! data/
//! ├── collections/
//! │   ├── users.json        (+ users.json.lock)
//! │   ├── exercises.json    (+ exercises.json.lock)
//! │   └── urls.json         (+ urls.json.lock)
//! └── sequences/
//!     └── {name}.json
//! ```

mod collection;
mod sequence;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::FileStorageConfig;
use crate::domain::{Exercise, ExerciseFilter, NewExercise, ShortUrl, User};
use crate::error::{StorageError, StorageResult};
use crate::storage::index;
use crate::storage::traits::{
    ExerciseStorage, SequenceStorage, Storage, UrlStorage, UserStorage,
};

pub use collection::FileCollection;
pub use sequence::FileSequenceStorage;

/// File-based storage implementation.
pub struct FileStorage {
    /// Base data directory.
    base_dir: PathBuf,
    /// Sequence storage.
    sequence_storage: FileSequenceStorage,
    /// User documents.
    users: FileCollection<User>,
    /// Exercise documents.
    exercises: FileCollection<Exercise>,
    /// Short URL documents.
    urls: FileCollection<ShortUrl>,
}

impl FileStorage {
    /// Create a new file storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directories cannot be created.
    pub fn new(config: &FileStorageConfig) -> StorageResult<Self> {
        let base_dir = config.data_dir.clone();

        Self::ensure_directories(&base_dir)?;

        let collections = base_dir.join("collections");
        Ok(Self {
            sequence_storage: FileSequenceStorage::new(base_dir.join("sequences")),
            users: FileCollection::new(collections.join("users.json")),
            exercises: FileCollection::new(collections.join("exercises.json")),
            urls: FileCollection::new(collections.join("urls.json")),
            base_dir,
        })
    }

    /// Ensure all required directories exist.
    fn ensure_directories(base_dir: &Path) -> StorageResult<()> {
        let dirs = [
            base_dir.to_path_buf(),
            base_dir.join("collections"),
            base_dir.join("sequences"),
        ];

        for dir in &dirs {
            std::fs::create_dir_all(dir).map_err(|e| {
                StorageError::FileIO(format!("Failed to create directory {}: {e}", dir.display()))
            })?;
        }

        Ok(())
    }
}

#[async_trait]
impl SequenceStorage for FileStorage {
    async fn next_value(&self, name: &str) -> StorageResult<u64> {
        self.sequence_storage.next_value(name).await
    }

    async fn advance_to(&self, name: &str, floor: u64) -> StorageResult<u64> {
        self.sequence_storage.advance_to(name, floor).await
    }
}

#[async_trait]
impl UserStorage for FileStorage {
    async fn insert_user(&self, username: &str) -> StorageResult<User> {
        self.users
            .update(|users| {
                index::check_username(users, username)?;
                let user = User::new(username);
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    async fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .read_all()
            .await?
            .into_iter()
            .find(|u| u.id == id))
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        self.users.read_all().await
    }
}

#[async_trait]
impl ExerciseStorage for FileStorage {
    async fn insert_exercise(&self, exercise: NewExercise) -> StorageResult<Exercise> {
        let exercise = Exercise::from(exercise);
        self.exercises
            .update(|exercises| {
                exercises.push(exercise.clone());
                Ok(())
            })
            .await?;
        Ok(exercise)
    }

    async fn find_exercises(
        &self,
        user_id: &str,
        filter: &ExerciseFilter,
    ) -> StorageResult<Vec<Exercise>> {
        let exercises = self.exercises.read_all().await?;
        Ok(filter.apply(exercises.iter().filter(|e| e.user_id == user_id)))
    }
}

#[async_trait]
impl UrlStorage for FileStorage {
    async fn insert_url(&self, url: &ShortUrl) -> StorageResult<()> {
        self.urls
            .update(|urls| {
                index::check_url(urls, url)?;
                urls.push(url.clone());
                Ok(())
            })
            .await
    }

    async fn find_url_by_original(&self, original: &str) -> StorageResult<Option<ShortUrl>> {
        Ok(self
            .urls
            .read_all()
            .await?
            .into_iter()
            .find(|u| u.original == original))
    }

    async fn find_url_by_short(&self, short: u64) -> StorageResult<Option<ShortUrl>> {
        Ok(self
            .urls
            .read_all()
            .await?
            .into_iter()
            .find(|u| u.short == short))
    }

    async fn max_short(&self) -> StorageResult<Option<u64>> {
        Ok(self.urls.read_all().await?.iter().map(|u| u.short).max())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn health_check(&self) -> StorageResult<()> {
        // Check if base directory is accessible
        if !self.base_dir.exists() {
            return Err(StorageError::Unavailable);
        }

        // Try to create a test file
        let test_file = self.base_dir.join(".health_check");
        tokio::fs::write(&test_file, b"ok")
            .await
            .map_err(|e| StorageError::FileIO(format!("Health check failed: {e}")))?;
        tokio::fs::remove_file(&test_file)
            .await
            .map_err(|e| StorageError::FileIO(format!("Health check cleanup failed: {e}")))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = FileStorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
        };
        let storage = FileStorage::new(&config).unwrap();
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (storage, _temp) = create_test_storage();
        tokio_test::assert_ok!(storage.health_check().await);
        assert_eq!(storage.backend_name(), "file");
    }

    #[tokio::test]
    async fn test_user_operations() {
        let (storage, _temp) = create_test_storage();

        let alice = storage.insert_user("alice").await.unwrap();
        storage.insert_user("bob").await.unwrap();

        let dup = storage.insert_user("alice").await;
        assert!(matches!(dup, Err(StorageError::Duplicate { .. })));

        let users = storage.list_users().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);

        assert_eq!(storage.get_user(&alice.id).await.unwrap(), Some(alice));
        assert_eq!(storage.get_user("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_exercise_operations() {
        let (storage, _temp) = create_test_storage();

        for (user_id, day) in [("u1", 3), ("u2", 4), ("u1", 5)] {
            storage
                .insert_exercise(NewExercise {
                    user_id: user_id.to_string(),
                    description: format!("day {day}"),
                    duration: 20,
                    date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
                })
                .await
                .unwrap();
        }

        let filter = ExerciseFilter {
            from: NaiveDate::from_ymd_opt(2024, 6, 4),
            to: None,
            limit: 10,
        };
        let found = storage.find_exercises("u1", &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "day 5");
    }

    #[tokio::test]
    async fn test_url_operations() {
        let (storage, _temp) = create_test_storage();

        storage
            .insert_url(&ShortUrl::new("https://example.com", 1))
            .await
            .unwrap();
        storage
            .insert_url(&ShortUrl::new("https://example.org", 2))
            .await
            .unwrap();

        let dup = storage
            .insert_url(&ShortUrl::new("https://example.net", 2))
            .await;
        assert!(matches!(dup, Err(StorageError::Duplicate { field: "short", .. })));

        assert_eq!(storage.max_short().await.unwrap(), Some(2));
        assert_eq!(
            storage
                .find_url_by_original("https://example.org")
                .await
                .unwrap()
                .map(|u| u.short),
            Some(2)
        );
        assert_eq!(
            storage.find_url_by_short(1).await.unwrap().map(|u| u.original),
            Some("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_sequence_delegation() {
        let (storage, _temp) = create_test_storage();

        assert_eq!(storage.advance_to("shorturl", 1).await.unwrap(), 1);
        assert_eq!(storage.next_value("shorturl").await.unwrap(), 1);
        assert_eq!(storage.advance_to("shorturl", 1).await.unwrap(), 2);
    }
}
