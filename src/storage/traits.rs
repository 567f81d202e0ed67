//! Storage trait definitions.
//!
//! These traits define the interface for storage backends, enabling swapping
//! between different implementations without changing business logic.

use async_trait::async_trait;

use crate::domain::{Exercise, ExerciseFilter, NewExercise, ShortUrl, User};
use crate::error::StorageResult;

/// Sequence storage operations.
///
/// Provides atomic operations for managing named counters.
#[async_trait]
pub trait SequenceStorage: Send + Sync {
    /// Hand out the next value and atomically advance the counter.
    ///
    /// Fails with `StorageError::NotFound` if the sequence was never created.
    async fn next_value(&self, name: &str) -> StorageResult<u64>;

    /// Raise the counter so the next value is at least `floor`, creating the
    /// sequence at `floor` if it does not exist.
    ///
    /// Returns the next value the sequence will hand out.
    async fn advance_to(&self, name: &str, floor: u64) -> StorageResult<u64>;
}

/// User collection.
///
/// `username` carries a unique index.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Insert a user with a store-generated id.
    ///
    /// Fails with `StorageError::Duplicate` if the username is taken.
    async fn insert_user(&self, username: &str) -> StorageResult<User>;

    /// Look a user up by id.
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>>;

    /// All users in creation order.
    async fn list_users(&self) -> StorageResult<Vec<User>>;
}

/// Exercise collection.
#[async_trait]
pub trait ExerciseStorage: Send + Sync {
    /// Insert an exercise with a store-generated id.
    ///
    /// The owner is not checked here.
    async fn insert_exercise(&self, exercise: NewExercise) -> StorageResult<Exercise>;

    /// A user's exercises in insertion order, narrowed by `filter`.
    async fn find_exercises(
        &self,
        user_id: &str,
        filter: &ExerciseFilter,
    ) -> StorageResult<Vec<Exercise>>;
}

/// Short URL collection.
///
/// Both `original` and `short` carry unique indexes.
#[async_trait]
pub trait UrlStorage: Send + Sync {
    /// Insert a record.
    ///
    /// Fails with `StorageError::Duplicate` naming the colliding field.
    async fn insert_url(&self, url: &ShortUrl) -> StorageResult<()>;

    /// Look a record up by its original URL.
    async fn find_url_by_original(&self, original: &str) -> StorageResult<Option<ShortUrl>>;

    /// Look a record up by its short code.
    async fn find_url_by_short(&self, short: u64) -> StorageResult<Option<ShortUrl>>;

    /// Highest short code stored, if any.
    async fn max_short(&self) -> StorageResult<Option<u64>>;
}

/// Combined storage trait for all storage operations.
#[async_trait]
pub trait Storage: SequenceStorage + UserStorage + ExerciseStorage + UrlStorage {
    /// Check if the storage backend is healthy and reachable.
    async fn health_check(&self) -> StorageResult<()>;

    /// Get the storage backend name.
    fn backend_name(&self) -> &'static str;
}

/// Trait object alias for Storage.
pub type DynStorage = dyn Storage;
