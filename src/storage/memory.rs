//! In-memory storage backend.
//!
//! Collections live behind a single `RwLock`, so every insert checks its
//! unique indexes and writes in one critical section. Data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{
    Exercise, ExerciseFilter, NewExercise, SequenceState, ShortUrl, User,
};
use crate::error::{StorageError, StorageResult};
use crate::storage::index;
use crate::storage::traits::{ExerciseStorage, SequenceStorage, Storage, UrlStorage, UserStorage};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    exercises: Vec<Exercise>,
    urls: Vec<ShortUrl>,
    sequences: HashMap<String, SequenceState>,
}

/// In-memory storage implementation.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Collections>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceStorage for MemoryStorage {
    async fn next_value(&self, name: &str) -> StorageResult<u64> {
        let mut inner = self.inner.write();
        let state = inner
            .sequences
            .get_mut(name)
            .ok_or_else(|| StorageError::NotFound(format!("Sequence '{name}' not found")))?;

        state
            .allocate()
            .ok_or_else(|| StorageError::SequenceExhausted(name.to_string()))
    }

    async fn advance_to(&self, name: &str, floor: u64) -> StorageResult<u64> {
        let mut inner = self.inner.write();
        let state = inner
            .sequences
            .entry(name.to_string())
            .or_insert_with(|| SequenceState::new(name.to_string(), floor));

        state.advance_to(floor);
        Ok(state.current_value)
    }
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn insert_user(&self, username: &str) -> StorageResult<User> {
        let mut inner = self.inner.write();
        index::check_username(&inner.users, username)?;

        let user = User::new(username);
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        Ok(self.inner.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        Ok(self.inner.read().users.clone())
    }
}

#[async_trait]
impl ExerciseStorage for MemoryStorage {
    async fn insert_exercise(&self, exercise: NewExercise) -> StorageResult<Exercise> {
        let exercise = Exercise::from(exercise);
        self.inner.write().exercises.push(exercise.clone());
        Ok(exercise)
    }

    async fn find_exercises(
        &self,
        user_id: &str,
        filter: &ExerciseFilter,
    ) -> StorageResult<Vec<Exercise>> {
        let inner = self.inner.read();
        Ok(filter.apply(inner.exercises.iter().filter(|e| e.user_id == user_id)))
    }
}

#[async_trait]
impl UrlStorage for MemoryStorage {
    async fn insert_url(&self, url: &ShortUrl) -> StorageResult<()> {
        let mut inner = self.inner.write();
        index::check_url(&inner.urls, url)?;
        inner.urls.push(url.clone());
        Ok(())
    }

    async fn find_url_by_original(&self, original: &str) -> StorageResult<Option<ShortUrl>> {
        Ok(self
            .inner
            .read()
            .urls
            .iter()
            .find(|u| u.original == original)
            .cloned())
    }

    async fn find_url_by_short(&self, short: u64) -> StorageResult<Option<ShortUrl>> {
        Ok(self
            .inner
            .read()
            .urls
            .iter()
            .find(|u| u.short == short)
            .cloned())
    }

    async fn max_short(&self) -> StorageResult<Option<u64>> {
        Ok(self.inner.read().urls.iter().map(|u| u.short).max())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
