//! Exercise tracker service.
//!
//! Registers users and keeps their exercise logs. Requests are checked
//! against the user first, so an unknown user is reported before a bad field.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::domain::{AddExerciseRequest, Exercise, LogQuery, LogResponse, NewExercise, User};
use crate::error::{AppError, Result, StorageError};
use crate::storage::DynStorage;

/// Service for users and their exercises.
pub struct TrackerService {
    /// Storage backend.
    storage: Arc<DynStorage>,
    /// Cap applied to every log query.
    max_log_entries: usize,
}

impl TrackerService {
    /// Create a new tracker service.
    pub fn new(storage: Arc<DynStorage>, config: &TrackerConfig) -> Self {
        Self {
            storage,
            max_log_entries: config.max_log_entries,
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `UsernameTaken` if the name is registered, or a storage error.
    pub async fn create_user(&self, username: &str) -> Result<User> {
        match self.storage.insert_user(username).await {
            Ok(user) => {
                info!(user_id = %user.id, username = %user.username, "User created");
                metrics::counter!("tracker_users_created_total").increment(1);
                Ok(user)
            }
            Err(StorageError::Duplicate { .. }) => {
                Err(AppError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    /// List every user in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.storage.list_users().await?)
    }

    /// Log an exercise for an existing user.
    ///
    /// The date defaults to today (UTC).
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user does not exist, `BadRequest` if a
    /// field is invalid, or a storage error.
    pub async fn add_exercise(
        &self,
        user_id: &str,
        request: &AddExerciseRequest,
    ) -> Result<(User, Exercise)> {
        let user = self.require_user(user_id).await?;
        let input = request.validate().map_err(AppError::BadRequest)?;

        let exercise = self
            .storage
            .insert_exercise(NewExercise {
                user_id: user.id.clone(),
                description: input.description,
                duration: input.duration,
                date: input
                    .date
                    .unwrap_or_else(|| chrono::Utc::now().date_naive()),
            })
            .await?;

        info!(
            user_id = %user.id,
            exercise_id = %exercise.id,
            duration = exercise.duration,
            date = %exercise.date,
            "Exercise logged"
        );
        metrics::counter!("tracker_exercises_logged_total").increment(1);

        Ok((user, exercise))
    }

    /// Fetch a user's exercises that match `query`.
    ///
    /// The limit is clamped to the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user does not exist, `BadRequest` if a
    /// bound cannot be parsed, or a storage error.
    pub async fn get_log(&self, user_id: &str, query: &LogQuery) -> Result<LogResponse> {
        let user = self.require_user(user_id).await?;
        let filter = query
            .to_filter(self.max_log_entries)
            .map_err(AppError::BadRequest)?;

        let exercises = self.storage.find_exercises(&user.id, &filter).await?;

        debug!(user_id = %user.id, count = exercises.len(), "Log fetched");
        Ok(LogResponse::new(user, &filter, exercises))
    }

    async fn require_user(&self, user_id: &str) -> Result<User> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }
}
