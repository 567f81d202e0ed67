//! Exercise tracker handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::api::extractors::JsonOrForm;
use crate::api::state::AppState;
use crate::domain::{
    AddExerciseRequest, CreateUserRequest, ExerciseResponse, LogQuery, LogResponse, UserResponse,
};
use crate::error::{AppError, Result};

/// Register a user.
pub async fn create_user(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<CreateUserRequest>,
) -> Result<Json<UserResponse>> {
    let username = request.validate().map_err(AppError::BadRequest)?;
    let user = state.tracker.create_user(username).await?;

    Ok(Json(user.into()))
}

/// List all users.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.tracker.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Log an exercise for the user in the path.
pub async fn add_exercise(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonOrForm(request): JsonOrForm<AddExerciseRequest>,
) -> Result<Json<ExerciseResponse>> {
    let (user, exercise) = state.tracker.add_exercise(&user_id, &request).await?;

    Ok(Json(ExerciseResponse::new(user, exercise)))
}

/// Fetch the user's exercise log, optionally bounded by `from`, `to` and `limit`.
pub async fn get_logs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: std::result::Result<Query<LogQuery>, QueryRejection>,
) -> Result<Json<LogResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let log = state.tracker.get_log(&user_id, &query).await?;

    Ok(Json(log))
}
