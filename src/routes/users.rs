use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{NewUser, User, UserPatch};
use crate::routes::validation::validate_registration;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Register a new user
///
/// Creates the user record and seeds its token balance and stats rows in the
/// same storage operation. Returns 409 Conflict if the email is taken.
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<Json<UserResponse>> {
    validate_registration(&payload)?;

    if state
        .storage
        .get_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        tracing::info!("Registration rejected: email already in use");
        return Err(AppError::EmailTaken);
    }

    let user = state.storage.create_user(payload).await?;
    tracing::info!(user_id = user.id, "New user registered");

    Ok(Json(UserResponse { user }))
}

/// Fetch the current user by id
pub async fn get_me(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>> {
    let user = state
        .storage
        .get_user(user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(UserResponse { user }))
}

/// Partially update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserResponse>> {
    let user = state
        .storage
        .update_user(id, patch)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(UserResponse { user }))
}
