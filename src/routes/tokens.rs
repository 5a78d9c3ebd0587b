use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{TokenBalance, TokensPatch};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub tokens: TokenBalance,
}

/// Fetch a user's token balance
pub async fn get_user_tokens(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<TokensResponse>> {
    let tokens = state
        .storage
        .get_user_tokens(user_id)
        .await?
        .ok_or(AppError::NotFound("Tokens"))?;
    Ok(Json(TokensResponse { tokens }))
}

/// Partially update a user's token balance.
///
/// Category fields are replaced as given. The stored `total` is only written
/// when the caller supplies one; it is never recomputed here.
pub async fn update_user_tokens(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(patch): Json<TokensPatch>,
) -> Result<Json<TokensResponse>> {
    let tokens = state
        .storage
        .update_user_tokens(user_id, patch)
        .await?
        .ok_or(AppError::NotFound("Tokens"))?;
    Ok(Json(TokensResponse { tokens }))
}
