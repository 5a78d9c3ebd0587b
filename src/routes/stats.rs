use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{StatsPatch, UserStats};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: UserStats,
}

/// Fetch a user's aggregate ride counters
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<StatsResponse>> {
    let stats = state
        .storage
        .get_user_stats(user_id)
        .await?
        .ok_or(AppError::NotFound("Stats"))?;
    Ok(Json(StatsResponse { stats }))
}

/// Partially update a user's counters. Values are replaced, not added;
/// nothing here derives counters from completed rides.
pub async fn update_user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(patch): Json<StatsPatch>,
) -> Result<Json<StatsResponse>> {
    let stats = state
        .storage
        .update_user_stats(user_id, patch)
        .await?
        .ok_or(AppError::NotFound("Stats"))?;
    Ok(Json(StatsResponse { stats }))
}
