use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Reward, UserReward};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RewardsResponse {
    pub rewards: Vec<Reward>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub user_id: i32,
    pub reward_id: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRewardResponse {
    pub user_reward: UserReward,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRewardsResponse {
    pub user_rewards: Vec<UserReward>,
}

/// All active catalog entries
pub async fn get_rewards(State(state): State<AppState>) -> Result<Json<RewardsResponse>> {
    let rewards = state.storage.get_rewards().await?;
    Ok(Json(RewardsResponse { rewards }))
}

/// Active catalog entries in one category (case-sensitive exact match)
pub async fn get_rewards_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<RewardsResponse>> {
    let rewards = state.storage.get_rewards_by_category(&category).await?;
    Ok(Json(RewardsResponse { rewards }))
}

/// Redeem a catalog reward for a user.
///
/// Records the redemption unconditionally: no catalog lookup, no balance
/// check, no debit. Tightening this needs a product decision first.
pub async fn redeem_reward(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> Result<Json<UserRewardResponse>> {
    let user_reward = state
        .storage
        .redeem_reward(payload.user_id, payload.reward_id)
        .await?;
    tracing::info!(
        user_id = payload.user_id,
        reward_id = payload.reward_id,
        "Reward redeemed"
    );
    Ok(Json(UserRewardResponse { user_reward }))
}

/// All redemption records for a user
pub async fn get_user_rewards(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserRewardsResponse>> {
    let user_rewards = state.storage.get_user_rewards(user_id).await?;
    Ok(Json(UserRewardsResponse { user_rewards }))
}
