pub mod health;
pub mod rewards;
pub mod rides;
pub mod stats;
pub mod tokens;
pub mod users;
pub mod validation;

pub use health::health_check;
pub use rewards::{get_rewards, get_rewards_by_category, get_user_rewards, redeem_reward};
pub use rides::{create_ride, get_nearby_rides, get_user_rides, update_ride};
pub use stats::{get_user_stats, update_user_stats};
pub use tokens::{get_user_tokens, update_user_tokens};
pub use users::{get_me, register_user, update_user};

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::AppState;

/// Build the API router over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register_user))
        .route("/api/auth/me/:user_id", get(get_me))
        .route("/api/users/:id", put(update_user))
        .route(
            "/api/tokens/:user_id",
            get(get_user_tokens).put(update_user_tokens),
        )
        .route("/api/rides", post(create_ride))
        .route("/api/rides/user/:user_id", get(get_user_rides))
        .route("/api/rides/nearby", get(get_nearby_rides))
        .route("/api/rides/:id", put(update_ride))
        .route(
            "/api/stats/:user_id",
            get(get_user_stats).put(update_user_stats),
        )
        .route("/api/rewards", get(get_rewards))
        .route("/api/rewards/category/:category", get(get_rewards_by_category))
        .route("/api/rewards/redeem", post(redeem_reward))
        .route("/api/rewards/user/:user_id", get(get_user_rewards))
        .with_state(state)
}
