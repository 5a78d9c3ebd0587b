//! Storage layer.
//!
//! One trait, two interchangeable backends: [`MemoryStorage`] for
//! development and tests, [`PgStorage`] for production. The backend is
//! chosen once at startup via `STORAGE_BACKEND`; everything above the trait
//! is backend-agnostic.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    NewReward, NewRide, NewUser, Reward, Ride, RidePatch, StatsPatch, TokenBalance, TokensPatch,
    User, UserPatch, UserReward, UserStats,
};

/// Storage backend failure. The memory backend never produces one.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Uniform CRUD access to every entity type.
///
/// Missing records are signaled with `Ok(None)`, never as errors; errors are
/// reserved for backend failures. Partial updates merge the provided fields
/// over the stored record and return the merged result, or `None` when the
/// id has no backing record.
#[async_trait]
pub trait Storage: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Get a user by id.
    async fn get_user(&self, id: i32) -> Result<Option<User>>;

    /// Look a user up by email (exact match).
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create a user and seed its token balance and stats rows in the same
    /// logical operation. Server-controlled defaults (rating, trust score,
    /// verification flag, timestamps) are filled in here.
    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    /// Merge the patch over an existing user.
    async fn update_user(&self, id: i32, patch: UserPatch) -> Result<Option<User>>;

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Get a user's token balance.
    async fn get_user_tokens(&self, user_id: i32) -> Result<Option<TokenBalance>>;

    /// Merge the patch over a user's token balance. The stored `total` is
    /// only written when the patch supplies one; it is never recomputed
    /// from the category balances.
    async fn update_user_tokens(
        &self,
        user_id: i32,
        patch: TokensPatch,
    ) -> Result<Option<TokenBalance>>;

    // =========================================================================
    // Rides
    // =========================================================================

    /// Get a ride by id.
    async fn get_ride(&self, id: i32) -> Result<Option<Ride>>;

    /// All rides where the user is the driver or the matched rider.
    async fn get_user_rides(&self, user_id: i32) -> Result<Vec<Ride>>;

    /// All pending rides. The geographic arguments are accepted but unused;
    /// there is no spatial filter. Kept in the signature so a real filter
    /// can land without an interface change.
    async fn get_nearby_rides(&self, lat: f64, lng: f64, radius: f64) -> Result<Vec<Ride>>;

    /// Create a ride. The rider starts unset, the token reward is the fixed
    /// constant, and `completed_at` starts unset.
    async fn create_ride(&self, new_ride: NewRide) -> Result<Ride>;

    /// Merge the patch over an existing ride. Status writes are not
    /// validated here; strict transition checking is a route-level concern.
    async fn update_ride(&self, id: i32, patch: RidePatch) -> Result<Option<Ride>>;

    // =========================================================================
    // Stats
    // =========================================================================

    /// Get a user's aggregate counters.
    async fn get_user_stats(&self, user_id: i32) -> Result<Option<UserStats>>;

    /// Merge the patch over a user's counters. Replacement, not increment.
    async fn update_user_stats(
        &self,
        user_id: i32,
        patch: StatsPatch,
    ) -> Result<Option<UserStats>>;

    // =========================================================================
    // Rewards
    // =========================================================================

    /// All active catalog entries.
    async fn get_rewards(&self) -> Result<Vec<Reward>>;

    /// Active catalog entries whose category equals `category` exactly
    /// (case-sensitive).
    async fn get_rewards_by_category(&self, category: &str) -> Result<Vec<Reward>>;

    /// All redemption records for a user, in insertion order.
    async fn get_user_rewards(&self, user_id: i32) -> Result<Vec<UserReward>>;

    /// Record a redemption with status `redeemed` and the current time.
    /// No catalog lookup, no balance check, no debit.
    async fn redeem_reward(&self, user_id: i32, reward_id: i32) -> Result<UserReward>;

    /// Insert the reward catalog if it has not been seeded yet.
    /// A no-op when any catalog entry already exists.
    async fn seed_rewards(&self, catalog: Vec<NewReward>) -> Result<()>;

    // =========================================================================
    // Health
    // =========================================================================

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<()>;
}
