//! In-memory storage backend.
//!
//! Plain maps behind a single `RwLock`; per-entity id counters start at 1.
//! State is lost on shutdown. Token balance and stats rows share their
//! owning user's id, so the one-to-one lookups are direct map hits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Result, Storage};
use crate::constants::{
    DEFAULT_SEATS_AVAILABLE, DEFAULT_TRUST_SCORE, DEFAULT_USER_RATING, RIDE_TOKENS_EARNED,
    SEED_STATS_CARBON_SAVED_KG, SEED_STATS_DISTANCE_KM, SEED_STATS_TOKENS_EARNED,
    SEED_STATS_TOTAL_RIDES, SEED_TOKENS_CLOTHING, SEED_TOKENS_COUPONS, SEED_TOKENS_FOOD,
    SEED_TOKENS_TOTAL, SEED_TOKENS_TRAVEL,
};
use crate::models::{
    NewReward, NewRide, NewUser, Reward, RewardStatus, Ride, RidePatch, RideStatus, StatsPatch,
    TokenBalance, TokensPatch, User, UserPatch, UserReward, UserStats,
};

#[derive(Default)]
struct Inner {
    users: HashMap<i32, User>,
    /// Keyed by user id
    tokens: HashMap<i32, TokenBalance>,
    rides: HashMap<i32, Ride>,
    /// Keyed by user id
    stats: HashMap<i32, UserStats>,
    rewards: HashMap<i32, Reward>,
    user_rewards: HashMap<i32, UserReward>,
    next_user_id: i32,
    next_ride_id: i32,
    next_reward_id: i32,
    next_user_reward_id: i32,
}

/// Ephemeral storage backend for development and tests
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    /// Create an empty store. The reward catalog is seeded separately via
    /// `seed_rewards`, like the persistent backend.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_user_id: 1,
                next_ride_id: 1,
                next_reward_id: 1,
                next_user_reward_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut inner = self.inner.write().await;
        let id = inner.next_user_id;
        inner.next_user_id += 1;
        let now = Utc::now();

        let user = User {
            id,
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            avatar: new_user.avatar,
            phone: new_user.phone,
            location: new_user.location,
            rating: DEFAULT_USER_RATING,
            trust_score: DEFAULT_TRUST_SCORE,
            is_verified: false,
            created_at: now,
        };
        inner.users.insert(id, user.clone());

        // Seed the token balance for the new user. The whole sequence runs
        // under one write lock, so a user is never observable without its
        // token and stats rows.
        inner.tokens.insert(
            id,
            TokenBalance {
                id,
                user_id: id,
                food: SEED_TOKENS_FOOD,
                travel: SEED_TOKENS_TRAVEL,
                clothing: SEED_TOKENS_CLOTHING,
                coupons: SEED_TOKENS_COUPONS,
                total: SEED_TOKENS_TOTAL,
                updated_at: now,
            },
        );

        // Seed the stats row for the new user
        inner.stats.insert(
            id,
            UserStats {
                id,
                user_id: id,
                total_rides: SEED_STATS_TOTAL_RIDES,
                carbon_saved: SEED_STATS_CARBON_SAVED_KG,
                distance_traveled: SEED_STATS_DISTANCE_KM,
                tokens_earned: SEED_STATS_TOKENS_EARNED,
                updated_at: now,
            },
        );

        Ok(user)
    }

    async fn update_user(&self, id: i32, patch: UserPatch) -> Result<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            patch.apply(user);
            user.clone()
        }))
    }

    async fn get_user_tokens(&self, user_id: i32) -> Result<Option<TokenBalance>> {
        let inner = self.inner.read().await;
        Ok(inner.tokens.get(&user_id).cloned())
    }

    async fn update_user_tokens(
        &self,
        user_id: i32,
        patch: TokensPatch,
    ) -> Result<Option<TokenBalance>> {
        let mut inner = self.inner.write().await;
        Ok(inner.tokens.get_mut(&user_id).map(|tokens| {
            patch.apply(tokens);
            tokens.updated_at = Utc::now();
            tokens.clone()
        }))
    }

    async fn get_ride(&self, id: i32) -> Result<Option<Ride>> {
        let inner = self.inner.read().await;
        Ok(inner.rides.get(&id).cloned())
    }

    async fn get_user_rides(&self, user_id: i32) -> Result<Vec<Ride>> {
        let inner = self.inner.read().await;
        let mut rides: Vec<Ride> = inner
            .rides
            .values()
            .filter(|r| r.driver_id == user_id || r.rider_id == Some(user_id))
            .cloned()
            .collect();
        rides.sort_by_key(|r| r.id);
        Ok(rides)
    }

    async fn get_nearby_rides(&self, _lat: f64, _lng: f64, _radius: f64) -> Result<Vec<Ride>> {
        // No spatial filter; every pending ride is "nearby"
        let inner = self.inner.read().await;
        let mut rides: Vec<Ride> = inner
            .rides
            .values()
            .filter(|r| r.status == RideStatus::Pending)
            .cloned()
            .collect();
        rides.sort_by_key(|r| r.id);
        Ok(rides)
    }

    async fn create_ride(&self, new_ride: NewRide) -> Result<Ride> {
        let mut inner = self.inner.write().await;
        let id = inner.next_ride_id;
        inner.next_ride_id += 1;

        let ride = Ride {
            id,
            driver_id: new_ride.driver_id,
            rider_id: new_ride.rider_id,
            status: new_ride.status,
            pickup_location: new_ride.pickup_location,
            destination: new_ride.destination,
            seats_available: new_ride.seats_available.unwrap_or(DEFAULT_SEATS_AVAILABLE),
            tokens_earned: RIDE_TOKENS_EARNED,
            distance: new_ride.distance,
            duration: new_ride.duration,
            scheduled_time: new_ride.scheduled_time,
            created_at: Utc::now(),
            completed_at: None,
        };
        inner.rides.insert(id, ride.clone());
        Ok(ride)
    }

    async fn update_ride(&self, id: i32, patch: RidePatch) -> Result<Option<Ride>> {
        let mut inner = self.inner.write().await;
        Ok(inner.rides.get_mut(&id).map(|ride| {
            patch.apply(ride);
            ride.clone()
        }))
    }

    async fn get_user_stats(&self, user_id: i32) -> Result<Option<UserStats>> {
        let inner = self.inner.read().await;
        Ok(inner.stats.get(&user_id).cloned())
    }

    async fn update_user_stats(
        &self,
        user_id: i32,
        patch: StatsPatch,
    ) -> Result<Option<UserStats>> {
        let mut inner = self.inner.write().await;
        Ok(inner.stats.get_mut(&user_id).map(|stats| {
            patch.apply(stats);
            stats.updated_at = Utc::now();
            stats.clone()
        }))
    }

    async fn get_rewards(&self) -> Result<Vec<Reward>> {
        let inner = self.inner.read().await;
        let mut rewards: Vec<Reward> = inner
            .rewards
            .values()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        rewards.sort_by_key(|r| r.id);
        Ok(rewards)
    }

    async fn get_rewards_by_category(&self, category: &str) -> Result<Vec<Reward>> {
        let inner = self.inner.read().await;
        let mut rewards: Vec<Reward> = inner
            .rewards
            .values()
            .filter(|r| r.is_active && r.category == category)
            .cloned()
            .collect();
        rewards.sort_by_key(|r| r.id);
        Ok(rewards)
    }

    async fn get_user_rewards(&self, user_id: i32) -> Result<Vec<UserReward>> {
        let inner = self.inner.read().await;
        let mut redemptions: Vec<UserReward> = inner
            .user_rewards
            .values()
            .filter(|ur| ur.user_id == user_id)
            .cloned()
            .collect();
        redemptions.sort_by_key(|ur| ur.id);
        Ok(redemptions)
    }

    async fn redeem_reward(&self, user_id: i32, reward_id: i32) -> Result<UserReward> {
        let mut inner = self.inner.write().await;
        let id = inner.next_user_reward_id;
        inner.next_user_reward_id += 1;

        let user_reward = UserReward {
            id,
            user_id,
            reward_id,
            redeemed_at: Utc::now(),
            status: RewardStatus::Redeemed,
        };
        inner.user_rewards.insert(id, user_reward.clone());
        Ok(user_reward)
    }

    async fn seed_rewards(&self, catalog: Vec<NewReward>) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.rewards.is_empty() {
            return Ok(());
        }
        for entry in catalog {
            let id = inner.next_reward_id;
            inner.next_reward_id += 1;
            inner.rewards.insert(
                id,
                Reward {
                    id,
                    name: entry.name,
                    description: entry.description,
                    category: entry.category,
                    tokens_required: entry.tokens_required,
                    brand: entry.brand,
                    icon: entry.icon,
                    is_active: entry.is_active,
                },
            );
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::reward_catalog;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Alex Kumar".to_string(),
            role: crate::models::Role::Both,
            avatar: None,
            phone: None,
            location: None,
        }
    }

    fn new_ride(driver_id: i32) -> NewRide {
        NewRide {
            driver_id,
            status: RideStatus::Pending,
            rider_id: None,
            pickup_location: None,
            destination: None,
            seats_available: None,
            distance: None,
            duration: None,
            scheduled_time: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_seeds_tokens_and_stats() {
        let store = MemoryStorage::new();
        let user = store.create_user(new_user("alex@example.com")).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.rating, DEFAULT_USER_RATING);
        assert_eq!(user.trust_score, DEFAULT_TRUST_SCORE);
        assert!(!user.is_verified);

        let fetched = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched, user);

        let tokens = store.get_user_tokens(user.id).await.unwrap().unwrap();
        assert_eq!(tokens.food, SEED_TOKENS_FOOD);
        assert_eq!(tokens.travel, SEED_TOKENS_TRAVEL);
        assert_eq!(tokens.clothing, SEED_TOKENS_CLOTHING);
        assert_eq!(tokens.coupons, SEED_TOKENS_COUPONS);
        assert_eq!(tokens.total, SEED_TOKENS_TOTAL);

        let stats = store.get_user_stats(user.id).await.unwrap().unwrap();
        assert_eq!(stats.total_rides, SEED_STATS_TOTAL_RIDES);
        assert_eq!(stats.carbon_saved, SEED_STATS_CARBON_SAVED_KG);
        assert_eq!(stats.distance_traveled, SEED_STATS_DISTANCE_KM);
        assert_eq!(stats.tokens_earned, SEED_STATS_TOKENS_EARNED);
    }

    #[tokio::test]
    async fn test_get_user_by_email() {
        let store = MemoryStorage::new();
        store.create_user(new_user("alex@example.com")).await.unwrap();
        store.create_user(new_user("priya@example.com")).await.unwrap();

        let found = store
            .get_user_by_email("priya@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, 2);

        assert!(store
            .get_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_empty_patch_is_noop_and_missing_id_is_none() {
        let store = MemoryStorage::new();
        let user = store.create_user(new_user("alex@example.com")).await.unwrap();

        let unchanged = store
            .update_user(user.id, UserPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged, user);

        assert!(store
            .update_user(999, UserPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_user_tokens(999, TokensPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_ride(999, RidePatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_user_stats(999, StatsPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_token_category_patch_does_not_recompute_total() {
        let store = MemoryStorage::new();
        let alex = store.create_user(new_user("alex@example.com")).await.unwrap();

        let tokens = store.get_user_tokens(alex.id).await.unwrap().unwrap();
        assert_eq!(tokens.total, 185);

        let patched = store
            .update_user_tokens(
                alex.id,
                TokensPatch {
                    food: Some(100),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        // The category changed but the stored total did not
        assert_eq!(patched.food, 100);
        assert_eq!(patched.total, 185);
    }

    #[tokio::test]
    async fn test_user_rides_covers_driver_and_matched_rider() {
        let store = MemoryStorage::new();
        let driver = store.create_user(new_user("driver@example.com")).await.unwrap();
        let rider = store.create_user(new_user("rider@example.com")).await.unwrap();

        let ride = store.create_ride(new_ride(driver.id)).await.unwrap();
        assert_eq!(ride.tokens_earned, RIDE_TOKENS_EARNED);
        assert!(ride.rider_id.is_none());
        assert!(ride.completed_at.is_none());

        let driver_rides = store.get_user_rides(driver.id).await.unwrap();
        assert_eq!(driver_rides.len(), 1);
        assert_eq!(driver_rides[0].id, ride.id);

        assert!(store.get_user_rides(rider.id).await.unwrap().is_empty());

        // Attach the rider; the ride now shows up for both parties
        store
            .update_ride(
                ride.id,
                RidePatch {
                    rider_id: Some(rider.id),
                    status: Some(RideStatus::Matched),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let rider_rides = store.get_user_rides(rider.id).await.unwrap();
        assert_eq!(rider_rides.len(), 1);
        assert_eq!(rider_rides[0].id, ride.id);
        assert_eq!(rider_rides[0].status, RideStatus::Matched);
    }

    #[tokio::test]
    async fn test_nearby_rides_returns_pending_only() {
        let store = MemoryStorage::new();
        let driver = store.create_user(new_user("driver@example.com")).await.unwrap();

        let pending = store.create_ride(new_ride(driver.id)).await.unwrap();
        let completed = store.create_ride(new_ride(driver.id)).await.unwrap();
        store
            .update_ride(
                completed.id,
                RidePatch {
                    status: Some(RideStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Coordinates are irrelevant to the result
        let nearby = store.get_nearby_rides(0.0, 0.0, 99999.0).await.unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].id, pending.id);
    }

    #[tokio::test]
    async fn test_lax_status_writes_are_accepted() {
        let store = MemoryStorage::new();
        let driver = store.create_user(new_user("driver@example.com")).await.unwrap();
        let ride = store.create_ride(new_ride(driver.id)).await.unwrap();

        // pending -> completed skips the sequence; storage accepts it anyway
        let updated = store
            .update_ride(
                ride.id,
                RidePatch {
                    status: Some(RideStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, RideStatus::Completed);
        // Completion never sets the timestamp on its own
        assert!(updated.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_reward_catalog_seeding_is_idempotent() {
        let store = MemoryStorage::new();
        store.seed_rewards(reward_catalog()).await.unwrap();
        store.seed_rewards(reward_catalog()).await.unwrap();

        let rewards = store.get_rewards().await.unwrap();
        assert_eq!(rewards.len(), 5);
    }

    #[tokio::test]
    async fn test_rewards_by_category_filters_active_exact_match() {
        let store = MemoryStorage::new();
        let mut catalog = reward_catalog();
        catalog.push(NewReward {
            name: "Retired Deal".to_string(),
            description: None,
            category: "food".to_string(),
            tokens_required: 10,
            brand: None,
            icon: None,
            is_active: false,
        });
        store.seed_rewards(catalog).await.unwrap();

        let food = store.get_rewards_by_category("food").await.unwrap();
        assert_eq!(food.len(), 2);
        assert!(food.iter().all(|r| r.category == "food" && r.is_active));

        // Case-sensitive match
        assert!(store.get_rewards_by_category("Food").await.unwrap().is_empty());

        // Inactive entries are excluded from the full listing too
        assert_eq!(store.get_rewards().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_redeem_reward_is_unconditional() {
        let store = MemoryStorage::new();

        // Neither the user nor the reward exists; redemption succeeds anyway
        let redemption = store.redeem_reward(999, 888).await.unwrap();
        assert_eq!(redemption.user_id, 999);
        assert_eq!(redemption.reward_id, 888);
        assert_eq!(redemption.status, RewardStatus::Redeemed);

        let records = store.get_user_rewards(999).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], redemption);
    }

    #[tokio::test]
    async fn test_redeem_reward_never_debits_balance() {
        let store = MemoryStorage::new();
        store.seed_rewards(reward_catalog()).await.unwrap();
        let alex = store.create_user(new_user("alex@example.com")).await.unwrap();

        let before = store.get_user_tokens(alex.id).await.unwrap().unwrap();
        store.redeem_reward(alex.id, 1).await.unwrap();
        let after = store.get_user_tokens(alex.id).await.unwrap().unwrap();

        assert_eq!(before, after);
    }
}
