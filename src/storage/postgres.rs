//! PostgreSQL storage backend.
//!
//! Six tables (users, tokens, rides, user_stats, rewards, user_rewards)
//! created by the migrations in `./migrations`. Location blobs live in
//! JSONB columns; roles and statuses are TEXT.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use std::time::Duration;

use super::{Result, Storage};
use crate::constants::{
    DEFAULT_SEATS_AVAILABLE, DEFAULT_TRUST_SCORE, DEFAULT_USER_RATING, RIDE_TOKENS_EARNED,
    SEED_STATS_CARBON_SAVED_KG, SEED_STATS_DISTANCE_KM, SEED_STATS_TOKENS_EARNED,
    SEED_STATS_TOTAL_RIDES, SEED_TOKENS_CLOTHING, SEED_TOKENS_COUPONS, SEED_TOKENS_FOOD,
    SEED_TOKENS_TOTAL, SEED_TOKENS_TRAVEL,
};
use crate::models::{
    Location, NewReward, NewRide, NewUser, Reward, RewardStatus, Ride, RidePatch, RideStatus, Role,
    StatsPatch, TokenBalance, TokensPatch, User, UserPatch, UserReward, UserStats,
};

/// Persistent storage backend over PostgreSQL
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Create a connection pool against the given database URL
    pub async fn connect(database_url: &str) -> std::result::Result<Self, sqlx::Error> {
        tracing::info!("Creating database connection pool...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        tracing::info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Underlying pool, for running migrations at startup
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode_err(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unrecognized {column}: {value}").into(),
    }
}

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let location: Option<Json<Location>> = row.try_get("location")?;
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role: Role::parse(&role).ok_or_else(|| decode_err("role", &role))?,
            avatar: row.try_get("avatar")?,
            phone: row.try_get("phone")?,
            location: location.map(|Json(l)| l),
            rating: row.try_get("rating")?,
            trust_score: row.try_get("trust_score")?,
            is_verified: row.try_get("is_verified")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl FromRow<'_, PgRow> for TokenBalance {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(TokenBalance {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            food: row.try_get("food")?,
            travel: row.try_get("travel")?,
            clothing: row.try_get("clothing")?,
            coupons: row.try_get("coupons")?,
            total: row.try_get("total")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, PgRow> for Ride {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let pickup: Option<Json<Location>> = row.try_get("pickup_location")?;
        let destination: Option<Json<Location>> = row.try_get("destination")?;
        Ok(Ride {
            id: row.try_get("id")?,
            driver_id: row.try_get("driver_id")?,
            rider_id: row.try_get("rider_id")?,
            status: RideStatus::parse(&status).ok_or_else(|| decode_err("status", &status))?,
            pickup_location: pickup.map(|Json(l)| l),
            destination: destination.map(|Json(l)| l),
            seats_available: row.try_get("seats_available")?,
            tokens_earned: row.try_get("tokens_earned")?,
            distance: row.try_get("distance")?,
            duration: row.try_get("duration")?,
            scheduled_time: row.try_get("scheduled_time")?,
            created_at: row.try_get("created_at")?,
            completed_at: row.try_get("completed_at")?,
        })
    }
}

impl FromRow<'_, PgRow> for UserStats {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(UserStats {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            total_rides: row.try_get("total_rides")?,
            carbon_saved: row.try_get("carbon_saved")?,
            distance_traveled: row.try_get("distance_traveled")?,
            tokens_earned: row.try_get("tokens_earned")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, PgRow> for Reward {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Reward {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            tokens_required: row.try_get("tokens_required")?,
            brand: row.try_get("brand")?,
            icon: row.try_get("icon")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

impl FromRow<'_, PgRow> for UserReward {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(UserReward {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            reward_id: row.try_get("reward_id")?,
            redeemed_at: row.try_get("redeemed_at")?,
            status: RewardStatus::parse(&status).ok_or_else(|| decode_err("status", &status))?,
        })
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        // One transaction for the user plus its token and stats rows, so a
        // crash mid-sequence cannot leave a partially-initialized user
        let mut tx = self.pool.begin().await?;

        let user: User = sqlx::query_as(
            "INSERT INTO users (email, name, role, avatar, phone, location, rating, trust_score, is_verified)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE)
             RETURNING *",
        )
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(new_user.role.as_str())
        .bind(&new_user.avatar)
        .bind(&new_user.phone)
        .bind(new_user.location.map(Json))
        .bind(DEFAULT_USER_RATING)
        .bind(DEFAULT_TRUST_SCORE)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO tokens (user_id, food, travel, clothing, coupons, total)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(SEED_TOKENS_FOOD)
        .bind(SEED_TOKENS_TRAVEL)
        .bind(SEED_TOKENS_CLOTHING)
        .bind(SEED_TOKENS_COUPONS)
        .bind(SEED_TOKENS_TOTAL)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_stats (user_id, total_rides, carbon_saved, distance_traveled, tokens_earned)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(SEED_STATS_TOTAL_RIDES)
        .bind(SEED_STATS_CARBON_SAVED_KG)
        .bind(SEED_STATS_DISTANCE_KM)
        .bind(SEED_STATS_TOKENS_EARNED)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn update_user(&self, id: i32, patch: UserPatch) -> Result<Option<User>> {
        let user = sqlx::query_as(
            "UPDATE users SET
                email = COALESCE($2, email),
                name = COALESCE($3, name),
                role = COALESCE($4, role),
                avatar = COALESCE($5, avatar),
                phone = COALESCE($6, phone),
                location = COALESCE($7, location),
                rating = COALESCE($8, rating),
                trust_score = COALESCE($9, trust_score),
                is_verified = COALESCE($10, is_verified)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&patch.email)
        .bind(&patch.name)
        .bind(patch.role.map(Role::as_str))
        .bind(&patch.avatar)
        .bind(&patch.phone)
        .bind(patch.location.map(Json))
        .bind(patch.rating)
        .bind(patch.trust_score)
        .bind(patch.is_verified)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user_tokens(&self, user_id: i32) -> Result<Option<TokenBalance>> {
        let tokens = sqlx::query_as("SELECT * FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tokens)
    }

    async fn update_user_tokens(
        &self,
        user_id: i32,
        patch: TokensPatch,
    ) -> Result<Option<TokenBalance>> {
        // COALESCE keeps the stored total whenever the patch omits one;
        // nothing recomputes it from the category balances
        let tokens = sqlx::query_as(
            "UPDATE tokens SET
                food = COALESCE($2, food),
                travel = COALESCE($3, travel),
                clothing = COALESCE($4, clothing),
                coupons = COALESCE($5, coupons),
                total = COALESCE($6, total),
                updated_at = now()
             WHERE user_id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(patch.food)
        .bind(patch.travel)
        .bind(patch.clothing)
        .bind(patch.coupons)
        .bind(patch.total)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tokens)
    }

    async fn get_ride(&self, id: i32) -> Result<Option<Ride>> {
        let ride = sqlx::query_as("SELECT * FROM rides WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ride)
    }

    async fn get_user_rides(&self, user_id: i32) -> Result<Vec<Ride>> {
        let rides =
            sqlx::query_as("SELECT * FROM rides WHERE driver_id = $1 OR rider_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rides)
    }

    async fn get_nearby_rides(&self, _lat: f64, _lng: f64, _radius: f64) -> Result<Vec<Ride>> {
        // No spatial filter; every pending ride is "nearby"
        let rides = sqlx::query_as("SELECT * FROM rides WHERE status = 'pending' ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rides)
    }

    async fn create_ride(&self, new_ride: NewRide) -> Result<Ride> {
        let ride = sqlx::query_as(
            "INSERT INTO rides (driver_id, rider_id, status, pickup_location, destination,
                                seats_available, tokens_earned, distance, duration, scheduled_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(new_ride.driver_id)
        .bind(new_ride.rider_id)
        .bind(new_ride.status.as_str())
        .bind(new_ride.pickup_location.map(Json))
        .bind(new_ride.destination.map(Json))
        .bind(new_ride.seats_available.unwrap_or(DEFAULT_SEATS_AVAILABLE))
        .bind(RIDE_TOKENS_EARNED)
        .bind(new_ride.distance)
        .bind(new_ride.duration)
        .bind(new_ride.scheduled_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(ride)
    }

    async fn update_ride(&self, id: i32, patch: RidePatch) -> Result<Option<Ride>> {
        let ride = sqlx::query_as(
            "UPDATE rides SET
                rider_id = COALESCE($2, rider_id),
                status = COALESCE($3, status),
                pickup_location = COALESCE($4, pickup_location),
                destination = COALESCE($5, destination),
                seats_available = COALESCE($6, seats_available),
                tokens_earned = COALESCE($7, tokens_earned),
                distance = COALESCE($8, distance),
                duration = COALESCE($9, duration),
                scheduled_time = COALESCE($10, scheduled_time),
                completed_at = COALESCE($11, completed_at)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(patch.rider_id)
        .bind(patch.status.map(RideStatus::as_str))
        .bind(patch.pickup_location.map(Json))
        .bind(patch.destination.map(Json))
        .bind(patch.seats_available)
        .bind(patch.tokens_earned)
        .bind(patch.distance)
        .bind(patch.duration)
        .bind(patch.scheduled_time)
        .bind(patch.completed_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ride)
    }

    async fn get_user_stats(&self, user_id: i32) -> Result<Option<UserStats>> {
        let stats = sqlx::query_as("SELECT * FROM user_stats WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(stats)
    }

    async fn update_user_stats(
        &self,
        user_id: i32,
        patch: StatsPatch,
    ) -> Result<Option<UserStats>> {
        let stats = sqlx::query_as(
            "UPDATE user_stats SET
                total_rides = COALESCE($2, total_rides),
                carbon_saved = COALESCE($3, carbon_saved),
                distance_traveled = COALESCE($4, distance_traveled),
                tokens_earned = COALESCE($5, tokens_earned),
                updated_at = now()
             WHERE user_id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(patch.total_rides)
        .bind(patch.carbon_saved)
        .bind(patch.distance_traveled)
        .bind(patch.tokens_earned)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stats)
    }

    async fn get_rewards(&self) -> Result<Vec<Reward>> {
        let rewards = sqlx::query_as("SELECT * FROM rewards WHERE is_active ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rewards)
    }

    async fn get_rewards_by_category(&self, category: &str) -> Result<Vec<Reward>> {
        let rewards =
            sqlx::query_as("SELECT * FROM rewards WHERE is_active AND category = $1 ORDER BY id")
                .bind(category)
                .fetch_all(&self.pool)
                .await?;
        Ok(rewards)
    }

    async fn get_user_rewards(&self, user_id: i32) -> Result<Vec<UserReward>> {
        let redemptions =
            sqlx::query_as("SELECT * FROM user_rewards WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(redemptions)
    }

    async fn redeem_reward(&self, user_id: i32, reward_id: i32) -> Result<UserReward> {
        // No catalog lookup, no balance check, no debit. The foreign keys
        // still reject ids with no backing rows on this backend.
        let redemption = sqlx::query_as(
            "INSERT INTO user_rewards (user_id, reward_id, status)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(user_id)
        .bind(reward_id)
        .bind(RewardStatus::Redeemed.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(redemption)
    }

    async fn seed_rewards(&self, catalog: Vec<NewReward>) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rewards")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        tracing::info!("Seeding reward catalog ({} entries)", catalog.len());
        let mut tx = self.pool.begin().await?;
        for entry in catalog {
            sqlx::query(
                "INSERT INTO rewards (name, description, category, tokens_required, brand, icon, is_active)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&entry.name)
            .bind(&entry.description)
            .bind(&entry.category)
            .bind(entry.tokens_required)
            .bind(&entry.brand)
            .bind(&entry.icon)
            .bind(entry.is_active)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
