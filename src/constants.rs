use crate::models::NewReward;

/// Rating assigned to a newly registered user
pub const DEFAULT_USER_RATING: f64 = 4.5;

/// Trust score assigned to a newly registered user
pub const DEFAULT_TRUST_SCORE: i32 = 85;

// =============================================================================
// Token Seed Balances
// =============================================================================

/// Food-category token balance seeded at registration
pub const SEED_TOKENS_FOOD: i32 = 45;

/// Travel-category token balance seeded at registration
pub const SEED_TOKENS_TRAVEL: i32 = 68;

/// Clothing-category token balance seeded at registration
pub const SEED_TOKENS_CLOTHING: i32 = 32;

/// Coupons-category token balance seeded at registration
pub const SEED_TOKENS_COUPONS: i32 = 40;

/// Stored total seeded at registration (sum of the category balances).
/// The total is a stored field, not derived; see `TokensPatch`.
pub const SEED_TOKENS_TOTAL: i32 = 185;

// =============================================================================
// Stats Seed Values
// =============================================================================

/// Ride count seeded at registration (demo data)
pub const SEED_STATS_TOTAL_RIDES: i32 = 47;

/// Carbon saved in kg seeded at registration (demo data)
pub const SEED_STATS_CARBON_SAVED_KG: f64 = 28.5;

/// Distance traveled in km seeded at registration (demo data)
pub const SEED_STATS_DISTANCE_KM: f64 = 342.8;

/// Tokens-earned counter seeded at registration (demo data)
pub const SEED_STATS_TOKENS_EARNED: i32 = 185;

// =============================================================================
// Rides
// =============================================================================

/// Flat token reward attached to every ride at creation,
/// regardless of distance or duration
pub const RIDE_TOKENS_EARNED: i32 = 10;

/// Seats offered when the driver does not specify a count
pub const DEFAULT_SEATS_AVAILABLE: i32 = 1;

/// Radius in km used by the nearby-rides query when the client omits one
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 2.0;

/// Built-in reward catalog, inserted once on first startup.
/// Catalog entries are immutable reference data.
pub fn reward_catalog() -> Vec<NewReward> {
    vec![
        NewReward {
            name: "Starbucks Coffee".to_string(),
            description: Some("Any size drink".to_string()),
            category: "food".to_string(),
            tokens_required: 50,
            brand: Some("Starbucks".to_string()),
            icon: Some("coffee".to_string()),
            is_active: true,
        },
        NewReward {
            name: "McDonald's Meal".to_string(),
            description: Some("Any value meal".to_string()),
            category: "food".to_string(),
            tokens_required: 80,
            brand: Some("McDonald's".to_string()),
            icon: Some("burger".to_string()),
            is_active: true,
        },
        NewReward {
            name: "H&M Discount".to_string(),
            description: Some("20% off any purchase".to_string()),
            category: "clothing".to_string(),
            tokens_required: 100,
            brand: Some("H&M".to_string()),
            icon: Some("tshirt".to_string()),
            is_active: true,
        },
        NewReward {
            name: "Travel Voucher".to_string(),
            description: Some("₹500 RedBus credit".to_string()),
            category: "travel".to_string(),
            tokens_required: 120,
            brand: Some("RedBus".to_string()),
            icon: Some("bus".to_string()),
            is_active: true,
        },
        NewReward {
            name: "Amazon Coupon".to_string(),
            description: Some("₹200 off on orders above ₹1000".to_string()),
            category: "coupons".to_string(),
            tokens_required: 150,
            brand: Some("Amazon".to_string()),
            icon: Some("gift".to_string()),
            is_active: true,
        },
    ]
}
