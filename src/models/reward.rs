use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry users can redeem tokens against.
/// Seeded once; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Spend category: food, travel, clothing or coupons.
    /// Matched case-sensitively by the category queries.
    pub category: String,
    pub tokens_required: i32,
    pub brand: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
}

/// Catalog entry before insertion
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReward {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub tokens_required: i32,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// State of a redemption record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    Redeemed,
    Used,
}

impl RewardStatus {
    /// Wire/database representation of the status
    pub fn as_str(self) -> &'static str {
        match self {
            RewardStatus::Redeemed => "redeemed",
            RewardStatus::Used => "used",
        }
    }

    /// Parse a status from its wire/database representation
    pub fn parse(s: &str) -> Option<RewardStatus> {
        match s {
            "redeemed" => Some(RewardStatus::Redeemed),
            "used" => Some(RewardStatus::Used),
            _ => None,
        }
    }
}

/// A redemption event linking a user to a catalog reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReward {
    pub id: i32,
    pub user_id: i32,
    pub reward_id: i32,
    pub redeemed_at: DateTime<Utc>,
    pub status: RewardStatus,
}
