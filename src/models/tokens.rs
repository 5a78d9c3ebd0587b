use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user token balances, one row per user.
///
/// `total` is a stored field. Nothing recomputes it from the category
/// balances; a caller that changes a category without supplying a new total
/// leaves the stored total as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub id: i32,
    pub user_id: i32,
    pub food: i32,
    pub travel: i32,
    pub clothing: i32,
    pub coupons: i32,
    pub total: i32,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a token balance. Category fields are replaced, not
/// added to. `total` is only written when supplied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokensPatch {
    pub food: Option<i32>,
    pub travel: Option<i32>,
    pub clothing: Option<i32>,
    pub coupons: Option<i32>,
    pub total: Option<i32>,
}

impl TokensPatch {
    /// Merge the provided fields over an existing record.
    /// The caller is responsible for bumping `updated_at`.
    pub fn apply(&self, tokens: &mut TokenBalance) {
        if let Some(food) = self.food {
            tokens.food = food;
        }
        if let Some(travel) = self.travel {
            tokens.travel = travel;
        }
        if let Some(clothing) = self.clothing {
            tokens.clothing = clothing;
        }
        if let Some(coupons) = self.coupons {
            tokens.coupons = coupons;
        }
        if let Some(total) = self.total {
            tokens.total = total;
        }
    }
}
