use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate ride counters, one row per user.
///
/// Counters are written by callers via partial replacement; nothing derives
/// them from completed rides automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub id: i32,
    pub user_id: i32,
    pub total_rides: i32,
    /// In kg
    pub carbon_saved: f64,
    /// In km
    pub distance_traveled: f64,
    pub tokens_earned: i32,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for user stats
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsPatch {
    pub total_rides: Option<i32>,
    pub carbon_saved: Option<f64>,
    pub distance_traveled: Option<f64>,
    pub tokens_earned: Option<i32>,
}

impl StatsPatch {
    /// Merge the provided fields over an existing record.
    /// The caller is responsible for bumping `updated_at`.
    pub fn apply(&self, stats: &mut UserStats) {
        if let Some(total_rides) = self.total_rides {
            stats.total_rides = total_rides;
        }
        if let Some(carbon_saved) = self.carbon_saved {
            stats.carbon_saved = carbon_saved;
        }
        if let Some(distance_traveled) = self.distance_traveled {
            stats.distance_traveled = distance_traveled;
        }
        if let Some(tokens_earned) = self.tokens_earned {
            stats.tokens_earned = tokens_earned;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_replaces_counters() {
        let mut stats = UserStats {
            id: 1,
            user_id: 1,
            total_rides: 47,
            carbon_saved: 28.5,
            distance_traveled: 342.8,
            tokens_earned: 185,
            updated_at: Utc::now(),
        };

        let patch = StatsPatch {
            total_rides: Some(48),
            tokens_earned: Some(195),
            ..Default::default()
        };
        patch.apply(&mut stats);

        // Replacement, not incremental add
        assert_eq!(stats.total_rides, 48);
        assert_eq!(stats.tokens_earned, 195);
        assert_eq!(stats.carbon_saved, 28.5);
        assert_eq!(stats.distance_traveled, 342.8);
    }
}
