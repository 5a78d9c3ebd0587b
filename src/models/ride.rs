use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Location;

/// Ride lifecycle state.
///
/// The intended sequence is pending -> matched -> in_progress -> completed,
/// with cancelled reachable from any non-terminal state. Updates do not
/// enforce the sequence unless strict transitions are enabled in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Pending,
    Matched,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// Wire/database representation of the status
    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Pending => "pending",
            RideStatus::Matched => "matched",
            RideStatus::InProgress => "in_progress",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status from its wire/database representation
    pub fn parse(s: &str) -> Option<RideStatus> {
        match s {
            "pending" => Some(RideStatus::Pending),
            "matched" => Some(RideStatus::Matched),
            "in_progress" => Some(RideStatus::InProgress),
            "completed" => Some(RideStatus::Completed),
            "cancelled" => Some(RideStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether the ride can no longer change state
    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }

    /// Whether `next` is a legal advance from this state
    pub fn can_transition_to(self, next: RideStatus) -> bool {
        use RideStatus::*;
        match (self, next) {
            (Pending, Matched) | (Matched, InProgress) | (InProgress, Completed) => true,
            (Pending | Matched | InProgress, Cancelled) => true,
            _ => false,
        }
    }
}

/// A single offered trip with a driver, an optional matched rider,
/// and a lifecycle status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: i32,
    pub driver_id: i32,
    pub rider_id: Option<i32>,
    pub status: RideStatus,
    pub pickup_location: Option<Location>,
    pub destination: Option<Location>,
    pub seats_available: i32,
    /// Flat reward, fixed at creation; never derived from distance or duration
    pub tokens_earned: i32,
    pub distance: Option<f64>,
    /// Duration in minutes
    pub duration: Option<i32>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Never set by the server; a caller marks completion explicitly
    pub completed_at: Option<DateTime<Utc>>,
}

/// Ride creation payload. The rider starts unset and the token reward is a
/// fixed constant regardless of what the ride looks like.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRide {
    pub driver_id: i32,
    pub status: RideStatus,
    #[serde(default)]
    pub rider_id: Option<i32>,
    #[serde(default)]
    pub pickup_location: Option<Location>,
    #[serde(default)]
    pub destination: Option<Location>,
    #[serde(default)]
    pub seats_available: Option<i32>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
}

/// Partial update for a ride. Identity fields (id, driver, creation time)
/// are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RidePatch {
    pub rider_id: Option<i32>,
    pub status: Option<RideStatus>,
    pub pickup_location: Option<Location>,
    pub destination: Option<Location>,
    pub seats_available: Option<i32>,
    pub tokens_earned: Option<i32>,
    pub distance: Option<f64>,
    pub duration: Option<i32>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RidePatch {
    /// Merge the provided fields over an existing record
    pub fn apply(&self, ride: &mut Ride) {
        if let Some(rider_id) = self.rider_id {
            ride.rider_id = Some(rider_id);
        }
        if let Some(status) = self.status {
            ride.status = status;
        }
        if let Some(pickup) = &self.pickup_location {
            ride.pickup_location = Some(pickup.clone());
        }
        if let Some(destination) = &self.destination {
            ride.destination = Some(destination.clone());
        }
        if let Some(seats) = self.seats_available {
            ride.seats_available = seats;
        }
        if let Some(tokens) = self.tokens_earned {
            ride.tokens_earned = tokens;
        }
        if let Some(distance) = self.distance {
            ride.distance = Some(distance);
        }
        if let Some(duration) = self.duration {
            ride.duration = Some(duration);
        }
        if let Some(scheduled_time) = self.scheduled_time {
            ride.scheduled_time = Some(scheduled_time);
        }
        if let Some(completed_at) = self.completed_at {
            ride.completed_at = Some(completed_at);
        }
    }
}
