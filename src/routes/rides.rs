use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_NEARBY_RADIUS_KM;
use crate::error::{AppError, Result};
use crate::models::{NewRide, Ride, RidePatch};
use crate::routes::validation::validate_new_ride;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RideResponse {
    pub ride: Ride,
}

#[derive(Debug, Serialize)]
pub struct RidesResponse {
    pub rides: Vec<Ride>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
}

/// Create a ride offered by a driver
pub async fn create_ride(
    State(state): State<AppState>,
    Json(payload): Json<NewRide>,
) -> Result<Json<RideResponse>> {
    validate_new_ride(&payload)?;

    let ride = state.storage.create_ride(payload).await?;
    tracing::info!(ride_id = ride.id, driver_id = ride.driver_id, "Ride created");

    Ok(Json(RideResponse { ride }))
}

/// All rides where the user is the driver or the matched rider
pub async fn get_user_rides(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<RidesResponse>> {
    let rides = state.storage.get_user_rides(user_id).await?;
    Ok(Json(RidesResponse { rides }))
}

/// Pending rides near a location
pub async fn get_nearby_rides(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<RidesResponse>> {
    let radius = query.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    let rides = state
        .storage
        .get_nearby_rides(query.lat, query.lng, radius)
        .await?;
    Ok(Json(RidesResponse { rides }))
}

/// Partially update a ride.
///
/// Status writes are unchecked by default; with strict transitions enabled,
/// a write that skips the lifecycle sequence is rejected with 400.
pub async fn update_ride(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<RidePatch>,
) -> Result<Json<RideResponse>> {
    if state.config.strict_ride_transitions {
        if let Some(next) = patch.status {
            let ride = state
                .storage
                .get_ride(id)
                .await?
                .ok_or(AppError::NotFound("Ride"))?;
            if next != ride.status && !ride.status.can_transition_to(next) {
                return Err(AppError::InvalidInput(format!(
                    "Illegal ride status transition: {} -> {}",
                    ride.status.as_str(),
                    next.as_str()
                )));
            }
        }
    }

    let ride = state
        .storage
        .update_ride(id, patch)
        .await?
        .ok_or(AppError::NotFound("Ride"))?;
    Ok(Json(RideResponse { ride }))
}
