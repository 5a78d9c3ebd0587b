use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint
///
/// Returns the health status of the server and its storage backend.
/// Used by load balancers and monitoring systems.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let storage_status = match state.storage.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!("Storage health check failed: {:?}", e);
            "disconnected"
        }
    };

    Json(json!({
        "status": if storage_status == "connected" { "healthy" } else { "unhealthy" },
        "storage": storage_status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
