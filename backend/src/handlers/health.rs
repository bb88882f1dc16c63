use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{db::connection::ping, state::AppState};

/// Liveness plus a store round trip. 503 when the database is unreachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(err) => {
            tracing::error!(error = %err, "health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unreachable" })),
            )
        }
    }
}

pub async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "time_zone": state.config.time_zone.to_string(),
        "server_time": Utc::now(),
    }))
}
