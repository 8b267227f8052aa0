//! Status API endpoint

use axum::{Json, extract::State as AxumState};
use serde::Serialize;

use crate::SharedState;
use crate::error::EventsError;

/// Server health and storage statistics
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub status: String,
    pub started_at: String,
    pub uptime_seconds: u64,
    pub events_stored: i64,
}

/// GET /status - Server status; fails with 500 when the store is unreachable
pub async fn status(
    AxumState(state): AxumState<SharedState>,
) -> Result<Json<StatusResponse>, EventsError> {
    let events_stored = state.store.count().await?;

    Ok(Json(StatusResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "healthy".to_string(),
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        events_stored,
    }))
}
