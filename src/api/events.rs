//! Events API endpoint

use axum::{Json, extract::State as AxumState};

use crate::error::EventsError;
use crate::event::CanonicalEvent;
use crate::{RECENT_EVENTS_LIMIT, SharedState};

/// GET /events - Most recent events, newest first
pub async fn get_events(
    AxumState(state): AxumState<SharedState>,
) -> Result<Json<Vec<CanonicalEvent>>, EventsError> {
    let events = state.store.recent(RECENT_EVENTS_LIMIT).await?;
    Ok(Json(events))
}
