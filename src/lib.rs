pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod event;
pub mod logging;
pub mod ui;
pub mod webhook;

use axum::{Router, routing};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

use db::SqlEventStore;

/// Maximum number of events returned by `GET /events`
pub const RECENT_EVENTS_LIMIT: i64 = 50;

pub struct AppState {
    pub store: SqlEventStore,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: SqlEventStore) -> Self {
        Self {
            store,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Build the HTTP router around shared state
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/webhook", routing::post(api::handle_webhook))
        .route("/events", routing::get(api::get_events))
        .route("/status", routing::get(api::status))
        .fallback(ui::serve_ui)
        .with_state(state)
}
