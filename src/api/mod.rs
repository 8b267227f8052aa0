//! API module for all HTTP handlers

pub mod events;
pub mod stats;
pub mod webhook;

// Re-export handlers
pub use events::get_events;
pub use stats::status;
pub use webhook::handle_webhook;
