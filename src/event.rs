use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EventsError;

/// Kind of repository activity a canonical event records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventAction {
    Push,
    PullRequest,
    Merge,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Push => "PUSH",
            EventAction::PullRequest => "PULL_REQUEST",
            EventAction::Merge => "MERGE",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventAction {
    type Err = EventsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUSH" => Ok(EventAction::Push),
            "PULL_REQUEST" => Ok(EventAction::PullRequest),
            "MERGE" => Ok(EventAction::Merge),
            other => Err(EventsError::DatabaseError(format!(
                "Unknown event action '{}' in store",
                other
            ))),
        }
    }
}

/// A normalized event that has not been stored yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEvent {
    pub request_id: String,
    pub author: String,
    pub action: EventAction,
    pub from_branch: Option<String>,
    pub to_branch: String,
    pub timestamp: String,
}

/// A stored event as returned by `GET /events`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalEvent {
    pub id: String,
    pub request_id: String,
    pub author: String,
    pub action: EventAction,
    pub from_branch: Option<String>,
    pub to_branch: String,
    pub timestamp: String,
}

impl CanonicalEvent {
    /// Attach the store-assigned id to a normalized event
    pub fn from_new(id: String, event: NewEvent) -> Self {
        Self {
            id,
            request_id: event.request_id,
            author: event.author,
            action: event.action,
            from_branch: event.from_branch,
            to_branch: event.to_branch,
            timestamp: event.timestamp,
        }
    }
}
