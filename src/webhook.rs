//! Normalization of GitHub webhook payloads into canonical events

use chrono::{NaiveDateTime, Timelike};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

use crate::error::{EventsError, Result};
use crate::event::{EventAction, NewEvent};

/// Header GitHub uses to name the event kind of a delivery
pub const EVENT_HEADER: &str = "X-GitHub-Event";

const UPSTREAM_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DISPLAY_TIMESTAMP_FORMAT: &str = "%d %B %Y - %I:%M %p UTC";

/// Outcome of normalizing one delivery
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Accepted(NewEvent),
    Ignored,
}

#[derive(Debug, Deserialize)]
pub struct PushPayload {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub after: String,
    pub pusher: Pusher,
    pub head_commit: HeadCommit,
}

#[derive(Debug, Deserialize)]
pub struct Pusher {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct HeadCommit {
    pub timestamp: String,
}

/// Outer shape of a `pull_request` delivery. The PR body stays untyped until
/// the action tells us which of its fields are required.
#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub action: String,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestDetails {
    pub id: PullRequestId,
    pub user: User,
    pub head: BranchRef,
    pub base: BranchRef,
    pub created_at: Option<String>,
    pub merged_at: Option<String>,
}

/// `merged` must be present on a closed PR; `null` reads as not merged
#[derive(Debug, Deserialize)]
struct MergeState {
    #[serde(deserialize_with = "nullable_flag")]
    merged: Option<bool>,
}

fn nullable_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer)
}

/// GitHub sends numeric ids; tolerate string ids as well
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PullRequestId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PullRequestId::Number(n) => write!(f, "{}", n),
            PullRequestId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// Map a delivery onto a canonical event.
///
/// Unrecognized event/action combinations are `Ignored`. A recognized
/// combination with a missing or mistyped field is `MalformedPayload`.
pub fn normalize(event_type: Option<&str>, payload: &Value) -> Result<Normalized> {
    match event_type {
        Some("push") => normalize_push(payload).map(Normalized::Accepted),
        Some("pull_request") => normalize_pull_request(payload),
        _ => Ok(Normalized::Ignored),
    }
}

fn normalize_push(payload: &Value) -> Result<NewEvent> {
    let push: PushPayload = parse("push", payload)?;
    let to_branch = push
        .git_ref
        .rsplit('/')
        .next()
        .unwrap_or(push.git_ref.as_str())
        .to_string();

    Ok(NewEvent {
        request_id: push.after,
        author: push.pusher.name,
        action: EventAction::Push,
        from_branch: None,
        to_branch,
        timestamp: format_timestamp(&push.head_commit.timestamp),
    })
}

fn normalize_pull_request(payload: &Value) -> Result<Normalized> {
    let envelope: PullRequestPayload = parse("pull_request", payload)?;

    let action = match envelope.action.as_str() {
        "opened" | "reopened" => EventAction::PullRequest,
        "closed" => {
            let pr = required_pull_request(&envelope)?;
            let state: MergeState = parse("pull_request", pr)?;
            if state.merged != Some(true) {
                return Ok(Normalized::Ignored);
            }
            EventAction::Merge
        }
        _ => return Ok(Normalized::Ignored),
    };

    let details: PullRequestDetails = parse("pull_request", required_pull_request(&envelope)?)?;
    let raw_timestamp = match action {
        EventAction::Merge => details.merged_at,
        _ => details.created_at,
    }
    .ok_or_else(|| {
        let field = if action == EventAction::Merge {
            "merged_at"
        } else {
            "created_at"
        };
        EventsError::malformed("pull_request", format!("missing field `{}`", field))
    })?;

    Ok(Normalized::Accepted(NewEvent {
        request_id: details.id.to_string(),
        author: details.user.login,
        action,
        from_branch: Some(details.head.git_ref),
        to_branch: details.base.git_ref,
        timestamp: format_timestamp(&raw_timestamp),
    }))
}

fn required_pull_request(envelope: &PullRequestPayload) -> Result<&Value> {
    match &envelope.pull_request {
        Some(pr) if !pr.is_null() => Ok(pr),
        _ => Err(EventsError::malformed(
            "pull_request",
            "missing field `pull_request`",
        )),
    }
}

fn parse<T: DeserializeOwned>(event: &str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| EventsError::malformed(event, e))
}

/// Render an upstream `YYYY-MM-DDTHH:MM:SSZ` timestamp for display,
/// e.g. `05 March 2024 - 10:15 AM UTC`. Anything else is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    // chrono skips leading whitespace and accepts `:60`; neither is a valid upstream value
    if raw != raw.trim_start() {
        return raw.to_string();
    }
    match NaiveDateTime::parse_from_str(raw, UPSTREAM_TIMESTAMP_FORMAT) {
        Ok(dt) if dt.nanosecond() < 1_000_000_000 => {
            dt.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
        }
        _ => raw.to_string(),
    }
}
