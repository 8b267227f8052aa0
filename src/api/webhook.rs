//! Webhook handler for GitHub push and pull request events

use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    http::HeaderMap,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::SharedState;
use crate::error::EventsError;
use crate::webhook::{EVENT_HEADER, Normalized, normalize};

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Success,
    Ignored,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: DeliveryStatus,
}

/// Handles the GitHub webhook POST request.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, EventsError> {
    let event_type = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok());

    let payload: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| EventsError::InvalidJson(e.to_string()))?;
    debug!("{:#?}", &payload);

    match normalize(event_type, &payload)? {
        Normalized::Accepted(event) => {
            let id = state.store.append(&event).await?;
            info!(
                "Stored {} event {} by '{}' ({} -> {})",
                event.action,
                id,
                event.author,
                event.from_branch.as_deref().unwrap_or("-"),
                event.to_branch
            );
            Ok(Json(WebhookResponse {
                status: DeliveryStatus::Success,
            }))
        }
        Normalized::Ignored => {
            info!("Ignoring {:?} event", event_type);
            Ok(Json(WebhookResponse {
                status: DeliveryStatus::Ignored,
            }))
        }
    }
}
