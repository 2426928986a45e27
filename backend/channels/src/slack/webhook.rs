//! Slack Events API webhook endpoint.
//!
//! Verifies each delivery with [`EventsApiParser`], answers `url_verification`
//! challenges, and forwards decoded `event_callback` deliveries to a consumer
//! channel.
//!
//! Status codes:
//!   401  stale timestamp or bad signature (fixed body, no details)
//!   400  body is not valid JSON for its shape
//!   200  everything else, including unregistered inner event types
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use eventgate_core::{EventsApiError, EventsApiEvent, SharedClock, SystemClock};
use eventgate_logging::redact_sensitive_data;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::parser::EventsApiParser;
use super::registry::EventRegistries;
use super::{SIGNATURE_HEADER, TIMESTAMP_HEADER};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SlackConfig {
    pub signing_secret: String,
    pub webhook_path: String,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("signing_secret", &"***")
            .field("webhook_path", &self.webhook_path)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Axum state
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct WebhookState {
    signing_secret: Arc<str>,
    parser: Arc<EventsApiParser<SharedClock>>,
    events_tx: mpsc::Sender<EventsApiEvent>,
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

pub struct SlackWebhook {
    config: SlackConfig,
    parser: EventsApiParser<SharedClock>,
    events_tx: mpsc::Sender<EventsApiEvent>,
}

impl SlackWebhook {
    pub fn new(config: SlackConfig, events_tx: mpsc::Sender<EventsApiEvent>) -> Self {
        let clock: SharedClock = Arc::new(SystemClock);
        Self {
            config,
            parser: EventsApiParser::new().with_clock(clock),
            events_tx,
        }
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.parser = self.parser.with_clock(clock);
        self
    }

    pub fn with_registries(mut self, registries: Arc<EventRegistries>) -> Self {
        self.parser = self.parser.with_registries(registries);
        self
    }

    fn state(&self) -> WebhookState {
        WebhookState {
            signing_secret: Arc::from(self.config.signing_secret.as_str()),
            parser: Arc::new(self.parser.clone()),
            events_tx: self.events_tx.clone(),
        }
    }

    pub fn build_router(&self) -> Router {
        Router::new()
            .route(&self.config.webhook_path, post(handle_slack_event))
            .with_state(self.state())
    }
}

/// HTTP status reported to Slack for a rejected delivery.
pub fn status_for(error: &EventsApiError) -> StatusCode {
    match error {
        EventsApiError::StaleTimestamp | EventsApiError::BadSignature => StatusCode::UNAUTHORIZED,
        EventsApiError::Unmarshalling(_) => StatusCode::BAD_REQUEST,
        // Slack retries anything that is not acknowledged.
        EventsApiError::UnknownInnerEvent(_) => StatusCode::OK,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Webhook handler
// ---------------------------------------------------------------------------

async fn handle_slack_event(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let delivery_id = Uuid::new_v4();
    let span = info_span!("slack_delivery", %delivery_id, bytes = body.len());
    process_delivery(state, headers, body).instrument(span).await
}

async fn process_delivery(state: WebhookState, headers: HeaderMap, body: Bytes) -> Response {
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    let signature = header_str(&headers, SIGNATURE_HEADER);

    let event = match state
        .parser
        .verify_and_parse(&body, &*state.signing_secret, timestamp, signature)
    {
        Ok(event) => event,
        Err(failure) => {
            let status = status_for(&failure.error);
            match &failure.error {
                EventsApiError::StaleTimestamp | EventsApiError::BadSignature => {
                    warn!(
                        kind = failure.kind(),
                        signature = %redact_sensitive_data(signature),
                        "[Slack] Unauthenticated webhook; rejecting"
                    );
                    return (status, "invalid_request").into_response();
                }
                EventsApiError::Unmarshalling(err) => {
                    error!("[Slack] Failed to parse event payload: {}", err);
                    return (status, "bad_json").into_response();
                }
                EventsApiError::UnknownInnerEvent(inner_type) => {
                    warn!(
                        team_id = %failure.event.team_id,
                        inner_type = %inner_type,
                        "[Slack] Acknowledging unregistered inner event"
                    );
                    return (status, "unknown_event").into_response();
                }
            }
        }
    };

    if let Some(challenge) = event.challenge() {
        info!("[Slack] Answering url_verification challenge");
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            challenge.to_string(),
        )
            .into_response();
    }

    if !event.is_callback() {
        info!(event_type = %event.event_type, "[Slack] Ignoring envelope type");
        return (StatusCode::OK, "ignored").into_response();
    }

    info!(
        team_id = %event.team_id,
        inner_type = event.inner.as_ref().map(|i| i.event_type.as_str()).unwrap_or_default(),
        "[Slack] Event received"
    );
    if state.events_tx.send(event).await.is_err() {
        error!("[Slack] Event consumer has shut down; dropping event");
    }

    (StatusCode::OK, "ok").into_response()
}
