use thiserror::Error;

use crate::event::EventsApiEvent;

/// Classified failure of a single Events API delivery.
#[derive(Debug, Error)]
pub enum EventsApiError {
    /// `|now - timestamp|` exceeds the replay window.
    #[error("timestamp is outside the replay window")]
    StaleTimestamp,

    /// The recomputed `v0=` signature does not match the supplied one.
    #[error("invalid request signature")]
    BadSignature,

    /// The envelope or the inner event is not valid JSON for its shape.
    #[error("failed to unmarshal events api payload: {0}")]
    Unmarshalling(#[source] serde_json::Error),

    /// The callback's inner `type` is absent from every registry.
    #[error("inner event type is not registered: {0:?}")]
    UnknownInnerEvent(String),
}

impl EventsApiError {
    /// Stable snake_case label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StaleTimestamp => "stale_timestamp",
            Self::BadSignature => "bad_signature",
            Self::Unmarshalling(_) => "unmarshalling_error",
            Self::UnknownInnerEvent(_) => "unknown_inner_event",
        }
    }

    /// True for failures that mean the request cannot be trusted at all.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::StaleTimestamp | Self::BadSignature)
    }
}

/// A rejected delivery: the classified error plus the best-effort event.
///
/// For `Unmarshalling` the event's type is `"unmarshalling_error"`; for
/// `UnknownInnerEvent` it keeps the envelope's `token` and `team_id`; for the
/// authentication failures it is empty.
#[derive(Debug, Error)]
#[error("events api delivery rejected")]
pub struct ParseFailure {
    #[source]
    pub error: EventsApiError,
    pub event: EventsApiEvent,
}

impl ParseFailure {
    pub fn new(error: EventsApiError, event: EventsApiEvent) -> Self {
        Self { error, event }
    }

    /// Failure carrying an empty event.
    pub fn bare(error: EventsApiError) -> Self {
        Self::new(error, EventsApiEvent::default())
    }

    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

impl From<serde_json::Error> for ParseFailure {
    fn from(err: serde_json::Error) -> Self {
        let event = EventsApiEvent::unmarshalling_error(&err, String::new(), String::new());
        Self::new(EventsApiError::Unmarshalling(err), event)
    }
}
