//! Outer envelope decoding.

use eventgate_core::{
    CallbackEvent, EventData, EventsApiEvent, UrlVerificationEvent, CALLBACK_EVENT,
};
use serde::Deserialize;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::value::RawValue;

/// Every top-level field any envelope variant uses, read in one pass.
///
/// `token`, `team_id` and `type` are shared by all variants and typed here.
/// Variant-specific fields stay raw until the variant is known, so a field
/// that only another variant uses never fails the delivery.
#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    token: String,
    #[serde(default)]
    team_id: String,
    #[serde(rename = "type", default)]
    event_type: String,
    #[serde(default)]
    event: Option<Box<RawValue>>,
    #[serde(default)]
    challenge: Option<Box<RawValue>>,
    #[serde(default)]
    api_app_id: Option<Box<RawValue>>,
    #[serde(default)]
    authed_users: Option<Box<RawValue>>,
    #[serde(default)]
    event_id: Option<Box<RawValue>>,
    #[serde(default)]
    event_time: Option<Box<RawValue>>,
}

/// Strictly decode a variant field; absent or `null` yields the default.
fn typed_field<T: DeserializeOwned + Default>(
    name: &str,
    raw: Option<Box<RawValue>>,
) -> Result<T, serde_json::Error> {
    match raw {
        Some(raw) => serde_json::from_str(raw.get())
            .map_err(|e| serde_json::Error::custom(format!("field `{name}`: {e}"))),
        None => Ok(T::default()),
    }
}

/// A decoded envelope.
#[derive(Debug, Clone)]
pub enum Envelope {
    /// `event_callback`, awaiting inner dispatch.
    Callback(CallbackEvent),
    /// `url_verification`, or any other type read leniently in the same shape.
    UrlVerification {
        team_id: String,
        event: UrlVerificationEvent,
    },
}

impl Envelope {
    pub fn event_type(&self) -> &str {
        match self {
            Self::Callback(cb) => &cb.event_type,
            Self::UrlVerification { event, .. } => &event.event_type,
        }
    }

    /// The envelope as a returned event, without any inner event.
    pub fn into_event(self) -> EventsApiEvent {
        match self {
            Self::Callback(cb) => EventsApiEvent {
                token: cb.token.clone(),
                team_id: cb.team_id.clone(),
                event_type: cb.event_type.clone(),
                data: EventData::Callback(cb),
                inner: None,
            },
            Self::UrlVerification { team_id, event } => EventsApiEvent {
                token: event.token.clone(),
                team_id,
                event_type: event.event_type.clone(),
                data: EventData::UrlVerification(event),
                inner: None,
            },
        }
    }
}

/// Decode the outer envelope of a delivery body.
///
/// Unknown top-level fields are ignored and unknown envelope types are not an
/// error. An `event_callback` without an `event` object is rejected.
pub fn decode_envelope(raw_body: &[u8]) -> Result<Envelope, serde_json::Error> {
    let wire: WireEnvelope = serde_json::from_slice(raw_body)?;

    if wire.event_type == CALLBACK_EVENT {
        let event = wire
            .event
            .ok_or_else(|| serde_json::Error::missing_field("event"))?;
        let callback = CallbackEvent {
            token: wire.token,
            team_id: wire.team_id,
            api_app_id: typed_field("api_app_id", wire.api_app_id)?,
            event,
            event_type: wire.event_type,
            authed_users: typed_field("authed_users", wire.authed_users)?,
            event_id: typed_field("event_id", wire.event_id)?,
            event_time: typed_field("event_time", wire.event_time)?,
        };
        return Ok(Envelope::Callback(callback));
    }

    Ok(Envelope::UrlVerification {
        team_id: wire.team_id,
        event: UrlVerificationEvent {
            token: wire.token,
            challenge: typed_field("challenge", wire.challenge)?,
            event_type: wire.event_type,
        },
    })
}
