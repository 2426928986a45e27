use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;

/// Envelope `type` of a delivery wrapping an inner event.
pub const CALLBACK_EVENT: &str = "event_callback";
/// Envelope `type` of the endpoint ownership challenge.
pub const URL_VERIFICATION: &str = "url_verification";
/// Synthetic `type` reported when a body could not be decoded.
pub const UNMARSHALLING_ERROR: &str = "unmarshalling_error";

/// A decoded inner event payload.
///
/// Implemented for every serde-capable type, so registering a new payload shape
/// needs no code here. Retrieve the concrete value with
/// [`downcast_ref`](trait.EventPayload.html#method.downcast_ref).
pub trait EventPayload: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// JSON rendition of the payload, for diagnostics.
    fn to_json(&self) -> Value;
}

impl<T> EventPayload for T
where
    T: Any + fmt::Debug + Send + Sync + Serialize + DeserializeOwned,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl dyn EventPayload {
    pub fn downcast_ref<T: EventPayload>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: EventPayload>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Serialize for dyn EventPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// `url_verification` envelope, also the lenient shape for unknown envelope types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlVerificationEvent {
    pub token: String,
    pub challenge: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

/// `event_callback` envelope. The inner event stays raw until dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackEvent {
    pub token: String,
    pub team_id: String,
    pub api_app_id: String,
    pub event: Box<RawValue>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub authed_users: Vec<String>,
    pub event_id: String,
    pub event_time: i64,
}

impl CallbackEvent {
    /// The untouched `event` fragment.
    pub fn inner_raw(&self) -> &RawValue {
        &self.event
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmarshallingErrorEvent {
    pub error: String,
}

/// Envelope-level payload of a delivery.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum EventData {
    UrlVerification(UrlVerificationEvent),
    Callback(CallbackEvent),
    UnmarshallingError(UnmarshallingErrorEvent),
    #[default]
    None,
}

impl EventData {
    pub fn as_url_verification(&self) -> Option<&UrlVerificationEvent> {
        match self {
            Self::UrlVerification(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&CallbackEvent> {
        match self {
            Self::Callback(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Inner event of a callback, decoded into its registered shape.
#[derive(Debug, Serialize)]
pub struct InnerEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: Box<dyn EventPayload>,
}

/// A verified and classified Events API delivery.
#[derive(Debug, Default, Serialize)]
pub struct EventsApiEvent {
    pub token: String,
    pub team_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner: Option<InnerEvent>,
}

impl EventsApiEvent {
    pub fn unmarshalling_error(err: &serde_json::Error, token: String, team_id: String) -> Self {
        Self {
            token,
            team_id,
            event_type: UNMARSHALLING_ERROR.to_string(),
            data: EventData::UnmarshallingError(UnmarshallingErrorEvent {
                error: err.to_string(),
            }),
            inner: None,
        }
    }

    pub fn is_callback(&self) -> bool {
        self.event_type == CALLBACK_EVENT
    }

    pub fn is_url_verification(&self) -> bool {
        self.event_type == URL_VERIFICATION
    }

    /// The challenge to echo back, for `url_verification` deliveries.
    pub fn challenge(&self) -> Option<&str> {
        if !self.is_url_verification() {
            return None;
        }
        self.data
            .as_url_verification()
            .map(|e| e.challenge.as_str())
    }
}
