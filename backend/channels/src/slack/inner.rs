//! Inner event dispatch for `event_callback` envelopes.

use eventgate_core::{
    CallbackEvent, EventData, EventsApiError, EventsApiEvent, InnerEvent, ParseFailure,
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::registry::EventRegistries;

/// Just enough of an inner event to pick its decoder.
#[derive(Deserialize)]
struct InnerTag {
    #[serde(rename = "type", default)]
    event_type: String,
}

fn unmarshalling_failure(err: serde_json::Error, callback: &CallbackEvent) -> ParseFailure {
    let event =
        EventsApiEvent::unmarshalling_error(&err, callback.token.clone(), callback.team_id.clone());
    ParseFailure::new(EventsApiError::Unmarshalling(err), event)
}

/// Decode the inner event of a callback envelope through `registries`.
///
/// On success `data` holds the callback envelope and `inner` the typed payload.
/// An unregistered tag yields `UnknownInnerEvent` with an event whose type is
/// that tag and which keeps the envelope's `token` and `team_id`.
pub fn decode_inner(
    callback: CallbackEvent,
    registries: &EventRegistries,
) -> Result<EventsApiEvent, ParseFailure> {
    let tag: InnerTag = match serde_json::from_str(callback.inner_raw().get()) {
        Ok(tag) => tag,
        Err(err) => return Err(unmarshalling_failure(err, &callback)),
    };

    let Some((source, decode)) = registries.resolve(&tag.event_type) else {
        warn!(
            team_id = %callback.team_id,
            event_id = %callback.event_id,
            inner_type = %tag.event_type,
            "[Slack] Unregistered inner event type"
        );
        let event = EventsApiEvent {
            token: callback.token,
            team_id: callback.team_id,
            event_type: tag.event_type.clone(),
            data: EventData::None,
            inner: None,
        };
        return Err(ParseFailure::new(
            EventsApiError::UnknownInnerEvent(tag.event_type),
            event,
        ));
    };

    let payload = match decode(callback.inner_raw()) {
        Ok(payload) => payload,
        Err(err) => return Err(unmarshalling_failure(err, &callback)),
    };
    debug!(
        registry = source,
        inner_type = %tag.event_type,
        event_id = %callback.event_id,
        "[Slack] Decoded inner event"
    );

    Ok(EventsApiEvent {
        token: callback.token.clone(),
        team_id: callback.team_id.clone(),
        event_type: callback.event_type.clone(),
        data: EventData::Callback(callback),
        inner: Some(InnerEvent {
            event_type: tag.event_type,
            payload,
        }),
    })
}
