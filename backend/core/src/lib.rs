pub mod clock;
pub mod error;
pub mod event;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use error::{EventsApiError, ParseFailure};
pub use event::{
    CallbackEvent, EventData, EventPayload, EventsApiEvent, InnerEvent, UnmarshallingErrorEvent,
    UrlVerificationEvent, CALLBACK_EVENT, UNMARSHALLING_ERROR, URL_VERIFICATION,
};
