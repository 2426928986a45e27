//! Slack Events API
//!
//! Verifies `X-Slack-Signature` / `X-Slack-Request-Timestamp`, then decodes
//! the envelope and dispatches the inner event through the registries.
//!
//! ```text
//! freshness -> signature -> envelope -> inner (event_callback only)
//! ```

pub mod envelope;
pub mod events;
pub mod inner;
pub mod parser;
pub mod registry;
pub mod rtm;
pub mod webhook;

pub use envelope::{decode_envelope, Envelope};
pub use inner::decode_inner;
pub use parser::{verify_and_parse, EventsApiParser};
pub use registry::{default_registries, DecodeFn, EventRegistries, EventRegistry};
pub use webhook::{status_for, SlackConfig, SlackWebhook};

/// Header carrying the request's Unix timestamp.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
/// Header carrying the `v0=` request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";
