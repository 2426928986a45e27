//! Inbound channel adapters for EventGate.
//!
//! Currently one channel: the Slack Events API (`slack`), which verifies
//! webhook deliveries and decodes them into typed events.

pub mod slack;

pub use slack::{verify_and_parse, EventRegistries, EventRegistry, EventsApiParser, SlackWebhook};
