//! Structured logging for EventGate.
//!
//! Console output (text or JSON), optional daily-rolling NDJSON files, and
//! redaction of Slack credentials before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogOptions};
pub use redact::redact_sensitive_data;
