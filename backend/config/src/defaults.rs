//! Config defaults: values used when a field is absent from the YAML file.

/// Default listen address for the webhook server.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default route for Slack Events API deliveries.
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhooks/slack";

/// Default buffer between the webhook and the event consumer.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Default log level when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Slack signing secrets are 32 hex characters; anything shorter is suspicious.
pub const MIN_SIGNING_SECRET_LEN: usize = 32;

pub(crate) fn bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

pub(crate) fn port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn webhook_path() -> String {
    DEFAULT_WEBHOOK_PATH.to_string()
}

pub(crate) fn event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

pub(crate) fn log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub(crate) fn enabled() -> bool {
    true
}
