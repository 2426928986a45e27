//! EventGate runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section and field has a
//! default, so an empty file (or no file at all) yields a usable config apart
//! from the signing secret.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for EventGate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGateConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Slack Events API settings
    #[serde(default)]
    pub slack: SlackEventsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Capacity of the channel between the webhook and the event consumer.
    #[serde(default = "defaults::event_buffer")]
    pub event_buffer: usize,
}

impl ServerConfig {
    /// `host:port` suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            port: defaults::port(),
            event_buffer: defaults::event_buffer(),
        }
    }
}

// ---------------------------------------------------------------------------
// Slack
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackEventsConfig {
    /// App signing secret from the Slack app's "Basic Information" page.
    /// Usually supplied as `${SLACK_SIGNING_SECRET}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,

    #[serde(default = "defaults::webhook_path")]
    pub webhook_path: String,

    /// Consult the legacy RTM registry after the Events API registry.
    #[serde(default = "defaults::enabled")]
    pub legacy_rtm_events: bool,
}

impl std::fmt::Debug for SlackEventsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackEventsConfig")
            .field("signing_secret", &self.signing_secret.as_ref().map(|_| "***"))
            .field("webhook_path", &self.webhook_path)
            .field("legacy_rtm_events", &self.legacy_rtm_events)
            .finish()
    }
}

impl Default for SlackEventsConfig {
    fn default() -> Self {
        Self {
            signing_secret: None,
            webhook_path: defaults::webhook_path(),
            legacy_rtm_events: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset (`error`..`trace` or a directive).
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Directory for daily-rolling NDJSON log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Emit console logs as JSON.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            dir: None,
            json: false,
        }
    }
}
