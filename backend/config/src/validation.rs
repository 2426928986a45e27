//! Config validation: schema checks with user-friendly error messages.

use crate::defaults::MIN_SIGNING_SECRET_LEN;
use crate::schema::EventGateConfig;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &EventGateConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_slack(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_server(config: &EventGateConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.bind_address.trim().is_empty() {
        report.error("server.bindAddress", "Bind address cannot be empty");
    }
    if server.port == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    } else if server.port < 1024 && server.port != 80 && server.port != 443 {
        report.warn(
            "server.port",
            format!(
                "Port {} requires elevated privileges; consider using a port >= 1024",
                server.port
            ),
        );
    }
    if server.event_buffer == 0 {
        report.error("server.eventBuffer", "eventBuffer must be >= 1");
    }
}

fn validate_slack(config: &EventGateConfig, report: &mut ValidationReport) {
    let slack = &config.slack;
    match slack.signing_secret.as_deref().map(str::trim) {
        None | Some("") => report.error(
            "slack.signingSecret",
            "Slack signing secret is required (set SLACK_SIGNING_SECRET)",
        ),
        Some(secret) if secret.len() < MIN_SIGNING_SECRET_LEN => report.warn(
            "slack.signingSecret",
            format!(
                "Signing secret is {} characters; Slack issues {MIN_SIGNING_SECRET_LEN}",
                secret.len()
            ),
        ),
        Some(_) => {}
    }
    if !slack.webhook_path.starts_with('/') {
        report.error(
            "slack.webhookPath",
            format!("Webhook path '{}' must start with '/'", slack.webhook_path),
        );
    }
}

fn validate_logging(config: &EventGateConfig, report: &mut ValidationReport) {
    let level = config.logging.level.to_ascii_lowercase();
    // Full directives like `eventgate=debug,tower_http=info` are passed to EnvFilter as-is.
    if !level.contains('=') && !LOG_LEVELS.contains(&level.as_str()) {
        report.warn(
            "logging.level",
            format!(
                "Unknown log level '{}'; falling back to 'info'",
                config.logging.level
            ),
        );
    }
}
