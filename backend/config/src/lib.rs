//! `eventgate-config`: EventGate runtime configuration management.
//!
//! Provides:
//! - Typed config schema (server, Slack, logging)
//! - YAML loading from the config directory
//! - `${ENV_VAR}` substitution and environment overrides
//! - Config redaction for safe logging/display
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use env::{apply_env_overrides, process_env, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw, parse_yaml};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{EventGateConfig, LoggingConfig, ServerConfig, SlackEventsConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Turn a raw value tree into a typed config: env substitution, typed
/// deserialization, then env overrides.
pub fn prepare(raw: &Value, env: &HashMap<String, String>) -> Result<EventGateConfig> {
    let value = resolve_env_vars_with(raw, env).context("Failed to resolve env vars in config")?;

    let mut config: EventGateConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;

    apply_env_overrides(&mut config, env)?;
    Ok(config)
}

/// Log every finding in a report; warnings at warn, errors at error.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

/// Load a config file and apply env substitution and overrides, without
/// validating it.
pub async fn load(path: &Path) -> Result<EventGateConfig> {
    let raw = load_raw(path).await?;
    prepare(&raw, &process_env()).with_context(|| format!("In config file: {}", path.display()))
}

/// Validate a config, log every finding, and fail if any is an error.
pub fn ensure_valid(config: &EventGateConfig) -> Result<()> {
    let report = validate(config);
    log_report(&report);
    if let Some(first) = report.errors.first() {
        bail!("{} config error(s); first: {first}", report.errors.len());
    }
    Ok(())
}
