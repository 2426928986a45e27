//! Two environment passes over the config.
//!
//! String leaves of the raw tree may reference `${SLACK_SIGNING_SECRET}` style
//! variables (uppercase names only, `$${NAME}` stays literal). Once the tree is
//! typed, the `EVENTGATE_*` and `SLACK_*` override variables below win over
//! whatever the file said.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::schema::EventGateConfig;

/// Escaped (`$${VAR}`) or live (`${VAR}`) references, escaped form first.
static ENV_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$\{([A-Z_][A-Z0-9_]*)\}|\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const ENV_BIND: &str = "EVENTGATE_BIND";
pub const ENV_PORT: &str = "EVENTGATE_PORT";
pub const ENV_SIGNING_SECRET: &str = "SLACK_SIGNING_SECRET";
pub const ENV_WEBHOOK_PATH: &str = "SLACK_WEBHOOK_PATH";
pub const ENV_LOG_DIR: &str = "EVENTGATE_LOG_DIR";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in every string leaf of a raw config tree.
///
/// A reference to an unset or empty variable fails with [`MissingEnvVarError`]
/// naming the config path it was found at.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        // Primitives pass through unchanged.
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_REF_PATTERN.replace_all(s, |caps: &Captures| {
        if let Some(escaped) = caps.get(1) {
            return format!("${{{}}}", escaped.as_str());
        }
        let var_name = &caps[2];
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply the fixed environment overrides to a typed config.
///
/// Empty values are ignored so that `SLACK_SIGNING_SECRET=` does not wipe a
/// secret set in the file.
pub fn apply_env_overrides(config: &mut EventGateConfig, env: &HashMap<String, String>) -> Result<()> {
    let get = |name: &str| env.get(name).map(String::as_str).filter(|v| !v.is_empty());

    if let Some(bind) = get(ENV_BIND) {
        config.server.bind_address = bind.to_string();
    }
    if let Some(port) = get(ENV_PORT) {
        config.server.port = port
            .parse()
            .with_context(|| format!("{ENV_PORT} must be a port number, got {port:?}"))?;
    }
    if let Some(secret) = get(ENV_SIGNING_SECRET) {
        config.slack.signing_secret = Some(secret.to_string());
    }
    if let Some(path) = get(ENV_WEBHOOK_PATH) {
        config.slack.webhook_path = path.to_string();
    }
    if let Some(dir) = get(ENV_LOG_DIR) {
        config.logging.dir = Some(PathBuf::from(dir));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"signingSecret": "${SLACK_SIGNING_SECRET}"});
        let env = env(&[("SLACK_SIGNING_SECRET", "abc123")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["signingSecret"], "abc123");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"slack": {"signingSecret": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        let missing = err.downcast_ref::<MissingEnvVarError>().unwrap();
        assert_eq!(missing.var_name, "MISSING_VAR");
        assert_eq!(missing.config_path, "slack.signingSecret");
    }

    #[test]
    fn empty_var_counts_as_missing() {
        let v = json!({"key": "${EMPTY}"});
        assert!(resolve_env_vars_with(&v, &env(&[("EMPTY", "")])).is_err());
    }

    #[test]
    fn passthrough_non_var_strings() {
        let v = json!({"key": "plain-string", "n": 3, "lower": "${lower}"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result, v);
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"key": "$${HOME} and ${USER_NAME}"});
        let env = env(&[("USER_NAME", "bob"), ("HOME", "/home/bob")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["key"], "${HOME} and bob");
    }

    #[test]
    fn substitutes_nested_and_arrays() {
        let v = json!({"a": {"b": ["x", "${MY_VAR}"]}});
        let env = env(&[("MY_VAR", "hello")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["a"]["b"][1], "hello");
    }

    #[test]
    fn overrides_apply() {
        let mut cfg = EventGateConfig::default();
        let env = env(&[
            (ENV_BIND, "127.0.0.1"),
            (ENV_PORT, "9000"),
            (ENV_SIGNING_SECRET, "s3cret"),
            (ENV_WEBHOOK_PATH, "/slack"),
            (ENV_LOG_DIR, "/var/log/eventgate"),
        ]);
        apply_env_overrides(&mut cfg, &env).unwrap();
        assert_eq!(cfg.server.listen_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.slack.signing_secret.as_deref(), Some("s3cret"));
        assert_eq!(cfg.slack.webhook_path, "/slack");
        assert_eq!(cfg.logging.dir, Some(PathBuf::from("/var/log/eventgate")));
    }

    #[test]
    fn empty_override_is_ignored() {
        let mut cfg = EventGateConfig::default();
        cfg.slack.signing_secret = Some("from-file".to_string());
        apply_env_overrides(&mut cfg, &env(&[(ENV_SIGNING_SECRET, "")])).unwrap();
        assert_eq!(cfg.slack.signing_secret.as_deref(), Some("from-file"));
    }

    #[test]
    fn bad_port_override_is_error() {
        let mut cfg = EventGateConfig::default();
        let err = apply_env_overrides(&mut cfg, &env(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }
}
