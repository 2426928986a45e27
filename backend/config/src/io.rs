//! Config file discovery and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the EventGate config directory.
/// Priority: `EVENTGATE_CONFIG_DIR` env > `~/.eventgate/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("EVENTGATE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".eventgate"),
        None => PathBuf::from(".eventgate"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Parse YAML text into an untyped value tree.
///
/// An empty document becomes an empty mapping.
pub fn parse_yaml(raw: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(raw).context("Failed to parse config YAML")?;
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

/// Load the config file as an untyped value tree, ready for `${VAR}`
/// substitution.
///
/// Returns an empty mapping if the file doesn't exist (first run).
pub async fn load_raw(path: &Path) -> Result<Value> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value = parse_yaml(&raw).with_context(|| format!("In config file: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_is_inside_dir() {
        let path = config_file_path(Path::new("/etc/eventgate"));
        assert_eq!(path, PathBuf::from("/etc/eventgate/config.yaml"));
    }

    #[test]
    fn empty_yaml_is_empty_object() {
        assert_eq!(parse_yaml("").unwrap(), serde_json::json!({}));
        assert_eq!(parse_yaml("# only a comment\n").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn invalid_yaml_is_error() {
        assert!(parse_yaml("server: [unclosed").is_err());
    }

    #[tokio::test]
    async fn missing_file_gives_empty_object() {
        let value = load_raw(Path::new("/definitely/not/here/config.yaml"))
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
