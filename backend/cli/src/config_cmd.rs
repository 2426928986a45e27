//! `eventgate check-config`: load, validate and print the redacted config.

use std::path::Path;

use anyhow::{bail, Context, Result};
use eventgate_config::{EventGateConfig, ValidationReport};

use crate::terminal_output::{note_info, note_success, note_warn, render_table};

fn findings_table(report: &ValidationReport) -> String {
    let rows: Vec<Vec<String>> = report
        .errors
        .iter()
        .map(|e| ("error", e))
        .chain(report.warnings.iter().map(|w| ("warning", w)))
        .map(|(severity, finding)| {
            vec![
                severity.to_string(),
                finding.path.clone(),
                finding.message.clone(),
            ]
        })
        .collect();
    render_table(&["Severity", "Path", "Message"], &rows)
}

/// Redacted YAML rendering of a typed config, plus the paths that were masked.
pub fn redacted_yaml(config: &EventGateConfig) -> Result<(String, Vec<String>)> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    let masked = eventgate_config::collect_redacted_paths(&value);
    let redacted = eventgate_config::redact(&value);
    let yaml = serde_yaml::to_string(&redacted).context("Failed to render config as YAML")?;
    Ok((yaml, masked))
}

pub async fn run(config_path: &Path) -> Result<()> {
    note_info(&format!("Config file: {}", config_path.display()));

    let config = eventgate_config::load(config_path).await?;
    let report = eventgate_config::validate(&config);

    let (yaml, masked) = redacted_yaml(&config)?;
    println!("{yaml}");
    if !masked.is_empty() {
        note_info(&format!("Masked: {}", masked.join(", ")));
    }

    if report.errors.is_empty() && report.warnings.is_empty() {
        note_success("Config is valid");
        return Ok(());
    }

    println!("{}", findings_table(&report));
    if report.is_valid() {
        note_warn(&format!("Config is valid with {} warning(s)", report.warnings.len()));
        Ok(())
    } else {
        bail!("{} config error(s)", report.errors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_output_hides_secret() {
        let mut config = EventGateConfig::default();
        config.slack.signing_secret = Some("8f742231b10e8888abcd99yyyzzz85a5".to_string());
        let (out, masked) = redacted_yaml(&config).unwrap();
        assert!(out.contains("8f74***"));
        assert!(!out.contains("b10e8888"));
        assert!(out.contains("/webhooks/slack"));
        assert_eq!(masked, vec!["slack.signingSecret"]);
    }

    #[test]
    fn unset_secret_is_not_listed_as_masked() {
        let (_, masked) = redacted_yaml(&EventGateConfig::default()).unwrap();
        assert!(masked.is_empty());
    }

    #[test]
    fn table_lists_errors_first() {
        let report = eventgate_config::validate(&EventGateConfig::default());
        let table = findings_table(&report);
        let first_row = table.lines().nth(2).unwrap();
        assert!(first_row.contains("error"));
        assert!(first_row.contains("slack.signingSecret"));
    }
}
