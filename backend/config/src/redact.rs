//! Masking of secrets in a serialized config.

use serde_json::Value;

/// Keys holding Slack credentials. Matched case-insensitively against the
/// last path segment.
static SECRET_KEYS: &[&str] = &[
    "signingSecret",
    "signing_secret",
    "verificationToken",
    "verification_token",
    "token",
];

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Masked form of a secret. Long values keep a four character prefix so two
/// deployments' secrets can be told apart.
fn mask(secret: &str) -> String {
    if secret.chars().count() > 8 {
        let prefix: String = secret.chars().take(4).collect();
        format!("{prefix}***")
    } else {
        "***".to_string()
    }
}

/// Copy of `value` with every non-empty secret string masked.
pub fn redact(value: &Value) -> Value {
    let mut out = value.clone();
    walk_mut(&mut out, "", &mut |_: &str, s: &mut String| *s = mask(s));
    out
}

/// Dotted paths of the fields [`redact`] would mask.
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    let mut copy = value.clone();
    walk_mut(&mut copy, "", &mut |path: &str, _: &mut String| {
        paths.push(path.to_string())
    });
    paths
}

fn walk_mut(value: &mut Value, path: &str, on_secret: &mut dyn FnMut(&str, &mut String)) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, child) in map.iter_mut() {
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        match child {
            Value::String(s) if !s.is_empty() && is_secret_key(key) => on_secret(&child_path, s),
            nested @ Value::Object(_) => walk_mut(nested, &child_path, on_secret),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_signing_secret_with_prefix() {
        let v = json!({ "slack": { "signingSecret": "8f742231b10e8888abcd99yyyzzz85a5" } });
        assert_eq!(redact(&v)["slack"]["signingSecret"], "8f74***");
    }

    #[test]
    fn short_secret_fully_masked() {
        assert_eq!(redact(&json!({ "token": "hoge" }))["token"], "***");
    }

    #[test]
    fn leaves_other_fields_alone() {
        let v = json!({
            "logging": { "level": "debug" },
            "server": { "port": 8080 },
            "slack": { "signingSecret": "", "webhookPath": "/webhooks/slack" }
        });
        assert_eq!(redact(&v), v);
    }

    #[test]
    fn lists_masked_paths() {
        let v = json!({ "slack": { "signingSecret": "abc", "webhookPath": "/x" } });
        assert_eq!(collect_redacted_paths(&v), vec!["slack.signingSecret"]);
        assert!(collect_redacted_paths(&json!({ "slack": { "signingSecret": null } })).is_empty());
    }
}
