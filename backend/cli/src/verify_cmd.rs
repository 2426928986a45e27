//! `eventgate verify`: replay a captured delivery through the parser.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use eventgate_channels::EventsApiParser;
use eventgate_core::{EventsApiError, EventsApiEvent, FixedClock, ParseFailure, SharedClock, SystemClock};

use crate::terminal_output::{note_error, note_info, note_success};

pub struct VerifyArgs {
    pub body: PathBuf,
    pub timestamp: String,
    pub signature: String,
    pub secret: Option<String>,
    pub now: Option<i64>,
}

/// Secret precedence: `--secret`, then the environment, then the config file.
async fn resolve_secret(explicit: Option<String>, config_path: &Path) -> Result<String> {
    if let Some(secret) = explicit.filter(|s| !s.is_empty()) {
        return Ok(secret);
    }
    let config = eventgate_config::load(config_path).await?;
    match config.slack.signing_secret {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => bail!("No signing secret: pass --secret or set SLACK_SIGNING_SECRET"),
    }
}

fn parser_for(now: Option<i64>) -> EventsApiParser<SharedClock> {
    let clock: SharedClock = match now {
        Some(now) => Arc::new(FixedClock(now)),
        None => Arc::new(SystemClock),
    };
    EventsApiParser::new().with_clock(clock)
}

fn to_pretty_json(event: &EventsApiEvent) -> Result<String> {
    serde_json::to_string_pretty(event).context("Failed to serialize event")
}

/// Run the parser against one captured request.
pub fn verify_capture(
    body: &[u8],
    secret: &str,
    timestamp: &str,
    signature: &str,
    now: Option<i64>,
) -> Result<EventsApiEvent, ParseFailure> {
    parser_for(now).verify_and_parse(body, secret, timestamp, signature)
}

pub async fn run(args: VerifyArgs, config_path: &Path) -> Result<()> {
    let body = tokio::fs::read(&args.body)
        .await
        .with_context(|| format!("Failed to read body file: {}", args.body.display()))?;
    let secret = resolve_secret(args.secret, config_path).await?;

    match verify_capture(&body, &secret, &args.timestamp, &args.signature, args.now) {
        Ok(event) => {
            note_success(&format!("Verified {} delivery", event.event_type));
            println!("{}", to_pretty_json(&event)?);
            Ok(())
        }
        Err(failure) => {
            note_error(&format!("{} ({})", failure.error, failure.kind()));
            match &failure.error {
                EventsApiError::StaleTimestamp => {
                    note_info("Pass --now <unix seconds> to replay an old capture");
                }
                EventsApiError::BadSignature => {
                    if let Ok(expected) =
                        eventgate_security::sign(secret.as_bytes(), &args.timestamp, &body)
                    {
                        note_info(&format!("Signature for this body and secret: {expected}"));
                    }
                }
                EventsApiError::Unmarshalling(_) | EventsApiError::UnknownInnerEvent(_) => {
                    println!("{}", to_pretty_json(&failure.event)?);
                }
            }
            bail!("delivery rejected: {}", failure.kind())
        }
    }
}
