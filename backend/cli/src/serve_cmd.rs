//! `eventgate serve`: run the Slack webhook behind an HTTP listener.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use axum::{routing::get, Router};
use eventgate_channels::slack::{SlackConfig, SlackWebhook};
use eventgate_channels::EventRegistries;
use eventgate_config::EventGateConfig;
use eventgate_core::EventsApiEvent;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

fn registries_for(config: &EventGateConfig) -> Arc<EventRegistries> {
    if config.slack.legacy_rtm_events {
        eventgate_channels::slack::default_registries()
    } else {
        Arc::new(EventRegistries::events_api_only())
    }
}

/// Assemble the full HTTP application: webhook route, health check, tracing.
pub fn build_app(config: &EventGateConfig, events_tx: mpsc::Sender<EventsApiEvent>) -> Result<Router> {
    let Some(signing_secret) = config.slack.signing_secret.clone().filter(|s| !s.is_empty()) else {
        bail!("slack.signingSecret is not configured");
    };

    let webhook = SlackWebhook::new(
        SlackConfig {
            signing_secret,
            webhook_path: config.slack.webhook_path.clone(),
        },
        events_tx,
    )
    .with_registries(registries_for(config));

    Ok(webhook
        .build_router()
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http()))
}

/// Drain decoded events. Outbound handling is out of scope, so events are
/// logged and dropped.
async fn consume_events(mut events_rx: mpsc::Receiver<EventsApiEvent>) {
    while let Some(event) = events_rx.recv().await {
        let inner_type = event.inner.as_ref().map(|i| i.event_type.as_str()).unwrap_or("");
        let event_id = event
            .data
            .as_callback()
            .map(|cb| cb.event_id.as_str())
            .unwrap_or("");
        info!(team_id = %event.team_id, event_id, inner_type, "Received Slack event");
        if let Some(inner) = &event.inner {
            if let Ok(payload) = serde_json::to_string(&inner.payload) {
                debug!(inner_type, %payload, "Event payload");
            }
        }
    }
    warn!("Event channel closed; consumer exiting");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub async fn run(config: EventGateConfig) -> Result<()> {
    let (events_tx, events_rx) = mpsc::channel(config.server.event_buffer);
    let app = build_app(&config, events_tx)?;
    let consumer = tokio::spawn(consume_events(events_rx));

    let addr = config.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        addr = %addr,
        webhook_path = %config.slack.webhook_path,
        legacy_rtm_events = config.slack.legacy_rtm_events,
        "EventGate listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    // The router owned the last sender; the consumer drains and exits.
    let _ = consumer.await;
    info!("EventGate stopped");
    Ok(())
}
