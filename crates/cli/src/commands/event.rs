//! `pulsecast event` — verify a Slack Events API body and answer it in-thread.

use pulsecast::{default_registry, slack_surface};
use pulsecast_channels::{InboundEvent, SlackSignatureVerifier, parse_event};
use pulsecast_config::AppConfig;
use pulsecast_stream::{ChatStreamer, RenderSettings};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(
    file: &Path,
    timestamp: Option<String>,
    signature: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let body = std::fs::read(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;

    match config.slack.signing_secret.as_deref() {
        Some(secret) => {
            SlackSignatureVerifier::new(secret, &config.webhook).verify_request(
                timestamp.as_deref(),
                signature.as_deref(),
                &body,
            )?;
            info!("Slack signature verified");
        }
        None => warn!("No signing secret configured, skipping signature verification"),
    }

    let message = match parse_event(&body)? {
        InboundEvent::UrlVerification { challenge } => {
            println!("{challenge}");
            return Ok(());
        }
        InboundEvent::Ignored(reason) => {
            info!(%reason, "Event ignored");
            return Ok(());
        }
        InboundEvent::Message(message) => message,
    };

    let slack = Arc::new(slack_surface(&config.slack));
    let streamer = ChatStreamer::new(
        default_registry(),
        slack.clone(),
        RenderSettings::from(&config.renderer),
    );

    let destination = message.destination();
    let report = streamer
        .stream(&config.default_computation, message.request(), &destination)
        .await?;
    println!(
        "{}",
        slack
            .message(&destination.channel, &report.handle)
            .await
            .unwrap_or_default()
    );
    Ok(())
}
