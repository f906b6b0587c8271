//! `pulsecast replay` — run a recorded chunk sequence through a chat session.

use pulsecast::{recording, slack_surface};
use pulsecast_config::AppConfig;
use pulsecast_core::{ComputationRegistry, ComputationRequest, Destination};
use pulsecast_stream::{ChatStreamer, RenderSettings};
use std::path::Path;
use std::sync::Arc;

pub async fn run(
    file: &Path,
    channel: String,
    thread: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let chunks = recording::load(file)?;

    let mut registry = ComputationRegistry::new();
    registry.register(Arc::new(recording::computation(chunks)));

    let slack = Arc::new(slack_surface(&config.slack));
    let streamer = ChatStreamer::new(
        registry,
        slack.clone(),
        RenderSettings::from(&config.renderer),
    );

    let destination = Destination::new(&channel, thread);
    let request = ComputationRequest::new("replay", "local_user", format!("{channel}-replay"));
    let report = streamer
        .stream(recording::REPLAY, request, &destination)
        .await?;

    let history = slack.history(&channel, &report.handle).await;
    eprintln!(
        "  {} renders, final write {} after {} attempt(s)",
        history.len(),
        if report.delivery.is_delivered() { "delivered" } else { "abandoned" },
        report.delivery.attempts()
    );
    println!("{}", slack.message(&channel, &report.handle).await.unwrap_or_default());
    Ok(())
}
