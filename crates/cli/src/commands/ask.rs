//! `pulsecast ask` — stream a computation's answer to the terminal.

use pulsecast::default_registry;
use pulsecast_config::AppConfig;
use pulsecast_core::ComputationRequest;
use pulsecast_stream::{RenderSettings, TerminalStreamer};

pub async fn run(
    message: String,
    computation: Option<String>,
    resource: String,
    thread: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let computation = computation.unwrap_or_else(|| config.default_computation.clone());

    let mut terminal = TerminalStreamer::new(
        default_registry(),
        RenderSettings::from(&config.renderer),
        tokio::io::stdout(),
    );
    terminal
        .stream(&computation, ComputationRequest::new(message, resource, thread))
        .await?;
    Ok(())
}
