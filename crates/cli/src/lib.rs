//! Pulsecast application wiring shared by the binary and its tests.
//!
//! - [`demo`] — built-in computations available without external services
//! - [`recording`] — JSONL chunk recordings replayed through a session

pub mod demo;
pub mod recording;

use pulsecast_channels::SlackSurface;
use pulsecast_config::SlackConfig;
use pulsecast_core::ComputationRegistry;
use std::sync::Arc;
use tracing::warn;

/// Token used when no bot token is configured. Accepted by the stub surface.
pub const OFFLINE_BOT_TOKEN: &str = "xoxb-offline";

/// Registry with every built-in computation.
pub fn default_registry() -> ComputationRegistry {
    let mut registry = ComputationRegistry::new();
    registry.register(Arc::new(demo::ReverseComputation));
    registry
}

/// Slack surface for CLI commands. Falls back to [`OFFLINE_BOT_TOKEN`] when
/// no bot token is configured, so commands still run against the stub.
pub fn slack_surface(config: &SlackConfig) -> SlackSurface {
    match config.bot_token.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(token) => SlackSurface::new(token),
        None => {
            warn!("No Slack bot token configured, using offline token");
            SlackSurface::new(OFFLINE_BOT_TOKEN)
        }
    }
}
