//! Surface trait — the abstraction over an editable chat destination.
//!
//! A chat surface lets the renderer post one message and then overwrite it in
//! place. Updates may be rejected transiently (rate limiting), so callers
//! decide per call site whether to swallow or retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

/// Opaque handle to a posted message (a Slack `ts`, for example).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle(pub String);

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session's output goes: a channel plus an optional thread anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub channel: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_anchor: Option<String>,
}

impl Destination {
    pub fn new(channel: impl Into<String>, thread_anchor: Option<String>) -> Self {
        Self {
            channel: channel.into(),
            thread_anchor,
        }
    }
}

/// The core ChatSurface trait.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    /// Human-readable surface name (e.g., "slack").
    fn name(&self) -> &str;

    /// Post a new message and return a handle for later updates.
    async fn post(
        &self,
        channel: &str,
        thread_anchor: Option<&str>,
        text: &str,
    ) -> std::result::Result<MessageHandle, SurfaceError>;

    /// Overwrite a previously posted message.
    async fn update(
        &self,
        channel: &str,
        handle: &MessageHandle,
        text: &str,
    ) -> std::result::Result<(), SurfaceError>;

    /// Health check — is the surface reachable?
    async fn health_check(&self) -> std::result::Result<bool, SurfaceError> {
        Ok(true)
    }
}
