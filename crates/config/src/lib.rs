//! Configuration loading, validation, and management for Pulsecast.
//!
//! Loads configuration from `~/.pulsecast/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.pulsecast/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Computation used when a session does not name one
    #[serde(default = "default_computation")]
    pub default_computation: String,

    /// Streaming renderer timings and texts
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Slack credentials
    #[serde(default)]
    pub slack: SlackConfig,

    /// Inbound webhook verification
    #[serde(default)]
    pub webhook: WebhookConfig,
}

fn default_computation() -> String {
    "reverse".into()
}

/// Timings for the animation loop, pacing and final write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Animation tick interval
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Hold time after a tool-call or step-start render
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,

    /// Cap on cumulative pacing per session (0 = unbounded)
    #[serde(default = "default_pacing_budget_ms")]
    pub pacing_budget_ms: u64,

    /// Attempts for the final write, including the first
    #[serde(default = "default_final_write_attempts")]
    pub final_write_attempts: u32,

    /// Delay between final-write attempts
    #[serde(default = "default_final_write_retry_delay_ms")]
    pub final_write_retry_delay_ms: u64,

    /// Written when a session produced no text
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,
}

fn default_tick_interval_ms() -> u64 {
    300
}
fn default_pacing_delay_ms() -> u64 {
    300
}
fn default_pacing_budget_ms() -> u64 {
    0
}
fn default_final_write_attempts() -> u32 {
    3
}
fn default_final_write_retry_delay_ms() -> u64 {
    500
}
fn default_fallback_text() -> String {
    "no response generated".into()
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            pacing_delay_ms: default_pacing_delay_ms(),
            pacing_budget_ms: default_pacing_budget_ms(),
            final_write_attempts: default_final_write_attempts(),
            final_write_retry_delay_ms: default_final_write_retry_delay_ms(),
            fallback_text: default_fallback_text(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token (xoxb-...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Signing secret for inbound request verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("signing_secret", &redact(&self.signing_secret))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Maximum age of a signed request
    #[serde(default = "default_timestamp_tolerance_secs")]
    pub timestamp_tolerance_secs: u64,
}

fn default_timestamp_tolerance_secs() -> u64 {
    300
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timestamp_tolerance_secs: default_timestamp_tolerance_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.pulsecast/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `SLACK_BOT_TOKEN`
    /// - `SLACK_SIGNING_SECRET`
    /// - `PULSECAST_COMPUTATION`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("SLACK_BOT_TOKEN") {
            self.slack.bot_token = Some(token);
        }
        if let Some(secret) = lookup("SLACK_SIGNING_SECRET") {
            self.slack.signing_secret = Some(secret);
        }
        if let Some(name) = lookup("PULSECAST_COMPUTATION") {
            self.default_computation = name;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".pulsecast")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.renderer.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "renderer.tick_interval_ms must be > 0".into(),
            ));
        }

        if self.renderer.final_write_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "renderer.final_write_attempts must be >= 1".into(),
            ));
        }

        if self.renderer.fallback_text.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "renderer.fallback_text must not be empty".into(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_computation: default_computation(),
            renderer: RendererConfig::default(),
            slack: SlackConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
