//! Inbound Slack webhook handling.
//!
//! Verifies the `X-Slack-Signature` header (HMAC-SHA256 over
//! `v0:<timestamp>:<body>`, constant-time compare, 5-minute replay window)
//! and turns an Events API envelope into the message a session is started for.

use hmac::{Hmac, Mac};
use pulsecast_config::WebhookConfig;
use pulsecast_core::computation::ComputationRequest;
use pulsecast_core::surface::Destination;
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_VERSION: &str = "v0";

pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Missing signing secret")]
    MissingSecret,

    #[error("Missing header: {0}")]
    MissingHeader(&'static str),

    #[error("Invalid request timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Request timestamp is {age_secs}s old, outside the replay window")]
    StaleTimestamp { age_secs: u64 },

    #[error("Signature mismatch")]
    InvalidSignature,

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

/// Verifies Slack request signatures.
pub struct SlackSignatureVerifier {
    signing_secret: String,
    tolerance_secs: u64,
}

impl SlackSignatureVerifier {
    pub fn new(signing_secret: impl Into<String>, config: &WebhookConfig) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            tolerance_secs: config.timestamp_tolerance_secs,
        }
    }

    /// Verify raw header values, as an HTTP handler would receive them.
    pub fn verify_request(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), WebhookError> {
        let timestamp = timestamp.ok_or(WebhookError::MissingHeader(TIMESTAMP_HEADER))?;
        let signature = signature.ok_or(WebhookError::MissingHeader(SIGNATURE_HEADER))?;
        self.verify(timestamp, body, signature)
    }

    /// Verify against the current wall clock.
    pub fn verify(&self, timestamp: &str, body: &[u8], signature: &str) -> Result<(), WebhookError> {
        self.verify_at(timestamp, body, signature, chrono::Utc::now().timestamp())
    }

    /// Verify as of `now` (unix seconds).
    pub fn verify_at(
        &self,
        timestamp: &str,
        body: &[u8],
        signature: &str,
        now: i64,
    ) -> Result<(), WebhookError> {
        if self.signing_secret.is_empty() {
            return Err(WebhookError::MissingSecret);
        }

        let ts: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp(timestamp.to_string()))?;
        let age_secs = now.abs_diff(ts);
        if age_secs > self.tolerance_secs {
            return Err(WebhookError::StaleTimestamp { age_secs });
        }

        let sig_hex = signature
            .strip_prefix("v0=")
            .ok_or(WebhookError::InvalidSignature)?;
        let provided = hex::decode(sig_hex).map_err(|_| WebhookError::InvalidSignature)?;

        // Constant-time comparison via `verify_slice`
        self.mac_for(timestamp.trim(), body)?
            .verify_slice(&provided)
            .map_err(|_| WebhookError::InvalidSignature)
    }

    /// Compute the `v0=<hex>` signature for a request.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, WebhookError> {
        let mac = self.mac_for(timestamp, body)?;
        Ok(format!(
            "{SIGNATURE_VERSION}={}",
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    fn mac_for(&self, timestamp: &str, body: &[u8]) -> Result<HmacSha256, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|_| WebhookError::MissingSecret)?;
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        Ok(mac)
    }
}

/// A user message that should start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    pub channel: String,
    /// `thread_ts` when inside a thread, else the message's own `ts`
    pub thread_anchor: String,
    pub user: String,
    pub team: String,
}

impl InboundMessage {
    /// Where the reply goes: same channel, same thread.
    pub fn destination(&self) -> Destination {
        Destination::new(&self.channel, Some(self.thread_anchor.clone()))
    }

    /// Resource = the user; thread = channel + thread anchor.
    pub fn request(&self) -> ComputationRequest {
        ComputationRequest::new(
            &self.text,
            &self.user,
            format!("{}-{}", self.channel, self.thread_anchor),
        )
    }
}

/// What an inbound Events API request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Endpoint ownership check; echo the challenge back.
    UrlVerification { challenge: String },
    Message(InboundMessage),
    /// Valid but not something to answer (bot echo, edit, other event type).
    Ignored(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    challenge: Option<String>,
    #[serde(default)]
    team_id: Option<String>,
    #[serde(default)]
    event: Option<EventBody>,
}

#[derive(Deserialize)]
struct EventBody {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    bot_id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    thread_ts: Option<String>,
}

/// Parse an Events API request body.
pub fn parse_event(body: &[u8]) -> Result<InboundEvent, WebhookError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

    match envelope.kind.as_str() {
        "url_verification" => {
            let challenge = envelope
                .challenge
                .ok_or_else(|| WebhookError::InvalidPayload("missing challenge".into()))?;
            Ok(InboundEvent::UrlVerification { challenge })
        }
        "event_callback" => {
            let event = envelope
                .event
                .ok_or_else(|| WebhookError::InvalidPayload("missing event".into()))?;
            message_from_event(event, envelope.team_id)
        }
        other => Ok(InboundEvent::Ignored(format!("envelope type {other}"))),
    }
}

fn message_from_event(
    event: EventBody,
    team_id: Option<String>,
) -> Result<InboundEvent, WebhookError> {
    if event.kind != "app_mention" && event.kind != "message" {
        return Ok(InboundEvent::Ignored(format!("event type {}", event.kind)));
    }
    if event.bot_id.is_some() {
        return Ok(InboundEvent::Ignored("bot message".into()));
    }
    if let Some(subtype) = event.subtype {
        return Ok(InboundEvent::Ignored(format!("message subtype {subtype}")));
    }

    let missing = |field: &str| WebhookError::InvalidPayload(format!("event missing {field}"));
    let channel = event.channel.ok_or_else(|| missing("channel"))?;
    let user = event.user.ok_or_else(|| missing("user"))?;
    let ts = event.ts.ok_or_else(|| missing("ts"))?;
    let text = strip_mentions(event.text.as_deref().unwrap_or_default());

    if text.is_empty() {
        return Ok(InboundEvent::Ignored("empty message".into()));
    }

    Ok(InboundEvent::Message(InboundMessage {
        text,
        channel,
        thread_anchor: event.thread_ts.unwrap_or(ts),
        user,
        team: event.team.or(team_id).unwrap_or_default(),
    }))
}

/// Drop leading `<@U123>` mentions.
fn strip_mentions(text: &str) -> String {
    let mut rest = text.trim_start();
    while let Some(after) = rest.strip_prefix("<@") {
        match after.find('>') {
            Some(end) => rest = after[end + 1..].trim_start(),
            None => break,
        }
    }
    rest.trim().to_string()
}
