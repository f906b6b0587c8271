//! Chat surface implementations for Pulsecast.
//!
//! - **Slack** — `chat.postMessage` / `chat.update` surface (stub, in-process store)
//! - **Webhook** — Slack request signature verification and event parsing

pub mod slack;
pub mod webhook;

pub use slack::SlackSurface;
pub use webhook::{InboundEvent, InboundMessage, SlackSignatureVerifier, WebhookError, parse_event};
