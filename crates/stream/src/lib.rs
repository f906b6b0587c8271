//! Streaming response renderer for Pulsecast.
//!
//! Consumes a computation's chunk sequence and keeps a live destination up to
//! date while it runs:
//!
//! - **Chat** — one editable placeholder, re-rendered by an animation loop
//!   and overwritten with the final text (retried) when the stream ends
//! - **Terminal** — text increments written straight to an output stream

pub mod animation;
pub mod chat;
pub mod retry;
pub mod settings;
pub mod terminal;

pub use animation::AnimationLoop;
pub use chat::{ChatReport, ChatStreamer, SessionPhase, error_message};
pub use retry::{RetryOutcome, final_write, retry_with};
pub use settings::{PacingBudget, RenderSettings, RetryPolicy};
pub use terminal::{TerminalReport, TerminalStreamer};

#[cfg(test)]
pub(crate) mod test_helpers;
