//! Terminal stream consumer.
//!
//! No placeholder and no animation: text increments are written to the output
//! stream the moment they arrive. Tool calls and step transitions are logged.

use pulsecast_core::{
    ComputationRegistry, ComputationRequest, DisplayState, StreamError, render_status,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::chat::error_message;
use crate::settings::RenderSettings;

/// Result of a successful terminal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalReport {
    /// Accumulated text, or the fallback if nothing but whitespace arrived
    pub text: String,
    /// Whether the fallback had to be written
    pub used_fallback: bool,
}

/// Streams computations onto a raw character stream.
pub struct TerminalStreamer<W> {
    registry: ComputationRegistry,
    settings: RenderSettings,
    out: W,
}

impl<W: AsyncWrite + Unpin + Send> TerminalStreamer<W> {
    pub fn new(registry: ComputationRegistry, settings: RenderSettings, out: W) -> Self {
        Self {
            registry,
            settings,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run `computation` and write its text to the output as it streams.
    ///
    /// On failure an error line is written (best effort) and the original
    /// error is returned.
    pub async fn stream(
        &mut self,
        computation: &str,
        request: ComputationRequest,
    ) -> Result<TerminalReport, StreamError> {
        info!(computation, thread_id = %request.thread_id, "Starting terminal session");

        let mut state = DisplayState::new();
        match self.drive(&mut state, computation, request).await {
            Ok(()) => self.finish(&state).await,
            Err(e) => {
                let line = format!("\n{}\n", error_message(&e));
                if let Err(write_err) = self.write(&line).await {
                    warn!(error = %write_err, "Failed to write error message");
                }
                Err(e)
            }
        }
    }

    async fn drive(
        &mut self,
        state: &mut DisplayState,
        name: &str,
        request: ComputationRequest,
    ) -> Result<(), StreamError> {
        let computation = self.registry.resolve(name)?;
        let mut chunks = computation.stream(request).await?;

        while let Some(next) = chunks.recv().await {
            let chunk = next?;
            let applied = state.apply(&chunk);
            if let Some(text) = applied.text.as_deref() {
                self.write(text).await?;
            }
            if applied.pulse {
                info!(status = %render_status(state, 0), "Progress");
            }
        }
        Ok(())
    }

    async fn finish(&mut self, state: &DisplayState) -> Result<TerminalReport, StreamError> {
        let used_fallback = state.text().trim().is_empty();
        if used_fallback {
            let fallback = self.settings.fallback_text.clone();
            self.write(&fallback).await?;
        }
        self.write("\n").await?;

        info!(chars = state.text().len(), used_fallback, "Terminal session finished");
        Ok(TerminalReport {
            text: state.final_text(&self.settings.fallback_text).to_string(),
            used_fallback,
        })
    }

    async fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsecast_core::{Chunk, ComputationError, ScriptedComputation};
    use std::sync::Arc;

    fn streamer(computation: ScriptedComputation) -> TerminalStreamer<Vec<u8>> {
        let mut registry = ComputationRegistry::new();
        registry.register(Arc::new(computation));
        TerminalStreamer::new(registry, RenderSettings::default(), Vec::new())
    }

    fn request() -> ComputationRequest {
        ComputationRequest::new("hi", "local_user", "cli_session")
    }

    #[tokio::test]
    async fn writes_deltas_incrementally() {
        let mut term = streamer(ScriptedComputation::new(
            "agent",
            vec![
                Chunk::text_delta("Hel"),
                Chunk::tool_call("reverseText"),
                Chunk::text_delta("lo!"),
            ],
        ));

        let report = term.stream("agent", request()).await.unwrap();
        assert_eq!(report.text, "Hello!");
        assert!(!report.used_fallback);
        assert_eq!(String::from_utf8(term.into_inner()).unwrap(), "Hello!\n");
    }

    #[tokio::test]
    async fn nested_agent_text_is_written_too() {
        let mut term = streamer(ScriptedComputation::new(
            "agent",
            vec![
                Chunk::text_delta("a"),
                Chunk::new(
                    "agent-execution-event-text-delta",
                    serde_json::json!({ "type": "text-delta", "payload": { "text": "b" } }),
                ),
            ],
        ));

        let report = term.stream("agent", request()).await.unwrap();
        assert_eq!(report.text, "ab");
        assert_eq!(String::from_utf8(term.into_inner()).unwrap(), "ab\n");
    }

    #[tokio::test]
    async fn empty_stream_writes_fallback() {
        let mut term = streamer(ScriptedComputation::new("agent", vec![]));
        let report = term.stream("agent", request()).await.unwrap();
        assert!(report.used_fallback);
        assert_eq!(report.text, "no response generated");
        assert_eq!(
            String::from_utf8(term.into_inner()).unwrap(),
            "no response generated\n"
        );
    }

    #[tokio::test]
    async fn whitespace_only_stream_writes_fallback() {
        let mut term = streamer(ScriptedComputation::new(
            "agent",
            vec![Chunk::text_delta(" "), Chunk::text_delta("\n")],
        ));
        let report = term.stream("agent", request()).await.unwrap();
        assert!(report.used_fallback);
        assert_eq!(report.text, "no response generated");
        // The whitespace itself was already streamed before the fallback line
        assert_eq!(
            String::from_utf8(term.into_inner()).unwrap(),
            " \nno response generated\n"
        );
    }

    #[tokio::test]
    async fn unknown_computation_writes_error() {
        let mut term = streamer(ScriptedComputation::new("agent", vec![]));
        let err = term.stream("ghost", request()).await.unwrap_err();
        assert!(err.is_resolution_error());
        let out = String::from_utf8(term.into_inner()).unwrap();
        assert!(out.contains("❌ Error"));
        assert!(out.contains("ghost"));
    }

    #[tokio::test]
    async fn upstream_failure_keeps_partial_output() {
        let mut term = streamer(
            ScriptedComputation::new("agent", vec![Chunk::text_delta("part")])
                .failing_with(ComputationError::Failed("model overloaded".into())),
        );
        let err = term.stream("agent", request()).await.unwrap_err();
        assert!(matches!(err, StreamError::Computation(ComputationError::Failed(_))));

        let out = String::from_utf8(term.into_inner()).unwrap();
        assert!(out.starts_with("part\n❌ Error"));
        assert!(out.contains("model overloaded"));
    }
}
