//! Display state — what has happened so far in one streaming session.
//!
//! Derived solely from the chunk sequence and independent of where it is
//! rendered. Created fresh per session and dropped after the final write.

use tracing::trace;

use crate::chunk::{Chunk, ChunkKind};
use crate::unwrap::unwrap_nested;

/// Kind shown before the first chunk arrives.
pub const INITIAL_KIND: &str = "thinking";

/// Step label set when a workflow starts, before its first step reports in.
pub const WORKFLOW_STARTING_STEP: &str = "Starting";

/// Written instead of an empty message when a session produced no text.
pub const FALLBACK_TEXT: &str = "no response generated";

/// Mutable projection of a chunk sequence.
///
/// Single writer (the stream consumer). Renderers only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    text: String,
    current_kind: String,
    tool_name: Option<String>,
    workflow_name: Option<String>,
    step_name: Option<String>,
    agent_name: Option<String>,
}

/// Side effects the consumer must perform after a chunk was applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Applied {
    /// The text increment this chunk contributed, top-level or nested.
    pub text: Option<String>,
    /// Render now and hold the frame for the pacing delay.
    pub pulse: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            current_kind: INITIAL_KIND.to_string(),
            tool_name: None,
            workflow_name: None,
            step_name: None,
            agent_name: None,
        }
    }

    /// Apply one chunk: unwrap any nested event, then dispatch on the
    /// top-level kind. Unknown kinds leave the state untouched.
    pub fn apply(&mut self, chunk: &Chunk) -> Applied {
        let kind = chunk.classify();
        if let ChunkKind::Unknown(kind) = kind {
            trace!(kind, "Ignoring unrecognized chunk kind");
            return Applied::default();
        }

        self.set_kind(&chunk.kind);
        let nested = unwrap_nested(chunk, self);
        let mut applied = Applied {
            text: nested.text,
            pulse: nested.pulse,
        };

        match kind {
            ChunkKind::TextDelta => {
                let text = chunk.payload_str("text").unwrap_or_default();
                self.append_text(text);
                applied.text = Some(text.to_string());
            }
            ChunkKind::ToolCall => {
                if let Some(name) = chunk
                    .payload_str("toolName")
                    .or_else(|| chunk.payload_str("name"))
                {
                    self.tool_name = Some(name.to_string());
                }
                applied.pulse = true;
            }
            ChunkKind::WorkflowStart => {
                if let Some(name) = chunk
                    .payload_str("workflowId")
                    .or_else(|| chunk.payload_str("name"))
                {
                    self.workflow_name = Some(name.to_string());
                }
                self.set_step(WORKFLOW_STARTING_STEP);
            }
            ChunkKind::AgentStart => {
                if let Some(name) = chunk
                    .payload_str("agentId")
                    .or_else(|| chunk.payload_str("name"))
                {
                    self.agent_name = Some(name.to_string());
                }
            }
            _ => {}
        }

        applied
    }

    /// Accumulated text is append-only.
    pub fn append_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn set_kind(&mut self, kind: &str) {
        if self.current_kind != kind {
            self.current_kind.clear();
            self.current_kind.push_str(kind);
        }
    }

    pub fn set_step(&mut self, step: &str) {
        self.step_name = Some(step.to_string());
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn current_kind(&self) -> &str {
        &self.current_kind
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    pub fn workflow_name(&self) -> Option<&str> {
        self.workflow_name.as_deref()
    }

    pub fn step_name(&self) -> Option<&str> {
        self.step_name.as_deref()
    }

    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }

    /// The text to commit at session end: accumulated text, or `fallback`
    /// when nothing but whitespace was produced.
    pub fn final_text<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.text.trim().is_empty() {
            fallback
        } else {
            &self.text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_deltas_concatenate_in_order() {
        let mut state = DisplayState::new();
        for piece in ["Hel", "lo", ", ", "world"] {
            let applied = state.apply(&Chunk::text_delta(piece));
            assert_eq!(applied.text.as_deref(), Some(piece));
        }
        assert_eq!(state.text(), "Hello, world");
        assert_eq!(state.current_kind(), "text-delta");
    }

    #[test]
    fn tool_call_records_name_and_pulses() {
        let mut state = DisplayState::new();
        let applied = state.apply(&Chunk::tool_call("reverseText"));
        assert!(applied.pulse);
        assert_eq!(state.tool_name(), Some("reverseText"));
        assert_eq!(state.current_kind(), "tool-call");

        // Overwritten by the next call, never reset.
        state.apply(&Chunk::text_delta("x"));
        assert_eq!(state.tool_name(), Some("reverseText"));
        state.apply(&Chunk::tool_call("lookup"));
        assert_eq!(state.tool_name(), Some("lookup"));
    }

    #[test]
    fn workflow_start_sets_placeholder_step() {
        let mut state = DisplayState::new();
        let applied = state.apply(&Chunk::new(
            "workflow-execution-start",
            json!({ "workflowId": "weatherWorkflow" }),
        ));
        assert!(!applied.pulse);
        assert_eq!(state.workflow_name(), Some("weatherWorkflow"));
        assert_eq!(state.step_name(), Some(WORKFLOW_STARTING_STEP));
    }

    #[test]
    fn agent_start_records_agent() {
        let mut state = DisplayState::new();
        state.apply(&Chunk::new("agent-execution-start", json!({ "agentId": "researcher" })));
        assert_eq!(state.agent_name(), Some("researcher"));
    }

    #[test]
    fn status_kinds_only_update_kind() {
        let mut state = DisplayState::new();
        state.apply(&Chunk::text_delta("a"));
        let applied = state.apply(&Chunk::bare("reasoning-start"));
        assert_eq!(applied, Applied::default());
        assert_eq!(state.current_kind(), "reasoning-start");
        assert_eq!(state.text(), "a");
    }

    #[test]
    fn unknown_kinds_are_ignored() {
        let mut state = DisplayState::new();
        state.apply(&Chunk::text_delta("a"));
        let before = state.clone();
        state.apply(&Chunk::new("vendor-telemetry", json!({ "text": "nope" })));
        assert_eq!(state, before);
    }

    #[test]
    fn tool_output_step_start_pulses() {
        let mut state = DisplayState::new();
        let applied = state.apply(&Chunk::new(
            "tool-output",
            json!({ "output": { "type": "workflow-step-start", "payload": { "stepId": "summarize" } } }),
        ));
        assert!(applied.pulse);
        assert_eq!(state.current_kind(), "workflow-step-start");
        assert_eq!(state.step_name(), Some("summarize"));
    }

    #[test]
    fn final_text_falls_back_on_blank() {
        let mut state = DisplayState::new();
        assert_eq!(state.final_text(FALLBACK_TEXT), FALLBACK_TEXT);
        state.apply(&Chunk::text_delta("  \n\t"));
        assert_eq!(state.final_text(FALLBACK_TEXT), FALLBACK_TEXT);
        state.apply(&Chunk::text_delta("ok"));
        assert_eq!(state.final_text(FALLBACK_TEXT), "  \n\tok");
    }
}
