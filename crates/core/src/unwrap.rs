//! Nested-event unwrapping.
//!
//! Sub-computations (an agent delegating to another agent, or a tool that is
//! itself a workflow) report progress as events embedded inside a parent chunk.
//! This module folds one level of that nesting into [`DisplayState`] as if the
//! inner event had arrived at the top level.

use crate::chunk::{Chunk, ChunkKind, EventView, TEXT_DELTA, WORKFLOW_STEP_START};
use crate::display::DisplayState;

/// Step label used when a step-start event carries no identifier.
pub const DEFAULT_STEP_NAME: &str = "step";

/// What the consumer must do after a nested event was folded in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unwrapped {
    /// Text appended to the accumulated output.
    pub text: Option<String>,
    /// A step transition happened that must be rendered and held on screen.
    pub pulse: bool,
}

/// Fold any embedded event carried by `chunk` into `state`.
///
/// Chunks without a payload, or whose payload is not event-shaped, are a no-op.
pub fn unwrap_nested(chunk: &Chunk, state: &mut DisplayState) -> Unwrapped {
    match chunk.classify() {
        ChunkKind::AgentEvent { .. } => match chunk.nested_event() {
            Some(inner) if inner.kind == TEXT_DELTA => {
                let text = inner.payload_str("text").unwrap_or_default();
                state.append_text(text);
                state.set_kind(inner.kind);
                Unwrapped {
                    text: Some(text.to_string()),
                    pulse: false,
                }
            }
            // Inner kinds not surfaced yet.
            _ => Unwrapped::default(),
        },
        ChunkKind::WorkflowEvent { .. } => match chunk.nested_event() {
            Some(inner) if inner.kind == WORKFLOW_STEP_START => {
                state.set_kind(inner.kind);
                state.set_step(step_name(&inner));
                Unwrapped::default()
            }
            _ => Unwrapped::default(),
        },
        ChunkKind::ToolOutput => match chunk.tool_output_event() {
            Some(inner) => {
                state.set_kind(inner.kind);
                if inner.kind == WORKFLOW_STEP_START {
                    state.set_step(step_name(&inner));
                    return Unwrapped {
                        text: None,
                        pulse: true,
                    };
                }
                Unwrapped::default()
            }
            None => Unwrapped::default(),
        },
        _ => Unwrapped::default(),
    }
}

/// `payload.id`, then `payload.stepId`, then [`DEFAULT_STEP_NAME`].
fn step_name<'a>(event: &EventView<'a>) -> &'a str {
    event
        .payload_str("id")
        .or_else(|| event.payload_str("stepId"))
        .unwrap_or(DEFAULT_STEP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step_output(payload: serde_json::Value) -> Chunk {
        Chunk::new(
            "tool-output",
            json!({ "output": { "type": "workflow-step-start", "payload": payload } }),
        )
    }

    #[test]
    fn nested_text_matches_top_level_text() {
        let mut nested = DisplayState::new();
        let mut top = DisplayState::new();

        let chunk = Chunk::new(
            "agent-execution-event-text-delta",
            json!({ "type": "text-delta", "payload": { "text": "Hola" } }),
        );
        let out = unwrap_nested(&chunk, &mut nested);
        top.apply(&Chunk::text_delta("Hola"));

        assert_eq!(out.text.as_deref(), Some("Hola"));
        assert_eq!(nested.text(), top.text());
        assert_eq!(nested.current_kind(), top.current_kind());
    }

    #[test]
    fn nested_agent_ignores_other_inner_kinds() {
        let mut state = DisplayState::new();
        let chunk = Chunk::new(
            "agent-execution-event-reasoning-delta",
            json!({ "type": "reasoning-delta", "payload": { "text": "hmm" } }),
        );
        assert_eq!(unwrap_nested(&chunk, &mut state), Unwrapped::default());
        assert_eq!(state.text(), "");
    }

    #[test]
    fn workflow_prefix_sets_step() {
        let mut state = DisplayState::new();
        let chunk = Chunk::new(
            "workflow-execution-event-workflow-step-start",
            json!({ "type": "workflow-step-start", "payload": { "id": "fetch-weather" } }),
        );
        let out = unwrap_nested(&chunk, &mut state);
        assert!(!out.pulse);
        assert_eq!(state.current_kind(), "workflow-step-start");
        assert_eq!(state.step_name(), Some("fetch-weather"));
    }

    #[test]
    fn workflow_prefix_without_id_uses_default() {
        let mut state = DisplayState::new();
        let chunk = Chunk::new(
            "workflow-execution-event-workflow-step-start",
            json!({ "type": "workflow-step-start" }),
        );
        unwrap_nested(&chunk, &mut state);
        assert_eq!(state.step_name(), Some(DEFAULT_STEP_NAME));
    }

    #[test]
    fn tool_output_step_name_priority() {
        let mut state = DisplayState::new();

        let out = unwrap_nested(&step_output(json!({ "id": "a", "stepId": "b" })), &mut state);
        assert!(out.pulse);
        assert_eq!(state.step_name(), Some("a"));

        unwrap_nested(&step_output(json!({ "stepId": "b" })), &mut state);
        assert_eq!(state.step_name(), Some("b"));

        unwrap_nested(&step_output(json!({})), &mut state);
        assert_eq!(state.step_name(), Some("step"));
    }

    #[test]
    fn tool_output_adopts_other_inner_kinds_without_pulse() {
        let mut state = DisplayState::new();
        let chunk = Chunk::new(
            "tool-output",
            json!({ "output": { "type": "workflow-step-result", "payload": { "id": "a" } } }),
        );
        let out = unwrap_nested(&chunk, &mut state);
        assert!(!out.pulse);
        assert_eq!(state.current_kind(), "workflow-step-result");
        assert_eq!(state.step_name(), None);
    }

    #[test]
    fn missing_payload_is_noop() {
        let mut state = DisplayState::new();
        for kind in ["agent-execution-event-text-delta", "workflow-execution-event-x", "tool-output"] {
            assert_eq!(unwrap_nested(&Chunk::bare(kind), &mut state), Unwrapped::default());
        }
        assert_eq!(state, DisplayState::new());
    }
}
