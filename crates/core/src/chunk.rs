//! Chunk taxonomy — the events a computation emits while it runs.
//!
//! A chunk is a `{"type": ..., "payload": ...}` object. Most kinds come from
//! a fixed vocabulary, but two families are open-ended: anything starting with
//! `agent-execution-event-` or `workflow-execution-event-` wraps an inner event
//! from a sub-computation. Those are matched by prefix, never enumerated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TEXT_DELTA: &str = "text-delta";
pub const TOOL_CALL: &str = "tool-call";
pub const TOOL_OUTPUT: &str = "tool-output";
pub const WORKFLOW_START: &str = "workflow-execution-start";
pub const WORKFLOW_STEP_START: &str = "workflow-step-start";
pub const AGENT_START: &str = "agent-execution-start";

pub const AGENT_EVENT_PREFIX: &str = "agent-execution-event-";
pub const WORKFLOW_EVENT_PREFIX: &str = "workflow-execution-event-";

/// Kinds that carry no special handling but are still surfaced as status.
const STATUS_KINDS: &[&str] = &[
    "start",
    "step-start",
    "step-finish",
    "finish",
    "error",
    "abort",
    "text-start",
    "text-end",
    "reasoning-start",
    "reasoning-delta",
    "reasoning-end",
    "tool-call-input-streaming-start",
    "tool-call-delta",
    "tool-call-input-streaming-end",
    "tool-result",
    "tool-error",
    "source",
    "file",
    "workflow-execution-end",
    "workflow-step-result",
    "workflow-step-finish",
    "agent-execution-end",
    "routing-agent-start",
    "routing-agent-end",
];

/// One unit of the event sequence emitted by a computation in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The event tag (e.g. `text-delta`, `tool-call`).
    #[serde(rename = "type")]
    pub kind: String,

    /// Kind-specific body. Some kinds carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// A classified view of a chunk's `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind<'a> {
    TextDelta,
    ToolCall,
    ToolOutput,
    WorkflowStart,
    AgentStart,
    /// `agent-execution-event-<inner>`; the inner kind is the suffix.
    AgentEvent { inner: &'a str },
    /// `workflow-execution-event-<inner>`.
    WorkflowEvent { inner: &'a str },
    /// A recognized kind with no handling beyond status display.
    Status(&'a str),
    /// Anything else. Ignored.
    Unknown(&'a str),
}

impl<'a> ChunkKind<'a> {
    pub fn of(kind: &'a str) -> Self {
        if let Some(inner) = kind.strip_prefix(AGENT_EVENT_PREFIX) {
            return Self::AgentEvent { inner };
        }
        if let Some(inner) = kind.strip_prefix(WORKFLOW_EVENT_PREFIX) {
            return Self::WorkflowEvent { inner };
        }
        match kind {
            TEXT_DELTA => Self::TextDelta,
            TOOL_CALL => Self::ToolCall,
            TOOL_OUTPUT => Self::ToolOutput,
            WORKFLOW_START => Self::WorkflowStart,
            AGENT_START => Self::AgentStart,
            other if STATUS_KINDS.contains(&other) => Self::Status(other),
            other => Self::Unknown(other),
        }
    }
}

/// A borrowed `{type, payload}` pair found inside another chunk's payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventView<'a> {
    pub kind: &'a str,
    pub payload: Option<&'a Value>,
}

impl<'a> EventView<'a> {
    /// Read an event-shaped object. Returns `None` unless `value` has a string `type`.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let kind = value.get("type")?.as_str()?;
        Some(Self {
            kind,
            payload: value.get("payload"),
        })
    }

    /// A string field of the payload.
    pub fn payload_str(&self, key: &str) -> Option<&'a str> {
        self.payload?.get(key)?.as_str()
    }
}

impl Chunk {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    /// A chunk with no payload at all.
    pub fn bare(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn text_delta(text: impl Into<String>) -> Self {
        Self::new(TEXT_DELTA, serde_json::json!({ "text": text.into() }))
    }

    pub fn tool_call(tool_name: impl Into<String>) -> Self {
        Self::new(TOOL_CALL, serde_json::json!({ "toolName": tool_name.into() }))
    }

    pub fn classify(&self) -> ChunkKind<'_> {
        ChunkKind::of(&self.kind)
    }

    pub fn view(&self) -> EventView<'_> {
        EventView {
            kind: &self.kind,
            payload: self.payload.as_ref(),
        }
    }

    /// A string field of the payload.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.view().payload_str(key)
    }

    /// The embedded event for the two prefix families: the payload is itself
    /// an event-shaped object.
    pub fn nested_event(&self) -> Option<EventView<'_>> {
        EventView::from_value(self.payload.as_ref()?)
    }

    /// The embedded event inside a `tool-output` chunk's `payload.output`.
    pub fn tool_output_event(&self) -> Option<EventView<'_>> {
        EventView::from_value(self.payload.as_ref()?.get("output")?)
    }
}
