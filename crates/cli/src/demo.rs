//! Demo computation: reverses the user's message.

use async_trait::async_trait;
use pulsecast_core::{Chunk, ChunkReceiver, Computation, ComputationError, ComputationRequest};
use tokio::sync::mpsc;
use tracing::debug;

pub const REVERSE: &str = "reverse";

/// Characters emitted per text delta.
const DELTA_CHARS: usize = 4;

/// Calls a `reverseText` tool, then streams the reversed message.
pub struct ReverseComputation;

#[async_trait]
impl Computation for ReverseComputation {
    fn name(&self) -> &str {
        REVERSE
    }

    async fn stream(&self, request: ComputationRequest) -> Result<ChunkReceiver, ComputationError> {
        let reversed: Vec<char> = request.message.chars().rev().collect();
        debug!(chars = reversed.len(), thread_id = %request.thread_id, "Reversing message");

        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            if tx.send(Ok(Chunk::tool_call("reverseText"))).await.is_err() {
                return;
            }
            for piece in reversed.chunks(DELTA_CHARS) {
                let text: String = piece.iter().collect();
                if tx.send(Ok(Chunk::text_delta(text))).await.is_err() {
                    return;
                }
            }
        });
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsecast_core::ChunkKind;

    #[tokio::test]
    async fn emits_tool_call_then_reversed_text() {
        let mut rx = ReverseComputation
            .stream(ComputationRequest::new("hello world", "u", "t"))
            .await
            .unwrap();

        let first = rx.recv().await.unwrap().unwrap();
        assert_eq!(first.classify(), ChunkKind::ToolCall);
        assert_eq!(first.payload_str("toolName"), Some("reverseText"));

        let mut text = String::new();
        while let Some(chunk) = rx.recv().await {
            text.push_str(chunk.unwrap().payload_str("text").unwrap());
        }
        assert_eq!(text, "dlrow olleh");
    }

    #[tokio::test]
    async fn empty_message_only_calls_tool() {
        let mut rx = ReverseComputation
            .stream(ComputationRequest::new("", "u", "t"))
            .await
            .unwrap();
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }
}
