//! Shared test helpers for session tests.

use async_trait::async_trait;
use pulsecast_core::{
    ChatSurface, Chunk, ChunkReceiver, Computation, ComputationError, ComputationRequest,
    MessageHandle, SurfaceError,
};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Post {
        channel: String,
        thread_anchor: Option<String>,
        text: String,
    },
    Update {
        channel: String,
        handle: MessageHandle,
        text: String,
    },
}

impl SurfaceCall {
    pub fn text(&self) -> &str {
        match self {
            Self::Post { text, .. } | Self::Update { text, .. } => text,
        }
    }
}

/// A chat surface that records every call and can be scripted to fail.
#[derive(Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    fail_posts: Mutex<bool>,
    /// Fail this many updates whose text equals the given string.
    fail_updates: Mutex<Option<(String, u32)>>,
    fail_all_updates: Mutex<bool>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_posts(self) -> Self {
        *self.fail_posts.lock().unwrap() = true;
        self
    }

    pub fn failing_updates(self) -> Self {
        *self.fail_all_updates.lock().unwrap() = true;
        self
    }

    pub fn failing_update_of(self, text: &str, times: u32) -> Self {
        *self.fail_updates.lock().unwrap() = Some((text.to_string(), times));
        self
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::Update { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn posts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::Post { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatSurface for RecordingSurface {
    fn name(&self) -> &str {
        "recording"
    }

    async fn post(
        &self,
        channel: &str,
        thread_anchor: Option<&str>,
        text: &str,
    ) -> Result<MessageHandle, SurfaceError> {
        self.calls.lock().unwrap().push(SurfaceCall::Post {
            channel: channel.into(),
            thread_anchor: thread_anchor.map(str::to_string),
            text: text.into(),
        });
        if *self.fail_posts.lock().unwrap() {
            return Err(SurfaceError::DeliveryFailed {
                channel: channel.into(),
                reason: "channel_not_found".into(),
            });
        }
        Ok(MessageHandle("1700000000.000100".into()))
    }

    async fn update(
        &self,
        channel: &str,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), SurfaceError> {
        self.calls.lock().unwrap().push(SurfaceCall::Update {
            channel: channel.into(),
            handle: handle.clone(),
            text: text.into(),
        });
        if *self.fail_all_updates.lock().unwrap() {
            return Err(SurfaceError::RateLimited { retry_after_secs: 1 });
        }
        let mut scripted = self.fail_updates.lock().unwrap();
        if let Some((target, remaining)) = scripted.as_mut() {
            if target == text && *remaining > 0 {
                *remaining -= 1;
                return Err(SurfaceError::RateLimited { retry_after_secs: 1 });
            }
        }
        Ok(())
    }
}

/// A computation that waits `gap` before each chunk.
pub struct DelayedComputation {
    pub chunks: Vec<Chunk>,
    pub gap: Duration,
}

#[async_trait]
impl Computation for DelayedComputation {
    fn name(&self) -> &str {
        "delayed"
    }

    async fn stream(&self, _request: ComputationRequest) -> Result<ChunkReceiver, ComputationError> {
        let (tx, rx) = mpsc::channel(8);
        let chunks = self.chunks.clone();
        let gap = self.gap;
        tokio::spawn(async move {
            for chunk in chunks {
                tokio::time::sleep(gap).await;
                if tx.send(Ok(chunk)).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }
}
