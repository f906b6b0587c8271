//! Computation trait — the producer of a chunk sequence.
//!
//! A computation is an agent or workflow that, given a message, emits an
//! ordered, finite sequence of chunks. The renderer never looks inside it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::chunk::Chunk;
use crate::error::ComputationError;

/// Ordered chunk sequence. The sender closing the channel ends the stream.
pub type ChunkReceiver = mpsc::Receiver<std::result::Result<Chunk, ComputationError>>;

/// Input to a computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationRequest {
    /// Free-text user message
    pub message: String,

    /// Stable per end-user / conversation owner. Passed through unchanged.
    pub resource_id: String,

    /// Stable per conversation thread. Passed through unchanged.
    pub thread_id: String,
}

impl ComputationRequest {
    pub fn new(
        message: impl Into<String>,
        resource_id: impl Into<String>,
        thread_id: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            resource_id: resource_id.into(),
            thread_id: thread_id.into(),
        }
    }
}

/// The core Computation trait.
#[async_trait]
pub trait Computation: Send + Sync {
    /// Registry name (e.g., "weatherAgent").
    fn name(&self) -> &str;

    /// Start the computation and return its chunk sequence.
    async fn stream(
        &self,
        request: ComputationRequest,
    ) -> std::result::Result<ChunkReceiver, ComputationError>;
}

/// Named computations available to sessions.
#[derive(Default, Clone)]
pub struct ComputationRegistry {
    computations: HashMap<String, Arc<dyn Computation>>,
}

impl ComputationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a computation under its own name.
    pub fn register(&mut self, computation: Arc<dyn Computation>) {
        let name = computation.name().to_string();
        info!(computation = %name, "Registered computation");
        self.computations.insert(name, computation);
    }

    /// Look up a computation by name.
    pub fn resolve(&self, name: &str) -> std::result::Result<Arc<dyn Computation>, ComputationError> {
        self.computations
            .get(name)
            .cloned()
            .ok_or_else(|| ComputationError::NotFound(name.to_string()))
    }

    /// List all registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.computations.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.computations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.computations.is_empty()
    }
}

/// A computation that replays a fixed script. Useful for demos and replays.
pub struct ScriptedComputation {
    name: String,
    script: Vec<std::result::Result<Chunk, ComputationError>>,
}

impl ScriptedComputation {
    pub fn new(name: impl Into<String>, chunks: Vec<Chunk>) -> Self {
        Self {
            name: name.into(),
            script: chunks.into_iter().map(Ok).collect(),
        }
    }

    /// End the script with an upstream failure instead of a clean close.
    pub fn failing_with(mut self, error: ComputationError) -> Self {
        self.script.push(Err(error));
        self
    }
}

#[async_trait]
impl Computation for ScriptedComputation {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream(
        &self,
        _request: ComputationRequest,
    ) -> std::result::Result<ChunkReceiver, ComputationError> {
        let (tx, rx) = mpsc::channel(self.script.len().max(1));
        let script = self.script.clone();
        tokio::spawn(async move {
            for item in script {
                if tx.send(item).await.is_err() {
                    break; // Consumer dropped
                }
            }
        });
        Ok(rx)
    }
}
