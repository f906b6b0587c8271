//! Chunk recordings: one JSON chunk per line.
//!
//! ```text
//! {"type":"tool-call","payload":{"toolName":"reverseText"}}
//! {"type":"text-delta","payload":{"text":"Hel"}}
//! ```

use pulsecast_core::{Chunk, ScriptedComputation};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Registry name used for replayed recordings.
pub const REPLAY: &str = "replay";

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Failed to read recording {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid chunk on line {line}: {reason}")]
    InvalidChunk { line: usize, reason: String },
}

/// Parse JSONL text. Blank lines are skipped.
pub fn parse(content: &str) -> Result<Vec<Chunk>, RecordingError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| RecordingError::InvalidChunk {
                line: idx + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<Chunk>, RecordingError> {
    let content = std::fs::read_to_string(path).map_err(|e| RecordingError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let chunks = parse(&content)?;
    debug!(path = %path.display(), chunks = chunks.len(), "Loaded recording");
    Ok(chunks)
}

/// A computation that replays `chunks` under the [`REPLAY`] name.
pub fn computation(chunks: Vec<Chunk>) -> ScriptedComputation {
    ScriptedComputation::new(REPLAY, chunks)
}
