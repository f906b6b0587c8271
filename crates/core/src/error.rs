//! Error types for the Pulsecast domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for a streaming session.
#[derive(Debug, Error)]
pub enum StreamError {
    // --- Computation errors ---
    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    // --- Display surface errors ---
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    // --- Terminal output ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our StreamError.
pub type Result<T> = std::result::Result<T, StreamError>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ComputationError {
    #[error("Computation not found: {0}")]
    NotFound(String),

    #[error("Computation failed: {0}")]
    Failed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),
}

#[derive(Debug, Clone, Error)]
pub enum SurfaceError {
    #[error("Rate limited by surface, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Surface I/O failed: {0}")]
    Io(String),
}

impl StreamError {
    /// Whether this failure happened before any chunk was requested
    /// (the named computation does not exist).
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Self::Computation(ComputationError::NotFound(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_error_displays_correctly() {
        let err = StreamError::Surface(SurfaceError::DeliveryFailed {
            channel: "C123".into(),
            reason: "ratelimited".into(),
        });
        assert!(err.to_string().contains("C123"));
        assert!(err.to_string().contains("ratelimited"));
    }

    #[test]
    fn not_found_is_resolution_error() {
        let err = StreamError::from(ComputationError::NotFound("weather".into()));
        assert!(err.is_resolution_error());
        assert!(err.to_string().contains("weather"));

        let err = StreamError::from(ComputationError::Failed("boom".into()));
        assert!(!err.is_resolution_error());
    }
}
