//! # Pulsecast Core
//!
//! Domain types, traits, and error definitions for streaming a computation's
//! progress onto a live, editable surface. This crate has **no I/O of its
//! own**: it defines the chunk taxonomy, the display state derived from it,
//! and the status line rendered from that state.
//!
//! ## Design Philosophy
//!
//! Producers (computations) and destinations (chat surfaces) are traits here.
//! Implementations live in their respective crates, so sessions can be tested
//! against scripted computations and recording surfaces.

pub mod chunk;
pub mod computation;
pub mod display;
pub mod error;
pub mod status;
pub mod surface;
pub mod unwrap;

// Re-export key types at crate root for ergonomics
pub use chunk::{Chunk, ChunkKind, EventView};
pub use computation::{
    ChunkReceiver, Computation, ComputationRegistry, ComputationRequest, ScriptedComputation,
};
pub use display::{Applied, DisplayState, FALLBACK_TEXT};
pub use error::{ComputationError, Result, StreamError, SurfaceError};
pub use status::{humanize, render_status, title_case};
pub use surface::{ChatSurface, Destination, MessageHandle};
pub use unwrap::{Unwrapped, unwrap_nested};
