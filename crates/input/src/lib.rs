//! Viewer input: event accumulation, per-frame snapshots, action mapping.
//!
//! # Invariants
//! - The main loop reads input only through one [`FrameInput`] per frame.
//! - At most one light move applies per frame (see [`LIGHT_BINDINGS`]).

pub mod action;
pub mod frame;

pub use action::{CameraDolly, LIGHT_BINDINGS, LightMove};
pub use frame::{FrameInput, Input};
