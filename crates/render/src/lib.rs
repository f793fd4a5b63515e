//! Rendering adapter: renderer-agnostic frame planning.
//!
//! # Invariants
//! - Renderers never mutate scene state.
//! - Grid and light gizmo are always unlit; objects follow the lit flag.

mod plan;
mod renderer;

pub use plan::{DrawCall, DrawTarget, plan_frame};
pub use renderer::{DebugTextRenderer, Renderer};
