//! Scene state for the viewer and its per-frame update.
//!
//! # Invariants
//! - Exactly one camera, one light and one grid; objects render in list order.
//! - Nothing here touches the GPU or the window; the desktop app and the
//!   headless CLI drive the same update.

mod camera;
mod grid;
mod light;
mod object;
mod scene;

pub use camera::{Camera, CameraMatrices};
pub use grid::Grid;
pub use light::Light;
pub use object::Object;
pub use scene::{FrameReport, Scene, ShadingPath, ViewerState};
