//! wgpu render backend for the scene viewer.
//!
//! [`Screen`] owns the window surface, device and queue. [`WgpuRenderer`]
//! draws a [`sceneview_scene::Scene`] through the default or lit program,
//! following the plan from [`sceneview_render::plan_frame`].
//!
//! # Invariants
//! - Rendering never mutates scene state.
//! - Grid and light gizmo always use the default program.
//! - Shader compile failures surface as [`ShaderError`], never as panics.

mod gpu;
mod mesh;
mod screen;
mod shader;
mod shaders;
mod texture;

pub use gpu::WgpuRenderer;
pub use mesh::{GpuMesh, MeshData, Vertex};
pub use screen::{Screen, ScreenError, ScreenFrame, surface_extent};
pub use shader::{Shader, ShaderError, ShaderSources};
pub use shaders::{DEFAULT_SHADER, LIT_SHADER};
pub use texture::{DEPTH_FORMAT, GpuTexture};
