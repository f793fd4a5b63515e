use crate::plan::{DrawTarget, plan_frame};
use sceneview_scene::{Scene, ViewerState};
use std::fmt::Write;

/// Renderer-agnostic interface.
///
/// A renderer reads the scene and loop state and produces output. It never
/// mutates the scene; input and the UI own all mutation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &Scene, state: &ViewerState) -> Self::Output;
}

/// Text renderer for the headless CLI and tests.
///
/// Walks the same frame plan as the GPU renderer and prints one line per
/// draw call.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, state: &ViewerState) -> String {
        let mut out = String::new();
        let cam = &scene.camera;
        let vp = cam.viewport();
        let _ = writeln!(
            out,
            "=== Frame (lit={}, running={}) ===",
            state.is_lit, state.running
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) viewport={}x{}+{}+{}",
            cam.position.x, cam.position.y, cam.position.z, vp.width, vp.height, vp.x, vp.y
        );

        for call in plan_frame(scene, state) {
            match call.target {
                DrawTarget::Grid => {
                    let r = scene.grid.transform().rotation;
                    let _ = writeln!(
                        out,
                        "  grid  {:?} rot=({:.2}, {:.2}, {:.2})",
                        call.shading, r.x, r.y, r.z
                    );
                }
                DrawTarget::Light => {
                    let p = scene.light.position();
                    let _ = writeln!(
                        out,
                        "  light {:?} pos=({:.2}, {:.2}, {:.2})",
                        call.shading, p.x, p.y, p.z
                    );
                }
                DrawTarget::Object(i) => {
                    let object = &scene.objects()[i];
                    let p = object.transform().position;
                    let _ = writeln!(
                        out,
                        "  [{i}] {:?} {:?} pos=({:.2}, {:.2}, {:.2}) textured={}",
                        object.shape(),
                        call.shading,
                        p.x,
                        p.y,
                        p.z,
                        object.is_textured()
                    );
                }
            }
        }

        out
    }
}
