use crate::camera::Camera;
use crate::grid::Grid;
use crate::light::Light;
use crate::object::Object;
use glam::Mat4;
use sceneview_common::{AssetId, ViewerConfig};
use sceneview_input::{CameraDolly, FrameInput, LightMove};

/// Loop-level flags toggled by input and the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerState {
    /// Objects are shaded with the point light when set.
    pub is_lit: bool,
    /// Cleared once a window close is observed.
    pub running: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            is_lit: false,
            running: true,
        }
    }
}

impl ViewerState {
    /// Shading used for every object this frame.
    pub fn object_shading(&self) -> ShadingPath {
        if self.is_lit {
            ShadingPath::Lit
        } else {
            ShadingPath::Unlit
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingPath {
    /// Default shader: color and optional texture.
    Unlit,
    /// Lit shader: default shading plus the point light.
    Lit,
}

/// What one call to [`Scene::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    pub pointer_over_viewport: bool,
    pub dolly: Option<CameraDolly>,
    pub light_move: Option<LightMove>,
    pub grid_dragged: bool,
}

/// Everything the viewer draws: one camera, one light, one grid, and an
/// ordered object list rendered front to back in list order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    pub light: Light,
    pub grid: Grid,
    objects: Vec<Object>,
}

impl Scene {
    pub fn new(camera: Camera, light: Light, grid: Grid) -> Self {
        Self {
            camera,
            light,
            grid,
            objects: Vec::new(),
        }
    }

    /// Startup scene for `config`: camera bound to the layout viewport,
    /// light speed and color, and the configured objects in order.
    /// `texture_id` maps a configured texture path to a loaded asset.
    pub fn from_config(config: &ViewerConfig, mut texture_id: impl FnMut(&str) -> AssetId) -> Self {
        let mut camera = Camera::default();
        camera.set_viewport(config.layout().viewport);
        camera.set_3d_view();
        camera.set_speed(config.camera.speed);

        let mut light = Light::default();
        light.set_speed(config.light.speed);
        light.set_color(config.light.color);

        let mut scene = Self::new(camera, light, Grid::default());
        for spec in &config.objects {
            scene.push_object(Object::new(spec.shape.clone(), texture_id(&spec.texture)));
        }
        tracing::debug!("scene built with {} objects", scene.objects.len());
        scene
    }

    pub fn push_object(&mut self, object: Object) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    /// World matrix of an object: grid transform, then the object's own.
    pub fn object_world_matrix(&self, index: usize) -> Option<Mat4> {
        self.objects
            .get(index)
            .map(|o| self.grid.transform().matrix() * o.transform().matrix())
    }

    /// Apply one frame of input to the scene.
    ///
    /// Order: wheel dolly, light move, grid drag, exit flag. The pointer must
    /// be over the camera viewport for a drag to rotate the grid.
    pub fn update(&mut self, input: &FrameInput, state: &mut ViewerState) -> FrameReport {
        let pointer = input.mouse_position();
        let mut report = FrameReport {
            pointer_over_viewport: self.camera.viewport().contains_pointer(pointer.x, pointer.y),
            ..FrameReport::default()
        };

        report.dolly = input.camera_dolly();
        match report.dolly {
            Some(CameraDolly::Forward) => self.camera.move_forward(),
            Some(CameraDolly::Backward) => self.camera.move_backward(),
            None => {}
        }

        report.light_move = input.light_move();
        if let Some(movement) = report.light_move {
            self.light.apply(movement);
        }

        if report.pointer_over_viewport && input.is_left_button_clicked() {
            self.grid.rotate_by(input.mouse_motion());
            report.grid_dragged = true;
        }

        if input.close_requested() && state.running {
            tracing::info!("close requested, exiting after this frame");
        }
        state.running = !input.close_requested();
        report
    }
}
