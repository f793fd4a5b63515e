use glam::{Mat4, Vec3};
use sceneview_common::ScreenRect;

/// Free-fly perspective camera bound to a viewport rectangle.
///
/// Orientation is fixed after construction; input only dollies it along the
/// view direction in steps of `speed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    viewport: ScreenRect,
}

impl Default for Camera {
    fn default() -> Self {
        let viewport = ScreenRect::new(0, 0, 1920, 1080);
        Self {
            position: Vec3::new(0.0, 4.0, 12.0),
            yaw: -90.0_f32.to_radians(),
            pitch: -15.0_f32.to_radians(),
            fov: 45.0_f32.to_radians(),
            aspect: viewport.aspect(),
            near: 0.1,
            far: 1000.0,
            speed: 1.0,
            viewport,
        }
    }
}

impl Camera {
    /// Reset the projection to the standard perspective setup.
    pub fn set_3d_view(&mut self) {
        self.fov = 45.0_f32.to_radians();
        self.near = 0.1;
        self.far = 1000.0;
        self.aspect = self.viewport.aspect();
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Set the render rectangle; the aspect ratio follows it.
    pub fn set_viewport(&mut self, viewport: ScreenRect) {
        self.viewport = viewport;
        self.aspect = viewport.aspect();
    }

    pub fn viewport(&self) -> ScreenRect {
        self.viewport
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn move_forward(&mut self) {
        self.position += self.forward() * self.speed;
    }

    pub fn move_backward(&mut self) {
        self.position -= self.forward() * self.speed;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Matrices and eye position as uploaded to the shaders each frame.
    pub fn uniform(&self) -> CameraMatrices {
        CameraMatrices {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            eye: self.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert!(cam.position.y > 0.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn dolly_steps_by_speed() {
        let mut cam = Camera::default();
        cam.set_speed(0.5);
        let start = cam.position;
        cam.move_forward();
        assert!(((cam.position - start).length() - 0.5).abs() < 1e-5);
        cam.move_backward();
        assert!((cam.position - start).length() < 1e-5);
    }

    #[test]
    fn forward_looks_down_negative_z() {
        let cam = Camera::default();
        let f = cam.forward();
        assert!(f.z < 0.0);
        assert!(f.y < 0.0);
        assert!(f.x.abs() < 1e-5);
    }

    #[test]
    fn uniform_carries_eye_and_matrices() {
        let cam = Camera::default();
        let u = cam.uniform();
        assert_eq!(u.eye, cam.position);
        assert_eq!(u.projection * u.view, cam.view_projection());
    }

    #[test]
    fn viewport_drives_aspect() {
        let mut cam = Camera::default();
        cam.set_viewport(ScreenRect::new(0, 0, 1520, 830));
        assert!((cam.aspect - 1520.0 / 830.0).abs() < 1e-6);
        cam.fov = 1.0;
        cam.set_3d_view();
        assert!((cam.fov - 45.0_f32.to_radians()).abs() < 1e-6);
        assert!((cam.aspect - 1520.0 / 830.0).abs() < 1e-6);
    }
}
