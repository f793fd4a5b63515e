use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Content-addressed identifier for a loaded asset (texture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// Spatial transform: position, Euler rotation in degrees, scale.
///
/// Rotation is applied X, then Y, then Z. Scale components are expected to
/// stay positive but nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vec3::new(x, y, z);
    }

    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.scale = Vec3::new(x, y, z);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Model matrix `T * Rx * Ry * Rz * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_scale(self.scale)
    }
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Mesh kind of a renderable object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Cube,
    Quad,
    /// OBJ model loaded from a path relative to the asset root.
    Model { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn setters_replace_components() {
        let mut t = Transform::default();
        t.set_position(1.0, 2.0, 3.0);
        t.set_rotation(0.0, 90.0, 0.0);
        t.set_scale(2.0, 2.0, 2.0);
        assert_eq!(t.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation(), Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(t.scale(), Vec3::splat(2.0));
    }

    #[test]
    fn matrix_uses_degrees() {
        let mut t = Transform::default();
        t.set_rotation(0.0, 90.0, 0.0);
        let x = t.matrix().transform_vector3(Vec3::X);
        assert!((x - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn matrix_scales_before_translating() {
        let mut t = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));
        t.set_scale(2.0, 2.0, 2.0);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(7.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn color_round_trips_through_array() {
        let c = Color::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(Color::from_array(c.to_array()), c);
        assert_eq!(Color::default(), Color::WHITE);
    }

    #[test]
    fn shape_yaml_tagging() {
        let shape: Shape = serde_yaml::from_str("kind: model\npath: Models/Armchair.obj").unwrap();
        assert_eq!(
            shape,
            Shape::Model {
                path: "Models/Armchair.obj".into()
            }
        );
        let cube: Shape = serde_yaml::from_str("kind: cube").unwrap();
        assert_eq!(cube, Shape::Cube);
    }
}
