use sceneview_common::{AssetId, Color, Shape, Transform};

/// A renderable scene object: cube, quad or loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    shape: Shape,
    transform: Transform,
    texture: AssetId,
    color: Color,
    textured: bool,
}

impl Object {
    /// New object at the origin, white and textured.
    pub fn new(shape: Shape, texture: AssetId) -> Self {
        Self {
            shape,
            transform: Transform::default(),
            texture,
            color: Color::WHITE,
            textured: true,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn texture(&self) -> AssetId {
        self.texture
    }

    pub fn set_texture(&mut self, texture: AssetId) {
        self.texture = texture;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn is_textured(&self) -> bool {
        self.textured
    }

    pub fn set_textured(&mut self, textured: bool) {
        self.textured = textured;
    }
}
