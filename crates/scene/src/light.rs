use glam::Vec3;
use sceneview_common::{Color, Transform};
use sceneview_input::LightMove;

/// Movable point light. Its transform also places the gizmo cube that marks
/// it in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    transform: Transform,
    speed: f32,
    color: Color,
}

impl Default for Light {
    fn default() -> Self {
        let mut transform = Transform::from_position(Vec3::new(0.0, 3.0, 2.0));
        transform.set_scale(0.2, 0.2, 0.2);
        Self {
            transform,
            speed: 1.0,
            color: Color::WHITE,
        }
    }
}

impl Light {
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn move_forward(&mut self) {
        self.transform.translate(Vec3::NEG_Z * self.speed);
    }

    pub fn move_backward(&mut self) {
        self.transform.translate(Vec3::Z * self.speed);
    }

    pub fn move_left(&mut self) {
        self.transform.translate(Vec3::NEG_X * self.speed);
    }

    pub fn move_right(&mut self) {
        self.transform.translate(Vec3::X * self.speed);
    }

    pub fn move_up(&mut self) {
        self.transform.translate(Vec3::Y * self.speed);
    }

    pub fn move_down(&mut self) {
        self.transform.translate(Vec3::NEG_Y * self.speed);
    }

    pub fn apply(&mut self, movement: LightMove) {
        match movement {
            LightMove::Forward => self.move_forward(),
            LightMove::Backward => self.move_backward(),
            LightMove::Left => self.move_left(),
            LightMove::Right => self.move_right(),
            LightMove::Up => self.move_up(),
            LightMove::Down => self.move_down(),
        }
    }
}
