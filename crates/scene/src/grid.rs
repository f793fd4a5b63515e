use glam::Vec2;
use sceneview_common::{Color, Transform};

/// Ground-plane line grid. Objects are parented to it, so rotating the grid
/// orbits the whole scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    transform: Transform,
    /// Lines on each side of the origin.
    pub half_extent: u32,
    pub spacing: f32,
    pub color: Color,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            half_extent: 10,
            spacing: 1.0,
            color: Color::GRAY,
        }
    }
}

impl Grid {
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Add a mouse delta (pixels, read as degrees) to the X/Y rotation.
    /// No clamping or wrapping.
    pub fn rotate_by(&mut self, delta: Vec2) {
        let r = self.transform.rotation;
        self.transform.set_rotation(r.x + delta.x, r.y + delta.y, r.z);
    }

    /// Endpoints of the grid lines in local space, two per line.
    pub fn line_endpoints(&self) -> Vec<[f32; 3]> {
        let n = self.half_extent as i32;
        let extent = n as f32 * self.spacing;
        let mut points = Vec::with_capacity(((2 * n + 1) * 4) as usize);
        for i in -n..=n {
            let offset = i as f32 * self.spacing;
            points.push([-extent, 0.0, offset]);
            points.push([extent, 0.0, offset]);
            points.push([offset, 0.0, -extent]);
            points.push([offset, 0.0, extent]);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn rotation_accumulates_without_wrapping() {
        let mut grid = Grid::default();
        for _ in 0..10 {
            grid.rotate_by(Vec2::new(50.0, -45.0));
        }
        assert_eq!(grid.transform().rotation, Vec3::new(500.0, -450.0, 0.0));
    }

    #[test]
    fn line_count_matches_extent() {
        let grid = Grid::default();
        let points = grid.line_endpoints();
        // 21 lines along each axis, two endpoints per line.
        assert_eq!(points.len(), 21 * 2 * 2);
        assert!(points.iter().all(|p| p[1] == 0.0));
        assert!(points.iter().all(|p| p[0].abs() <= 10.0 && p[2].abs() <= 10.0));
    }
}
