use raylib::prelude::*;
use crate::constants::CAMERA_FOVY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Tween target for the viewing camera. The renderer copies this into its
/// projection once per frame; nothing animates the projection directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vector3,
    pub target: Vector3,
}

impl CameraState {
    pub fn new(position: Vector3) -> Self {
        Self { position, target: Vector3::new(0.0, 0.0, 0.0) }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.position.x,
            Axis::Y => self.position.y,
            Axis::Z => self.position.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.position.x = value,
            Axis::Y => self.position.y = value,
            Axis::Z => self.position.z = value,
        }
    }
}

/// Pixel size of the output surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width: width.max(1) as f32, height: height.max(1) as f32 }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// A point projected to screen space. `depth` is the distance along the
/// view direction and is used for back-to-front ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub position: Vector2,
    pub depth: f32,
}

/// Perspective projection built from a camera state for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    eye: Vector3,
    right: Vector3,
    up: Vector3,
    forward: Vector3,
    focal: f32,
    viewport: Viewport,
}

const NEAR_PLANE: f32 = 0.05;

impl Projection {
    pub fn new(camera: &CameraState, viewport: Viewport) -> Self {
        let view = camera.target - camera.position;
        // Degenerate camera (eye on target): look down -Z.
        let forward = if view.length() <= f32::EPSILON {
            Vector3::new(0.0, 0.0, -1.0)
        } else {
            view.normalized()
        };
        let right = forward.cross(Vector3::new(0.0, 1.0, 0.0)).normalized();
        let up = right.cross(forward);
        let focal = (viewport.height * 0.5) / (CAMERA_FOVY.to_radians() * 0.5).tan();
        Self { eye: camera.position, right, up, forward, focal, viewport }
    }

    /// Projects a world point, or `None` when it lies behind the near plane.
    pub fn project(&self, point: Vector3) -> Option<ScreenPoint> {
        let d = point - self.eye;
        let depth = d.dot(self.forward);
        if depth <= NEAR_PLANE {
            return None;
        }
        let x = d.dot(self.right) * self.focal / depth;
        let y = d.dot(self.up) * self.focal / depth;
        Some(ScreenPoint {
            position: Vector2::new(self.viewport.width * 0.5 + x, self.viewport.height * 0.5 - y),
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_center() {
        let camera = CameraState::new(Vector3::new(0.0, 0.0, 8.0));
        let projection = Projection::new(&camera, Viewport::new(1280, 720));
        let p = projection.project(Vector3::new(0.0, 0.0, 0.0)).unwrap();
        assert!((p.position.x - 640.0).abs() < 1e-3);
        assert!((p.position.y - 360.0).abs() < 1e-3);
        assert!((p.depth - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_up_and_right_map_to_screen() {
        let camera = CameraState::new(Vector3::new(0.0, 0.0, 8.0));
        let projection = Projection::new(&camera, Viewport::new(1280, 720));
        let right = projection.project(Vector3::new(1.0, 0.0, 0.0)).unwrap();
        let up = projection.project(Vector3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(right.position.x > 640.0);
        assert!(up.position.y < 360.0);
    }

    #[test]
    fn test_points_behind_camera_are_culled() {
        let camera = CameraState::new(Vector3::new(0.0, 0.0, 8.0));
        let projection = Projection::new(&camera, Viewport::new(800, 600));
        assert!(projection.project(Vector3::new(0.0, 0.0, 9.0)).is_none());
    }

    #[test]
    fn test_viewport_never_degenerate() {
        let viewport = Viewport::new(0, -4);
        assert_eq!(viewport.aspect(), 1.0);
    }

    #[test]
    fn test_axis_accessors() {
        let mut camera = CameraState::new(Vector3::new(0.0, 0.0, 8.0));
        camera.set(Axis::Y, 0.3);
        assert_eq!(camera.get(Axis::Y), 0.3);
        assert_eq!(camera.get(Axis::Z), 8.0);
    }
}
