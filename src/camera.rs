use crate::constants::*;
use crate::types::Vector3;

/// Perspective chase camera projecting world points onto a character grid.
///
/// View space is right-handed and Y-up; the camera looks from `position`
/// toward `target`. Screen rows grow downward.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vector3,
    pub target: Vector3,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
}

/// A projected point: grid cell plus view depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
    pub depth: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Vector3::new(0.0, 0.0, 10.0),
            target: Vector3::ZERO,
            fov_degrees: CAMERA_FOV_DEGREES,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl Camera {
    pub fn offset() -> Vector3 {
        Vector3::new(CAMERA_OFFSET.0, CAMERA_OFFSET.1, CAMERA_OFFSET.2)
    }

    /// Eases toward the spot behind and above `subject`, then looks at it.
    pub fn follow(&mut self, subject: Vector3) {
        let desired = subject.add(Self::offset());
        self.position = self.position.lerp(desired, CAMERA_FOLLOW_LERP);
        self.target = subject;
    }

    fn basis(&self) -> (Vector3, Vector3, Vector3) {
        let forward = self.target.sub(self.position).normalize();
        let mut right = forward.cross(Vector3::UP).normalize();
        if right == Vector3::ZERO {
            right = Vector3::new(1.0, 0.0, 0.0);
        }
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Projects a world point; `None` when it lies outside the near/far range.
    pub fn project(&self, point: Vector3, width: u16, height: u16) -> Option<ScreenPoint> {
        self.project_direction(point.sub(self.position), width, height)
    }

    /// Projects a point given relative to the camera position. Used for the
    /// star field, which sits at infinity for practical purposes.
    pub fn project_direction(&self, relative: Vector3, width: u16, height: u16) -> Option<ScreenPoint> {
        let (forward, right, up) = self.basis();
        let depth = relative.dot(forward);
        if depth <= self.near || depth > self.far {
            return None;
        }

        let half_h = height as f64 / 2.0;
        let half_w = width as f64 / 2.0;
        let focal = half_h / (self.fov_degrees.to_radians() / 2.0).tan();
        let sx = half_w + relative.dot(right) / depth * focal * TERMINAL_ASPECT_RATIO_COMPENSATION;
        let sy = half_h - relative.dot(up) / depth * focal;
        Some(ScreenPoint { x: sx.round() as i32, y: sy.round() as i32, depth })
    }
}
