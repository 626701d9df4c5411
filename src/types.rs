use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vector3 = Vector3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    pub fn add(&self, other: Vector3) -> Self {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: Vector3) -> Self {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn dot(&self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vector3) -> Self {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    pub fn distance_to(&self, other: Vector3) -> f64 {
        self.sub(other).length()
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == 0.0 { *self } else { self.scale(1.0 / len) }
    }

    pub fn lerp(&self, target: Vector3, t: f64) -> Self {
        self.add(target.sub(*self).scale(t))
    }

    /// Rotation about the X axis, then the Y axis.
    pub fn rotate_xy(&self, angle_x: f64, angle_y: f64) -> Self {
        let (sx, cx) = angle_x.sin_cos();
        let y = self.y * cx - self.z * sx;
        let z = self.y * sx + self.z * cx;
        let (sy, cy) = angle_y.sin_cos();
        Vector3::new(self.x * cy + z * sy, y, -self.x * sy + z * cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_zero_vector() {
        assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
        let n = Vector3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-2.0, 6.0, 3.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = Vector3::new(10.0, -4.0, 7.5);
        let r = v.rotate_xy(0.3, 1.2);
        assert!((v.length() - r.length()).abs() < 1e-9);
    }
}
