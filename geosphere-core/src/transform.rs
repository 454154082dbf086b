/// Sphere spin state and the two-axis rotation it drives
use nalgebra::{Rotation3, Vector3};

use crate::geometry::Point3D;

/// Spin angle (radians) and the direction idle rotation advances it in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    pub angle: f64,
    /// +1.0 or -1.0
    pub direction: f64,
}

impl SpinState {
    pub fn new(angle: f64, direction: f64) -> Self {
        Self { angle, direction }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Advance the angle by `speed` in the current direction
    pub fn advance(&mut self, speed: f64) {
        self.angle += speed * self.direction;
    }
}

impl Default for SpinState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Rotation builder for the sphere
pub struct Transform;

impl Transform {
    /// Rotation for a spin angle.
    ///
    /// Turns about the vertical axis by `angle` (x toward -z), then tilts
    /// about the horizontal axis by `angle * tilt_ratio`.
    pub fn spin_rotation(angle: f64, tilt_ratio: f64) -> Rotation3<f64> {
        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), -angle);
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), angle * tilt_ratio);

        // Apply rotations in order: yaw, then tilt
        tilt * yaw
    }

    pub fn rotate_all(points: &[Point3D], rotation: &Rotation3<f64>) -> Vec<Point3D> {
        points.iter().map(|p| rotation * p).collect()
    }
}
