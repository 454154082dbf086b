/// Per-frame radial ripple applied to sphere vertices
use nalgebra::Vector3;

use crate::geometry::Point3D;

/// Radial sine displacement whose phase advances with vertex index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub amplitude: f64,
    pub frequency: f64,
    /// Phase added per vertex index
    pub phase_step: f64,
}

impl Ripple {
    pub fn new(amplitude: f64, frequency: f64, phase_step: f64) -> Self {
        Self {
            amplitude,
            frequency,
            phase_step,
        }
    }

    /// Radial offset of vertex `index` at time `t`
    pub fn offset(&self, index: usize, t: f64) -> f64 {
        let phase = index as f64 * self.phase_step;
        self.amplitude * (self.frequency * t + phase).sin()
    }

    /// Displace every vertex along its direction from the origin.
    ///
    /// Returns a fresh vertex list; `vertices` is left untouched. A vertex at
    /// the origin has no direction and stays where it is.
    pub fn apply(&self, vertices: &[Point3D], t: f64) -> Vec<Point3D> {
        vertices
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let direction = v
                    .coords
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                *v + direction * self.offset(i, t)
            })
            .collect()
    }
}

impl Default for Ripple {
    fn default() -> Self {
        Self::new(0.02, 1.0, 0.1)
    }
}

/// Animate with the default ripple
pub fn animate(vertices: &[Point3D], t: f64) -> Vec<Point3D> {
    Ripple::default().apply(vertices, t)
}
