/// Orthographic mapping from rotated sphere space to canvas pixels
use nalgebra::{Point2, Rotation3};

use crate::error::GeometryError;
use crate::geometry::{Point3D, SphereMesh};

/// A projected point in canvas pixel space
pub type Vec2 = Point2<f64>;

/// Orthographic camera: scale x/y, drop z, translate to the sphere center.
///
/// There is no perspective divide and no clipping; points outside the canvas
/// are left for the rasterizer to clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub center: Vec2,
    pub scale: f64,
}

impl OrthoCamera {
    pub fn new(center: Vec2, scale: f64) -> Self {
        Self { center, scale }
    }

    /// Project a point already in view orientation
    pub fn project(&self, point: &Point3D) -> Vec2 {
        Vec2::new(
            point.x * self.scale + self.center.x,
            point.y * self.scale + self.center.y,
        )
    }

    /// Rotate and project every face corner.
    ///
    /// `vertices` are the animated positions indexed by `mesh.faces`; the result
    /// holds one triangle per face in face order. A face pointing past the end
    /// of `vertices` is an error.
    pub fn project_faces(
        &self,
        mesh: &SphereMesh,
        vertices: &[Point3D],
        rotation: &Rotation3<f64>,
    ) -> Result<Vec<[Vec2; 3]>, GeometryError> {
        mesh.faces
            .iter()
            .enumerate()
            .map(|(face_index, face)| {
                let mut triangle = [Vec2::origin(); 3];
                for (point, &index) in triangle.iter_mut().zip(face) {
                    let vertex = vertices.get(index).ok_or_else(|| {
                        GeometryError::InvalidGeometry(format!(
                            "face {face_index} references vertex {index} but only {} were given",
                            vertices.len()
                        ))
                    })?;
                    *point = self.project(&(rotation * *vertex));
                }
                Ok(triangle)
            })
            .collect()
    }
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::new(Vec2::new(300.0, 300.0), 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    #[test]
    fn test_project_scales_and_translates() {
        let camera = OrthoCamera::new(Vec2::new(300.0, 300.0), 50.0);
        let p = camera.project(&Point3D::new(1.0, -0.5, 42.0));
        assert_eq!(p, Vec2::new(350.0, 275.0));
    }

    #[test]
    fn test_depth_is_ignored() {
        let camera = OrthoCamera::default();
        let near = camera.project(&Point3D::new(0.2, 0.3, -1.0));
        let far = camera.project(&Point3D::new(0.2, 0.3, 1.0));
        assert_eq!(near, far);
    }

    #[test]
    fn test_project_faces_one_triangle_per_face() {
        let mesh = SphereMesh::generate(1).unwrap();
        let camera = OrthoCamera::new(Vec2::new(300.0, 300.0), 100.0);
        let rotation = Transform::spin_rotation(0.4, 0.8);
        let triangles = camera.project_faces(&mesh, &mesh.vertices, &rotation).unwrap();

        assert_eq!(triangles.len(), mesh.faces.len());
        for triangle in &triangles {
            for p in triangle {
                // Unit sphere stays within scale of the center
                assert!((p - camera.center).norm() <= 100.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_project_faces_rejects_short_vertex_list() {
        let mesh = SphereMesh::generate(1).unwrap();
        let camera = OrthoCamera::default();
        let rotation = Rotation3::identity();
        let err = camera
            .project_faces(&mesh, &mesh.vertices[..12], &rotation)
            .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidGeometry(_)));
    }
}
