/// Icosphere generation and the per-level mesh cache
use nalgebra::Point3;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::error::GeometryError;

/// A mesh-local 3D position
pub type Point3D = Point3<f64>;

/// Three indices into a mesh's vertex list, in winding order
pub type Face = [usize; 3];

/// Golden ratio, the only irrational in the icosahedron's corner coordinates
const PHI: f64 = 1.618_033_988_749_895;

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [[f64; 3]; 12] = [
    [-1.0,  PHI,  0.0], [ 1.0,  PHI,  0.0], [-1.0, -PHI,  0.0], [ 1.0, -PHI,  0.0],
    [ 0.0, -1.0,  PHI], [ 0.0,  1.0,  PHI], [ 0.0, -1.0, -PHI], [ 0.0,  1.0, -PHI],
    [ PHI,  0.0, -1.0], [ PHI,  0.0,  1.0], [-PHI,  0.0, -1.0], [-PHI,  0.0,  1.0],
];

#[rustfmt::skip]
const ICOSAHEDRON_FACES: [Face; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// A triangle mesh approximating the unit sphere.
///
/// Midpoints are appended per face without welding, so two faces sharing an
/// edge each own a copy of that edge's midpoint. Faces index into `vertices`
/// and are never reordered: draw order is generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub vertices: Vec<Point3D>,
    pub faces: Vec<Face>,
}

impl SphereMesh {
    /// The regular icosahedron inscribed in the unit sphere
    pub fn icosahedron() -> Self {
        let vertices = ICOSAHEDRON_VERTICES
            .iter()
            .map(|&[x, y, z]| {
                let p = Point3D::new(x, y, z);
                p / p.coords.norm()
            })
            .collect();

        Self {
            vertices,
            faces: ICOSAHEDRON_FACES.to_vec(),
        }
    }

    /// Build the sphere for a subdivision `level`; level 0 is the bare icosahedron
    pub fn generate(level: u32) -> Result<Self, GeometryError> {
        let mut mesh = Self::icosahedron();
        for _ in 0..level {
            mesh = mesh.subdivide()?;
        }
        Ok(mesh)
    }

    /// Split every face into four, pushing the new edge midpoints onto the sphere
    pub fn subdivide(&self) -> Result<Self, GeometryError> {
        let mut vertices = Vec::with_capacity(self.vertices.len() + self.faces.len() * 3);
        vertices.extend_from_slice(&self.vertices);
        let mut faces = Vec::with_capacity(self.faces.len() * 4);

        for (face_index, face) in self.faces.iter().enumerate() {
            let [a, b, c] = self.corners(face_index)?;

            let ab = vertices.len();
            vertices.push(normalize(&midpoint(&a, &b))?);
            let bc = vertices.len();
            vertices.push(normalize(&midpoint(&b, &c))?);
            let ca = vertices.len();
            vertices.push(normalize(&midpoint(&c, &a))?);

            faces.push([face[0], ab, ca]);
            faces.push([face[1], bc, ab]);
            faces.push([face[2], ca, bc]);
            faces.push([ab, bc, ca]);
        }

        Ok(Self { vertices, faces })
    }

    /// The three corner positions of a face, checking its indices
    pub fn corners(&self, face_index: usize) -> Result<[Point3D; 3], GeometryError> {
        let face = self.faces.get(face_index).ok_or_else(|| {
            GeometryError::InvalidGeometry(format!("face {face_index} does not exist"))
        })?;

        let mut corners = [Point3D::origin(); 3];
        for (corner, &index) in corners.iter_mut().zip(face) {
            *corner = *self.vertices.get(index).ok_or_else(|| {
                GeometryError::InvalidGeometry(format!(
                    "face {face_index} references vertex {index} but the mesh has {}",
                    self.vertices.len()
                ))
            })?;
        }
        Ok(corners)
    }

    /// Check that every face index is within the vertex list
    pub fn validate(&self) -> Result<(), GeometryError> {
        (0..self.faces.len()).try_for_each(|i| self.corners(i).map(|_| ()))
    }
}

/// Project a point onto the unit sphere.
///
/// A point at the origin has no direction and is rejected.
pub fn normalize(p: &Point3D) -> Result<Point3D, GeometryError> {
    p.coords
        .try_normalize(f64::EPSILON)
        .map(Point3D::from)
        .ok_or_else(|| {
            GeometryError::InvalidGeometry(format!(
                "cannot normalize zero-length vector ({}, {}, {})",
                p.x, p.y, p.z
            ))
        })
}

pub fn midpoint(a: &Point3D, b: &Point3D) -> Point3D {
    nalgebra::center(a, b)
}

/// Subdivision level for a zoom scale.
///
/// Bands: below 100 → 1, below 200 → 2, below 400 → 3, otherwise 4.
pub fn lod_for_scale(scale: f64) -> u32 {
    if scale < 100.0 {
        1
    } else if scale < 200.0 {
        2
    } else if scale < 400.0 {
        3
    } else {
        4
    }
}

type MeshSlot = Arc<OnceLock<Result<Arc<SphereMesh>, GeometryError>>>;

/// Sphere meshes memoized by subdivision level.
///
/// Each level is computed at most once, even under concurrent callers; the
/// map lock is only held long enough to find the level's slot.
#[derive(Debug, Default)]
pub struct MeshCache {
    levels: Mutex<HashMap<u32, MeshSlot>>,
    computed: AtomicUsize,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mesh for `level`, generating it on first request
    pub fn get(&self, level: u32) -> Result<Arc<SphereMesh>, GeometryError> {
        let slot = {
            let mut levels = self.levels.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(levels.entry(level).or_default())
        };

        slot.get_or_init(|| {
            self.computed.fetch_add(1, Ordering::Relaxed);
            let mesh = SphereMesh::generate(level)?;
            tracing::debug!(
                lod = level,
                vertices = mesh.vertices.len(),
                faces = mesh.faces.len(),
                "generated sphere mesh"
            );
            Ok(Arc::new(mesh))
        })
        .clone()
    }

    /// Number of levels that have been generated so far
    pub fn computed_levels(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_count_per_level() {
        for level in 0..=4 {
            let mesh = SphereMesh::generate(level).unwrap();
            assert_eq!(mesh.faces.len(), 20 * 4usize.pow(level));
        }
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        for level in 0..=3 {
            let mesh = SphereMesh::generate(level).unwrap();
            for v in &mesh.vertices {
                assert!((v.coords.norm() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_face_indices_in_bounds() {
        let mesh = SphereMesh::generate(3).unwrap();
        assert!(mesh.validate().is_ok());
        for face in &mesh.faces {
            assert!(face.iter().all(|&i| i < mesh.vertices.len()));
        }
    }

    #[test]
    fn test_midpoints_are_not_welded() {
        // 12 seed corners plus three fresh midpoints per face
        let mesh = SphereMesh::generate(1).unwrap();
        assert_eq!(mesh.vertices.len(), 12 + 20 * 3);

        let mesh = SphereMesh::generate(2).unwrap();
        assert_eq!(mesh.vertices.len(), 12 + 20 * 3 + 80 * 3);
    }

    #[test]
    fn test_subdivision_face_layout() {
        let base = SphereMesh::icosahedron();
        let once = base.subdivide().unwrap();
        // First seed face [0, 11, 5] gets midpoints 12, 13, 14
        assert_eq!(once.faces[0], [0, 12, 14]);
        assert_eq!(once.faces[1], [11, 13, 12]);
        assert_eq!(once.faces[2], [5, 14, 13]);
        assert_eq!(once.faces[3], [12, 13, 14]);
        // Seed vertices keep their slots
        assert_eq!(&once.vertices[..12], &base.vertices[..]);
    }

    #[test]
    fn test_generate_is_deterministic() {
        assert_eq!(SphereMesh::generate(2).unwrap(), SphereMesh::generate(2).unwrap());
    }

    #[test]
    fn test_normalize_zero_vector() {
        let err = normalize(&Point3D::origin()).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidGeometry(_)));
    }

    #[test]
    fn test_subdivide_rejects_antipodal_edge() {
        // The midpoint of two opposite points is the origin
        let mesh = SphereMesh {
            vertices: vec![
                Point3D::new(1.0, 0.0, 0.0),
                Point3D::new(-1.0, 0.0, 0.0),
                Point3D::new(0.0, 1.0, 0.0),
            ],
            faces: vec![[0, 1, 2]],
        };
        assert!(mesh.subdivide().is_err());
    }

    #[test]
    fn test_subdivide_rejects_bad_index() {
        let mesh = SphereMesh {
            vertices: vec![Point3D::new(1.0, 0.0, 0.0)],
            faces: vec![[0, 0, 7]],
        };
        assert!(mesh.validate().is_err());
        assert!(mesh.subdivide().is_err());
    }

    #[test]
    fn test_lod_thresholds() {
        let cases = [
            (10.0, 1),
            (50.0, 1),
            (99.0, 1),
            (100.0, 2),
            (199.0, 2),
            (200.0, 3),
            (399.0, 3),
            (400.0, 4),
            (1000.0, 4),
        ];
        for (scale, level) in cases {
            assert_eq!(lod_for_scale(scale), level, "scale {scale}");
        }
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let cache = MeshCache::new();
        let first = cache.get(2).unwrap();
        let second = cache.get(2).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, SphereMesh::generate(2).unwrap());
        assert_eq!(cache.computed_levels(), 1);

        cache.get(1).unwrap();
        assert_eq!(cache.computed_levels(), 2);
    }

    #[test]
    fn test_cache_computes_once_under_contention() {
        let cache = MeshCache::new();
        let meshes: Vec<Arc<SphereMesh>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| cache.get(3).unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.computed_levels(), 1);
        for mesh in &meshes[1..] {
            assert!(Arc::ptr_eq(&meshes[0], mesh));
        }
    }
}
