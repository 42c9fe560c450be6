use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from scene construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("vertex buffer has {vertices} entries but normal buffer has {normals}")]
    MismatchedBuffers { vertices: usize, normals: usize },
    #[error("buffer length {0} is not a multiple of 3")]
    PartialTriangle(usize),
}

/// A flat triangle soup: parallel vertex and normal buffers.
///
/// Triangle `k` is formed by entries `3k`, `3k+1`, `3k+2`. There is no index
/// buffer and no vertex sharing; every triangle owns its three entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriMesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl TriMesh {
    /// Build a mesh from parallel buffers, validating the triangle alignment.
    pub fn new(vertices: Vec<Vec3>, normals: Vec<Vec3>) -> Result<Self, SceneError> {
        if vertices.len() != normals.len() {
            return Err(SceneError::MismatchedBuffers {
                vertices: vertices.len(),
                normals: normals.len(),
            });
        }
        if vertices.len() % 3 != 0 {
            return Err(SceneError::PartialTriangle(vertices.len()));
        }
        Ok(Self { vertices, normals })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Iterate over the triangles as `[(vertex, normal); 3]` triples.
    ///
    /// The iterator is lazy, finite, and restartable; it borrows the buffers
    /// and carries no state beyond its position.
    pub fn triangles(&self) -> impl Iterator<Item = [(Vec3, Vec3); 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .map(|(v, n)| [(v[0], n[0]), (v[1], n[1]), (v[2], n[2])])
    }
}

/// The cube (side 2, centered at the origin) as 12 triangles with
/// per-face normals, wound counter-clockwise seen from outside.
pub fn cube_mesh() -> TriMesh {
    let p = [
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
    ];
    let n = [
        Vec3::Z,
        Vec3::NEG_Z,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::X,
        Vec3::NEG_X,
    ];

    // (corner indices, face normal index), two triangles per cube face.
    #[rustfmt::skip]
    let faces: [([usize; 3], usize); 12] = [
        ([0, 1, 2], 0), ([0, 2, 3], 0), // +Z
        ([5, 4, 6], 1), ([6, 4, 7], 1), // -Z
        ([1, 5, 2], 4), ([2, 5, 6], 4), // +X
        ([4, 3, 7], 5), ([3, 4, 0], 5), // -X
        ([3, 2, 7], 2), ([6, 7, 2], 2), // +Y
        ([0, 4, 1], 3), ([1, 4, 5], 3), // -Y
    ];

    let mut vertices = Vec::with_capacity(36);
    let mut normals = Vec::with_capacity(36);
    for (corners, normal) in faces {
        for c in corners {
            vertices.push(p[c]);
            normals.push(n[normal]);
        }
    }
    TriMesh { vertices, normals }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffers() {
        let err = TriMesh::new(vec![Vec3::ZERO; 3], vec![Vec3::Z; 4]).unwrap_err();
        assert_eq!(
            err,
            SceneError::MismatchedBuffers {
                vertices: 3,
                normals: 4
            }
        );
    }

    #[test]
    fn rejects_partial_triangle() {
        let err = TriMesh::new(vec![Vec3::ZERO; 4], vec![Vec3::Z; 4]).unwrap_err();
        assert_eq!(err, SceneError::PartialTriangle(4));
    }

    #[test]
    fn empty_mesh_is_valid() {
        let mesh = TriMesh::new(vec![], vec![]).unwrap();
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn cube_has_twelve_triangles() {
        let cube = cube_mesh();
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.vertices().len(), 36);
        assert_eq!(cube.normals().len(), 36);
    }

    #[test]
    fn triangles_iterator_is_restartable() {
        let cube = cube_mesh();
        let first: Vec<_> = cube.triangles().collect();
        let second: Vec<_> = cube.triangles().collect();
        assert_eq!(first.len(), 12);
        assert_eq!(first, second);
    }

    #[test]
    fn cube_normals_are_unit_axis_aligned() {
        for tri in cube_mesh().triangles() {
            for (_, normal) in tri {
                assert!((normal.length() - 1.0).abs() < 1e-6);
                // Each per-face normal points along exactly one axis
                let nonzero = [normal.x, normal.y, normal.z]
                    .iter()
                    .filter(|c| c.abs() > 0.0)
                    .count();
                assert_eq!(nonzero, 1);
            }
        }
    }

    #[test]
    fn cube_triangle_normals_match_winding() {
        // Cross product of the edge vectors must agree with the stored normal,
        // otherwise back-face culling would drop visible faces.
        for tri in cube_mesh().triangles() {
            let [(a, n), (b, _), (c, _)] = tri;
            let face = (b - a).cross(c - a).normalize();
            assert!(face.dot(n) > 0.99, "winding disagrees with normal {n:?}");
        }
    }
}
