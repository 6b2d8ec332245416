// Triangle mesh hand-off format.
//
//   level::generate() → TriMesh → WalkMesh::new() → walk / world_point
//
// TriMesh is just the two arrays a mesh supplier produces. It does no
// adjacency work; that happens once inside WalkMesh.

use glam::{UVec3, Vec3};

use super::error::{Result, WalkMeshError};

// ============================================================================
// TRI MESH
// ============================================================================

/// Indexed triangle soup with consistent winding.
/// Triangles are CCW when viewed from the walkable side.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<UVec3>,
}

impl TriMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, pos: Vec3) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(pos);
        idx
    }

    /// Add a triangle by vertex indices (CCW order).
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push(UVec3::new(a, b, c));
    }

    pub fn vertex_count(&self) -> usize { self.positions.len() }
    pub fn triangle_count(&self) -> usize { self.triangles.len() }

    /// Check that every triangle index refers to an existing vertex.
    pub fn validate(&self) -> Result<()> {
        validate_indices(&self.positions, &self.triangles)
    }
}

/// Shared by `TriMesh::validate` and `WalkMesh::new`.
pub(crate) fn validate_indices(positions: &[Vec3], triangles: &[UVec3]) -> Result<()> {
    let vertex_count = positions.len();
    for (ti, tri) in triangles.iter().enumerate() {
        for index in tri.to_array() {
            if index as usize >= vertex_count {
                return Err(WalkMeshError::IndexOutOfRange {
                    triangle: ti,
                    index,
                    vertex_count,
                });
            }
        }
    }
    Ok(())
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use super::TriMesh;
    use glam::Vec3;

    /// Unit square in z=0 split along the (0,0)-(1,1) diagonal:
    /// triangles (0,1,2) and (0,2,3). Every outer edge is open.
    pub fn unit_quad() -> TriMesh {
        let mut mesh = TriMesh::new();
        mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        mesh
    }

    /// Unit quad floor (y in [0,1]) followed by a ramp rising one unit
    /// in z over y in [1,2]. The fold sits on edge (2,3).
    pub fn floor_and_ramp() -> TriMesh {
        let mut mesh = unit_quad();
        mesh.add_vertex(Vec3::new(1.0, 2.0, 1.0)); // 4
        mesh.add_vertex(Vec3::new(0.0, 2.0, 1.0)); // 5
        mesh.add_triangle(3, 2, 4);
        mesh.add_triangle(3, 4, 5);
        mesh
    }

    /// Closed octahedron with outward-facing CCW triangles.
    pub fn octahedron() -> TriMesh {
        let mut mesh = TriMesh::new();
        let px = mesh.add_vertex(Vec3::X);
        let nx = mesh.add_vertex(Vec3::NEG_X);
        let py = mesh.add_vertex(Vec3::Y);
        let ny = mesh.add_vertex(Vec3::NEG_Y);
        let pz = mesh.add_vertex(Vec3::Z);
        let nz = mesh.add_vertex(Vec3::NEG_Z);
        mesh.add_triangle(px, py, pz);
        mesh.add_triangle(py, nx, pz);
        mesh.add_triangle(nx, ny, pz);
        mesh.add_triangle(ny, px, pz);
        mesh.add_triangle(py, px, nz);
        mesh.add_triangle(nx, py, nz);
        mesh.add_triangle(ny, nx, nz);
        mesh.add_triangle(px, ny, nz);
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_vertex_returns_sequential_indices() {
        let mut mesh = TriMesh::new();
        assert_eq!(mesh.add_vertex(Vec3::ZERO), 0);
        assert_eq!(mesh.add_vertex(Vec3::X), 1);
        assert_eq!(mesh.vertex_count(), 2);
    }

    #[test]
    fn validate_accepts_fixtures() {
        assert!(fixtures::unit_quad().validate().is_ok());
        assert!(fixtures::octahedron().validate().is_ok());
    }

    #[test]
    fn validate_reports_first_bad_index() {
        let mut mesh = fixtures::unit_quad();
        mesh.add_triangle(0, 3, 7);
        assert_eq!(
            mesh.validate(),
            Err(WalkMeshError::IndexOutOfRange { triangle: 2, index: 7, vertex_count: 4 })
        );
    }
}
