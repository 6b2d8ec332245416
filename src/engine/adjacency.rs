// Directed-edge adjacency for walk meshes.
//
// Every triangle (a,b,c) owns three directed edges: (a,b)→c, (b,c)→a, (c,a)→b.
// Looking up the REVERSED edge (v,u) finds the triangle on the other side of
// (u,v); a missing entry means (u,v) is an open boundary.

use std::collections::HashMap;

use glam::UVec3;
use log::warn;

use super::error::{Result, WalkMeshError};

/// What to do when two triangles claim the same directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateEdgePolicy {
    /// Last triangle wins. Logged as a warning.
    #[default]
    Overwrite,
    /// Fail construction with `WalkMeshError::DuplicateEdge`.
    Reject,
}

// ============================================================================
// EDGE MAP
// ============================================================================

/// Directed edge → third vertex of the owning triangle. Read-only after build.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    next_vertex: HashMap<(u32, u32), u32>,
}

impl EdgeMap {
    /// Build from a triangle list. Only the exact (u,v) order inserted here
    /// will match in `opposite`.
    pub fn build(triangles: &[UVec3], policy: DuplicateEdgePolicy) -> Result<Self> {
        let mut next_vertex = HashMap::with_capacity(triangles.len() * 3);
        for tri in triangles {
            let (a, b, c) = (tri.x, tri.y, tri.z);
            for (key, third) in [((a, b), c), ((b, c), a), ((c, a), b)] {
                if let Some(previous) = next_vertex.insert(key, third) {
                    match policy {
                        DuplicateEdgePolicy::Reject => {
                            return Err(WalkMeshError::DuplicateEdge { from: key.0, to: key.1 });
                        }
                        DuplicateEdgePolicy::Overwrite => {
                            warn!(
                                "directed edge ({}, {}) already owned (third vertex {}), overwriting with {}",
                                key.0, key.1, previous, third
                            );
                        }
                    }
                }
            }
        }
        Ok(Self { next_vertex })
    }

    /// Third vertex of the triangle owning directed edge (u,v), if any.
    #[inline]
    pub fn opposite(&self, u: u32, v: u32) -> Option<u32> {
        self.next_vertex.get(&(u, v)).copied()
    }

    /// True if no triangle sits on the far side of directed edge (u,v).
    #[inline]
    pub fn is_boundary(&self, u: u32, v: u32) -> bool {
        self.opposite(v, u).is_none()
    }

    /// All owned directed edges whose reverse is unowned.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.next_vertex
            .keys()
            .copied()
            .filter(|&(u, v)| self.is_boundary(u, v))
    }

    pub fn len(&self) -> usize { self.next_vertex.len() }
    pub fn is_empty(&self) -> bool { self.next_vertex.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mesh::fixtures;

    #[test]
    fn quad_edges_map_to_opposite_corner() {
        let quad = fixtures::unit_quad();
        let edges = EdgeMap::build(&quad.triangles, DuplicateEdgePolicy::Reject).unwrap();

        assert_eq!(edges.len(), 6);
        assert_eq!(edges.opposite(0, 1), Some(2));
        assert_eq!(edges.opposite(2, 0), Some(1));
        assert_eq!(edges.opposite(0, 2), Some(3));
        // Wrong direction on a boundary edge.
        assert_eq!(edges.opposite(1, 0), None);
    }

    #[test]
    fn shared_diagonal_is_not_boundary() {
        let quad = fixtures::unit_quad();
        let edges = EdgeMap::build(&quad.triangles, DuplicateEdgePolicy::Reject).unwrap();

        assert!(!edges.is_boundary(0, 2));
        assert!(!edges.is_boundary(2, 0));
        assert!(edges.is_boundary(0, 1));

        let mut open: Vec<_> = edges.boundary_edges().collect();
        open.sort_unstable();
        assert_eq!(open, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
    }

    #[test]
    fn closed_mesh_has_no_boundary() {
        let octa = fixtures::octahedron();
        let edges = EdgeMap::build(&octa.triangles, DuplicateEdgePolicy::Reject).unwrap();
        assert_eq!(edges.len(), 24);
        assert_eq!(edges.boundary_edges().count(), 0);
    }

    #[test]
    fn duplicate_edge_overwrites_by_default() {
        let tris = [UVec3::new(0, 1, 2), UVec3::new(0, 1, 3)];
        let edges = EdgeMap::build(&tris, DuplicateEdgePolicy::Overwrite).unwrap();
        assert_eq!(edges.opposite(0, 1), Some(3));
    }

    #[test]
    fn duplicate_edge_rejected_when_strict() {
        let tris = [UVec3::new(0, 1, 2), UVec3::new(0, 1, 3)];
        let err = EdgeMap::build(&tris, DuplicateEdgePolicy::Reject).unwrap_err();
        assert_eq!(err, WalkMeshError::DuplicateEdge { from: 0, to: 1 });
    }
}
