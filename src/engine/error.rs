// Error types for walk-mesh construction and seeding.
// The per-frame walk itself never fails; everything here is caught up front.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WalkMeshError {
    /// A triangle references a vertex past the end of the vertex list.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Two triangles own the same directed edge (non-manifold or flipped winding).
    #[error("directed edge ({from}, {to}) is owned by more than one triangle")]
    DuplicateEdge { from: u32, to: u32 },

    #[error("walk mesh has no triangles")]
    EmptyMesh,
}

pub type Result<T> = std::result::Result<T, WalkMeshError>;
