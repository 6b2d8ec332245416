// Engine module - walk mesh navigation plus the ECS pieces that ride on it

pub mod adjacency;
pub mod barycentric;
pub mod camera;
pub mod components;
pub mod error;
pub mod input;
pub mod level;
pub mod mesh;
pub mod systems;
pub mod walkmesh;

// Re-export commonly used items
pub use adjacency::{DuplicateEdgePolicy, EdgeMap};
pub use components::*;
pub use error::{Result, WalkMeshError};
pub use mesh::TriMesh;
pub use walkmesh::{WalkConfig, WalkMesh, WalkPoint};
