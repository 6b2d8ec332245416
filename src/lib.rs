// Walk-mesh navigation: keep an agent glued to a triangle surface, moving
// across shared edges and sliding along open boundaries.

pub mod engine;
pub mod game;

pub use engine::{
    DuplicateEdgePolicy, EdgeMap, TriMesh, WalkConfig, WalkMesh, WalkMeshError, WalkPoint,
};
pub use game::{Game, GameConfig};
