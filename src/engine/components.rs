// ECS components and resources for the walk-mesh game.
// The walk mesh itself lives in a resource and is shared read-only.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::rngs::StdRng;

use super::walkmesh::{WalkMesh, WalkPoint};

// ============================================================================
// COMPONENTS
// ============================================================================

/// Position of an entity in 3D space (Z up).
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// Marks the player-controlled entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

/// An entity constrained to the walk mesh surface.
///
/// `Transform.position` is derived from `point` every frame, lifted by
/// `eye_height` along world Z.
#[derive(Component, Debug, Clone, Copy)]
pub struct WalkAgent {
    pub point: WalkPoint,
    pub eye_height: f32,
}

/// One of the six axis-aligned headings an enemy drifts along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    PosZ,
    NegZ,
    PosX,
    NegX,
    PosY,
    NegY,
}

impl Heading {
    pub fn unit(self) -> Vec3 {
        match self {
            Heading::PosZ => Vec3::Z,
            Heading::NegZ => Vec3::NEG_Z,
            Heading::PosX => Vec3::X,
            Heading::NegX => Vec3::NEG_X,
            Heading::PosY => Vec3::Y,
            Heading::NegY => Vec3::NEG_Y,
        }
    }
}

/// Free-flying enemy. Ignores the walk mesh entirely.
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy {
    pub heading: Heading,
    /// Seconds until the next heading change.
    pub time_to_change: f32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            heading: Heading::PosX,
            time_to_change: 0.0,
        }
    }
}

/// Collectable button sitting on a platform surface.
#[derive(Component, Debug, Clone, Copy)]
pub struct Button;

// ============================================================================
// RESOURCES
// ============================================================================

/// The level's walk mesh.
#[derive(Resource)]
pub struct Terrain(pub WalkMesh);

/// Seconds elapsed since the previous frame.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameTime {
    pub dt: f32,
}

/// Displacement the player wants to make this frame (already clamped).
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct MoveIntent {
    pub step: Vec3,
}

/// Session random generator. Seeded once so whole runs replay exactly.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

/// Tunables read by the systems.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Rules {
    /// Squared distance from the player's eye at which an enemy catches them.
    pub catch_radius_sq: f32,
    /// Squared distance from the player's feet at which a button is collected.
    pub pickup_radius_sq: f32,
    /// Enemy heading changes every `min..max` seconds.
    pub turn_interval: (f32, f32),
    /// Enemy speed in world units per second.
    pub enemy_speed: f32,
}

/// Outcome tracking for the session.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStatus {
    pub buttons_total: usize,
    pub buttons_collected: usize,
    pub lost: bool,
}

impl GameStatus {
    pub fn won(&self) -> bool {
        !self.lost && self.buttons_total > 0 && self.buttons_collected == self.buttons_total
    }
}
