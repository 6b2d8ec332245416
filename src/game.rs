// Game session: one generated level, one walking player, wandering enemies
// and buttons to collect. Owns the ECS world and drives it frame by frame.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::camera::FirstPersonCamera;
use crate::engine::components::*;
use crate::engine::error::Result;
use crate::engine::input::InputState;
use crate::engine::level::{self, LevelConfig, Platform};
use crate::engine::systems::{button_pickup_system, enemy_wander_system, player_walk_system};
use crate::engine::walkmesh::{WalkConfig, WalkMesh, WalkPoint};

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub level: LevelConfig,
    pub walk: WalkConfig,
    /// Player speed in world units per second.
    pub move_speed: f32,
    /// Camera height above the walk mesh surface.
    pub eye_height: f32,
    pub rules: Rules,
    pub enemy_spawns: Vec<Vec3>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: LevelConfig::default(),
            walk: WalkConfig::default(),
            move_speed: 3.0,
            eye_height: 0.5,
            rules: Rules {
                catch_radius_sq: 0.25,
                pickup_radius_sq: 0.5,
                turn_interval: (2.0, 4.0),
                enemy_speed: 1.0,
            },
            enemy_spawns: vec![
                Vec3::new(0.0, 20.0, 2.0),
                Vec3::new(0.0, 10.0, 1.0),
                Vec3::new(0.0, 15.0, 3.0),
                Vec3::new(0.0, 5.0, 4.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
        }
    }
}

// ============================================================================
// GAME
// ============================================================================

pub struct Game {
    world: World,
    schedule: Schedule,
    camera: FirstPersonCamera,
    platforms: Vec<Platform>,
    move_speed: f32,
}

impl Game {
    /// Generate a level from `seed` and place everything on it.
    /// The same seed and input sequence always replays identically.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let level = level::generate(&config.level, &mut rng);

        let mesh = WalkMesh::from_tri_mesh(level.mesh, config.walk)?;
        let point = mesh.start(level.spawn)?;
        let eye = mesh.world_point(&point) + Vec3::Z * config.eye_height;

        let mut world = World::new();
        world.insert_resource(Terrain(mesh));
        world.insert_resource(FrameTime::default());
        world.insert_resource(MoveIntent::default());
        world.insert_resource(GameRng(rng));
        world.insert_resource(config.rules);
        world.insert_resource(GameStatus {
            buttons_total: level.buttons.len(),
            ..Default::default()
        });

        world.spawn((
            Player,
            WalkAgent { point, eye_height: config.eye_height },
            Transform::from_position(eye),
        ));
        for &spawn in &config.enemy_spawns {
            world.spawn((Transform::from_position(spawn), Enemy::default()));
        }
        for &button in &level.buttons {
            world.spawn((Button, Transform::from_position(button)));
        }

        let mut schedule = Schedule::default();
        schedule.add_systems((player_walk_system, enemy_wander_system, button_pickup_system).chain());

        let mut camera = FirstPersonCamera::new();
        camera.eye = eye;

        info!(
            "game: seed {seed}, {} platforms, {} buttons, {} enemies, spawn {}",
            level.platforms.len(),
            level.buttons.len(),
            config.enemy_spawns.len(),
            eye
        );

        Ok(Self {
            world,
            schedule,
            camera,
            platforms: level.platforms,
            move_speed: config.move_speed,
        })
    }

    /// Run one frame: mouse look, movement intent, then all systems.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        self.camera.update(input);
        let step = self.camera.movement_step(input, self.move_speed, dt);

        self.world.resource_mut::<FrameTime>().dt = dt;
        self.world.resource_mut::<MoveIntent>().step = step;
        self.schedule.run(&mut self.world);

        self.camera.eye = self.player_position();
    }

    pub fn status(&self) -> GameStatus {
        *self.world.resource::<GameStatus>()
    }

    /// Eye position of the player.
    pub fn player_position(&mut self) -> Vec3 {
        self.world
            .query_filtered::<&Transform, With<Player>>()
            .get_single(&self.world)
            .map(|t| t.position)
            .unwrap_or(self.camera.eye)
    }

    pub fn player_walk_point(&mut self) -> Option<WalkPoint> {
        self.world
            .query_filtered::<&WalkAgent, With<Player>>()
            .get_single(&self.world)
            .ok()
            .map(|agent| agent.point)
    }

    pub fn terrain(&self) -> &WalkMesh {
        &self.world.resource::<Terrain>().0
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn enemy_positions(&mut self) -> Vec<Vec3> {
        self.world
            .query_filtered::<&Transform, With<Enemy>>()
            .iter(&self.world)
            .map(|t| t.position)
            .collect()
    }
}
