// ECS systems for one game frame.
// Run chained in this order: player walk → enemy wander → button pickup.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use super::components::*;

/// Normalized offset component an enemy must exceed to consider that axis.
const CHASE_THRESHOLD: f32 = 0.4;

/// Advance the player along the walk mesh by this frame's intent and place
/// the eye above the resulting surface point.
pub fn player_walk_system(
    terrain: Res<Terrain>,
    intent: Res<MoveIntent>,
    mut players: Query<(&mut WalkAgent, &mut Transform), With<Player>>,
) {
    for (mut agent, mut transform) in players.iter_mut() {
        terrain.0.walk(&mut agent.point, intent.step);
        transform.position = terrain.0.world_point(&agent.point) + Vec3::Z * agent.eye_height;
    }
}

/// Pick a heading toward `offset`, randomly among the axes it leans along.
/// Falls back to +X when no axis stands out.
pub fn choose_heading<R: Rng + ?Sized>(offset: Vec3, rng: &mut R) -> Heading {
    let dir = offset.normalize_or_zero();
    let mut candidates = Vec::with_capacity(3);
    if dir.x > CHASE_THRESHOLD { candidates.push(Heading::PosX); }
    if dir.y > CHASE_THRESHOLD { candidates.push(Heading::PosY); }
    if dir.z > CHASE_THRESHOLD { candidates.push(Heading::PosZ); }
    if dir.x < -CHASE_THRESHOLD { candidates.push(Heading::NegX); }
    if dir.y < -CHASE_THRESHOLD { candidates.push(Heading::NegY); }
    if dir.z < -CHASE_THRESHOLD { candidates.push(Heading::NegZ); }
    candidates.choose(rng).copied().unwrap_or(Heading::PosX)
}

/// Drift enemies along their heading, periodically re-aiming at the player.
/// Flags the session lost when one reaches the player's eye.
pub fn enemy_wander_system(
    time: Res<FrameTime>,
    rules: Res<Rules>,
    mut rng: ResMut<GameRng>,
    mut status: ResMut<GameStatus>,
    players: Query<&Transform, With<Player>>,
    mut enemies: Query<(&mut Transform, &mut Enemy), Without<Player>>,
) {
    let Ok(player) = players.get_single() else {
        return;
    };
    let target = player.position;

    for (mut transform, mut enemy) in enemies.iter_mut() {
        transform.position += enemy.heading.unit() * rules.enemy_speed * time.dt;
        enemy.time_to_change -= time.dt;

        let offset = target - transform.position;
        if enemy.time_to_change <= 0.0 {
            let (min, max) = rules.turn_interval;
            enemy.time_to_change += rng.0.gen_range(min..max);
            enemy.heading = choose_heading(offset, &mut rng.0);
            debug!("enemy at {} now heading {:?}", transform.position, enemy.heading);
        }

        if offset.length_squared() < rules.catch_radius_sq && !status.lost {
            status.lost = true;
            info!("caught by enemy at {}", transform.position);
        }
    }
}

/// Collect buttons the player is standing on.
pub fn button_pickup_system(
    mut commands: Commands,
    rules: Res<Rules>,
    mut status: ResMut<GameStatus>,
    players: Query<(&Transform, &WalkAgent), With<Player>>,
    buttons: Query<(Entity, &Transform), (With<Button>, Without<Player>)>,
) {
    let Ok((player, agent)) = players.get_single() else {
        return;
    };
    let feet = player.position - Vec3::Z * agent.eye_height;

    for (entity, button) in buttons.iter() {
        if (button.position - feet).length_squared() < rules.pickup_radius_sq {
            commands.entity(entity).despawn();
            status.buttons_collected += 1;
            info!(
                "button collected at {} ({}/{})",
                button.position, status.buttons_collected, status.buttons_total
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mesh::fixtures;
    use crate::engine::walkmesh::WalkMesh;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RULES: Rules = Rules {
        catch_radius_sq: 0.25,
        pickup_radius_sq: 0.5,
        turn_interval: (2.0, 4.0),
        enemy_speed: 1.0,
    };

    fn world_with_player(start: Vec3) -> World {
        let quad = fixtures::unit_quad();
        let mesh = WalkMesh::new(quad.positions, quad.triangles).unwrap();
        let point = mesh.start(start).unwrap();

        let mut world = World::new();
        world.insert_resource(Terrain(mesh));
        world.insert_resource(FrameTime { dt: 0.1 });
        world.insert_resource(MoveIntent::default());
        world.insert_resource(GameRng(StdRng::seed_from_u64(9)));
        world.insert_resource(RULES);
        world.insert_resource(GameStatus { buttons_total: 1, ..Default::default() });
        world.spawn((
            Player,
            WalkAgent { point, eye_height: 0.5 },
            Transform::from_position(start + Vec3::Z * 0.5),
        ));
        world
    }

    fn run<M>(world: &mut World, systems: impl IntoSystemConfigs<M>) {
        let mut schedule = Schedule::default();
        schedule.add_systems(systems);
        schedule.run(world);
    }

    fn player_position(world: &mut World) -> Vec3 {
        world
            .query_filtered::<&Transform, With<Player>>()
            .single(world)
            .position
    }

    #[test]
    fn player_follows_intent_on_surface() {
        let mut world = world_with_player(Vec3::new(0.6, 0.3, 0.0));
        world.resource_mut::<MoveIntent>().step = Vec3::new(0.1, 0.05, 0.0);

        run(&mut world, player_walk_system);

        assert!(player_position(&mut world).abs_diff_eq(Vec3::new(0.7, 0.35, 0.5), 1e-5));
    }

    #[test]
    fn player_is_held_at_mesh_boundary() {
        let mut world = world_with_player(Vec3::new(0.5, 0.5, 0.0) + Vec3::new(0.1, -0.05, 0.0));
        world.resource_mut::<MoveIntent>().step = Vec3::new(5.0, 0.0, 0.0);

        run(&mut world, player_walk_system);

        let p = player_position(&mut world);
        assert!(p.x <= 1.0 + 1e-4, "walked off the mesh: {p:?}");
    }

    #[test]
    fn enemy_drifts_along_heading() {
        let mut world = world_with_player(Vec3::new(0.5, 0.2, 0.0));
        let enemy = world
            .spawn((
                Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
                Enemy { heading: Heading::NegX, time_to_change: 1.0 },
            ))
            .id();

        run(&mut world, enemy_wander_system);

        let transform = world.get::<Transform>(enemy).unwrap();
        assert!(transform.position.abs_diff_eq(Vec3::new(9.9, 0.0, 0.0), 1e-5));
        let enemy = world.get::<Enemy>(enemy).unwrap();
        assert_eq!(enemy.heading, Heading::NegX);
        assert!((enemy.time_to_change - 0.9).abs() < 1e-5);
        assert!(!world.resource::<GameStatus>().lost);
    }

    #[test]
    fn enemy_reaims_when_timer_expires() {
        let mut world = world_with_player(Vec3::new(0.5, 0.2, 0.0));
        let enemy = world
            .spawn((
                Transform::from_position(Vec3::new(0.5, 0.7, -8.0)),
                Enemy { heading: Heading::NegX, time_to_change: 0.05 },
            ))
            .id();

        run(&mut world, enemy_wander_system);

        let enemy = world.get::<Enemy>(enemy).unwrap();
        // Player is straight above.
        assert_eq!(enemy.heading, Heading::PosZ);
        assert!(enemy.time_to_change >= 1.9 && enemy.time_to_change < 4.0);
    }

    #[test]
    fn enemy_at_eye_loses_the_game() {
        let mut world = world_with_player(Vec3::new(0.5, 0.2, 0.0));
        world.spawn((
            Transform::from_position(Vec3::new(0.6, 0.2, 0.5)),
            Enemy { heading: Heading::NegX, time_to_change: 3.0 },
        ));

        run(&mut world, enemy_wander_system);

        assert!(world.resource::<GameStatus>().lost);
    }

    #[test]
    fn standing_on_button_collects_it() {
        let mut world = world_with_player(Vec3::new(0.5, 0.2, 0.0));
        let near = world.spawn((Button, Transform::from_position(Vec3::new(0.6, 0.3, 0.0)))).id();
        let far = world.spawn((Button, Transform::from_position(Vec3::new(5.0, 5.0, 0.0)))).id();

        run(&mut world, button_pickup_system);

        assert!(world.get::<Button>(near).is_none());
        assert!(world.get::<Button>(far).is_some());
        let status = *world.resource::<GameStatus>();
        assert_eq!(status.buttons_collected, 1);
        assert!(status.won());
    }

    #[test]
    fn heading_prefers_dominant_axes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(choose_heading(Vec3::new(0.0, -3.0, 0.0), &mut rng), Heading::NegY);
        assert_eq!(choose_heading(Vec3::ZERO, &mut rng), Heading::PosX);
        for _ in 0..20 {
            let h = choose_heading(Vec3::new(1.0, 1.0, 0.0), &mut rng);
            assert!(h == Heading::PosX || h == Heading::PosY);
        }
    }
}
