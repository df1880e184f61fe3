//! End-to-end collision queries through `CollisionWorld`

use approx::assert_relative_eq;
use arena_collision::prelude::*;

const RADIUS: f32 = 0.5;
const HEIGHT: f32 = 2.0;
const EYE: f32 = 1.6;

fn at_feet(x: f32, feet: f32, z: f32) -> Vec3 {
    Vec3::new(x, feet + HEIGHT * 0.5, z)
}

fn block(min: (f32, f32, f32), max: (f32, f32, f32)) -> AABB {
    AABB::new(Vec3::new(min.0, min.1, min.2), Vec3::new(max.0, max.1, max.2))
}

/// Ground slab, a crate and a wall
fn arena() -> CollisionWorld {
    arena_collision::foundation::logging::init_for_tests();

    let mut world = CollisionWorld::default();
    let floor = world.spawn_entity(ColliderTags::ground());
    world
        .add_collider(floor, block((-500.0, -1.0, -500.0), (500.0, 0.0, 500.0)))
        .unwrap();

    let level = world.spawn_entity(ColliderTags::world());
    world.add_collider(level, block((-2.0, 0.0, -2.0), (2.0, 5.0, 2.0))).unwrap();
    world.add_collider(level, block((30.0, 0.0, -20.0), (31.0, 8.0, 20.0))).unwrap();
    world
}

#[test]
fn test_at_rest_keeps_position() {
    let world = arena();
    let standing = at_feet(-10.0, 0.0, 0.0);
    let result = world.resolve_movement(standing, standing, RADIUS, HEIGHT).unwrap();
    assert_eq!(result.position, standing);
    assert!(result.on_ground);

    let hovering = at_feet(-10.0, 3.0, 0.0);
    let result = world.resolve_movement(hovering, hovering, RADIUS, HEIGHT).unwrap();
    assert_eq!(result.position, hovering);
    assert!(!result.on_ground);
}

#[test]
fn test_landing_on_crate_top() {
    let world = arena();
    let current = at_feet(0.5, 5.5, -0.5);
    let proposed = at_feet(0.5, 5.3, -0.5);
    let result = world.resolve_movement(current, proposed, RADIUS, HEIGHT).unwrap();

    assert_relative_eq!(result.position.y - HEIGHT * 0.5, 5.0, epsilon = 1e-5);
    assert_relative_eq!(result.position.x, 0.5);
    assert_relative_eq!(result.position.z, -0.5);
    assert!(result.on_ground);
}

#[test]
fn test_wall_pushes_back_both_sides() {
    let world = arena();
    let near = world
        .resolve_movement(at_feet(29.0, 0.0, 0.0), at_feet(29.8, 0.0, 0.0), RADIUS, HEIGHT)
        .unwrap();
    assert_relative_eq!(near.position.x, 30.0 - RADIUS);

    let far = world
        .resolve_movement(at_feet(32.0, 0.0, 0.0), at_feet(31.2, 0.0, 0.0), RADIUS, HEIGHT)
        .unwrap();
    assert_relative_eq!(far.position.x, 31.0 + RADIUS);
}

#[test]
fn test_line_of_sight() {
    let mut world = CollisionWorld::default();
    let from = Vec3::zeros();
    let to = Vec3::new(40.0, 0.0, 0.0);
    assert!(world.has_line_of_sight(from, to, EYE).unwrap());

    let enemy = world.spawn_entity(ColliderTags::enemy());
    world.add_collider(enemy, block((10.0, 0.0, -1.0), (11.0, 2.0, 1.0))).unwrap();
    assert!(world.has_line_of_sight(from, to, EYE).unwrap());

    let wall = world.spawn_entity(ColliderTags::world());
    let handle = world.add_collider(wall, block((20.0, 0.0, -5.0), (21.0, 6.0, 5.0))).unwrap();
    assert!(!world.has_line_of_sight(from, to, EYE).unwrap());
    assert_eq!(
        world.first_sight_blocker(from, to, EYE).unwrap().map(|hit| hit.collider),
        Some(handle)
    );

    world.remove_collider(handle).unwrap();
    assert!(world.has_line_of_sight(from, to, EYE).unwrap());
}

#[test]
fn test_spawn_search() {
    let mut world = arena();
    let open = at_feet(-50.0, 0.0, -50.0);
    assert_eq!(world.find_clear_spawn(open, RADIUS, HEIGHT, 50).unwrap(), open);

    let inside_crate = at_feet(0.0, 0.0, 0.0);
    let placement = world
        .find_spawn_placement(inside_crate, RADIUS, HEIGHT, 50)
        .unwrap();
    assert!(placement.attempts <= 50);
    assert!(!placement.fallback);
    assert!(world.is_clear(placement.position, RADIUS, HEIGHT).unwrap());
}

#[test]
fn test_bullet_against_team_and_plain_geometry() {
    let shape = block((10.0, 0.0, -1.0), (11.0, 3.0, 1.0));
    let origin = Vec3::new(0.0, 1.0, 0.0);

    let mut red = CollisionWorld::default();
    let soldier = red.spawn_entity(ColliderTags::world().with_team("red"));
    red.add_collider(soldier, shape).unwrap();
    let outcome = red.check_bullet_hit(origin, Vec3::x(), 100.0).unwrap();
    assert!(!outcome.hit());

    let mut plain = CollisionWorld::default();
    let crate_id = plain.spawn_entity(ColliderTags::world());
    let handle = plain.add_collider(crate_id, shape).unwrap();
    let outcome = plain.check_bullet_hit(origin, Vec3::x(), 100.0).unwrap();
    assert!(outcome.hit());
    assert_eq!(outcome.collider(), Some(handle));
    assert_relative_eq!(outcome.distance().unwrap(), 10.0);
    assert_relative_eq!(outcome.point().unwrap().x, 10.0);
}

#[test]
fn test_shooter_does_not_hit_itself() {
    let mut world = CollisionWorld::default();
    let shooter = world.spawn_entity(ColliderTags::world());
    let position = at_feet(0.0, 0.0, 0.0);
    world
        .add_collider(shooter, AABB::from_capsule(position, RADIUS, HEIGHT))
        .unwrap();

    assert!(world.check_bullet_hit(position, Vec3::x(), 50.0).unwrap().hit());
    assert_eq!(
        world
            .check_bullet_hit_excluding(shooter, position, Vec3::x(), 50.0)
            .unwrap(),
        BulletHit::Miss
    );
}

#[test]
fn test_bad_input_rejected() {
    let world = arena();
    assert_eq!(
        world.cast_ray(Vec3::zeros(), Vec3::zeros(), 10.0),
        Err(CollisionError::ZeroDirection)
    );
    assert!(matches!(
        world.resolve_movement(Vec3::zeros(), Vec3::new(f32::NAN, 0.0, 0.0), RADIUS, HEIGHT),
        Err(CollisionError::NonFinite { .. })
    ));
    assert!(matches!(
        world.cast_ray(Vec3::zeros(), Vec3::x(), -1.0),
        Err(CollisionError::InvalidDistance(_))
    ));
}

#[test]
fn test_config_file_round_trip() {
    let mut config = CollisionConfig::default();
    config.grid.cell_size = 64.0;
    config.spawn.max_attempts = 12;

    for ext in ["toml", "ron"] {
        let path = std::env::temp_dir().join(format!("arena_collision_world_{}.{ext}", std::process::id()));
        let path = path.to_str().unwrap();
        config.save_to_file(path).unwrap();
        let loaded = CollisionConfig::load_from_file(path).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(loaded, config);
        let world = CollisionWorld::new(loaded).unwrap();
        assert_relative_eq!(world.config().grid.cell_size, 64.0);
    }
}
