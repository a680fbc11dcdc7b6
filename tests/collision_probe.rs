// tests/collision_probe.rs
use approx::assert_abs_diff_eq;
use glam::{Mat4, Vec3};

use haunted_walkthrough::demo_scene::create_scene;
use haunted_walkthrough::engine_lib::camera::Camera;
use haunted_walkthrough::engine_lib::collision::{probe, probe_ray, CollisionMesh, Ray, Triangle, TriangleIntersection};
use haunted_walkthrough::engine_lib::config::Variant;
use haunted_walkthrough::engine_lib::movement::{
    apply_gated_movement, step_walk, HeightMode, HeldKeys, MovementPermissions, WalkState, DEFAULT_PROBE_LENGTH,
};

fn unit_square_xz() -> CollisionMesh {
    CollisionMesh::new(vec![
        Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0),
    ])
    .unwrap()
}

// Two triangles spanning the plane z = `z`, `half` units either side of x = 0, y = 0.
fn wall_at_z(z: f32, half: f32) -> Vec<Triangle> {
    vec![
        Triangle::new(Vec3::new(-half, -half, z), Vec3::new(half, -half, z), Vec3::new(half, half, z)),
        Triangle::new(Vec3::new(-half, -half, z), Vec3::new(half, half, z), Vec3::new(-half, half, z)),
    ]
}

#[test]
fn centroid_ray_hits_at_centroid_distance() {
    let tri = Triangle::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
    let origin = Vec3::splat(5.0);
    let to_centroid = tri.centroid() - origin;
    let t = TriangleIntersection::ray_triangle(origin, to_centroid.normalize(), &tri).unwrap();
    assert_abs_diff_eq!(t, to_centroid.length(), epsilon = 1e-4);
}

#[test]
fn parallel_and_backward_rays_never_hit() {
    let mesh = unit_square_xz();
    assert!(!probe(Vec3::new(-1.0, 0.5, 0.5), Vec3::X, 100.0, &mesh, None));
    assert!(!probe(Vec3::new(0.5, 1.0, 0.5), Vec3::Y, 100.0, &mesh, None));
}

#[test]
fn probe_length_bounds_the_hit() {
    let mesh = unit_square_xz();
    let down = Ray::new(Vec3::new(0.5, 1.0, 0.5), Vec3::NEG_Y, 2.0);
    assert!(probe_ray(&down, &mesh, None));
    assert!(!probe(Vec3::new(0.5, 1.0, 0.5), Vec3::NEG_Y, 0.5, &mesh, None));
}

#[test]
fn transformed_mesh_is_only_hit_where_it_is_placed() {
    let mesh = unit_square_xz();
    let far_away = Mat4::from_translation(Vec3::new(100.0, 0.0, 0.0));
    let origin = Vec3::new(0.5, 1.0, 0.5);

    assert!(probe(origin, Vec3::NEG_Y, 2.0, &mesh, None));
    assert!(!probe(origin, Vec3::NEG_Y, 2.0, &mesh, Some(&far_away)));
    assert!(!probe(origin, Vec3::NEG_Y, 2.0, &mesh.to_world(&far_away), None));
    assert!(probe(origin + Vec3::X * 100.0, Vec3::NEG_Y, 2.0, &mesh.to_world(&far_away), None));
}

#[test]
fn baked_house_placement_agrees_with_per_probe_transform() {
    let scene = create_scene(Variant::Casa);
    let placement = scene.level.model_matrix(0.0);
    // A local wall that lands just ahead of the casa start position once placed.
    let local_z = (scene.camera_start.z - 0.3 - placement.w_axis.z) / 0.1;
    let local = CollisionMesh::from_triangles(&wall_at_z(local_z, 50.0));
    let world = local.to_world(&placement);

    let start = scene.camera_start;
    assert!(probe(start, Vec3::NEG_Z, DEFAULT_PROBE_LENGTH, &local, Some(&placement)));
    assert!(probe(start, Vec3::NEG_Z, DEFAULT_PROBE_LENGTH, &world, None));
    assert!(!probe(start, Vec3::Z, DEFAULT_PROBE_LENGTH, &world, None));
}

#[test]
fn perpendicular_keys_move_on_both_axes_unless_gated() {
    let keys = HeldKeys { forward: true, right: true, ..Default::default() };

    let mut camera = Camera::new(Vec3::ZERO);
    let free = apply_gated_movement(&mut camera, &keys, &MovementPermissions::ALL, 0.2, 1.0);
    assert_abs_diff_eq!(free.z, -0.2, epsilon = 1e-5);
    assert_abs_diff_eq!(free.x, 0.2, epsilon = 1e-5);

    let mut camera = Camera::new(Vec3::ZERO);
    let gated = MovementPermissions { right: false, ..MovementPermissions::ALL };
    let blocked = apply_gated_movement(&mut camera, &keys, &gated, 0.2, 1.0);
    assert_abs_diff_eq!(blocked.x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(blocked.z, -0.2, epsilon = 1e-5);
}

#[test]
fn walking_into_a_wall_stops_within_probe_length() {
    let scene = create_scene(Variant::Casa);
    let wall_z = scene.camera_start.z - 1.0;
    let mesh = CollisionMesh::from_triangles(&wall_at_z(wall_z, 5.0));

    let mut camera = Camera::new(scene.camera_start);
    let mut walk = WalkState::new(scene.height_mode);
    let keys = HeldKeys { forward: true, ..Default::default() };
    let dt = 0.016;
    let mut permissions = MovementPermissions::ALL;
    for _ in 0..200 {
        permissions = step_walk(&mut camera, &mut walk, &keys, &mesh, DEFAULT_PROBE_LENGTH, scene.speed_multiplier, dt);
    }

    let gap = camera.position.z - wall_z;
    assert!(!permissions.forward);
    assert!(gap > DEFAULT_PROBE_LENGTH - dt - 1e-3, "stopped too close: {gap}");
    assert!(gap < DEFAULT_PROBE_LENGTH, "never blocked: {gap}");
    assert_eq!(camera.position.y, 0.85);
}

#[test]
fn walk_bob_follows_time_spent_walking() {
    let mode = HeightMode::WalkBob { base: 0.2, amplitude: 0.2, frequency: 10.0 };
    let mut camera = Camera::new(Vec3::new(-21.0, 0.2, -15.0));
    let mut walk = WalkState::new(mode);
    let empty = CollisionMesh::default();

    let walking = HeldKeys { left: true, ..Default::default() };
    step_walk(&mut camera, &mut walk, &walking, &empty, DEFAULT_PROBE_LENGTH, 5.0, 0.1);
    assert_abs_diff_eq!(camera.position.y, 0.2 + 0.2 * 1.0f32.sin(), epsilon = 1e-5);

    step_walk(&mut camera, &mut walk, &HeldKeys::default(), &empty, DEFAULT_PROBE_LENGTH, 5.0, 0.1);
    assert_eq!(camera.position.y, 0.2);
}
