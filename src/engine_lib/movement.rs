// src/engine_lib/movement.rs

use glam::Vec3;
use crate::engine_lib::camera::{Camera, CameraMovement};
use crate::engine_lib::collision::{probe, CollisionMesh};

pub const DEFAULT_PROBE_LENGTH: f32 = 0.5;

/// Which of the four planar directions are free this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementPermissions {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementPermissions {
    pub const ALL: Self = Self { forward: true, backward: true, left: true, right: true };

    /// Casts one probe per direction from the camera's current position.
    pub fn compute(camera: &Camera, mesh: &CollisionMesh, probe_length: f32) -> Self {
        let forward_dir = camera.front().normalize_or_zero();
        let right_dir = camera.right().normalize_or_zero();
        let free = |dir: Vec3| !probe(camera.position, dir, probe_length, mesh, None);

        Self {
            forward: free(forward_dir),
            backward: free(-forward_dir),
            left: free(-right_dir),
            right: free(right_dir),
        }
    }

    pub fn allows(&self, direction: CameraMovement) -> bool {
        match direction {
            CameraMovement::Forward => self.forward,
            CameraMovement::Backward => self.backward,
            CameraMovement::Left => self.left,
            CameraMovement::Right => self.right,
        }
    }
}

/// Movement keys currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn is_held(&self, direction: CameraMovement) -> bool {
        match direction {
            CameraMovement::Forward => self.forward,
            CameraMovement::Backward => self.backward,
            CameraMovement::Left => self.left,
            CameraMovement::Right => self.right,
        }
    }

    pub fn set(&mut self, direction: CameraMovement, held: bool) {
        match direction {
            CameraMovement::Forward => self.forward = held,
            CameraMovement::Backward => self.backward = held,
            CameraMovement::Left => self.left = held,
            CameraMovement::Right => self.right = held,
        }
    }
}

const DIRECTIONS: [CameraMovement; 4] = [
    CameraMovement::Forward,
    CameraMovement::Backward,
    CameraMovement::Left,
    CameraMovement::Right,
];

/// Applies keyboard translation, one direction at a time, only where both the
/// key is held and the direction is permitted. Returns the total offset.
pub fn apply_gated_movement(
    camera: &mut Camera,
    keys: &HeldKeys,
    permissions: &MovementPermissions,
    dt: f32,
    speed_multiplier: f32,
) -> Vec3 {
    let start = camera.position;
    for direction in DIRECTIONS {
        if keys.is_held(direction) && permissions.allows(direction) {
            camera.process_keyboard(direction, dt * speed_multiplier);
        }
    }
    camera.position - start
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeightMode {
    Fixed(f32),
    WalkBob { base: f32, amplitude: f32, frequency: f32 },
}

impl HeightMode {
    pub fn base(&self) -> f32 {
        match *self {
            HeightMode::Fixed(height) => height,
            HeightMode::WalkBob { base, .. } => base,
        }
    }
}

/// Eye-height state carried between frames.
#[derive(Clone, Debug)]
pub struct WalkState {
    pub mode: HeightMode,
    time_walking: f32,
}

impl WalkState {
    pub fn new(mode: HeightMode) -> Self {
        Self { mode, time_walking: 0.0 }
    }

    pub fn time_walking(&self) -> f32 {
        self.time_walking
    }

    /// Eye height for this frame; `walked` means some gated movement was applied.
    pub fn advance(&mut self, walked: bool, dt: f32) -> f32 {
        match self.mode {
            HeightMode::WalkBob { base, amplitude, frequency } if walked => {
                self.time_walking += dt * frequency;
                base + amplitude * self.time_walking.sin()
            }
            // Fixed height, or standing still mid-bob.
            mode => mode.base(),
        }
    }
}

/// One frame of walking: probe from the start-of-frame position, move through
/// the gate, then settle the eye height.
pub fn step_walk(
    camera: &mut Camera,
    walk: &mut WalkState,
    keys: &HeldKeys,
    mesh: &CollisionMesh,
    probe_length: f32,
    speed_multiplier: f32,
    dt: f32,
) -> MovementPermissions {
    let permissions = MovementPermissions::compute(camera, mesh, probe_length);
    let walked = DIRECTIONS
        .iter()
        .any(|dir| keys.is_held(*dir) && permissions.allows(*dir));
    apply_gated_movement(camera, keys, &permissions, dt, speed_multiplier);
    camera.position.y = walk.advance(walked, dt);
    permissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_lib::collision::Triangle;
    use approx::assert_abs_diff_eq;

    // A wall in the plane z = -0.3, facing a camera at the origin.
    fn wall_ahead() -> CollisionMesh {
        CollisionMesh::from_triangles(&[
            Triangle::new(Vec3::new(-5.0, -5.0, -0.3), Vec3::new(5.0, -5.0, -0.3), Vec3::new(5.0, 5.0, -0.3)),
            Triangle::new(Vec3::new(-5.0, -5.0, -0.3), Vec3::new(5.0, 5.0, -0.3), Vec3::new(-5.0, 5.0, -0.3)),
        ])
    }

    #[test]
    fn wall_ahead_blocks_only_forward() {
        let camera = Camera::new(Vec3::ZERO);
        let perms = MovementPermissions::compute(&camera, &wall_ahead(), DEFAULT_PROBE_LENGTH);
        assert_eq!(perms, MovementPermissions { forward: false, backward: true, left: true, right: true });
    }

    #[test]
    fn wall_beyond_probe_length_does_not_block() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 1.0));
        let perms = MovementPermissions::compute(&camera, &wall_ahead(), DEFAULT_PROBE_LENGTH);
        assert_eq!(perms, MovementPermissions::ALL);
    }

    #[test]
    fn diagonal_movement_moves_on_both_axes() {
        let mut camera = Camera::new(Vec3::ZERO);
        let keys = HeldKeys { forward: true, right: true, ..Default::default() };
        let delta = apply_gated_movement(&mut camera, &keys, &MovementPermissions::ALL, 0.1, 1.0);
        assert!(delta.x.abs() > 1e-4);
        assert!(delta.z.abs() > 1e-4);
    }

    #[test]
    fn blocked_axis_does_not_stop_the_other() {
        let mut camera = Camera::new(Vec3::ZERO);
        let keys = HeldKeys { forward: true, right: true, ..Default::default() };
        let perms = MovementPermissions { forward: false, ..MovementPermissions::ALL };
        let delta = apply_gated_movement(&mut camera, &keys, &perms, 0.1, 1.0);
        assert_abs_diff_eq!(delta.z, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(delta.x, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn speed_multiplier_scales_translation() {
        let mut camera = Camera::new(Vec3::ZERO);
        let keys = HeldKeys { backward: true, ..Default::default() };
        let delta = apply_gated_movement(&mut camera, &keys, &MovementPermissions::ALL, 0.1, 5.0);
        assert_abs_diff_eq!(delta.z, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn walk_bob_resets_when_idle() {
        let mut walk = WalkState::new(HeightMode::WalkBob { base: 0.2, amplitude: 0.2, frequency: 10.0 });
        let y = walk.advance(true, 0.05);
        assert_abs_diff_eq!(y, 0.2 + 0.2 * 0.5f32.sin(), epsilon = 1e-6);
        assert_eq!(walk.advance(false, 0.05), 0.2);
        assert_abs_diff_eq!(walk.time_walking(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn fixed_height_ignores_walking() {
        let mut walk = WalkState::new(HeightMode::Fixed(0.85));
        assert_eq!(walk.advance(true, 0.1), 0.85);
        assert_eq!(walk.advance(false, 0.1), 0.85);
        assert_eq!(walk.time_walking(), 0.0);
        assert_eq!(HeightMode::WalkBob { base: 0.2, amplitude: 0.2, frequency: 10.0 }.base(), 0.2);
    }

    #[test]
    fn step_walk_holds_fixed_height_and_stops_at_wall() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.85, 0.0));
        let mut walk = WalkState::new(HeightMode::Fixed(0.85));
        let keys = HeldKeys { forward: true, ..Default::default() };
        let perms = step_walk(&mut camera, &mut walk, &keys, &wall_ahead(), DEFAULT_PROBE_LENGTH, 1.0, 0.1);
        assert!(!perms.forward);
        assert_eq!(camera.position, Vec3::new(0.0, 0.85, 0.0));
    }
}
