// src/engine_lib/camera.rs

use glam::{Mat4, Vec3};

pub const DEFAULT_YAW_DEG: f32 = -90.0;
pub const DEFAULT_PITCH_DEG: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 1.0;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM_DEG: f32 = 45.0;

const PITCH_LIMIT_DEG: f32 = 89.0;
const MIN_ZOOM_DEG: f32 = 1.0;
const MAX_ZOOM_DEG: f32 = 45.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person fly camera. Angles are kept in degrees; `front`, `right` and
/// `up` are recomputed whenever yaw or pitch change.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom_deg: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw_deg: DEFAULT_YAW_DEG,
            pitch_deg: DEFAULT_PITCH_DEG,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom_deg: DEFAULT_ZOOM_DEG,
            znear: 0.1,
            zfar: 100.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    // wgpu clip space has z in [0, 1].
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom_deg.to_radians(), aspect_ratio, self.znear, self.zfar)
    }

    /// Offset that `process_keyboard` would add for this direction.
    pub fn keyboard_delta(&self, direction: CameraMovement, dt: f32) -> Vec3 {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.front * velocity,
            CameraMovement::Backward => -self.front * velocity,
            CameraMovement::Left => -self.right * velocity,
            CameraMovement::Right => self.right * velocity,
        }
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        self.position += self.keyboard_delta(direction, dt);
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw_deg += x_offset * self.mouse_sensitivity;
        self.pitch_deg += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch_deg = self.pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
        }
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom_deg = (self.zoom_deg - y_offset).clamp(MIN_ZOOM_DEG, MAX_ZOOM_DEG);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw_deg.to_radians(), self.pitch_deg.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_orientation_looks_down_negative_z() {
        let camera = Camera::new(Vec3::ZERO);
        assert_abs_diff_eq!(camera.front().x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.front().z, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.right().x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.up().y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch_deg, 89.0);
        camera.process_mouse_movement(0.0, -20_000.0, true);
        assert_eq!(camera.pitch_deg, -89.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom_deg, 1.0);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom_deg, 45.0);
    }

    #[test]
    fn keyboard_moves_along_front_scaled_by_time() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        camera.movement_speed = 2.0;
        camera.process_keyboard(CameraMovement::Forward, 0.5);
        assert_abs_diff_eq!(camera.position.z, 2.0, epsilon = 1e-6);
        camera.process_keyboard(CameraMovement::Left, 0.25);
        assert_abs_diff_eq!(camera.position.x, 0.5, epsilon = 1e-6);
    }
}
