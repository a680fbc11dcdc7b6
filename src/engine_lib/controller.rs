// src/engine_lib/controller.rs

use winit::{
    event::{WindowEvent, DeviceEvent, ElementState, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, CursorGrabMode},
};
use crate::engine_lib::camera::{Camera, CameraMovement};
use crate::engine_lib::movement::HeldKeys;

// Pixels per scroll "line" for touchpads reporting pixel deltas.
const PIXELS_PER_SCROLL_LINE: f32 = 40.0;

/// Folds window and device events into per-frame input: held movement keys,
/// accumulated mouse motion and scroll.
pub struct CameraController {
    pub held_keys: HeldKeys,

    pub mouse_dx_accum: f32,
    pub mouse_dy_accum: f32,
    pub scroll_accum: f32,

    pub cursor_grabbed: bool,
}

impl CameraController {
    pub fn new(initial_grab: bool) -> Self {
        Self {
            held_keys: HeldKeys::default(),
            mouse_dx_accum: 0.0,
            mouse_dy_accum: 0.0,
            scroll_accum: 0.0,
            cursor_grabbed: initial_grab,
        }
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state == ElementState::Pressed && key_event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    self.toggle_cursor_grab(window);
                    return true;
                }
                let pressed = key_event.state == ElementState::Pressed;
                match key_event.physical_key {
                    PhysicalKey::Code(code) => match movement_for_key(code) {
                        Some(direction) => { self.held_keys.set(direction, pressed); true }
                        None => false,
                    },
                    _ => false,
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if !self.cursor_grabbed && *state == ElementState::Pressed && *button == winit::event::MouseButton::Left {
                    self.grab_cursor(window, true);
                    return true;
                }
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_accum += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_SCROLL_LINE,
                };
                true
            }
            WindowEvent::Focused(focused) => {
                if !*focused {
                    // Keys released while unfocused never reach us.
                    self.held_keys = HeldKeys::default();
                    if self.cursor_grabbed {
                        self.grab_cursor(window, false);
                    }
                }
                false
            }
            _ => false,
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if !self.cursor_grabbed {
            self.mouse_dx_accum = 0.0;
            self.mouse_dy_accum = 0.0;
            return;
        }
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.mouse_dx_accum += *dx as f32;
            self.mouse_dy_accum += *dy as f32;
        }
    }

    pub fn toggle_cursor_grab(&mut self, window: &Window) {
        self.grab_cursor(window, !self.cursor_grabbed);
    }

    fn grab_cursor(&mut self, window: &Window, grab: bool) {
        if grab {
            if !self.cursor_grabbed {
                if window.set_cursor_grab(CursorGrabMode::Confined)
                    .or_else(|_e| window.set_cursor_grab(CursorGrabMode::Locked))
                    .is_ok() {
                    window.set_cursor_visible(false);
                    self.cursor_grabbed = true;
                } else { log::warn!("Could not grab cursor"); }
            }
        } else if self.cursor_grabbed {
            if window.set_cursor_grab(CursorGrabMode::None).is_ok() {
                window.set_cursor_visible(true);
                self.cursor_grabbed = false;
                self.mouse_dx_accum = 0.0;
                self.mouse_dy_accum = 0.0;
            } else { log::warn!("Could not release cursor"); }
        }
    }

    /// Applies accumulated look and zoom input to the camera and clears it.
    /// Translation is left to the movement gate.
    pub fn apply_look(&mut self, camera: &mut Camera) {
        if self.mouse_dx_accum != 0.0 || self.mouse_dy_accum != 0.0 {
            // Screen y grows downwards.
            camera.process_mouse_movement(self.mouse_dx_accum, -self.mouse_dy_accum, true);
        }
        if self.scroll_accum != 0.0 {
            camera.process_mouse_scroll(self.scroll_accum);
        }
        self.mouse_dx_accum = 0.0;
        self.mouse_dy_accum = 0.0;
        self.scroll_accum = 0.0;
    }
}

pub fn movement_for_key(code: KeyCode) -> Option<CameraMovement> {
    match code {
        KeyCode::KeyW => Some(CameraMovement::Forward),
        KeyCode::KeyS => Some(CameraMovement::Backward),
        KeyCode::KeyA => Some(CameraMovement::Left),
        KeyCode::KeyD => Some(CameraMovement::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn wasd_maps_to_directions() {
        assert_eq!(movement_for_key(KeyCode::KeyW), Some(CameraMovement::Forward));
        assert_eq!(movement_for_key(KeyCode::KeyD), Some(CameraMovement::Right));
        assert_eq!(movement_for_key(KeyCode::Space), None);
    }

    #[test]
    fn apply_look_consumes_accumulated_input() {
        let mut controller = CameraController::new(true);
        controller.handle_device_event(&DeviceEvent::MouseMotion { delta: (100.0, -50.0) });
        controller.scroll_accum = 5.0;

        let mut camera = Camera::new(Vec3::ZERO);
        controller.apply_look(&mut camera);

        assert_eq!(camera.yaw_deg, -80.0);
        assert_eq!(camera.pitch_deg, 5.0);
        assert_eq!(camera.zoom_deg, 40.0);
        assert_eq!(controller.mouse_dx_accum, 0.0);
        assert_eq!(controller.scroll_accum, 0.0);
    }

    #[test]
    fn mouse_motion_ignored_without_grab() {
        let mut controller = CameraController::new(false);
        controller.handle_device_event(&DeviceEvent::MouseMotion { delta: (10.0, 10.0) });
        assert_eq!(controller.mouse_dx_accum, 0.0);
    }
}
