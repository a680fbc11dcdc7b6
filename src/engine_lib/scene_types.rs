// src/engine_lib/scene_types.rs
use glam::{Mat4, Vec3};
use crate::engine_lib::movement::HeightMode;

// Type aliases for IDs
pub type ModelId = &'static str;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadingKind {
    /// Textured, lit by every point light in the scene.
    Lit,
    /// Lamp body, tinted by the light it carries.
    Lamp { light_index: usize },
}

/// Time-driven motion layered over a prop's static placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Pendulum-like swing about Z plus a small sideways slide.
    Sway { phase: f32, max_angle_deg: f32, slide: f32 },
    /// Back-and-forth travel along one world axis.
    Drift { axis: Vec3, amplitude: f32, phase: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropPlacement {
    pub name: &'static str,
    pub model: ModelId,
    pub shading: ShadingKind,
    pub position: Vec3,
    pub rotation_axis: Vec3,
    pub rotation_deg: f32,
    pub scale: Vec3,
    pub motion: Option<Motion>,
}

impl PropPlacement {
    pub fn new(name: &'static str, model: ModelId, position: Vec3) -> Self {
        Self {
            name,
            model,
            shading: ShadingKind::Lit,
            position,
            rotation_axis: Vec3::Y,
            rotation_deg: 0.0,
            scale: Vec3::ONE,
            motion: None,
        }
    }

    pub fn rotated_y(mut self, degrees: f32) -> Self {
        self.rotation_axis = Vec3::Y;
        self.rotation_deg = degrees;
        self
    }

    pub fn scaled(mut self, uniform: f32) -> Self {
        self.scale = Vec3::splat(uniform);
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn shaded(mut self, shading: ShadingKind) -> Self {
        self.shading = shading;
        self
    }

    pub fn is_static(&self) -> bool {
        self.motion.is_none()
    }

    /// Model-to-world matrix at `time` seconds since start-up.
    pub fn model_matrix(&self, time: f32) -> Mat4 {
        let mut model = match self.motion {
            Some(Motion::Sway { phase, max_angle_deg, slide }) => {
                let wave = (time + phase).sin();
                Mat4::from_translation(self.position)
                    * Mat4::from_rotation_z(wave * max_angle_deg.to_radians())
                    * Mat4::from_translation(Vec3::new(wave * slide, 0.0, 0.0))
            }
            Some(Motion::Drift { axis, amplitude, phase }) => {
                Mat4::from_translation(self.position + axis * ((time + phase).sin() * amplitude))
            }
            None => Mat4::from_translation(self.position),
        };

        if self.rotation_deg != 0.0 {
            model *= Mat4::from_axis_angle(self.rotation_axis.normalize_or_zero(), self.rotation_deg.to_radians());
        }
        model * Mat4::from_scale(self.scale)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingParams {
    pub color: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 0.8, 0.6),
            constant: 1.0,
            linear: 0.1,
            quadratic: 0.012,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowSettings {
    pub title: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Everything one walkthrough variant needs: which meshes block movement,
/// where props sit, how the camera starts and walks.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescription {
    pub variant: &'static str,
    pub window: WindowSettings,
    pub level: PropPlacement,
    pub props: Vec<PropPlacement>,
    pub lights: Vec<PointLight>,
    pub lighting: LightingParams,
    pub camera_start: Vec3,
    pub camera_speed: f32,
    pub speed_multiplier: f32,
    pub height_mode: HeightMode,
    pub music: Option<&'static str>,
}

impl SceneDescription {
    /// Level first, then props in draw order.
    pub fn placements(&self) -> impl Iterator<Item = &PropPlacement> {
        std::iter::once(&self.level).chain(self.props.iter())
    }

    pub fn model_ids(&self) -> Vec<ModelId> {
        let mut ids: Vec<ModelId> = Vec::new();
        for placement in self.placements() {
            if !ids.contains(&placement.model) {
                ids.push(placement.model);
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn static_placement_composes_translate_rotate_scale() {
        let prop = PropPlacement::new("pig", "cerdo", Vec3::new(3.0, 0.1, -7.0)).rotated_y(90.0).scaled(0.5);
        let expected = Mat4::from_translation(Vec3::new(3.0, 0.1, -7.0))
            * Mat4::from_rotation_y(90f32.to_radians())
            * Mat4::from_scale(Vec3::splat(0.5));
        assert!(prop.model_matrix(12.0).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn sway_at_rest_matches_static_composition() {
        let lamp = PropPlacement::new("lamp", "lamp", Vec3::new(7.5, 0.9, -60.4))
            .scaled(0.1)
            .with_motion(Motion::Sway { phase: 0.0, max_angle_deg: 5.0, slide: 0.05 });
        let expected = Mat4::from_translation(Vec3::new(7.5, 0.9, -60.4)) * Mat4::from_scale(Vec3::splat(0.1));
        assert!(lamp.model_matrix(0.0).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn drift_offsets_along_axis() {
        let ghost = PropPlacement::new("ghost", "ghost", Vec3::new(7.0, 0.3, -58.0))
            .scaled(0.06)
            .with_motion(Motion::Drift { axis: Vec3::Z, amplitude: 10.0, phase: 0.0 });
        let time = 0.7;
        let origin = ghost.model_matrix(time).transform_point3(Vec3::ZERO);
        assert_abs_diff_eq!(origin.z, -58.0 + 10.0 * time.sin(), epsilon = 1e-4);
        assert_abs_diff_eq!(origin.x, 7.0, epsilon = 1e-6);
    }
}
