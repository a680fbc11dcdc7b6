// src/demo_scene.rs

use glam::Vec3;
use crate::engine_lib::config::Variant;
use crate::engine_lib::movement::HeightMode;
use crate::engine_lib::scene_types::{
    LightingParams, ModelId, Motion, PointLight, PropPlacement,
    SceneDescription, ShadingKind, WindowSettings,
};

pub const HOUSE_MODEL: ModelId = "model/casa/casa.obj";
pub const LAMP_MODEL: ModelId = "model/lamp/lamp.obj";
pub const GHOST_MODEL: ModelId = "model/ghost/ghost.obj";
pub const PIG_MODEL: ModelId = "model/cerdo/cerdo.obj";
pub const TORSO_MODEL: ModelId = "model/torso/torso.obj";
pub const EGG_MODEL: ModelId = "model/egg/easter_egg.obj";
pub const MUSIC_TRACK: &str = "model/terror.wav";

const EYE_HEIGHT: f32 = 0.85;

const LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(7.52944, 1.12457, -60.3977),
    Vec3::new(2.46593, 1.7368, -64.9968),
    Vec3::new(3.94016, 1.22564, -69.8362),
    Vec3::new(3.56388, 1.79457, -65.1359),
];

const LAMP_BASES: [Vec3; 3] = [
    Vec3::new(7.52944, 0.9, -60.3977),
    Vec3::new(2.7847, 0.85, -65.2366),
    Vec3::new(3.68961, 0.88, -69.9629),
];

fn lamps() -> Vec<PropPlacement> {
    LAMP_BASES
        .iter()
        .enumerate()
        .map(|(i, base)| {
            PropPlacement::new("lamp", LAMP_MODEL, *base)
                .scaled(0.1)
                .shaded(ShadingKind::Lamp { light_index: i })
                .with_motion(Motion::Sway { phase: i as f32, max_angle_deg: 5.0, slide: 0.05 })
        })
        .collect()
}

fn ghost() -> PropPlacement {
    PropPlacement::new("ghost", GHOST_MODEL, Vec3::new(7.45636, 0.3, -58.3212))
        .scaled(0.06)
        .with_motion(Motion::Drift { axis: Vec3::Z, amplitude: 10.0, phase: 0.0 })
}

fn house_at(position: Vec3) -> PropPlacement {
    PropPlacement::new("house", HOUSE_MODEL, position).scaled(0.1)
}

fn lights() -> Vec<PointLight> {
    LIGHT_POSITIONS.iter().map(|&position| PointLight { position }).collect()
}

fn terror_house() -> SceneDescription {
    let mut props = lamps();
    props.push(ghost());
    SceneDescription {
        variant: "terror_house",
        window: WindowSettings { title: "Lamp as Light Source", width: 1920, height: 1080 },
        level: house_at(Vec3::new(0.0, 0.0, 10.0)),
        props,
        lights: lights(),
        lighting: LightingParams::default(),
        camera_start: Vec3::new(-21.0, 0.2, -15.0),
        camera_speed: 1.0,
        speed_multiplier: 5.0,
        height_mode: HeightMode::WalkBob { base: 0.2, amplitude: 0.2, frequency: 10.0 },
        music: None,
    }
}

fn casa() -> SceneDescription {
    let mut props = lamps();
    props.push(ghost());
    SceneDescription {
        variant: "casa",
        window: WindowSettings { title: "Raycasting with Camera", width: 1920, height: 1080 },
        level: house_at(Vec3::new(0.402749, -0.332003, -49.6566)),
        props,
        lights: lights(),
        lighting: LightingParams::default(),
        camera_start: Vec3::new(0.0, EYE_HEIGHT, -65.0),
        camera_speed: 1.0,
        speed_multiplier: 1.0,
        height_mode: HeightMode::Fixed(EYE_HEIGHT),
        music: None,
    }
}

fn final_walkthrough() -> SceneDescription {
    let mut scene = casa();
    scene.variant = "final";
    scene.window = WindowSettings { title: "Raycasting with Camera", width: 800, height: 600 };
    let ghost = scene.props.pop();
    scene.props.extend([
        PropPlacement::new("pig", PIG_MODEL, Vec3::new(3.62067, 0.12, -70.2754)).rotated_y(90.0).scaled(0.5),
        PropPlacement::new("torso", TORSO_MODEL, Vec3::new(12.5226, 0.15, -70.0827)).scaled(0.5),
        PropPlacement::new("torso", TORSO_MODEL, Vec3::new(11.5226, 0.15, -70.0827)).rotated_y(-90.0).scaled(0.5),
        PropPlacement::new("egg", EGG_MODEL, Vec3::new(3.63193, 0.15, -69.0763)).rotated_y(180.0).scaled(0.05),
    ]);
    scene.props.extend(ghost);
    scene.music = Some(MUSIC_TRACK);
    scene
}

pub fn create_scene(variant: Variant) -> SceneDescription {
    match variant {
        Variant::TerrorHouse => terror_house(),
        Variant::Casa => casa(),
        Variant::Final => final_walkthrough(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_walks_the_house() {
        for variant in [Variant::TerrorHouse, Variant::Casa, Variant::Final] {
            let scene = create_scene(variant);
            assert_eq!(scene.level.model, HOUSE_MODEL);
            assert!(scene.level.is_static());
            assert_eq!(scene.lights.len(), 4);
            let lamp_count = scene.props.iter().filter(|p| p.model == LAMP_MODEL).count();
            assert_eq!(lamp_count, 3);
        }
    }

    #[test]
    fn final_variant_adds_props_and_music() {
        let scene = create_scene(Variant::Final);
        assert_eq!(scene.music, Some(MUSIC_TRACK));
        assert_eq!((scene.window.width, scene.window.height), (800, 600));
        for model in [PIG_MODEL, TORSO_MODEL, EGG_MODEL, GHOST_MODEL] {
            assert!(scene.model_ids().contains(&model));
        }
        assert_eq!(scene.props.iter().filter(|p| p.model == TORSO_MODEL).count(), 2);
    }

    #[test]
    fn terror_house_bobs_and_walks_faster() {
        let scene = create_scene(Variant::TerrorHouse);
        assert_eq!(scene.speed_multiplier, 5.0);
        assert!(matches!(scene.height_mode, HeightMode::WalkBob { .. }));
        assert!(scene.music.is_none());
    }

    #[test]
    fn lamp_light_indices_are_in_range() {
        let scene = create_scene(Variant::Casa);
        for prop in &scene.props {
            if let ShadingKind::Lamp { light_index } = prop.shading {
                assert!(light_index < scene.lights.len());
            }
        }
    }
}
