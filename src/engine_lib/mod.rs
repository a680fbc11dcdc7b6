// src/engine_lib/mod.rs
pub mod assets;
pub mod audio;
pub mod camera;
pub mod collision;
pub mod config;
pub mod controller;
pub mod movement;
pub mod scene_types;

pub use camera::{Camera, CameraMovement};
pub use collision::{probe, CollisionMesh, Ray, Triangle, TriangleIntersection};
pub use controller::CameraController;
pub use movement::{HeldKeys, HeightMode, MovementPermissions, WalkState};
pub use scene_types::{PropPlacement, SceneDescription};
