// src/app.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use winit::{
    event::{WindowEvent, DeviceEvent, ElementState},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, CursorGrabMode},
};
use haunted_walkthrough::demo_scene::HOUSE_MODEL;
use haunted_walkthrough::engine_lib::assets::{load_obj, AssetError, ModelData};
use haunted_walkthrough::engine_lib::audio::BackgroundMusic;
use haunted_walkthrough::engine_lib::camera::Camera;
use haunted_walkthrough::engine_lib::collision::CollisionMesh;
use haunted_walkthrough::engine_lib::config::{AppConfig, ConfigError};
use haunted_walkthrough::engine_lib::controller::CameraController;
use haunted_walkthrough::engine_lib::movement::{step_walk, MovementPermissions, WalkState};
use haunted_walkthrough::engine_lib::scene_types::{ModelId, SceneDescription};
use haunted_walkthrough::rendering_lib::{Renderer, WGSL_SHADER_SOURCE};
use crate::ui::{build_ui, HudState};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter")]
    NoAdapter,
    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Loads every model the scene names. The house is required; a missing prop
/// is logged and left undrawn.
fn load_models(config: &AppConfig, scene: &SceneDescription) -> Result<HashMap<ModelId, ModelData>, AssetError> {
    let mut models = HashMap::new();
    for id in scene.model_ids() {
        match load_obj(&config.asset_path(id)) {
            Ok(model) => {
                log::info!("Loaded {} ({} meshes, {} triangles)", id, model.meshes.len(), model.triangle_count());
                models.insert(id, model);
            }
            Err(e) if id == scene.level.model => return Err(e),
            Err(e) => log::warn!("{}; skipping", e),
        }
    }
    Ok(models)
}

/// The house's triangles baked into world space at its (static) placement.
fn world_collision_mesh(scene: &SceneDescription, models: &HashMap<ModelId, ModelData>) -> Result<CollisionMesh, AssetError> {
    let mesh = match models.get(scene.level.model) {
        Some(model) => model.collision_mesh()?,
        None => CollisionMesh::default(),
    };
    let world = mesh.to_world(&scene.level.model_matrix(0.0));
    if world.is_empty() {
        log::warn!("{} has no triangles; nothing will block movement", HOUSE_MODEL);
    }
    log::info!("Collision mesh: {} triangles from {}", world.triangle_count(), HOUSE_MODEL);
    Ok(world)
}

pub struct WalkthroughApp {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    renderer: Renderer,
    scene: SceneDescription,
    collision_mesh: CollisionMesh,
    probe_length: f32,
    camera: Camera,
    camera_controller: CameraController,
    walk: WalkState,
    permissions: MovementPermissions,
    started: Instant,
    music: Option<BackgroundMusic>,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl WalkthroughApp {
    pub async fn new(window: Arc<Window>, app_config: &AppConfig, scene: SceneDescription) -> Result<Self, AppError> {
        let models = load_models(app_config, &scene)?;
        let collision_mesh = world_collision_mesh(&scene, &models)?;

        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(AppError::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats.iter().copied()
            .find(|f| f.is_srgb()).unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(
            &device, &queue, config.format, WGSL_SHADER_SOURCE,
            config.width, config.height, &scene, &models,
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(), egui::ViewportId::ROOT, &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device, config.format, None, 1,
        );

        let mut camera = Camera::new(scene.camera_start);
        camera.movement_speed = scene.camera_speed;
        camera.mouse_sensitivity = app_config.mouse_sensitivity;

        let mut initial_grab = false;
        if window.has_focus() {
            if window.set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_e| window.set_cursor_grab(CursorGrabMode::Locked))
                .is_ok() {
                window.set_cursor_visible(false);
                initial_grab = true;
            } else { log::warn!("Could not grab cursor on init."); }
        }
        let camera_controller = CameraController::new(initial_grab);

        let music = match scene.music {
            Some(track) if app_config.play_music => match BackgroundMusic::play_looping(&app_config.asset_path(track)) {
                Ok(music) => Some(music),
                Err(e) => {
                    log::warn!("{}; continuing without music", e);
                    None
                }
            },
            _ => None,
        };

        log::info!("Walkthrough '{}' ready at {:?}", scene.variant, camera.position);

        Ok(Self {
            surface, device, queue, config, size,
            renderer,
            walk: WalkState::new(scene.height_mode),
            scene,
            collision_mesh,
            probe_length: app_config.probe_length,
            camera, camera_controller,
            permissions: MovementPermissions::ALL,
            started: Instant::now(),
            music,
            egui_ctx, egui_state, egui_renderer,
        })
    }

    pub fn get_size(&self) -> winit::dpi::PhysicalSize<u32> { self.size }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.device, new_size.width, new_size.height);
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.camera_controller.apply_look(&mut self.camera);
        self.permissions = step_walk(
            &mut self.camera,
            &mut self.walk,
            &self.camera_controller.held_keys,
            &self.collision_mesh,
            self.probe_length,
            self.scene.speed_multiplier,
            dt,
        );
        log::debug!("camera at {:?}, permissions {:?}", self.camera.position, self.permissions);
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Main Command Encoder"),
        });

        let aspect_ratio = self.config.width as f32 / self.config.height as f32;
        self.renderer.render_scene(
            &self.queue, &mut encoder, &view,
            &self.scene, &self.camera,
            self.started.elapsed().as_secs_f32(),
            aspect_ratio,
        );

        let hud = HudState {
            variant: self.scene.variant,
            position: self.camera.position,
            permissions: self.permissions,
            cursor_grabbed: self.camera_controller.cursor_grabbed,
        };
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| { build_ui(ctx, &hud); });
        self.egui_state.handle_platform_output(window, full_output.platform_output);
        let tris = self.egui_ctx.tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.egui_renderer.update_buffers(&self.device, &self.queue, &mut encoder, &tris, &screen_descriptor);
        {
            let mut gui_render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view, resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None, occlusion_query_set: None, timestamp_writes: None,
            });
            self.egui_renderer.render(&mut gui_render_pass, &tris, &screen_descriptor);
        }
        for tex_id in &full_output.textures_delta.free { self.egui_renderer.free_texture(tex_id); }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();
        Ok(())
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        if self.egui_state.on_window_event(window, event).consumed { return true; }
        if let WindowEvent::KeyboardInput { event: key_event, .. } = event {
            if key_event.state == ElementState::Pressed
                && !key_event.repeat
                && key_event.physical_key == PhysicalKey::Code(KeyCode::KeyM)
            {
                if let Some(music) = &self.music {
                    music.toggle_pause();
                    log::info!("Music {}", if music.is_paused() { "paused" } else { "resumed" });
                }
                return true;
            }
        }
        self.camera_controller.handle_window_event(event, window)
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent, _window: &Window) {
        self.camera_controller.handle_device_event(event);
    }
}
