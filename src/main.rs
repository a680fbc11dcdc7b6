// src/main.rs

mod app;
mod ui;

use std::path::PathBuf;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopWindowTarget, EventLoop},
    window::WindowBuilder,
};
use haunted_walkthrough::demo_scene::create_scene;
use haunted_walkthrough::engine_lib::config::AppConfig;
use haunted_walkthrough::engine_lib::scene_types::SceneDescription;
use app::{AppError, WalkthroughApp};

fn load_settings() -> Result<(AppConfig, SceneDescription), AppError> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::resolve(config_path.as_deref())?;
    let mut scene = create_scene(config.variant);
    if let Some(width) = config.window_width {
        scene.window.width = width;
    }
    if let Some(height) = config.window_height {
        scene.window.height = height;
    }
    log::info!("Starting variant '{}' from {}", scene.variant, config.asset_root.display());
    Ok((config, scene))
}

pub async fn run() {
    env_logger::init();

    let (config, scene) = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    let window = match WindowBuilder::new()
        .with_title(scene.window.title)
        .with_inner_size(winit::dpi::PhysicalSize::new(scene.window.width, scene.window.height))
        .build(&event_loop)
    {
        Ok(window) => std::sync::Arc::new(window),
        Err(e) => {
            log::error!("Failed to create window: {}", e);
            std::process::exit(1);
        }
    };

    let mut app_state = match WalkthroughApp::new(window.clone(), &config, scene).await {
        Ok(app) => app,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let mut last_time = std::time::Instant::now();

    let result = event_loop.run(move |event, target: &EventLoopWindowTarget<()>| {
        target.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                if !app_state.handle_window_event(event, &window) {
                    match event {
                        WindowEvent::CloseRequested => {
                            target.exit();
                        }
                        WindowEvent::Resized(physical_size) => {
                            app_state.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => { /* In AboutToWait */ }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: device_event, .. } => {
                app_state.handle_device_event(&device_event, &window);
            }
            Event::AboutToWait => {
                let now = std::time::Instant::now();
                let dt = (now - last_time).as_secs_f32();
                last_time = now;

                app_state.update(dt);
                match app_state.render(&window) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        app_state.resize(app_state.get_size());
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("WGPU Out Of Memory! Exiting.");
                        target.exit();
                    }
                    Err(e) => log::warn!("Surface error: {:?}", e),
                }

                if !target.exiting() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    });

    if let Err(e) = result {
        log::error!("Event loop terminated: {}", e);
    }
}

#[tokio::main]
async fn main() {
    run().await;
}
