//! Entry point for the hybrid compute/render viewer.

use anyhow::Result;
use clap::Parser;
use hybrid_viewer::{app::App, error::ViewerError, input::FrameInputs};
use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

/// `hybrid_viewer` - paints the surface with a compute kernel every frame,
/// then draws a spinning textured mesh over it in the same frame.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Config {
    /// Initial window width in logical pixels.
    #[arg(long, env = "VIEWER_WIDTH", default_value_t = 1280)]
    width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, env = "VIEWER_HEIGHT", default_value_t = 720)]
    height: u32,

    /// Update rate of the synthetic attitude feed in hertz.
    ///
    /// The feed stands in for a platform motion sensor and drives the
    /// backdrop's tilt. Zero disables it.
    #[arg(long, env = "VIEWER_ATTITUDE_HZ", default_value_t = 50.0)]
    attitude_hz: f64,
}

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // Create the event loop and window.
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Hybrid Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .build(&event_loop)?,
    );

    // Initialise the application (async -> sync).
    let mut app = pollster::block_on(App::new(window.clone()))?;
    app.load_demo_model()?;

    if config.attitude_hz > 0.0 {
        spawn_attitude_feed(app.inputs(), config.attitude_hz);
    }

    // Run the winit event loop.
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                // Forward events to the app; handle unconsumed window events.
                if !app.handle_event(&event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => match app.render() {
                            Ok(()) => {}
                            Err(ViewerError::SurfaceAcquire(wgpu::SurfaceError::Lost)) => {
                                app.resize(app.size());
                            }
                            Err(ViewerError::SurfaceAcquire(
                                wgpu::SurfaceError::OutOfMemory,
                            )) => {
                                log::error!("WGPU out of memory - exiting.");
                                elwt.exit();
                            }
                            // Anything else aborts only this frame.
                            Err(e) => log::warn!("Frame skipped: {e}"),
                        },
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                // Request a redraw each frame.
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}

/// Stands in for a platform motion sensor: feeds slowly drifting
/// pitch/roll/yaw samples into the shared frame state from its own thread.
fn spawn_attitude_feed(inputs: Arc<FrameInputs>, rate_hz: f64) {
    let interval = Duration::from_secs_f64(1.0 / rate_hz);
    thread::spawn(move || {
        let start = Instant::now();
        loop {
            let t = start.elapsed().as_secs_f32();
            let pitch = 0.25 * (0.31 * t).sin();
            let roll = 0.20 * (0.23 * t).cos();
            let yaw = 0.10 * (0.11 * t).sin();
            inputs.update_orientation(pitch, roll, yaw);
            thread::sleep(interval);
        }
    });
}
