mod cli;
mod error;
mod framepace;
mod gpu;
mod particle;
mod physics;
mod render;
mod types;

use std::sync::Arc;

use clap::Parser;
use error::{StartupError, STARTUP_FAILURE_STATUS};
use framepace::Framepacer;
use gpu::GpuContext;
use log::{debug, error, info, warn};
use physics::Simulation;
use render::RenderModule;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

const WINDOW_SIZE: u32 = 800;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Collect Arguments
    let args = cli::Args::parse();
    let seed = args.seed.unwrap_or_else(particle::clock_seed);
    info!("Starting the {:?} demo with seed {}", args.dimension, seed);

    // Setup Winit
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => exit_with(e.into()),
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    // State
    let mut app_state = AppState {
        tokio_rt: tokio::runtime::Runtime::new()?,
        framepace: Framepacer::new(args.framerate),
        phase: Phase::Initializing,
        args,
        seed,
    };

    event_loop.run_app(&mut app_state)?;

    if let Phase::Terminating(Err(e)) = app_state.phase {
        exit_with(e);
    }

    info!("Rendered {} frames", app_state.framepace.frames());
    Ok(())
}

/// Report a startup failure and leave with a non-zero status
fn exit_with(err: StartupError) -> ! {
    error!("{:?}", err);
    println!("{}", err);
    std::process::exit(STARTUP_FAILURE_STATUS);
}

enum Phase {
    Initializing,
    Running(Box<Scene>),
    Terminating(Result<(), StartupError>),
}

/// Everything that exists while the demo is running
struct Scene {
    window: Arc<Window>,
    gpu: GpuContext,
    render_module: RenderModule,
    simulation: Box<dyn Simulation>,
}

impl Scene {
    fn render_frame(&self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.gpu.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let _rpass = self.render_module.begin_pass(&mut encoder, &view);
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();

        Ok(())
    }
}

struct AppState {
    tokio_rt: tokio::runtime::Runtime,
    framepace: Framepacer,
    phase: Phase,

    args: cli::Args,
    seed: u64,
}

impl AppState {
    fn create_scene(&self, event_loop: &ActiveEventLoop) -> Result<Scene, StartupError> {
        let dimension = self.args.dimension;

        let attributes = Window::default_attributes()
            .with_title(dimension.window_title())
            .with_inner_size(PhysicalSize::new(WINDOW_SIZE, WINDOW_SIZE));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let gpu = self.tokio_rt.block_on(GpuContext::new(
            window.clone(),
            self.args.backend.backends(),
        ))?;

        let simulation = physics::new_simulation(dimension, particle::seeded_rng(self.seed));
        let render_module = RenderModule::new(
            &gpu.device,
            &gpu.config,
            gpu.sample_count,
            dimension,
            simulation.num_particles(),
            self.args.point_size,
        );

        Ok(Scene {
            window,
            gpu,
            render_module,
            simulation,
        })
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.phase, Phase::Initializing) {
            return;
        }

        self.phase = match self.create_scene(event_loop) {
            Ok(scene) => {
                info!(
                    "{} particles in {:?}",
                    scene.simulation.num_particles(),
                    scene.simulation.dimension()
                );
                Phase::Running(Box::new(scene))
            }
            Err(e) => {
                event_loop.exit();
                Phase::Terminating(Err(e))
            }
        };
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Phase::Running(scene) = &mut self.phase else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                // Dropping the scene releases the window and the GPU context
                self.phase = Phase::Terminating(Ok(()));
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                scene.gpu.resize(new_size.width, new_size.height);

                let (width, height) = (scene.gpu.config.width, scene.gpu.config.height);
                debug!("Resized to {}x{}", width, height);
                scene
                    .render_module
                    .update_size(&scene.gpu.device, &scene.gpu.queue, width, height);
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Phase::Running(scene) = &mut self.phase else {
            return;
        };

        self.framepace.begin_frame();

        scene.simulation.step();
        scene
            .render_module
            .upload(&scene.gpu.queue, scene.simulation.flatten());

        match scene.render_frame() {
            Ok(()) => (),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                scene.gpu.reconfigure_surface();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Out of memory while acquiring the next frame");
                self.phase = Phase::Terminating(Ok(()));
                event_loop.exit();
                return;
            }
        }

        self.framepace.end_frame();
    }
}
