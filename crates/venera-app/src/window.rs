//! Window shell: winit event handling and per-frame orchestration.
//!
//! [`App`] implements winit's [`ApplicationHandler`]: the window and GPU come
//! up in `resumed`, input events are folded into the frame-coherent trackers,
//! and every `RedrawRequested` runs one driver tick followed by the visible
//! renders (main view, then minimaps while the modifier is held).

use std::sync::Arc;

use glam::Vec2;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use venera_assets::{AssetBundle, AssetError};
use venera_config::Config;
use venera_input::{
    DragTarget, KeyboardState, MotionBindings, MotionIntent, MouseState, route_drag,
};
use venera_render::{
    CaptureError, CaptureTarget, DepthBuffer, GlobeScene, GpuContext, LightUniform, RgbaPixels,
    SurfaceError, TerrainScene, capture_debug_viewport, init_gpu_blocking, minimap_viewport,
};
use venera_rig::{DragDelta, OrbitRig, RigError};

use crate::cameras::{
    ChaseView, chase_camera, heading_light_direction, minimap_camera, nadir_camera,
};
use crate::frame::{FrameDriver, GlobeCapture, SimState};

/// Fatal startup errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required startup image failed to load; the running state must
    /// never be entered with textures missing.
    #[error("asset loading failed: {0}")]
    Asset(#[from] AssetError),

    /// The orbit rig's resting transform produced unusable axes.
    #[error("rig setup failed: {0}")]
    Rig(#[from] RigError),

    /// The windowing event loop could not be created or crashed.
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// The wgpu-backed implementation of the driver's capture seam.
struct GpuCapture<'a> {
    gpu: &'a GpuContext,
    target: &'a CaptureTarget,
    scene: &'a GlobeScene,
    globe: &'a venera_config::GlobeConfig,
}

impl GlobeCapture for GpuCapture<'_> {
    fn capture(&mut self, rig: &OrbitRig) -> Result<Vec<u8>, CaptureError> {
        let camera = nadir_camera(rig, self.globe);
        self.scene
            .render_capture(&self.gpu.device, &self.gpu.queue, self.target, &camera);
        self.target.read_back(&self.gpu.device, &self.gpu.queue)
    }
}

/// The application: configuration, simulation state, input trackers, and
/// (once `resumed` has run) the window and GPU resources.
pub struct App {
    config: Config,
    assets: AssetBundle,
    bindings: MotionBindings,
    keyboard: KeyboardState,
    mouse: MouseState,
    chase: ChaseView,
    driver: FrameDriver,
    sim: SimState,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    depth: Option<DepthBuffer>,
    capture: Option<CaptureTarget>,
    globe_scene: Option<GlobeScene>,
    terrain_scene: Option<TerrainScene>,
}

impl App {
    /// Build the pre-window application state.
    pub fn new(config: Config, assets: AssetBundle) -> Result<Self, AppError> {
        let sim = SimState::new(&config)?;
        Ok(Self {
            config,
            assets,
            bindings: MotionBindings::default(),
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            chase: ChaseView::default(),
            driver: FrameDriver::new(),
            sim,
            window: None,
            gpu: None,
            depth: None,
            capture: None,
            globe_scene: None,
            terrain_scene: None,
        })
    }

    fn surface_size(&self) -> (u32, u32) {
        self.gpu
            .as_ref()
            .map(|gpu| (gpu.surface_config.width, gpu.surface_config.height))
            .unwrap_or((1, 1))
    }

    /// One frame: tick the driver, upload what changed, render all views.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu), Some(depth), Some(capture), Some(globe), Some(terrain)) = (
            self.window.as_ref(),
            self.gpu.as_ref(),
            self.depth.as_ref(),
            self.capture.as_ref(),
            self.globe_scene.as_ref(),
            self.terrain_scene.as_ref(),
        ) else {
            return;
        };

        let intent = MotionIntent::capture(&self.keyboard, &self.bindings);
        let size = (gpu.surface_config.width, gpu.surface_config.height);

        // Pointer input: route drags by screen region, wheel zooms the chase
        // camera.
        let delta = self.mouse.delta();
        let drag = if self.mouse.any_button_held() && delta != Vec2::ZERO {
            let target = route_drag(self.mouse.position(), size, intent.show_minimap);
            if target == DragTarget::MainView {
                self.chase.raise(delta.y);
            }
            Some((
                target,
                DragDelta {
                    dx: delta.x,
                    dy: delta.y,
                },
            ))
        } else {
            None
        };
        let scroll = self.mouse.scroll();
        if scroll != 0.0 {
            self.chase.zoom(scroll);
        }

        let mut host = GpuCapture {
            gpu,
            target: capture,
            scene: globe,
            globe: &self.config.globe,
        };
        let outcome = self.driver.tick(&mut self.sim, intent, drag, &mut host);

        if outcome.field_refreshed {
            terrain.update_terrain(&gpu.queue, self.sim.terrain.vertices());
            terrain.set_vehicle_transform(&gpu.queue, self.sim.vehicle.model_matrix());
        }
        terrain.set_light(
            &gpu.queue,
            LightUniform::with_direction(heading_light_direction(
                &self.sim.heading,
                self.config.terrain.plane_scale,
            )),
        );

        match gpu.get_current_texture() {
            Ok(frame) => {
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let camera = chase_camera(
                    &self.sim.vehicle,
                    &self.sim.terrain_pivot,
                    &self.chase,
                    size.0 as f32 / size.1.max(1) as f32,
                );
                terrain.render(&gpu.device, &gpu.queue, &view, depth, &camera, None);

                if intent.show_minimap {
                    let mini = minimap_camera(&self.sim.minimap_orbit);
                    globe.render_to_surface(
                        &gpu.device,
                        &gpu.queue,
                        &view,
                        &mini,
                        Some(minimap_viewport(size.0, size.1)),
                    );

                    // The texture being read into the height field, as the
                    // nadir camera sees it.
                    let nadir = nadir_camera(&self.sim.rig, &self.config.globe);
                    globe.render_to_surface(
                        &gpu.device,
                        &gpu.queue,
                        &view,
                        &nadir,
                        Some(capture_debug_viewport(size.1)),
                    );
                }

                frame.present();
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => warn!("skipping frame: {e}"),
        }

        if self.config.debug.log_frame_stats && self.driver.frame_count() % 600 == 0 {
            info!(
                frame = self.driver.frame_count(),
                walk = self.sim.motion.walk_speed(),
                turn = self.sim.motion.turn_speed(),
                elevation = self.sim.vehicle.position.z,
                "frame stats"
            );
        }

        // Clear per-frame transient input after all systems have run.
        self.keyboard.clear_transients();
        self.mouse.clear_transients();

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        if self.config.window.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let gpu = match init_gpu_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.depth = Some(DepthBuffer::new(&gpu.device, size.width, size.height));

        // One capture pixel per terrain vertex.
        let resolution = self.config.terrain.detail + 1;
        self.capture = Some(CaptureTarget::new(&gpu.device, resolution));

        self.globe_scene = Some(GlobeScene::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format,
            &self.assets.globe_bump.rgba,
            self.assets.globe_bump.width,
            self.assets.globe_bump.height,
        ));

        fn pixels(img: &venera_assets::DecodedImage) -> RgbaPixels<'_> {
            RgbaPixels {
                rgba: &img.rgba,
                width: img.width,
                height: img.height,
            }
        }
        self.terrain_scene = Some(TerrainScene::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format,
            self.sim.terrain.vertices(),
            self.sim.terrain.indices(),
            self.config.terrain.plane_scale,
            self.sim.field.height_multiplier(),
            pixels(&self.assets.terrain_low),
            pixels(&self.assets.terrain_high),
            pixels(&self.assets.sky),
        ));

        self.gpu = Some(gpu);
        self.window = Some(window.clone());

        // All collaborators are live; the loop may start consuming them.
        self.driver.start_running();
        info!(
            "Entering running state ({}x{} capture, {} terrain vertices)",
            resolution,
            resolution,
            self.sim.terrain.vertices().len()
        );

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    if let Some(depth) = &mut self.depth {
                        depth.resize(&gpu.device, new_size.width, new_size.height);
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = self.surface_size();
                self.mouse.on_cursor_moved(position.x, position.y, size);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

/// Load assets, create the window, and run the loop until the process ends.
pub fn run(config: Config) -> Result<(), AppError> {
    info!("Loading startup images");
    let assets = AssetBundle::load(&config.assets)?;

    let mut app = App::new(config, assets)?;
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
