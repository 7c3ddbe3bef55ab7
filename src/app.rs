use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::Config;
use crate::desktop::background::BackgroundRotator;
use crate::desktop::filesystem::DesktopLayout;
use crate::desktop::letters::LetterStore;
use crate::desktop::photos;
use crate::desktop::wallpaper::WallpaperLoader;
use crate::desktop::DesktopShell;
use crate::ecs::Viewport;
use crate::error::AppError;
use crate::input::{CommandBus, PointerState};
use crate::pet::tuning::TICK_RATE;
use crate::render::instance::{self, SpriteInstance};
use crate::render::GpuState;
use crate::sim::Simulation;
use crate::ui::Overlay;

/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    last_log_time: Instant,
    frame_time_sum: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64) {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_min = self.frame_time_min.min(dt);
        self.frame_time_max = self.frame_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= FPS_LOG_INTERVAL {
            let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
            let fps = self.frames_since_log as f64 / elapsed;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                fps,
                avg_ms,
                self.frame_time_min * 1000.0,
                self.frame_time_max * 1000.0,
                self.frame_count,
            );
            self.last_log_time = Instant::now();
            self.frame_time_sum = 0.0;
            self.frame_time_min = f64::MAX;
            self.frame_time_max = 0.0;
            self.frames_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    config: Config,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    overlay: Option<Overlay>,

    // Pet world, created once the window size is known
    sim: Option<Simulation>,

    // Desktop chrome
    shell: DesktopShell,
    rotator: BackgroundRotator,
    wallpapers: Option<WallpaperLoader>,
    photo_urls: Option<Receiver<Vec<String>>>,

    // Input
    pointer: PointerState,
    bus: CommandBus,
    cursor_hidden: bool,

    // Fixed timestep
    started: Instant,
    last_frame_time: Option<Instant>,
    accumulator: f64,
    tick_count: u64,

    // Frame timing
    frame_stats: FrameStats,

    // Screen dimensions
    screen_w: u32,
    screen_h: u32,

    // Reusable instance buffer (avoid per-frame allocation)
    instance_buf: Vec<SpriteInstance>,

    // First fatal error raised inside the event loop
    fatal: Option<AppError>,
}

impl App {
    fn new(config: Config, shell: DesktopShell) -> Self {
        let bg = &config.background;
        let rotator = BackgroundRotator::new(
            &bg.local_photos,
            &bg.direct_urls,
            &bg.default_image,
            bg.refresh_interval(),
        );
        Self {
            config,
            window: None,
            gpu: None,
            overlay: None,
            sim: None,
            shell,
            rotator,
            wallpapers: None,
            photo_urls: None,
            pointer: PointerState::new(),
            bus: CommandBus::new(),
            cursor_hidden: false,
            started: Instant::now(),
            last_frame_time: None,
            accumulator: 0.0,
            tick_count: 0,
            frame_stats: FrameStats::new(),
            screen_w: 0,
            screen_h: 0,
            instance_buf: Vec::with_capacity(8),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let wc = &self.config.window;
        let attrs = WindowAttributes::default()
            .with_title(wc.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(wc.width, wc.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        self.screen_w = size.width;
        self.screen_h = size.height;
        log::info!(
            "Window created: {}x{} (scale {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        let gpu = GpuState::new(window.clone())?;
        log::info!("wgpu + sprite pipeline initialized");
        self.overlay = Some(Overlay::new(&window, &gpu));
        self.gpu = Some(gpu);

        self.sim = Some(Simulation::new(
            Viewport::new(size.width as f32, size.height as f32),
            self.config.pet.seed,
            &self.config.pet.name,
        ));

        match WallpaperLoader::spawn() {
            Ok(loader) => {
                loader.request(self.rotator.current_source());
                self.wallpapers = Some(loader);
            }
            Err(e) => log::warn!("wallpaper worker failed to start: {e}"),
        }

        if self.config.photos.enabled {
            let (tx, rx) = mpsc::channel();
            match photos::spawn_fetch(self.config.photos.clone(), tx) {
                Ok(_) => self.photo_urls = Some(rx),
                Err(e) => log::warn!("photo fetch worker failed to start: {e}"),
            }
        }

        event_loop.set_control_flow(ControlFlow::Poll);
        self.window = Some(window);
        Ok(())
    }

    /// Run fixed-timestep simulation ticks.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        let Some(sim) = &mut self.sim else {
            return;
        };
        while self.accumulator >= TICK_RATE {
            // Commands land on the first tick; later ticks see an empty bus.
            let commands = self.bus.take();
            sim.step(TICK_RATE as f32, &mut self.pointer, &commands);

            self.accumulator -= TICK_RATE;
            self.tick_count += 1;
        }
    }

    /// Interpolation alpha for rendering between ticks.
    fn interpolation_alpha(&self) -> f32 {
        (self.accumulator / TICK_RATE) as f32
    }

    /// Drain worker results and advance the wallpaper rotation.
    fn poll_background(&mut self, dt: f64) {
        if let Some(rx) = &self.photo_urls {
            if let Ok(urls) = rx.try_recv() {
                let was_default = !self.rotator.use_custom();
                self.rotator.extend(urls);
                log::info!("background rotation: {} image(s)", self.rotator.count());
                if was_default {
                    if let Some(loader) = &self.wallpapers {
                        loader.request(self.rotator.current_source());
                    }
                }
                self.photo_urls = None;
            }
        }

        if self.rotator.tick(Duration::from_secs_f64(dt)) {
            if let Some(loader) = &self.wallpapers {
                loader.request(self.rotator.current_source());
            }
        }

        if let (Some(loader), Some(overlay)) = (&self.wallpapers, &mut self.overlay) {
            if let Some(wp) = loader.poll() {
                overlay.set_wallpaper(wp);
            }
        }
    }

    fn sync_cursor(&mut self) {
        let hidden = self.sim.as_ref().is_some_and(Simulation::cursor_hidden);
        if hidden != self.cursor_hidden {
            if let Some(w) = &self.window {
                w.set_cursor_visible(!hidden);
            }
            log::debug!("system cursor {}", if hidden { "hidden" } else { "visible" });
            self.cursor_hidden = hidden;
        }
    }

    /// Build the sprite instance buffer from the simulation.
    fn build_instances(&mut self) {
        self.instance_buf.clear();
        let alpha = self.interpolation_alpha();
        if let Some(sim) = &self.sim {
            let pet = sim.pet_view(alpha);
            let props = sim.props_view(alpha);
            instance::build(pet.as_ref(), &props, &mut self.instance_buf);
        }
    }

    fn render(&mut self) {
        let alpha = self.interpolation_alpha();
        let time = self.started.elapsed().as_secs_f32();
        let (Some(window), Some(gpu), Some(overlay)) =
            (&self.window, &mut self.gpu, &mut self.overlay)
        else {
            return;
        };

        gpu.update_sprites(&self.instance_buf, time);
        let Some(frame) = gpu.begin_frame() else {
            return;
        };
        let mut encoder = frame.encoder;

        let pet = self.sim.as_ref().and_then(|s| s.pet_view(alpha));
        let (primitives, textures_delta, screen_descriptor) = overlay.run_frame(
            window,
            self.screen_w,
            self.screen_h,
            &mut self.shell,
            pet.as_ref(),
            &mut self.bus,
        );
        let cmd_bufs = overlay.prepare(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &primitives,
            &textures_delta,
            &screen_descriptor,
        );

        {
            let mut pass = GpuState::begin_desktop_pass(&mut encoder, &frame.view);
            overlay.render(&mut pass, &primitives, &screen_descriptor);
        }
        gpu.draw_sprites(&mut encoder, &frame.view);

        gpu.finish_frame(encoder, frame.output, cmd_bufs);
        overlay.free_textures(&textures_delta);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(overlay)) = (&self.window, &mut self.overlay) {
            // Pointer events still reach the pet; egui only decides whether a
            // press counts as a desktop press.
            overlay.on_window_event(window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let typing = self
                    .overlay
                    .as_ref()
                    .is_some_and(|o| o.egui_ctx.wants_keyboard_input());
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                    && !typing
                {
                    log::info!("ESC pressed, exiting");
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer
                    .move_to(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.pointer.leave(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    let on_ui = self.overlay.as_ref().is_some_and(Overlay::pointer_over_ui);
                    self.pointer.press(on_ui);
                }
                ElementState::Released => self.pointer.release(),
            },
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                if new_size.width > 0 && new_size.height > 0 {
                    self.screen_w = new_size.width;
                    self.screen_h = new_size.height;
                    if let Some(sim) = &mut self.sim {
                        sim.resize(Viewport::new(new_size.width as f32, new_size.height as f32));
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                // --- Timing ---
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();

                    self.frame_stats.record_frame(dt);
                    self.run_fixed_update(dt);
                    self.shell.tick(dt as f32);
                    self.poll_background(dt);
                }
                self.last_frame_time = Some(now);

                self.sync_cursor();
                self.build_instances();
                self.render();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("shutting down after {} ticks", self.tick_count);
    }
}

/// Entry point: create event loop and run.
pub fn run(config: Config) -> Result<(), AppError> {
    let layout = match DesktopLayout::embedded() {
        Ok(layout) => layout,
        Err(e) => {
            log::error!("embedded desktop layout is invalid: {e}");
            DesktopLayout {
                file_system: Vec::new(),
                icons: Vec::new(),
            }
        }
    };
    let store = LetterStore::new(config.letters.resolved_store_path());
    let shell = DesktopShell::new(layout, store);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, shell);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
