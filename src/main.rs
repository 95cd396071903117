use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use segment_raycaster::projector::interp;
use segment_raycaster::renderer::{self, Frame};
use segment_raycaster::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};
use segment_raycaster::{AppError, Config, Viewer, World, project, sample};

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    config: Config,
    world: World,
    viewer: Viewer,
    fov: f64,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal buffer: map on the left, raycast view on the right
    fb: Vec<u32>,
    fb_w: usize,
    fb_h: usize,
    view_w: usize,

    scale_lut: ScaleLut,
    window_h: f64,

    // Input and movement
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
}

impl App {
    fn new(config: Config, world: World) -> Self {
        let view_w = config.view_width as usize;
        let fb_w = 2 * view_w;
        let fb_h = config.view_height as usize;
        let viewer = Viewer::new(
            [config.view_width as f64 / 2.0, config.view_height as f64 / 2.0],
            0.0, // facing +X
            config.fov_min,
        );

        Self {
            window: None,
            surface: None,
            fov: config.fov_min,
            config,
            world,
            viewer,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fb: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,
            view_w,

            scale_lut: ScaleLut::empty(),
            window_h: fb_h as f64,

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = Window::default_attributes()
            .with_title("Segment Raycaster")
            .with_inner_size(LogicalSize::new(self.fb_w as f64, self.fb_h as f64));

        let window = Rc::new(event_loop.create_window(attributes)?);
        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;

        self.window_h = window.inner_size().height as f64;
        window.request_redraw();

        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn tick(&mut self) {
        // Compute dt with cap to avoid huge jumps if the app was paused
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;
        let dt_s = dt.as_secs_f64();

        let axis = |pos: KeyCode, neg: KeyCode| -> f64 {
            (self.keys_down.contains(&pos) as i32 - self.keys_down.contains(&neg) as i32) as f64
        };
        let turn = axis(KeyCode::ArrowRight, KeyCode::ArrowLeft);
        let fwd = axis(KeyCode::ArrowUp, KeyCode::ArrowDown);

        if turn != 0.0 {
            self.viewer.rotate(turn * self.config.turn_speed * dt_s);
        }
        if fwd != 0.0 {
            self.viewer.move_forward(fwd * self.config.move_speed * dt_s);
        }
    }

    fn set_fov_from_cursor(&mut self, y: f64) {
        // cursor y in window pixels, mapped onto the internal buffer first
        let y_fb = if self.window_h > 0.0 {
            y * self.fb_h as f64 / self.window_h
        } else {
            0.0
        };
        self.fov = interp(
            y_fb,
            [0.0, self.fb_h as f64],
            [self.config.fov_min, self.config.fov_max],
        );
    }

    fn draw_scene(&mut self) {
        let rays = self.viewer.ray_fan(self.fov);
        let samples = sample(
            &rays,
            &self.world.segments,
            self.viewer.heading,
            self.config.ray_length,
        );
        let strips = project(
            &samples,
            self.config.view_width,
            self.config.view_height,
            self.config.max_distance(),
        );

        renderer::render_frame(
            &mut self.fb,
            self.fb_w,
            self.fb_h,
            self.view_w,
            &Frame {
                world: &self.world,
                viewer: &self.viewer,
                samples: &samples,
                strips: &strips,
            },
        );
    }

    fn present(&mut self, id: WindowId) -> Result<(), AppError> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (dw, dh) = (size.width as usize, size.height as usize);
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };

        // Set softbuffer to window size
        surface.resize(nw, nh)?;
        if self.scale_lut.dst_size() != (dw, dh) {
            self.scale_lut = build_scale_lut(dw, dh, self.fb_w, self.fb_h);
        }

        let mut buf = surface.buffer_mut()?;
        blit_nearest_stretch(&mut buf, dw, &self.fb, self.fb_w, &self.scale_lut);
        buf.present()?;
        Ok(())
    }

    fn count_frame(&mut self) {
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            debug!(
                "FPS: {:.1} heading {:.0} fov {:.0}",
                self.frame_counter as f32 / elapsed,
                self.viewer.heading,
                self.fov
            );
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            error!("failed to open window: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    use winit::event::ElementState;
                    match state {
                        ElementState::Pressed => {
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.set_fov_from_cursor(position.y);
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                self.draw_scene();

                if let Err(e) = self.present(id) {
                    error!("failed to present frame: {e}");
                    event_loop.exit();
                    return;
                }
                self.count_frame();
            }

            WindowEvent::Resized(new_size) => {
                self.window_h = new_size.height as f64;
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<(), AppError> {
    env_logger::init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(path.as_deref())?;
    let world = World::from_config(&config);
    info!(
        "{} walls in a {}x{} world, fov {}..{}",
        world.segments.len(),
        config.view_width,
        config.view_height,
        config.fov_min,
        config.fov_max
    );

    let event_loop = EventLoop::new()?;

    // about_to_wait requests the next redraw
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, world);
    event_loop.run_app(&mut app)?;
    Ok(())
}
