//! Native preview window.
//!
//! Opens a winit window and runs a particle field in it, the same way a page
//! would run it behind its hero section. Useful for tuning a configuration
//! before shipping it to the browser.
//!
//! ```ignore
//! Viewer::new(FieldConfig::default())
//!     .with_title("Backdrop")
//!     .with_size(1280, 720)
//!     .run()?;
//! ```
//!
//! | Key | Action |
//! |-----|--------|
//! | Space | pause / resume |
//! | R | respawn every particle |
//! | S | save a PNG snapshot |
//! | Escape | quit |

mod present;

pub use present::{Presenter, BLIT_SHADER};

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::ViewerError;
use crate::field::ParticleField;
use crate::frame_loop::{AnimationLoop, FrameHost};
use crate::input::{Input, KeyCode};
use crate::raster::Pixmap;
use crate::time::Time;
use crate::visuals::Rgba;

/// Frames between window title refreshes.
const TITLE_INTERVAL: u64 = 30;

/// Frame host backed by the window's redraw request.
pub struct RedrawHost {
    window: Arc<Window>,
}

impl FrameHost for RedrawHost {
    type Handle = ();

    fn request_frame(&mut self) -> Option<()> {
        self.window.request_redraw();
        Some(())
    }
}

/// Builder for the preview window.
pub struct Viewer {
    config: FieldConfig,
    title: String,
    size: (u32, u32),
    background: Rgba,
}

impl Viewer {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            title: "Backdrop".to_string(),
            size: (1280, 720),
            background: Rgba::rgb8(10, 10, 20, 1.0),
        }
    }

    /// Set the window title. The current FPS is appended while running.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Set the color the field is drawn over.
    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    viewer: Viewer,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    field: Option<ParticleField<Pixmap>>,
    frame_loop: Option<AnimationLoop<RedrawHost>>,
    input: Input,
    time: Time,
    paused: bool,
    occluded: bool,
    snapshots: u32,
    error: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            window: None,
            presenter: None,
            field: None,
            frame_loop: None,
            input: Input::new(),
            time: Time::new(),
            paused: false,
            occluded: false,
            snapshots: 0,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let (width, height) = self.viewer.size;
        let attrs = Window::default_attributes()
            .with_title(self.viewer.title.clone())
            .with_inner_size(LogicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        let size = window.inner_size();
        let surface = Pixmap::with_background(0, 0, self.viewer.background);
        let mut field = ParticleField::new(Some(surface), self.viewer.config.clone(), (size.width, size.height));
        let mut frame_loop = AnimationLoop::new(RedrawHost {
            window: window.clone(),
        });
        frame_loop.start(&mut field);

        log::info!(
            "preview running: {} particles at {}x{}",
            field.particles().len(),
            size.width,
            size.height
        );

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.field = Some(field);
        self.frame_loop = Some(frame_loop);
        Ok(())
    }

    /// Visible means neither paused by the user nor hidden by the compositor.
    fn sync_visibility(&mut self) {
        let visible = !self.paused && !self.occluded;
        self.time.set_running(visible);
        if let (Some(frame_loop), Some(field)) = (&mut self.frame_loop, &mut self.field) {
            frame_loop.set_visible(visible, field);
        }
        // A redraw requested while hidden may have been dropped.
        if visible {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        match key {
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "paused" } else { "resumed" });
                self.sync_visibility();
            }
            KeyCode::R => {
                if let Some(field) = &mut self.field {
                    let size = field.size();
                    field.reinitialize(size);
                }
            }
            KeyCode::S => self.save_snapshot(),
            KeyCode::Escape => event_loop.exit(),
            _ => {}
        }
    }

    fn save_snapshot(&mut self) {
        let Some(pixmap) = self.field.as_ref().and_then(|f| f.surface()) else {
            return;
        };
        self.snapshots += 1;
        let path = format!("backdrop-{:04}.png", self.snapshots);
        match pixmap.save_png(&path) {
            Ok(()) => log::info!("saved snapshot to {}", path),
            Err(e) => log::error!("snapshot failed: {}", e),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(presenter), Some(field)) = (&mut self.presenter, &mut self.field) else {
            return;
        };

        // Present the frame the previous step produced, then step the next one.
        if let Some(pixmap) = field.surface() {
            presenter.upload(pixmap);
        }
        match presenter.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::error!("render error: {:?}", e),
        }

        if let Some(frame_loop) = &mut self.frame_loop {
            if frame_loop.is_scheduled() && frame_loop.tick(field) {
                self.time.tick();
            }
        }

        if self.time.frame() % TITLE_INTERVAL == 1 {
            if let Some(window) = &self.window {
                window.set_title(&format!("{} - {:.0} FPS", self.viewer.title, self.time.fps()));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("failed to start preview: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
                if let Some(field) = &mut self.field {
                    field.resize(size.width, size.height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::Occluded(occluded) => {
                self.occluded = occluded;
                self.sync_visibility();
            }
            WindowEvent::CursorMoved { .. } => {
                if let Some(field) = &mut self.field {
                    field.set_pointer(self.input.pointer());
                }
            }
            WindowEvent::KeyboardInput { .. } => {
                let pressed: Vec<KeyCode> = [KeyCode::Space, KeyCode::R, KeyCode::S, KeyCode::Escape]
                    .into_iter()
                    .filter(|k| self.input.key_pressed(*k))
                    .collect();
                for key in pressed {
                    self.handle_key(key, event_loop);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }

        self.input.begin_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_builder_defaults() {
        let viewer = Viewer::new(FieldConfig::default());
        assert_eq!(viewer.title, "Backdrop");
        assert_eq!(viewer.size, (1280, 720));
        assert_eq!(viewer.background.a, 1.0);
    }

    #[test]
    fn test_builder_overrides() {
        let viewer = Viewer::new(FieldConfig::default())
            .with_title("Hero")
            .with_size(640, 480)
            .with_background(Rgba::BLACK);
        assert_eq!(viewer.title, "Hero");
        assert_eq!(viewer.size, (640, 480));
        assert_eq!(viewer.background, Rgba::BLACK);
    }

    #[test]
    fn test_pointer_follows_input() {
        // The viewer forwards the tracked pointer; the tracker starts at the origin.
        let mut input = Input::new();
        input.move_pointer(Vec2::new(320.0, 200.0));
        let mut field = ParticleField::new(
            Some(Pixmap::new(0, 0)),
            FieldConfig::default().with_particle_count(1).with_seed(3),
            (640, 400),
        );
        field.set_pointer(input.pointer());
        assert_eq!(field.pointer(), Vec2::new(320.0, 200.0));
    }
}
