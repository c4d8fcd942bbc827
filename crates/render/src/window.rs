//! Window creation and pointer tracking with winit.

use std::sync::Arc;

use anyhow::Result;
use glam::Vec2;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

/// Native window hosting the demo canvas.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Title bar text; stands in for the host element name.
    pub title: String,
    /// Requested inner width in physical pixels.
    pub width: u32,
    /// Requested inner height in physical pixels.
    pub height: u32,
    /// Present in step with the display refresh.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "hovercube".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// Owns the demo window and the event loop that drives it.
pub struct WindowManager {
    window: Arc<Window>,
    event_loop: Option<EventLoop<()>>,
}

impl WindowManager {
    /// Open the demo window. It is not drawn into until a renderer attaches.
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .build(&event_loop)?;

        Ok(Self {
            window: Arc::new(window),
            event_loop: Some(event_loop),
        })
    }

    /// Shared handle for surface creation.
    pub fn window(&self) -> Arc<Window> {
        self.window.clone()
    }

    /// Inner size in physical pixels, used for the first viewport resize.
    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Poll events until `callback` returns `false`.
    ///
    /// Polling keeps `AboutToWait` firing so the cube animates without input.
    pub fn run<F>(mut self, mut callback: F) -> Result<()>
    where
        F: FnMut(Event<()>, &Window) -> bool + 'static,
    {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("Event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let window = self.window;

        event_loop.run(move |event, elwt| {
            let should_continue = callback(event, &window);

            if !should_continue {
                elwt.exit();
            }
        })?;

        Ok(())
    }
}

/// Pointer change derived from window events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Cursor moved to this window-space position in pixels.
    Moved(Vec2),
    /// Cursor left the window.
    Left,
}

/// Last known cursor position.
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    position: Option<Vec2>,
}

impl PointerInput {
    /// Create a tracker with no known cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position in pixels, if the cursor is over the window.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Record a cursor move.
    pub fn moved(&mut self, x: f64, y: f64) -> PointerEvent {
        let position = Vec2::new(x as f32, y as f32);
        self.position = Some(position);
        PointerEvent::Moved(position)
    }

    /// Record the cursor leaving. Returns `None` if it was already outside.
    pub fn left(&mut self) -> Option<PointerEvent> {
        self.position.take().map(|_| PointerEvent::Left)
    }

    /// Translate a window event into a pointer change.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(self.moved(position.x, position.y)),
            WindowEvent::CursorLeft { .. } => self.left(),
            _ => None,
        }
    }
}
