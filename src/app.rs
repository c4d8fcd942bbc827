use anyhow::{Context, Result};
use hovercube_render::{PointerEvent, PointerInput, RenderError, Renderer, WindowManager};
use hovercube_scene::DemoScene;
use tracing::{error, info};
use winit::event::{Event, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::config::DemoConfig;

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Running demo: renderer, scene and pointer state for one window.
pub struct App {
    renderer: Renderer,
    demo: DemoScene,
    pointer: PointerInput,
}

impl App {
    pub fn new(config: &DemoConfig, window_manager: &WindowManager) -> Result<Self> {
        let mut renderer = Renderer::new(config.renderer_config());
        pollster::block_on(renderer.initialize_gpu(window_manager.window()))
            .context("Failed to initialize GPU renderer")?;

        let mut demo = DemoScene::build(&config.demo_settings());
        let (width, height) = window_manager.size();
        demo.resize(width, height, &mut renderer);

        Ok(Self {
            renderer,
            demo,
            pointer: PointerInput::new(),
        })
    }

    pub fn handle_event(&mut self, event: &Event<()>, window: &Window) -> AppAction {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == window.id() => {
                if let Some(pointer) = self.pointer.handle_event(event) {
                    self.handle_pointer(pointer);
                }

                match event {
                    WindowEvent::CloseRequested => return AppAction::Quit,
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state.is_pressed()
                            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                        {
                            return AppAction::Quit;
                        }
                    }
                    WindowEvent::Resized(new_size) => {
                        self.demo
                            .resize(new_size.width, new_size.height, &mut self.renderer);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(err) = self.demo.frame(&mut self.renderer) {
                            error!(%err, "frame failed");
                            if matches!(err, RenderError::OutOfMemory) {
                                return AppAction::Quit;
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!(frames = self.renderer.frames(), "event loop exiting");
            }
            _ => {}
        }

        AppAction::Continue
    }

    fn handle_pointer(&mut self, pointer: PointerEvent) {
        match pointer {
            PointerEvent::Moved(position) => {
                self.demo.pointer_moved(position);
            }
            PointerEvent::Left => self.demo.pointer_left(),
        }
    }
}
