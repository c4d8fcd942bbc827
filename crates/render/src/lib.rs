#![warn(missing_docs)]
//! Rendering facade built on top of wgpu for hovercube scenes.

use std::sync::Arc;

use hovercube_scene::{Camera, Color, FrameRenderer, RenderSurface, Scene};
use thiserror::Error;
use tracing::{debug, trace, warn};

mod context;
mod pipeline;
mod window;

pub use context::RenderContext;
pub use pipeline::{
    collect_draws, CameraUniform, DrawItem, MeshPipeline, MeshVertex, ObjectUniform,
    UNIT_CUBE_INDICES, UNIT_CUBE_VERTICES,
};
pub use window::{PointerEvent, PointerInput, WindowConfig, WindowManager};

/// Errors that abort a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// `render` was called before [`Renderer::initialize_gpu`].
    #[error("renderer used before GPU initialization")]
    NotInitialized,
    /// The device ran out of memory acquiring the next frame.
    #[error("GPU out of memory while acquiring a frame")]
    OutOfMemory,
}

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Wait for vertical blank when presenting.
    pub vsync: bool,
    /// Background color.
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            clear_color: Color::BLACK,
        }
    }
}

/// Main renderer owning GPU resources.
pub struct Renderer {
    config: RendererConfig,
    context: Option<RenderContext>,
    pipeline: Option<MeshPipeline>,
    frames: u64,
}

impl Renderer {
    /// Construct a renderer with the supplied config.
    pub fn new(config: RendererConfig) -> Self {
        tracing::info!(?config, "renderer initialized");
        Self {
            config,
            context: None,
            pipeline: None,
            frames: 0,
        }
    }

    /// Initialize GPU resources with a window (async).
    pub async fn initialize_gpu(&mut self, window: Arc<winit::window::Window>) -> anyhow::Result<()> {
        let context = RenderContext::new(window, self.config.vsync).await?;
        let pipeline = MeshPipeline::new(&context);

        self.config.width = context.size.0;
        self.config.height = context.size.1;
        self.context = Some(context);
        self.pipeline = Some(pipeline);
        Ok(())
    }

    /// Current output size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Resize the output surface.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 == 0 || new_size.1 == 0 {
            return;
        }
        self.config.width = new_size.0;
        self.config.height = new_size.1;
        if let Some(context) = &mut self.context {
            if context.resize(new_size) {
                if let Some(pipeline) = &mut self.pipeline {
                    pipeline.resize(&context.device, new_size);
                }
                debug!(width = new_size.0, height = new_size.1, "surface resized");
            }
        }
    }

    /// Draw `scene` through `camera` and present it.
    pub fn render_frame(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        let (Some(context), Some(pipeline)) = (self.context.as_ref(), self.pipeline.as_mut()) else {
            return Err(RenderError::NotInitialized);
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost or outdated; reconfiguring");
                context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(err) => {
                warn!(%err, "skipping frame");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        pipeline.prepare(&context.device, &context.queue, scene, camera);
        trace!(draws = pipeline.draw_count(), frame = self.frames, "frame prepared");

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        pipeline.draw(&mut encoder, &view, to_wgpu_color(self.config.clear_color));
        context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frames += 1;
        Ok(())
    }
}

impl RenderSurface for Renderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.resize((width, height));
    }
}

impl FrameRenderer for Renderer {
    type Error = RenderError;

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error> {
        self.render_frame(scene, camera)
    }
}

/// Clear values are linear, like shader outputs.
fn to_wgpu_color(color: Color) -> wgpu::Color {
    let [r, g, b, a] = color.to_linear_rgba();
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: f64::from(a),
    }
}
