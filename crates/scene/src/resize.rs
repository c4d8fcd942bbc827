//! Window resize handling: camera aspect, world-space viewport and the
//! per-object resize notifications.

use tracing::{debug, info};

use crate::camera::Camera;
use crate::scene::Scene;

/// Visible world-space rectangle at the camera's look-at distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    /// World-space width.
    pub width: f32,
    /// World-space height.
    pub height: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl ViewportSize {
    /// Viewport of `camera` at its target distance for the given aspect.
    pub fn at_target(camera: &Camera, aspect: f32) -> Self {
        let distance = camera.distance_to_target();
        let height = 2.0 * (camera.fov_radians() / 2.0).tan() * distance;
        Self {
            width: height * aspect,
            height,
            aspect,
        }
    }
}

/// Output surface whose pixel size follows the window.
pub trait RenderSurface {
    /// Resize the drawable area to `width` x `height` pixels.
    fn set_size(&mut self, width: u32, height: u32);
}

/// Recomputes everything that depends on the window size.
#[derive(Debug, Default, Clone)]
pub struct ResizeReactor {
    size: (u32, u32),
    viewport: Option<ViewportSize>,
}

impl ResizeReactor {
    /// Create a reactor that has not seen a size yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied window size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Last computed viewport.
    pub fn viewport(&self) -> Option<ViewportSize> {
        self.viewport
    }

    /// Apply a new window size.
    ///
    /// Zero-area sizes (minimized windows) are ignored and return `None`.
    pub fn resize<S>(
        &mut self,
        width: u32,
        height: u32,
        camera: &mut Camera,
        scene: &mut Scene,
        surface: &mut S,
    ) -> Option<ViewportSize>
    where
        S: RenderSurface + ?Sized,
    {
        if width == 0 || height == 0 {
            debug!(width, height, "ignoring zero-area resize");
            return None;
        }

        let aspect = width as f32 / height as f32;
        camera.aspect = aspect;
        let viewport = ViewportSize::at_target(camera, aspect);
        camera.update_projection_matrix();
        surface.set_size(width, height);
        scene.dispatch_resize(&viewport);

        info!(
            width,
            height,
            aspect,
            viewport_width = viewport.width,
            viewport_height = viewport.height,
            "viewport resized"
        );

        self.size = (width, height);
        self.viewport = Some(viewport);
        Some(viewport)
    }
}
