//! Per-frame animation: spin one object, then render.

use glam::Vec3;
use tracing::trace;

use crate::camera::Camera;
use crate::object::ObjectId;
use crate::scene::Scene;

/// Something that can draw the scene through a camera.
pub trait FrameRenderer {
    /// Error raised when a frame cannot be drawn.
    type Error;

    /// Draw one frame.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error>;
}

/// Rotation increment applied every frame, in radians.
pub const DEFAULT_SPIN: Vec3 = Vec3::new(0.01, 0.01, 0.0);

/// Rotates a target object by a fixed amount each frame.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    target: ObjectId,
    spin: Vec3,
    frames: u64,
}

impl AnimationDriver {
    /// Drive `target` with [`DEFAULT_SPIN`].
    pub fn new(target: ObjectId) -> Self {
        Self::with_spin(target, DEFAULT_SPIN)
    }

    /// Drive `target` with a custom per-frame rotation.
    pub fn with_spin(target: ObjectId, spin: Vec3) -> Self {
        Self {
            target,
            spin,
            frames: 0,
        }
    }

    /// Object being animated.
    pub fn target(&self) -> ObjectId {
        self.target
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance one frame and render it with the shared camera.
    pub fn tick<R>(&mut self, scene: &mut Scene, camera: &Camera, renderer: &mut R) -> Result<(), R::Error>
    where
        R: FrameRenderer + ?Sized,
    {
        if let Some(object) = scene.object_mut(self.target) {
            object.transform.rotation += self.spin;
        }
        self.frames += 1;
        trace!(frame = self.frames, "animation tick");
        renderer.render(scene, camera)
    }
}
