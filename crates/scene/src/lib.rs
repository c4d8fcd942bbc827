#![warn(missing_docs)]
//! Scene graph, camera, ray casting and the pointer/resize/animation
//! controllers for hovercube.
//!
//! Nothing here touches the GPU. Rendering is reached through the
//! [`FrameRenderer`] and [`RenderSurface`] traits so the controllers can be
//! driven headless in tests.
//!
//! # Example
//!
//! ```rust
//! use hovercube_scene::{DemoScene, DemoSettings, RenderSurface};
//! use glam::Vec2;
//!
//! struct NoSurface;
//! impl RenderSurface for NoSurface {
//!     fn set_size(&mut self, _width: u32, _height: u32) {}
//! }
//!
//! let mut demo = DemoScene::build(&DemoSettings::default());
//! demo.resize(800, 600, &mut NoSurface);
//! let hits = demo.pointer_moved(Vec2::new(400.0, 300.0));
//! assert_eq!(hits[0].object, demo.cube);
//! ```

mod animation;
mod camera;
mod color;
mod demo;
mod geometry;
mod hover;
mod object;
mod raycast;
mod resize;
mod scene;

pub use animation::{AnimationDriver, FrameRenderer, DEFAULT_SPIN};
pub use camera::Camera;
pub use color::{Color, ParseColorError};
pub use demo::{DemoScene, DemoSettings};
pub use geometry::{Aabb, AabbHit, BoxGeometry};
pub use hover::{HoverTracker, PointerDispatch};
pub use object::{BasicMaterial, Mesh, Object3D, ObjectId, Transform};
pub use raycast::{pointer_to_ndc, Intersection, Ray, Raycaster};
pub use resize::{RenderSurface, ResizeReactor, ViewportSize};
pub use scene::{EventHandlers, PointerHandler, ResizeHandler, Scene, SceneError};
