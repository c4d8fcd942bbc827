//! The demo scene: one cube that lights up while hovered.

use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::animation::{AnimationDriver, FrameRenderer, DEFAULT_SPIN};
use crate::camera::Camera;
use crate::color::Color;
use crate::geometry::BoxGeometry;
use crate::hover::HoverTracker;
use crate::object::{BasicMaterial, Mesh, Object3D, ObjectId};
use crate::raycast::{pointer_to_ndc, Intersection, Raycaster};
use crate::resize::{RenderSurface, ResizeReactor, ViewportSize};
use crate::scene::Scene;

/// Knobs for [`DemoScene::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSettings {
    /// Edge length of the cube.
    pub cube_size: f32,
    /// Initial cube color.
    pub color: Color,
    /// Color while hovered.
    pub hover_color: Color,
    /// Color after the pointer leaves.
    pub rest_color: Color,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Distance from the camera to the cube along +Z.
    pub camera_distance: f32,
    /// Initial aspect ratio, replaced by the first resize.
    pub aspect: f32,
    /// Rotation per frame in radians.
    pub spin: Vec3,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            cube_size: 1.0,
            color: Color::from_hex(0x00ff00),
            hover_color: Color::from_hex(0xff69b4),
            rest_color: Color::from_hex(0x008000),
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_distance: 5.0,
            aspect: 16.0 / 9.0,
            spin: DEFAULT_SPIN,
        }
    }
}

/// Scene, camera and the controllers that drive them.
#[derive(Debug)]
pub struct DemoScene {
    /// Scene graph.
    pub scene: Scene,
    /// The single camera, shared by resize, ray casting and rendering.
    pub camera: Camera,
    /// Id of the cube mesh.
    pub cube: ObjectId,
    /// Hovered-set owner.
    pub hover: HoverTracker,
    /// Viewport bookkeeping.
    pub resizer: ResizeReactor,
    /// Per-frame spin.
    pub animation: AnimationDriver,
    raycaster: Raycaster,
}

impl DemoScene {
    /// Build the scene: exactly one cube, one camera.
    pub fn build(settings: &DemoSettings) -> Self {
        let mut scene = Scene::new();
        let cube = scene.add(Object3D::mesh(
            "cube",
            Mesh::new(
                BoxGeometry::cube(settings.cube_size),
                BasicMaterial::new(settings.color),
            ),
        ));

        let hover_color = settings.hover_color;
        let rest_color = settings.rest_color;
        // The id was just returned by `add`, so the lookup cannot miss.
        if let Ok(handlers) = scene.handlers_mut(cube) {
            handlers
                .on_pointer_over(move |object, _| {
                    if let Some(material) = object.material_mut() {
                        material.color = hover_color;
                    }
                })
                .on_pointer_out(move |object, _| {
                    if let Some(material) = object.material_mut() {
                        material.color = rest_color;
                    }
                });
        }

        let mut camera = Camera::new(settings.fov_degrees, settings.aspect, settings.near, settings.far);
        camera.position = Vec3::new(0.0, 0.0, settings.camera_distance);

        info!(%cube, color = %settings.color, "demo scene built");

        Self {
            scene,
            camera,
            cube,
            hover: HoverTracker::new(),
            resizer: ResizeReactor::new(),
            animation: AnimationDriver::with_spin(cube, settings.spin),
            raycaster: Raycaster::new(),
        }
    }

    /// Handle a window resize.
    pub fn resize<S>(&mut self, width: u32, height: u32, surface: &mut S) -> Option<ViewportSize>
    where
        S: RenderSurface + ?Sized,
    {
        self.resizer
            .resize(width, height, &mut self.camera, &mut self.scene, surface)
    }

    /// Handle a pointer move given in window pixels. Returns the hit list.
    pub fn pointer_moved(&mut self, position: Vec2) -> Vec<Intersection> {
        let ndc = pointer_to_ndc(position, self.resizer.size());
        let hits = self
            .raycaster
            .intersect_from_camera(ndc, &self.camera, &self.scene);
        self.hover.update(&hits, &mut self.scene);
        hits
    }

    /// Handle the pointer leaving the window.
    pub fn pointer_left(&mut self) {
        debug!(hovered = self.hover.len(), "pointer left window");
        self.hover.clear(&mut self.scene);
    }

    /// Advance one animation frame and render it.
    pub fn frame<R>(&mut self, renderer: &mut R) -> Result<(), R::Error>
    where
        R: FrameRenderer + ?Sized,
    {
        self.animation.tick(&mut self.scene, &self.camera, renderer)
    }

    /// Current cube color.
    pub fn cube_color(&self) -> Option<Color> {
        self.scene
            .object(self.cube)
            .and_then(|object| object.mesh.as_ref())
            .map(|mesh| mesh.material.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSurface;
    impl RenderSurface for NullSurface {
        fn set_size(&mut self, _: u32, _: u32) {}
    }

    #[test]
    fn builds_exactly_one_cube() {
        let demo = DemoScene::build(&DemoSettings::default());
        assert_eq!(demo.scene.len(), 1);
        assert_eq!(demo.scene.children(), &[demo.cube]);
        assert_eq!(demo.cube_color().map(Color::to_hex), Some(0x00ff00));
        assert_eq!(demo.camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(demo.camera.fov, 75.0);
    }

    #[test]
    fn hover_changes_cube_color() {
        let mut demo = DemoScene::build(&DemoSettings::default());
        demo.resize(800, 600, &mut NullSurface);

        demo.pointer_moved(Vec2::new(400.0, 300.0));
        assert_eq!(demo.cube_color().map(Color::to_hex), Some(0xff69b4));

        demo.pointer_moved(Vec2::new(5.0, 5.0));
        assert_eq!(demo.cube_color().map(Color::to_hex), Some(0x008000));
    }

    #[test]
    fn leaving_window_releases_hover() {
        let mut demo = DemoScene::build(&DemoSettings::default());
        demo.resize(800, 600, &mut NullSurface);
        demo.pointer_moved(Vec2::new(400.0, 300.0));
        assert!(demo.hover.is_hovered(demo.cube));

        demo.pointer_left();
        assert!(!demo.hover.is_hovered(demo.cube));
        assert_eq!(demo.cube_color().map(Color::to_hex), Some(0x008000));
    }

    #[test]
    fn pointer_before_first_resize_hits_nothing() {
        let mut demo = DemoScene::build(&DemoSettings::default());
        assert!(demo.pointer_moved(Vec2::new(400.0, 300.0)).is_empty());
    }
}
