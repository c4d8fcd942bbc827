//! Perspective camera looking at a fixed target.

use glam::{Mat4, Vec3};

/// Perspective camera with a cached projection matrix.
///
/// Changing `fov`, `aspect`, `near` or `far` has no effect on
/// [`Camera::projection_matrix`] until [`Camera::update_projection_matrix`]
/// is called.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a camera at `(0, 0, 5)` looking at the origin.
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fov,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Vertical field of view in radians.
    pub fn fov_radians(&self) -> f32 {
        self.fov.to_radians()
    }

    /// Distance from the camera to its look-at target.
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Recompute the projection from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_radians(), self.aspect, self.near, self.far);
    }

    /// Cached projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// World to camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Map a normalized device coordinate back into world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection_matrix().inverse().project_point3(ndc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_cached_until_refreshed() {
        let mut camera = Camera::new(75.0, 4.0 / 3.0, 0.1, 1000.0);
        let before = camera.projection_matrix();
        camera.aspect = 16.0 / 9.0;
        assert_eq!(camera.projection_matrix(), before);
        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn default_camera_faces_origin() {
        let camera = Camera::default();
        assert!((camera.distance_to_target() - 5.0).abs() < 1e-6);
        let view_origin = camera.view_matrix().transform_point3(Vec3::ZERO);
        // Origin sits straight ahead (negative Z in view space).
        assert!(view_origin.x.abs() < 1e-6);
        assert!(view_origin.y.abs() < 1e-6);
        assert!((view_origin.z + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_view_projection_matrix() {
        let camera = Camera::default();
        assert!(camera.view_projection_matrix().determinant().abs() > 0.0);
    }

    #[test]
    fn unproject_center_lies_on_view_axis() {
        let camera = Camera::default();
        let p = camera.unproject(Vec3::new(0.0, 0.0, 0.5));
        assert!(p.x.abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
        assert!(p.z < camera.position.z);
    }
}
