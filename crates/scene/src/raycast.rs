//! Pointer ray casting through the camera into the scene graph.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::object::ObjectId;
use crate::scene::Scene;

/// One object hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Object that was hit.
    pub object: ObjectId,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// World-space hit position.
    pub point: Vec3,
    /// World-space normal of the face that was hit.
    pub normal: Vec3,
}

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from the camera through a point in normalized device coordinates.
    pub fn from_camera(ndc: Vec2, camera: &Camera) -> Self {
        let through = camera.unproject(ndc.extend(0.5));
        Self::new(camera.position, through - camera.position)
    }

    /// Point at parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Convert a window-space pointer position (pixels, origin top-left) into
/// normalized device coordinates (`-1..1`, Y up).
pub fn pointer_to_ndc(position: Vec2, size: (u32, u32)) -> Vec2 {
    Vec2::new(
        position.x / size.0 as f32 * 2.0 - 1.0,
        -(position.y / size.1 as f32) * 2.0 + 1.0,
    )
}

/// Casts rays against scene meshes.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    /// Hits closer than this are ignored.
    pub near: f32,
    /// Hits farther than this are ignored.
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl Raycaster {
    /// Create a raycaster with an unbounded range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intersect `ray` with `roots` (and their descendants when `recursive`),
    /// nearest first.
    pub fn intersect_objects(
        &self,
        ray: &Ray,
        scene: &Scene,
        roots: &[ObjectId],
        recursive: bool,
    ) -> Vec<Intersection> {
        let mut hits = Vec::new();
        if !ray.origin.is_finite() || !ray.direction.is_finite() || ray.direction == Vec3::ZERO {
            return hits;
        }

        let mut pending: Vec<ObjectId> = roots.iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            let Some(object) = scene.object(id) else {
                continue;
            };
            if !object.visible {
                continue;
            }
            if let Some(hit) = self.intersect_object(ray, scene, id) {
                hits.push(hit);
            }
            if recursive {
                pending.extend(object.children().iter().rev().copied());
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Intersect `ray` with a single mesh object.
    pub fn intersect_object(&self, ray: &Ray, scene: &Scene, id: ObjectId) -> Option<Intersection> {
        let mesh = scene.object(id)?.mesh.as_ref()?;
        let world = scene.world_matrix(id)?;
        if world.determinant() == 0.0 {
            return None;
        }
        let inverse = world.inverse();

        let local_origin = inverse.transform_point3(ray.origin);
        let local_dir = inverse.transform_vector3(ray.direction);
        let hit = mesh.geometry.bounds().ray_intersection(local_origin, local_dir)?;

        // Affine maps preserve the ray parameter.
        let point = ray.at(hit.t);
        let distance = ray.origin.distance(point);
        if distance < self.near || distance > self.far {
            return None;
        }
        let normal = inverse
            .transpose()
            .transform_vector3(hit.normal)
            .normalize_or_zero();

        Some(Intersection {
            object: id,
            distance,
            point,
            normal,
        })
    }

    /// Cast from the camera through `ndc` against every scene object.
    pub fn intersect_from_camera(&self, ndc: Vec2, camera: &Camera, scene: &Scene) -> Vec<Intersection> {
        if !ndc.is_finite() {
            return Vec::new();
        }
        let ray = Ray::from_camera(ndc, camera);
        self.intersect_objects(&ray, scene, scene.children(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxGeometry;
    use crate::object::{BasicMaterial, Mesh, Object3D};

    fn cube_at(scene: &mut Scene, name: &str, position: Vec3) -> ObjectId {
        let mut object = Object3D::mesh(name, Mesh::new(BoxGeometry::cube(1.0), BasicMaterial::default()));
        object.transform.position = position;
        scene.add(object)
    }

    #[test]
    fn pointer_center_maps_to_ndc_origin() {
        let ndc = pointer_to_ndc(Vec2::new(400.0, 300.0), (800, 600));
        assert_eq!(ndc, Vec2::ZERO);
        let corner = pointer_to_ndc(Vec2::ZERO, (800, 600));
        assert_eq!(corner, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn zero_sized_window_yields_no_hits() {
        let mut scene = Scene::new();
        cube_at(&mut scene, "cube", Vec3::ZERO);
        let ndc = pointer_to_ndc(Vec2::new(10.0, 10.0), (0, 0));
        let hits = Raycaster::new().intersect_from_camera(ndc, &Camera::default(), &scene);
        assert!(hits.is_empty());
    }

    #[test]
    fn center_ray_hits_cube_front_face() {
        let mut scene = Scene::new();
        let cube = cube_at(&mut scene, "cube", Vec3::ZERO);
        let hits = Raycaster::new().intersect_from_camera(Vec2::ZERO, &Camera::default(), &scene);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].object, cube);
        assert!((hits[0].distance - 4.5).abs() < 1e-3);
        assert!((hits[0].normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let mut scene = Scene::new();
        let far = cube_at(&mut scene, "far", Vec3::new(0.0, 0.0, -3.0));
        let near = cube_at(&mut scene, "near", Vec3::new(0.0, 0.0, 1.0));
        let hits = Raycaster::new().intersect_from_camera(Vec2::ZERO, &Camera::default(), &scene);
        let order: Vec<_> = hits.iter().map(|hit| hit.object).collect();
        assert_eq!(order, vec![near, far]);
    }

    #[test]
    fn rotated_cube_is_hit_on_its_corner() {
        let mut scene = Scene::new();
        let mut object = Object3D::mesh("cube", Mesh::default());
        object.transform.rotation = Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0);
        let id = scene.add(object);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = Raycaster::new().intersect_object(&ray, &scene, id).unwrap();
        // Rotated 45 degrees, the nearest edge sits at half the diagonal.
        assert!((hit.point.z - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn scaled_parent_hit_lies_on_world_ray() {
        let mut scene = Scene::new();
        let mut group = Object3D::group("group");
        group.transform.scale = Vec3::splat(2.0);
        group.transform.position = Vec3::new(0.0, 0.0, -1.0);
        let group = scene.add(group);
        let child = scene
            .add_child(group, Object3D::mesh("child", Mesh::default()))
            .unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = Raycaster::new().intersect_object(&ray, &scene, child).unwrap();
        // Front face at local z = 0.5 lands at world z = -1 + 2 * 0.5.
        assert!((hit.point - Vec3::ZERO).length() < 1e-4);
        assert!((hit.distance - 5.0).abs() < 1e-4);
        assert!((ray.at(hit.distance) - hit.point).length() < 1e-4);
    }

    #[test]
    fn recursive_flag_controls_children() {
        let mut scene = Scene::new();
        let group = scene.add(Object3D::group("group"));
        let child = scene
            .add_child(group, Object3D::mesh("child", Mesh::default()))
            .unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let raycaster = Raycaster::new();

        assert!(raycaster
            .intersect_objects(&ray, &scene, &[group], false)
            .is_empty());
        let hits = raycaster.intersect_objects(&ray, &scene, &[group], true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].object, child);
    }

    #[test]
    fn invisible_objects_are_skipped() {
        let mut scene = Scene::new();
        let cube = cube_at(&mut scene, "cube", Vec3::ZERO);
        scene.object_mut(cube).unwrap().visible = false;
        let hits = Raycaster::new().intersect_from_camera(Vec2::ZERO, &Camera::default(), &scene);
        assert!(hits.is_empty());
    }

    #[test]
    fn off_center_pointer_misses() {
        let mut scene = Scene::new();
        cube_at(&mut scene, "cube", Vec3::ZERO);
        let hits =
            Raycaster::new().intersect_from_camera(Vec2::new(0.9, 0.9), &Camera::default(), &scene);
        assert!(hits.is_empty());
    }
}
