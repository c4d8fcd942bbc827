//! Box geometry and the axis-aligned bounds used for ray tests.

use glam::Vec3;

/// Box centered on the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z.
    pub depth: f32,
}

impl BoxGeometry {
    /// Create a box with the given extents.
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Create a cube with equal extents.
    pub fn cube(size: f32) -> Self {
        Self::new(size, size, size)
    }

    /// Extents as a vector.
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    /// Local-space bounds.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(Vec3::ZERO, self.size())
    }
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self::cube(1.0)
    }
}

/// Entry point of a ray into an [`Aabb`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AabbHit {
    /// Ray parameter at the entry point.
    pub t: f32,
    /// Outward normal of the face the ray entered through.
    pub normal: Vec3,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create from min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from a center and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Slab test against the outside faces of the box.
    ///
    /// Rays starting inside the box or pointing away from it miss. `t` is in
    /// units of `ray_dir`, so it is a distance only when `ray_dir` is normalized.
    pub fn ray_intersection(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<AabbHit> {
        let inv_dir = ray_dir.recip();

        let t1 = (self.min - ray_origin) * inv_dir;
        let t2 = (self.max - ray_origin) * inv_dir;
        let near = t1.min(t2);
        let far = t1.max(t2);

        let tmin = near.max_element();
        let tmax = far.min_element();

        if tmin.is_nan() || tmax.is_nan() || tmax < 0.0 || tmin > tmax {
            return None;
        }

        // Origin inside the box: only back faces are ahead.
        if tmin < 0.0 {
            return None;
        }

        let normal = if tmin == near.x {
            Vec3::new(-ray_dir.x.signum(), 0.0, 0.0)
        } else if tmin == near.y {
            Vec3::new(0.0, -ray_dir.y.signum(), 0.0)
        } else {
            Vec3::new(0.0, 0.0, -ray_dir.z.signum())
        };

        Some(AabbHit { t: tmin, normal })
    }
}
