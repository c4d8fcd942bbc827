//! Scene objects: transforms, meshes and materials.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::color::Color;
use crate::geometry::BoxGeometry;

/// Identifier unique to one object instance within a [`crate::Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Local transform relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Rotation as a quaternion.
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local matrix (translation * rotation * scale).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// Unlit material drawn with a single flat color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BasicMaterial {
    /// Surface color.
    pub color: Color,
}

impl BasicMaterial {
    /// Create a material with the given color.
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// Geometry paired with a material.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mesh {
    /// Shape.
    pub geometry: BoxGeometry,
    /// Appearance.
    pub material: BasicMaterial,
}

impl Mesh {
    /// Create a mesh.
    pub fn new(geometry: BoxGeometry, material: BasicMaterial) -> Self {
        Self { geometry, material }
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct Object3D {
    pub(crate) id: ObjectId,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    /// Human-readable label used in logs.
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Renderable content; `None` for grouping nodes.
    pub mesh: Option<Mesh>,
    /// Hidden objects are neither drawn nor hit by rays.
    pub visible: bool,
}

impl Object3D {
    /// Empty grouping node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId(0),
            parent: None,
            children: Vec::new(),
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            visible: true,
        }
    }

    /// Node carrying a mesh.
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::group(name)
        }
    }

    /// Identifier assigned when the object was added to a scene.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Parent node, `None` for scene roots.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Ordered child ids.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Material of the mesh, if any.
    pub fn material_mut(&mut self) -> Option<&mut BasicMaterial> {
        self.mesh.as_mut().map(|mesh| &mut mesh.material)
    }
}
