//! Scene graph with per-object optional event handler slots.

use std::collections::HashMap;

use glam::Mat4;
use thiserror::Error;
use tracing::debug;

use crate::hover::PointerDispatch;
use crate::object::{Object3D, ObjectId};
use crate::raycast::Intersection;
use crate::resize::ViewportSize;

/// Callback for pointer events on an object.
pub type PointerHandler = Box<dyn FnMut(&mut Object3D, &Intersection)>;
/// Callback for viewport changes.
pub type ResizeHandler = Box<dyn FnMut(&mut Object3D, &ViewportSize)>;

/// Errors raised when addressing scene objects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The id does not name an object in this scene.
    #[error("object {0} is not part of the scene")]
    UnknownObject(ObjectId),
}

/// Optional handler slots; empty slots are skipped on dispatch.
#[derive(Default)]
pub struct EventHandlers {
    pointer_over: Option<PointerHandler>,
    pointer_out: Option<PointerHandler>,
    pointer_move: Option<PointerHandler>,
    resize: Option<ResizeHandler>,
}

impl EventHandlers {
    /// Called once when the pointer starts intersecting the object.
    pub fn on_pointer_over<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Object3D, &Intersection) + 'static,
    {
        self.pointer_over = Some(Box::new(handler));
        self
    }

    /// Called once when the pointer stops intersecting the object.
    pub fn on_pointer_out<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Object3D, &Intersection) + 'static,
    {
        self.pointer_out = Some(Box::new(handler));
        self
    }

    /// Called on every pointer update while intersecting.
    pub fn on_pointer_move<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Object3D, &Intersection) + 'static,
    {
        self.pointer_move = Some(Box::new(handler));
        self
    }

    /// Called after every viewport recomputation.
    pub fn on_resize<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Object3D, &ViewportSize) + 'static,
    {
        self.resize = Some(Box::new(handler));
        self
    }

    /// Whether any pointer slot is filled.
    pub fn has_pointer_handlers(&self) -> bool {
        self.pointer_over.is_some() || self.pointer_out.is_some() || self.pointer_move.is_some()
    }

    /// Whether the resize slot is filled.
    pub fn has_resize_handler(&self) -> bool {
        self.resize.is_some()
    }
}

impl std::fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandlers")
            .field("pointer_over", &self.pointer_over.is_some())
            .field("pointer_out", &self.pointer_out.is_some())
            .field("pointer_move", &self.pointer_move.is_some())
            .field("resize", &self.resize.is_some())
            .finish()
    }
}

#[derive(Debug)]
struct Entry {
    object: Object3D,
    handlers: EventHandlers,
}

#[derive(Clone, Copy)]
enum PointerSlot {
    Over,
    Out,
    Move,
}

/// Tree of [`Object3D`] nodes.
#[derive(Debug, Default)]
pub struct Scene {
    entries: HashMap<ObjectId, Entry>,
    roots: Vec<ObjectId>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object at the top level.
    pub fn add(&mut self, object: Object3D) -> ObjectId {
        let id = self.insert(object, None);
        self.roots.push(id);
        id
    }

    /// Add an object beneath `parent`.
    pub fn add_child(&mut self, parent: ObjectId, object: Object3D) -> Result<ObjectId, SceneError> {
        if !self.entries.contains_key(&parent) {
            return Err(SceneError::UnknownObject(parent));
        }
        let id = self.insert(object, Some(parent));
        if let Some(entry) = self.entries.get_mut(&parent) {
            entry.object.children.push(id);
        }
        Ok(id)
    }

    fn insert(&mut self, mut object: Object3D, parent: Option<ObjectId>) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        object.id = id;
        object.parent = parent;
        object.children.clear();
        debug!(%id, name = %object.name, "object added to scene");
        self.entries.insert(
            id,
            Entry {
                object,
                handlers: EventHandlers::default(),
            },
        );
        id
    }

    /// Remove an object and its whole subtree.
    pub fn remove(&mut self, id: ObjectId) -> Result<Object3D, SceneError> {
        let parent = self
            .entries
            .get(&id)
            .ok_or(SceneError::UnknownObject(id))?
            .object
            .parent;

        match parent.and_then(|p| self.entries.get_mut(&p)) {
            Some(entry) => entry.object.children.retain(|child| *child != id),
            None => self.roots.retain(|root| *root != id),
        }

        let mut pending = vec![id];
        let mut removed = None;
        while let Some(next) = pending.pop() {
            if let Some(entry) = self.entries.remove(&next) {
                pending.extend(entry.object.children.iter().copied());
                if next == id {
                    removed = Some(entry.object);
                }
            }
        }
        removed.ok_or(SceneError::UnknownObject(id))
    }

    /// Look up an object.
    pub fn object(&self, id: ObjectId) -> Option<&Object3D> {
        self.entries.get(&id).map(|entry| &entry.object)
    }

    /// Look up an object mutably.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.entries.get_mut(&id).map(|entry| &mut entry.object)
    }

    /// Handler slots of an object.
    pub fn handlers_mut(&mut self, id: ObjectId) -> Result<&mut EventHandlers, SceneError> {
        self.entries
            .get_mut(&id)
            .map(|entry| &mut entry.handlers)
            .ok_or(SceneError::UnknownObject(id))
    }

    /// Top-level objects in insertion order.
    pub fn children(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of every object, depth-first pre-order.
    pub fn traverse_ids(&self) -> Vec<ObjectId> {
        let mut order = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<ObjectId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(entry) = self.entries.get(&id) {
                order.push(id);
                stack.extend(entry.object.children.iter().rev().copied());
            }
        }
        order
    }

    /// Visit every object depth-first, parents before children.
    pub fn traverse(&self, mut visit: impl FnMut(&Object3D)) {
        for id in self.traverse_ids() {
            if let Some(object) = self.object(id) {
                visit(object);
            }
        }
    }

    /// Model matrix including all ancestors.
    pub fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        let mut object = self.object(id)?;
        let mut matrix = object.transform.matrix();
        while let Some(parent) = object.parent {
            object = self.object(parent)?;
            matrix = object.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// Whether the object and all its ancestors are visible.
    pub fn is_visible(&self, id: ObjectId) -> bool {
        let mut current = self.object(id);
        while let Some(object) = current {
            if !object.visible {
                return false;
            }
            current = object.parent.and_then(|parent| self.object(parent));
        }
        true
    }

    /// Invoke every registered resize handler in traversal order.
    pub fn dispatch_resize(&mut self, viewport: &ViewportSize) {
        for id in self.traverse_ids() {
            if let Some(Entry { object, handlers }) = self.entries.get_mut(&id) {
                if let Some(handler) = handlers.resize.as_mut() {
                    handler(object, viewport);
                }
            }
        }
    }

    fn dispatch_pointer(&mut self, slot: PointerSlot, hit: &Intersection) {
        let Some(Entry { object, handlers }) = self.entries.get_mut(&hit.object) else {
            return;
        };
        let handler = match slot {
            PointerSlot::Over => handlers.pointer_over.as_mut(),
            PointerSlot::Out => handlers.pointer_out.as_mut(),
            PointerSlot::Move => handlers.pointer_move.as_mut(),
        };
        if let Some(handler) = handler {
            handler(object, hit);
        }
    }
}

impl PointerDispatch for Scene {
    fn pointer_over(&mut self, hit: &Intersection) {
        self.dispatch_pointer(PointerSlot::Over, hit);
    }

    fn pointer_out(&mut self, hit: &Intersection) {
        self.dispatch_pointer(PointerSlot::Out, hit);
    }

    fn pointer_move(&mut self, hit: &Intersection) {
        self.dispatch_pointer(PointerSlot::Move, hit);
    }
}
