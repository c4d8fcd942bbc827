//! Pointer hover tracking: diffs consecutive ray hit lists into
//! over / out / move notifications.

use std::collections::BTreeMap;

use tracing::debug;

use crate::object::ObjectId;
use crate::raycast::Intersection;

/// Receiver of hover notifications.
///
/// [`crate::Scene`] implements this by invoking each object's optional
/// handler slots.
pub trait PointerDispatch {
    /// The pointer started intersecting `hit.object`.
    fn pointer_over(&mut self, hit: &Intersection);
    /// The pointer stopped intersecting `hit.object`; `hit` is the last
    /// recorded intersection.
    fn pointer_out(&mut self, hit: &Intersection);
    /// The pointer moved while intersecting `hit.object`.
    fn pointer_move(&mut self, hit: &Intersection);
}

/// Tracks which objects are currently under the pointer.
///
/// An id is in the hovered set iff it appeared in the hit list passed to
/// the most recent [`HoverTracker::update`].
#[derive(Debug, Default, Clone)]
pub struct HoverTracker {
    hovered: BTreeMap<ObjectId, Intersection>,
}

impl HoverTracker {
    /// Create a tracker with nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fresh nearest-first hit list.
    pub fn update<D>(&mut self, hits: &[Intersection], dispatch: &mut D)
    where
        D: PointerDispatch + ?Sized,
    {
        let left: Vec<ObjectId> = self
            .hovered
            .keys()
            .filter(|id| !hits.iter().any(|hit| hit.object == **id))
            .copied()
            .collect();
        for id in left {
            if let Some(last) = self.hovered.remove(&id) {
                debug!(object = %id, "pointer out");
                dispatch.pointer_out(&last);
            }
        }

        for hit in hits {
            if !self.hovered.contains_key(&hit.object) {
                self.hovered.insert(hit.object, *hit);
                debug!(object = %hit.object, distance = hit.distance, "pointer over");
                dispatch.pointer_over(hit);
            }
            dispatch.pointer_move(hit);
        }
    }

    /// Release everything, e.g. when the pointer leaves the window.
    pub fn clear<D>(&mut self, dispatch: &mut D)
    where
        D: PointerDispatch + ?Sized,
    {
        self.update(&[], dispatch);
    }

    /// Whether `id` is currently hovered.
    pub fn is_hovered(&self, id: ObjectId) -> bool {
        self.hovered.contains_key(&id)
    }

    /// Currently hovered objects with the intersection that first entered them.
    pub fn hovered(&self) -> &BTreeMap<ObjectId, Intersection> {
        &self.hovered
    }

    /// Number of hovered objects.
    pub fn len(&self) -> usize {
        self.hovered.len()
    }

    /// Whether nothing is hovered.
    pub fn is_empty(&self) -> bool {
        self.hovered.is_empty()
    }
}
