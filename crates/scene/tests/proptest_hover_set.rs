//! Property tests for the hovered-set bookkeeping.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use hovercube_scene::{HoverTracker, Intersection, ObjectId, PointerDispatch};
use proptest::prelude::*;

#[derive(Default)]
struct Tally {
    over: BTreeMap<u64, u32>,
    out: BTreeMap<u64, u32>,
    moves: u32,
}

impl PointerDispatch for Tally {
    fn pointer_over(&mut self, hit: &Intersection) {
        *self.over.entry(hit.object.0).or_default() += 1;
    }
    fn pointer_out(&mut self, hit: &Intersection) {
        *self.out.entry(hit.object.0).or_default() += 1;
    }
    fn pointer_move(&mut self, _hit: &Intersection) {
        self.moves += 1;
    }
}

fn hits_for(ids: &BTreeSet<u64>) -> Vec<Intersection> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| Intersection {
            object: ObjectId(*id),
            distance: i as f32 + 1.0,
            point: Vec3::ZERO,
            normal: Vec3::Z,
        })
        .collect()
}

proptest! {
    /// Property: after every update the hovered set equals the last hit set
    #[test]
    fn hovered_set_matches_latest_hits(
        frames in prop::collection::vec(prop::collection::btree_set(0u64..6, 0..6), 1..40),
    ) {
        let mut tracker = HoverTracker::new();
        let mut tally = Tally::default();

        for ids in &frames {
            tracker.update(&hits_for(ids), &mut tally);
            let hovered: BTreeSet<u64> = tracker.hovered().keys().map(|id| id.0).collect();
            prop_assert_eq!(&hovered, ids);
        }
    }

    /// Property: overs and outs alternate, and moves equal total hits
    #[test]
    fn transitions_are_balanced(
        frames in prop::collection::vec(prop::collection::btree_set(0u64..6, 0..6), 1..40),
    ) {
        let mut tracker = HoverTracker::new();
        let mut tally = Tally::default();
        let mut total_hits = 0u32;

        for ids in &frames {
            tracker.update(&hits_for(ids), &mut tally);
            total_hits += ids.len() as u32;
        }

        prop_assert_eq!(tally.moves, total_hits);
        for id in 0u64..6 {
            let over = tally.over.get(&id).copied().unwrap_or(0);
            let out = tally.out.get(&id).copied().unwrap_or(0);
            let still_hovered = u32::from(tracker.is_hovered(ObjectId(id)));
            prop_assert_eq!(over, out + still_hovered);
        }
    }
}
