// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained scene and its keyed diff.
//!
//! `Scene::tick` consumes the fresh mark list for a frame and reports what
//! changed relative to the retained previous frame, keyed by [`MarkId`].
//! Reordering the input never affects which diff a datum receives; only the
//! presence or absence of its id does.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::id::MarkId;
use crate::mark::{Mark, MarkPayload};

/// One keyed change between the previous frame and the current one.
#[derive(Clone, Debug)]
pub enum MarkDiff {
    /// A mark whose id was not present in the previous frame.
    Enter {
        /// The mark id.
        id: MarkId,
        /// Rendering order hint.
        z_index: i32,
        /// The payload to settle on.
        new: Box<MarkPayload>,
        /// Optional payload to animate from (the mark's declared enter state).
        from: Option<Box<MarkPayload>>,
        /// Geometric bounds of `new`, where well defined.
        bounds: Option<Rect>,
    },
    /// A mark whose id survives from the previous frame.
    Update {
        /// The mark id.
        id: MarkId,
        /// Rendering order hint for the new payload.
        new_z_index: i32,
        /// The retained payload from the previous frame.
        old: Box<MarkPayload>,
        /// The payload to settle on.
        new: Box<MarkPayload>,
        /// Geometric bounds of `new`, where well defined.
        bounds: Option<Rect>,
    },
    /// A mark whose id is gone this frame.
    Exit {
        /// The mark id.
        id: MarkId,
        /// Rendering order hint the mark was drawn with.
        z_index: i32,
        /// The payload to fade out from.
        old: Box<MarkPayload>,
    },
}

impl MarkDiff {
    /// Returns the id this diff is about.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}

/// Retained mark state across frames.
#[derive(Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of retained marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` when no marks are retained.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Returns the retained mark for an id, if present.
    pub fn mark(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Drops all retained marks.
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Replaces the frame and returns keyed diffs.
    ///
    /// Enter/update diffs are emitted sorted by `(z_index, id)`; exit diffs
    /// follow, sorted by id. An update is emitted for every
    /// surviving id (consumers treat identical payloads as settled no-ops),
    /// which keeps the diff deterministic without requiring payload
    /// equality.
    ///
    /// If the same id appears twice in `marks`, the later mark wins and the
    /// earlier one is dropped without a diff.
    pub fn tick(&mut self, marks: Vec<Mark>) -> Vec<MarkDiff> {
        let mut next: HashMap<MarkId, Mark> = HashMap::with_capacity(marks.len());
        for mark in marks {
            next.insert(mark.id, mark);
        }

        let mut diffs: Vec<MarkDiff> = Vec::with_capacity(next.len() + self.marks.len());

        let mut entered: Vec<&Mark> = next.values().collect();
        entered.sort_by_key(|m| (m.z_index, m.id));

        for mark in entered {
            match self.marks.get(&mark.id) {
                Some(prev) => diffs.push(MarkDiff::Update {
                    id: mark.id,
                    new_z_index: mark.z_index,
                    old: Box::new(prev.payload.clone()),
                    new: Box::new(mark.payload.clone()),
                    bounds: mark.payload.bounds(),
                }),
                None => diffs.push(MarkDiff::Enter {
                    id: mark.id,
                    z_index: mark.z_index,
                    new: Box::new(mark.payload.clone()),
                    from: mark.enter.clone().map(Box::new),
                    bounds: mark.payload.bounds(),
                }),
            }
        }

        let mut exited: Vec<&Mark> = self
            .marks
            .values()
            .filter(|m| !next.contains_key(&m.id))
            .collect();
        exited.sort_by_key(|m| m.id);
        for old in exited {
            diffs.push(MarkDiff::Exit {
                id: old.id,
                z_index: old.z_index,
                old: Box::new(old.payload.clone()),
            });
        }

        self.marks = next;
        diffs
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::Rect;
    use peniko::color::palette::css;

    use super::*;
    use crate::mark::RectPayload;

    fn bar(id: u64, x: f64) -> Mark {
        Mark::builder(MarkId::from_raw(id))
            .rect(RectPayload::new(
                Rect::new(x, 0.0, x + 10.0, 40.0),
                css::CORNFLOWER_BLUE,
            ))
            .build()
    }

    #[test]
    fn first_tick_enters_everything() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![bar(1, 0.0), bar(2, 20.0)]);
        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|d| matches!(d, MarkDiff::Enter { .. })));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn survivors_update_and_missing_ids_exit() {
        let mut scene = Scene::new();
        scene.tick(vec![bar(1, 0.0), bar(2, 20.0)]);

        let diffs = scene.tick(vec![bar(2, 25.0), bar(3, 40.0)]);
        let updates: Vec<_> = diffs
            .iter()
            .filter(|d| matches!(d, MarkDiff::Update { .. }))
            .collect();
        let exits: Vec<_> = diffs
            .iter()
            .filter(|d| matches!(d, MarkDiff::Exit { .. }))
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id(), MarkId::from_raw(2));
        assert_eq!(exits.len(), 1);
        assert_eq!(exits[0].id(), MarkId::from_raw(1));
    }

    #[test]
    fn input_order_does_not_affect_identity() {
        let mut a = Scene::new();
        a.tick(vec![bar(1, 0.0), bar(2, 20.0)]);
        let mut b = Scene::new();
        b.tick(vec![bar(2, 20.0), bar(1, 0.0)]);

        // Same second frame against both scenes: identical diff kinds per id.
        let da = a.tick(vec![bar(1, 5.0), bar(2, 20.0)]);
        let db = b.tick(vec![bar(1, 5.0), bar(2, 20.0)]);
        assert_eq!(da.len(), db.len());
        for (x, y) in da.iter().zip(db.iter()) {
            assert_eq!(x.id(), y.id());
            assert_eq!(
                core::mem::discriminant(x),
                core::mem::discriminant(y),
            );
        }
    }
}
