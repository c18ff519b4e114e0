// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition planning over keyed diffs.
//!
//! The planner turns one batch of [`MarkDiff`]s into sampled [`Tween`]s:
//! entering marks grow from their declared enter payload, surviving marks
//! interpolate old to new, and exiting marks fade out. Guide layers snap
//! instead of animating when the axis signature changes, so an orientation
//! flip never shows axes sliding through the plot.
//!
//! Time is caller-supplied in milliseconds; the planner never reads a clock,
//! which keeps plans reproducible in tests.

extern crate alloc;

use alloc::boxed::Box;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::id::MarkId;
use crate::mark::{MarkPayload, PathPayload, RectPayload, TextPayload};
use crate::scene::MarkDiff;

/// Easing curve applied to normalized tween progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Accelerates from rest.
    CubicIn,
    /// Decelerates to rest.
    CubicOut,
    /// Accelerates, then decelerates.
    CubicInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// Timing parameters for a render transition.
#[derive(Clone, Copy, Debug)]
pub struct TransitionPolicy {
    /// Enter/update duration in milliseconds.
    pub duration: f64,
    /// Exit fade duration in milliseconds.
    pub exit_duration: f64,
    /// Per-entering-mark delay in milliseconds.
    pub stagger: f64,
    /// Easing applied to every tween.
    pub easing: Easing,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self {
            duration: 400.0,
            exit_duration: 200.0,
            stagger: 20.0,
            easing: Easing::CubicInOut,
        }
    }
}

impl TransitionPolicy {
    /// A policy that settles everything immediately.
    pub fn immediate() -> Self {
        Self {
            duration: 0.0,
            exit_duration: 0.0,
            stagger: 0.0,
            easing: Easing::Linear,
        }
    }
}

/// How guide layers (axes, grid) move this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisMotion {
    /// Guides interpolate like any other mark.
    Animate,
    /// Guides jump straight to their new state.
    Snap,
}

impl Default for AxisMotion {
    fn default() -> Self {
        Self::Animate
    }
}

#[derive(Clone, Debug)]
enum TweenKind {
    /// Enter: grow from a declared enter payload.
    Grow {
        from: Box<MarkPayload>,
        to: Box<MarkPayload>,
    },
    /// Update: interpolate the retained payload to the new one.
    Morph {
        from: Box<MarkPayload>,
        to: Box<MarkPayload>,
    },
    /// Exit: fade the old payload out.
    Fade { from: Box<MarkPayload> },
}

/// One in-flight animation for a single mark.
#[derive(Clone, Debug)]
pub struct Tween {
    /// The mark being animated.
    pub id: MarkId,
    /// Rendering order hint.
    pub z_index: i32,
    start: f64,
    duration: f64,
    easing: Easing,
    kind: TweenKind,
}

impl Tween {
    /// Returns `true` for exit fades, whose marks disappear once finished.
    pub fn is_exit(&self) -> bool {
        matches!(self.kind, TweenKind::Fade { .. })
    }

    /// Returns `true` once the tween has reached its final state at `now`.
    pub fn finished(&self, now: f64) -> bool {
        now >= self.start + self.duration
    }

    fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Samples the payload to draw at `now`.
    ///
    /// Exit fades return `None` once fully faded; every other tween clamps
    /// to its target payload.
    pub fn sample(&self, now: f64) -> Option<MarkPayload> {
        let e = self.easing.apply(self.progress(now));
        match &self.kind {
            TweenKind::Grow { from, to } | TweenKind::Morph { from, to } => {
                Some(lerp_payload(from, to, e))
            }
            TweenKind::Fade { from } => {
                if e >= 1.0 {
                    None
                } else {
                    Some(fade_payload(from, 1.0 - e))
                }
            }
        }
    }
}

/// The transition plan for one frame of diffs.
#[derive(Clone, Debug, Default)]
pub struct FramePlan {
    /// Guide-layer motion for this frame.
    pub axis_motion: AxisMotion,
    /// Tweens, one per diff, in diff order.
    pub tweens: SmallVec<[Tween; 8]>,
    /// How many diffs replaced a tween that was still in flight.
    pub interrupted: usize,
}

impl FramePlan {
    /// Returns `true` once every tween has finished at `now`.
    pub fn settled(&self, now: f64) -> bool {
        self.tweens.iter().all(|t| t.finished(now))
    }
}

/// Plans transitions across successive diff batches.
///
/// A new plan for an id that is still animating replaces the old tween from
/// its target state (last-plan-wins); the replacement is counted in
/// [`FramePlan::interrupted`].
#[derive(Debug, Default)]
pub struct TransitionPlanner {
    policy: TransitionPolicy,
    last_axis_signature: Option<u64>,
    active_until: HashMap<MarkId, f64>,
}

impl TransitionPlanner {
    /// Creates a planner with the given policy.
    pub fn new(policy: TransitionPolicy) -> Self {
        Self {
            policy,
            last_axis_signature: None,
            active_until: HashMap::new(),
        }
    }

    /// The policy tweens are planned with.
    pub fn policy(&self) -> &TransitionPolicy {
        &self.policy
    }

    /// Replaces the policy used by subsequent [`TransitionPlanner::plan`]
    /// calls. Tweens already handed out keep their original timing.
    pub fn set_policy(&mut self, policy: TransitionPolicy) {
        self.policy = policy;
    }

    /// Plans tweens for one diff batch at time `now` (milliseconds).
    ///
    /// `axis_signature` identifies the guide configuration (orientation,
    /// facet structure); when it differs from the previous plan's, guide
    /// marks (those whose z-index satisfies `is_guide`) snap with zero
    /// duration while data marks keep animating.
    pub fn plan(
        &mut self,
        now: f64,
        axis_signature: u64,
        diffs: &[MarkDiff],
        is_guide: impl Fn(i32) -> bool,
    ) -> FramePlan {
        let axis_motion = match self.last_axis_signature {
            Some(prev) if prev != axis_signature => AxisMotion::Snap,
            _ => AxisMotion::Animate,
        };
        self.last_axis_signature = Some(axis_signature);

        let mut plan = FramePlan {
            axis_motion,
            tweens: SmallVec::new(),
            interrupted: 0,
        };
        let mut enter_index: u64 = 0;
        let mut next_active: HashMap<MarkId, f64> = HashMap::with_capacity(diffs.len());

        for diff in diffs {
            if self
                .active_until
                .get(&diff.id())
                .is_some_and(|until| *until > now)
            {
                plan.interrupted += 1;
            }

            let tween = match diff {
                MarkDiff::Enter {
                    id,
                    z_index,
                    new,
                    from,
                    ..
                } => {
                    let snap = axis_motion == AxisMotion::Snap && is_guide(*z_index);
                    let delay = if snap {
                        0.0
                    } else {
                        self.policy.stagger * enter_index as f64
                    };
                    enter_index += 1;
                    Tween {
                        id: *id,
                        z_index: *z_index,
                        start: now + delay,
                        duration: if snap { 0.0 } else { self.policy.duration },
                        easing: self.policy.easing,
                        kind: TweenKind::Grow {
                            from: from.clone().unwrap_or_else(|| new.clone()),
                            to: new.clone(),
                        },
                    }
                }
                MarkDiff::Update {
                    id,
                    new_z_index,
                    old,
                    new,
                    ..
                } => {
                    let snap = axis_motion == AxisMotion::Snap && is_guide(*new_z_index);
                    Tween {
                        id: *id,
                        z_index: *new_z_index,
                        start: now,
                        duration: if snap { 0.0 } else { self.policy.duration },
                        easing: self.policy.easing,
                        kind: TweenKind::Morph {
                            from: old.clone(),
                            to: new.clone(),
                        },
                    }
                }
                MarkDiff::Exit { id, z_index, old } => {
                    let snap = axis_motion == AxisMotion::Snap && is_guide(*z_index);
                    Tween {
                        id: *id,
                        z_index: *z_index,
                        start: now,
                        duration: if snap { 0.0 } else { self.policy.exit_duration },
                        easing: self.policy.easing,
                        kind: TweenKind::Fade {
                            from: old.clone(),
                        },
                    }
                }
            };
            next_active.insert(tween.id, tween.start + tween.duration);
            plan.tweens.push(tween);
        }

        self.active_until = next_active;
        plan
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_rect(a: kurbo::Rect, b: kurbo::Rect, t: f64) -> kurbo::Rect {
    kurbo::Rect::new(
        lerp(a.x0, b.x0, t),
        lerp(a.y0, b.y0, t),
        lerp(a.x1, b.x1, t),
        lerp(a.y1, b.y1, t),
    )
}

// Solid brushes interpolate per sRGB component; anything else jumps to the
// target halfway through.
fn lerp_brush(a: &peniko::Brush, b: &peniko::Brush, t: f64) -> peniko::Brush {
    match (a, b) {
        (peniko::Brush::Solid(ca), peniko::Brush::Solid(cb)) => {
            let ca = ca.to_rgba8();
            let cb = cb.to_rgba8();
            let c = |x: u8, y: u8| -> u8 {
                (f64::from(x) + (f64::from(y) - f64::from(x)) * t + 0.5) as u8
            };
            peniko::Brush::Solid(peniko::Color::from_rgba8(
                c(ca.r, cb.r),
                c(ca.g, cb.g),
                c(ca.b, cb.b),
                c(ca.a, cb.a),
            ))
        }
        _ => {
            if t < 0.5 {
                a.clone()
            } else {
                b.clone()
            }
        }
    }
}

fn lerp_payload(a: &MarkPayload, b: &MarkPayload, t: f64) -> MarkPayload {
    match (a, b) {
        (MarkPayload::Rect(ra), MarkPayload::Rect(rb)) => MarkPayload::Rect(RectPayload {
            rect: lerp_rect(ra.rect, rb.rect, t),
            corner_radius: lerp(ra.corner_radius, rb.corner_radius, t),
            fill: lerp_brush(&ra.fill, &rb.fill, t),
            stroke: lerp_brush(&ra.stroke, &rb.stroke, t),
            stroke_width: lerp(ra.stroke_width, rb.stroke_width, t),
        }),
        (MarkPayload::Text(ta), MarkPayload::Text(tb)) => MarkPayload::Text(TextPayload {
            pos: kurbo::Point::new(lerp(ta.pos.x, tb.pos.x, t), lerp(ta.pos.y, tb.pos.y, t)),
            text: tb.text.clone(),
            font_size: lerp(ta.font_size, tb.font_size, t),
            angle: lerp(ta.angle, tb.angle, t),
            anchor: tb.anchor,
            baseline: tb.baseline,
            fill: lerp_brush(&ta.fill, &tb.fill, t),
        }),
        // Paths don't interpolate structurally; they fade-swap instead.
        (MarkPayload::Path(pa), MarkPayload::Path(pb)) => {
            if t < 0.5 {
                MarkPayload::Path(PathPayload {
                    path: pa.path.clone(),
                    fill: pa.fill.clone(),
                    stroke: pa.stroke.clone(),
                    stroke_width: pa.stroke_width,
                })
            } else {
                MarkPayload::Path(pb.clone())
            }
        }
        _ => b.clone(),
    }
}

fn scale_alpha(brush: &peniko::Brush, factor: f64) -> peniko::Brush {
    match brush {
        peniko::Brush::Solid(color) => {
            let c = color.to_rgba8();
            let a = (f64::from(c.a) * factor.clamp(0.0, 1.0) + 0.5) as u8;
            peniko::Brush::Solid(peniko::Color::from_rgba8(c.r, c.g, c.b, a))
        }
        other => other.clone(),
    }
}

fn fade_payload(p: &MarkPayload, opacity: f64) -> MarkPayload {
    match p {
        MarkPayload::Rect(r) => MarkPayload::Rect(RectPayload {
            fill: scale_alpha(&r.fill, opacity),
            stroke: scale_alpha(&r.stroke, opacity),
            ..r.clone()
        }),
        MarkPayload::Text(t) => MarkPayload::Text(TextPayload {
            fill: scale_alpha(&t.fill, opacity),
            ..t.clone()
        }),
        MarkPayload::Path(p) => MarkPayload::Path(PathPayload {
            fill: scale_alpha(&p.fill, opacity),
            stroke: scale_alpha(&p.stroke, opacity),
            ..p.clone()
        }),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Rect;
    use peniko::color::palette::css;

    use super::*;
    use crate::mark::Mark;
    use crate::scene::Scene;

    fn bar(id: u64, top: f64) -> Mark {
        Mark::builder(MarkId::from_raw(id))
            .rect(RectPayload::new(
                Rect::new(0.0, top, 10.0, 100.0),
                css::STEEL_BLUE,
            ))
            .enter_from(Rect::new(0.0, 100.0, 10.0, 100.0))
            .build()
    }

    fn rect_of(p: &MarkPayload) -> Rect {
        match p {
            MarkPayload::Rect(r) => r.rect,
            _ => panic!("expected rect payload"),
        }
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        for e in [
            Easing::Linear,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
        ] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
        }
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn enters_grow_from_the_declared_enter_state() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![bar(1, 40.0)]);
        let mut planner = TransitionPlanner::new(TransitionPolicy {
            easing: Easing::Linear,
            stagger: 0.0,
            ..TransitionPolicy::default()
        });
        let plan = planner.plan(0.0, 7, &diffs, |_| false);
        assert_eq!(plan.tweens.len(), 1);

        let at_start = plan.tweens[0].sample(0.0).map(|p| rect_of(&p));
        let at_end = plan.tweens[0].sample(400.0).map(|p| rect_of(&p));
        assert_eq!(at_start, Some(Rect::new(0.0, 100.0, 10.0, 100.0)));
        assert_eq!(at_end, Some(Rect::new(0.0, 40.0, 10.0, 100.0)));
    }

    #[test]
    fn enters_stagger_in_diff_order() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![bar(1, 40.0), bar(2, 60.0)]);
        let mut planner = TransitionPlanner::new(TransitionPolicy::default());
        let plan = planner.plan(0.0, 7, &diffs, |_| false);
        assert!(!plan.tweens[0].finished(400.0 - 1.0));
        assert!(plan.tweens[0].finished(400.0));
        // Second enter starts one stagger step later.
        assert!(!plan.tweens[1].finished(400.0));
        assert!(plan.tweens[1].finished(420.0));
    }

    #[test]
    fn exits_fade_out_and_then_disappear() {
        let mut scene = Scene::new();
        scene.tick(vec![bar(1, 40.0)]);
        let diffs = scene.tick(Vec::new());
        let mut planner = TransitionPlanner::new(TransitionPolicy {
            easing: Easing::Linear,
            ..TransitionPolicy::default()
        });
        let plan = planner.plan(0.0, 7, &diffs, |_| false);
        assert!(plan.tweens[0].is_exit());

        let Some(MarkPayload::Rect(half)) = plan.tweens[0].sample(100.0) else {
            panic!("expected rect payload mid-fade");
        };
        let peniko::Brush::Solid(c) = half.fill else {
            panic!("expected solid fill");
        };
        assert_eq!(c.to_rgba8().a, 128);
        assert!(plan.tweens[0].sample(200.0).is_none());
    }

    #[test]
    fn axis_signature_change_snaps_guides_only() {
        let mut scene = Scene::new();
        let mut planner = TransitionPlanner::new(TransitionPolicy::default());

        let diffs = scene.tick(vec![bar(1, 40.0)]);
        let first = planner.plan(0.0, 1, &diffs, |z| z < 0);
        assert_eq!(first.axis_motion, AxisMotion::Animate);

        let guide = Mark::builder(MarkId::from_raw(99))
            .z_index(-10)
            .rect(RectPayload::new(Rect::new(0.0, 0.0, 1.0, 100.0), css::GRAY))
            .build();
        let diffs = scene.tick(vec![bar(1, 60.0), guide]);
        let plan = planner.plan(1000.0, 2, &diffs, |z| z < 0);
        assert_eq!(plan.axis_motion, AxisMotion::Snap);

        let guide_tween = plan
            .tweens
            .iter()
            .find(|t| t.id == MarkId::from_raw(99))
            .unwrap();
        let data_tween = plan
            .tweens
            .iter()
            .find(|t| t.id == MarkId::from_raw(1))
            .unwrap();
        assert!(guide_tween.finished(1000.0));
        assert!(!data_tween.finished(1000.0));
    }

    #[test]
    fn replanning_mid_flight_counts_interruptions() {
        let mut scene = Scene::new();
        let mut planner = TransitionPlanner::new(TransitionPolicy::default());

        let diffs = scene.tick(vec![bar(1, 40.0)]);
        planner.plan(0.0, 7, &diffs, |_| false);

        // Re-plan at t=100, well inside the 400ms enter.
        let diffs = scene.tick(vec![bar(1, 80.0)]);
        let plan = planner.plan(100.0, 7, &diffs, |_| false);
        assert_eq!(plan.interrupted, 1);

        // And again after everything settled: no interruptions.
        let diffs = scene.tick(vec![bar(1, 20.0)]);
        let plan = planner.plan(2000.0, 7, &diffs, |_| false);
        assert_eq!(plan.interrupted, 0);
    }

    #[test]
    fn immediate_policy_settles_at_plan_time() {
        let mut scene = Scene::new();
        let mut planner = TransitionPlanner::new(TransitionPolicy::immediate());
        let diffs = scene.tick(vec![bar(1, 40.0), bar(2, 60.0)]);
        let plan = planner.plan(5.0, 7, &diffs, |_| false);
        assert!(plan.settled(5.0));
    }
}
