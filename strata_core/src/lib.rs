// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained chart scene core.
//!
//! This crate is the runtime half of `strata`:
//! - **Marks** are resolved drawing instructions (rects, text, paths) with
//!   stable identity, produced fresh by the chart layer on every render.
//! - The **Scene** retains the previous frame's marks and computes keyed
//!   enter/update/exit diffs, so reordering the input data never churns mark
//!   identity.
//! - The **transition planner** turns diffs into sampled tweens: entering
//!   marks grow from a declared enter state, updates interpolate, exits fade,
//!   and axis layers snap when the orientation signature changes.
//!
//! The core knows nothing about categories, values, or configuration; it only
//! sees marks. Any 2-D surface that can draw the sampled payloads satisfies
//! the rendering contract.

#![no_std]

extern crate alloc;

mod id;
mod mark;
mod scene;
mod transition;

pub use id::MarkId;
pub use mark::{
    Mark, MarkBuilder, MarkPayload, PathPayload, RectMarkBuilder, RectPayload, TextAnchor,
    TextBaseline, TextPayload,
};
pub use scene::{MarkDiff, Scene};
pub use transition::{
    AxisMotion, Easing, FramePlan, TransitionPlanner, TransitionPolicy, Tween,
};
