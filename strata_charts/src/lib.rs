// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative categorical bar charts lowered to `strata_core` marks.
//!
//! This crate is the chart layer above `strata_core`:
//! - **Data shaping**: records are pivoted into a category x series table,
//!   stacked when the mode asks for it, and reduced to ordered domains.
//! - **Geometry**: one orientation-agnostic rule set lays out simple,
//!   grouped, stacked, and normalized bars, plus small-multiples panels.
//! - **Guides**: axes, gridlines, legends, and bar labels are generated as
//!   ordinary marks with deterministic ids.
//!
//! Every render recomputes marks from scratch; `strata_core` diffs them by
//! stable id and plans transitions. Text shaping is out of scope; guide
//! layout works against a [`TextMeasurer`] callback.

#![no_std]

extern crate alloc;

mod axis;
mod bar_layout;
mod chart;
mod color;
mod config;
mod domain;
mod facet;
#[cfg(not(feature = "std"))]
mod float;
mod interaction;
mod label;
mod layout;
mod legend;
mod measure;
mod overlay;
mod record;
mod scale;
mod stack;
mod z_order;

pub use axis::{AxisOrient, AxisScaleSpec, AxisSpec, AxisStyle, GridStyle, StrokeStyle};
pub use bar_layout::{BarDatum, BarGeometry, BarKey, BarLayout, layout_bars, span_rect};
pub use chart::{ChartEngine, ChartError, RenderOutput, build_marks};
pub use color::{ColorResolver, darken};
pub use config::{
    BarMode, BarOverride, ChartEncoding, ChartSpec, ChartStyle, ColorMode, LabelConfig,
    LabelPosition, LabelSource, LayoutPreset, Orientation, OverlayKind, OverlayLabelMode,
    OverlaySpec, OverrideMap, RenderConfig, default_palette,
};
pub use domain::Domains;
pub use facet::{FACET_GAP, Facet, layout_facets};
pub use interaction::{BarInfo, FillChange, InteractionController, Tooltip};
pub use label::{LabelPlan, fit_label, flag_text, label_text, place_label};
pub use layout::{ChartLayout, ChartLayoutSpec, LegendOrient, LegendPlacement, Size};
pub use legend::{LegendItem, LegendSwatchesSpec};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use overlay::{OverlayOutput, compose_overlays};
pub use record::{BindingError, FieldBinding, Record, Value};
pub use scale::{ScaleBand, ScaleLinear, nice_ticks};
pub use stack::{PivotTable, StackSegment, stack_diverging, stack_extent, stack_normalized};
pub use z_order::*;
