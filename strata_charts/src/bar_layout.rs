// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar geometry.
//!
//! One rule set covers all eight layout combinations of
//! `{simple, grouped, stacked, stacked100}` × `{vertical, horizontal}`:
//! every bar is a span along the band axis crossed with a `[low, high]` span
//! along the value axis, and orientation only decides which screen axis is
//! which (see [`span_rect`]). Mode decides where the spans come from:
//! simple/grouped span baseline-to-value, stacked modes span their segment.
//!
//! Enter geometry (what a bar grows from) is the same band span collapsed
//! onto the zero baseline.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use strata_core::MarkId;

use crate::config::{BarMode, Orientation, OverrideMap, RenderConfig};
use crate::domain::Domains;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::stack::{PivotTable, StackSegment};

/// The stable identity of one bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarKey {
    /// Category label.
    pub category: String,
    /// Series label, for grouped/stacked bars.
    pub series: Option<String>,
}

impl BarKey {
    /// The composite override/tooltip key (`category` or
    /// `category|series`).
    pub fn key_string(&self) -> String {
        OverrideMap::key(&self.category, self.series.as_deref())
    }

    /// The stable mark id derived from the key.
    ///
    /// Hashing the key (rather than using positional indices) is what keeps
    /// identity stable when the dataset is reordered.
    pub fn mark_id(&self) -> MarkId {
        MarkId::from_key(&self.key_string())
    }
}

/// One bar's data-side description.
#[derive(Clone, Debug)]
pub struct BarDatum {
    /// Stable identity.
    pub key: BarKey,
    /// The signed datum value (cell value, or category total in simple
    /// mode).
    pub value: f64,
    /// Lower span edge in domain units.
    pub low: f64,
    /// Upper span edge in domain units.
    pub high: f64,
    /// Back-reference into the input record slice.
    pub record: Option<usize>,
    /// Index into the category domain.
    pub category_index: usize,
    /// Index into the series domain, if any.
    pub series_index: Option<usize>,
}

impl BarDatum {
    /// The palette ordinal: series index for series-colored layers,
    /// category index otherwise.
    pub fn ordinal(&self) -> usize {
        self.series_index.unwrap_or(self.category_index)
    }
}

/// One bar's resolved geometry.
#[derive(Clone, Debug)]
pub struct BarGeometry {
    /// Data-side description.
    pub datum: BarDatum,
    /// Final rectangle in scene coordinates.
    pub rect: Rect,
    /// Rectangle the bar grows from when entering: the band span collapsed
    /// onto the zero baseline.
    pub enter_rect: Rect,
    /// Center of the bar along the band axis, in scene coordinates.
    pub band_center: f64,
    /// Thickness of the bar along the band axis.
    pub band_width: f64,
}

/// The geometry plan for one (non-faceted) plot.
#[derive(Clone, Debug)]
pub struct BarLayout {
    /// Per-bar geometry, in category-major order.
    pub bars: Vec<BarGeometry>,
    /// The category band scale, for axes and overlays.
    pub band: ScaleBand,
    /// The value scale, for axes and overlays.
    pub value_scale: ScaleLinear,
    /// Scene coordinate of domain zero on the value axis.
    pub baseline: f64,
    /// The orientation geometry was computed under.
    pub orientation: Orientation,
}

/// Builds a rectangle from a band-axis span and a value-axis span.
///
/// This is the single place orientation touches geometry; the value span may
/// arrive in either order.
pub fn span_rect(orientation: Orientation, band0: f64, band1: f64, va: f64, vb: f64) -> Rect {
    let (v0, v1) = if va <= vb { (va, vb) } else { (vb, va) };
    match orientation {
        Orientation::Vertical => Rect::new(band0, v0, band1, v1),
        Orientation::Horizontal => Rect::new(v0, band0, v1, band1),
    }
}

/// Lays out all bars for one plot.
///
/// `stacks` must be present for the stacked modes and is ignored otherwise.
/// Empty domains produce an empty bar list rather than failing.
pub fn layout_bars(
    table: &PivotTable,
    stacks: Option<&[Vec<StackSegment>]>,
    domains: &Domains,
    config: &RenderConfig,
    data: Rect,
) -> BarLayout {
    let (band_range, value_range) = axis_ranges(config.orientation, data);
    let band = ScaleBand::new(band_range, domains.categories.len())
        .with_padding(config.padding_inner(), config.padding_outer());
    let value_scale = ScaleLinear::new(domains.value, value_range);
    let baseline = value_scale.map(0.0);

    let mut bars = Vec::new();
    match config.mode {
        BarMode::Simple => {
            for (ci, category) in domains.categories.iter().enumerate() {
                let value = table.category_total(ci);
                bars.push(bar(
                    config.orientation,
                    &value_scale,
                    baseline,
                    BarDatum {
                        key: BarKey {
                            category: category.clone(),
                            series: None,
                        },
                        value,
                        low: value.min(0.0),
                        high: value.max(0.0),
                        record: table.record_index(ci, 0),
                        category_index: ci,
                        series_index: None,
                    },
                    band.position(ci),
                    band.band_width(),
                ));
            }
        }
        BarMode::Grouped => {
            let sub = band.sub_band(domains.series.len().max(1), config.padding_inner());
            for (ci, category) in domains.categories.iter().enumerate() {
                let base = band.position(ci);
                for (si, series) in domains.series.iter().enumerate() {
                    let value = table.value(ci, si);
                    bars.push(bar(
                        config.orientation,
                        &value_scale,
                        baseline,
                        BarDatum {
                            key: BarKey {
                                category: category.clone(),
                                series: Some(series.clone()),
                            },
                            value,
                            low: value.min(0.0),
                            high: value.max(0.0),
                            record: table.record_index(ci, si),
                            category_index: ci,
                            series_index: Some(si),
                        },
                        base + sub.position(si),
                        sub.band_width(),
                    ));
                }
            }
        }
        BarMode::Stacked | BarMode::Stacked100 => {
            let empty: &[Vec<StackSegment>] = &[];
            let stacks = stacks.unwrap_or(empty);
            for (ci, category) in domains.categories.iter().enumerate() {
                for (si, series) in domains.series.iter().enumerate() {
                    let Some(seg) = stacks.get(si).and_then(|lane| lane.get(ci)) else {
                        continue;
                    };
                    bars.push(bar(
                        config.orientation,
                        &value_scale,
                        baseline,
                        BarDatum {
                            key: BarKey {
                                category: category.clone(),
                                series: Some(series.clone()),
                            },
                            value: table.value(ci, si),
                            low: seg.low,
                            high: seg.high,
                            record: seg.record,
                            category_index: ci,
                            series_index: Some(si),
                        },
                        band.position(ci),
                        band.band_width(),
                    ));
                }
            }
        }
    }

    BarLayout {
        bars,
        band,
        value_scale,
        baseline,
        orientation: config.orientation,
    }
}

/// Which scene ranges the band and value axes occupy.
///
/// The value range is inverted for vertical charts so larger values sit
/// higher on screen.
fn axis_ranges(orientation: Orientation, data: Rect) -> ((f64, f64), (f64, f64)) {
    match orientation {
        Orientation::Vertical => ((data.x0, data.x1), (data.y1, data.y0)),
        Orientation::Horizontal => ((data.y0, data.y1), (data.x0, data.x1)),
    }
}

fn bar(
    orientation: Orientation,
    value_scale: &ScaleLinear,
    baseline: f64,
    datum: BarDatum,
    band_pos: f64,
    band_width: f64,
) -> BarGeometry {
    let v0 = value_scale.map(datum.low);
    let v1 = value_scale.map(datum.high);
    let rect = span_rect(orientation, band_pos, band_pos + band_width, v0, v1);
    let enter_rect = span_rect(
        orientation,
        band_pos,
        band_pos + band_width,
        baseline,
        baseline,
    );
    BarGeometry {
        datum,
        rect,
        enter_rect,
        band_center: band_pos + 0.5 * band_width,
        band_width,
    }
}
