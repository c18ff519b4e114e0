// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! A single [`AxisSpec`] with an `orient` of `top`, `bottom`, `left`, or
//! `right` covers both chart axes: the value axis carries a linear scale,
//! the category axis a band scale whose tick labels are the category
//! strings. An axis is measured first (for the margin layout pass) and
//! arranged into marks once the plot rectangle is known.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::{BezPath, Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;
use strata_core::{Mark, MarkId, PathPayload, TextAnchor, TextBaseline, TextPayload};

use crate::measure::TextMeasurer;
use crate::scale::{ScaleBand, ScaleLinear, nice_ticks};
use crate::z_order;

/// A paint + width pair for stroked paths (domain lines, ticks, gridlines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Axis styling defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Fill paint for the axis title.
    pub title_fill: Brush,
    /// Font size for the axis title.
    pub title_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::default();
        Self {
            rule: rule.clone(),
            label_fill: rule.brush.clone(),
            label_font_size: 10.0,
            title_fill: rule.brush,
            title_font_size: 11.0,
        }
    }
}

/// Gridline styling.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStyle {
    /// Stroke style for gridlines.
    pub stroke: StrokeStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle {
                brush: Brush::Solid(css::BLACK.with_alpha(40.0 / 255.0)),
                stroke_width: 1.0,
            },
        }
    }
}

/// Axis placement relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed above the plot area.
    Top,
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
    /// A vertical axis placed to the right of the plot area.
    Right,
}

impl AxisOrient {
    fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// What an axis runs over.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisScaleSpec {
    /// A continuous value axis.
    Linear {
        /// Value domain `(min, max)`.
        domain: (f64, f64),
    },
    /// A discrete category axis; tick labels are the category strings.
    Band {
        /// Ordered category labels.
        categories: Vec<String>,
        /// Inner band padding, matching the bar layout's band scale.
        padding_inner: f64,
        /// Outer band padding, matching the bar layout's band scale.
        padding_outer: f64,
    },
}

/// One tick: position along the axis plus label text.
struct Tick {
    at: f64,
    label: String,
}

/// An axis specification: scale, placement, and styling.
#[derive(Clone, Debug)]
pub struct AxisSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from
    /// this base.
    pub id_base: u64,
    /// The axis scale.
    pub scale: AxisScaleSpec,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks (linear scales only).
    pub tick_count: usize,
    /// Tick line length; direction depends on `orient`.
    pub tick_size: f64,
    /// Whether to draw tick marks.
    pub ticks: bool,
    /// Whether to draw tick labels.
    pub labels: bool,
    /// Whether to draw the axis domain line.
    pub show_domain: bool,
    /// Padding between the tick end and the tick label.
    pub tick_padding: f64,
    /// Axis styling.
    pub style: AxisStyle,
    /// Optional gridline styling; gridline marks span the plot area.
    pub grid: Option<GridStyle>,
    /// Optional axis title text.
    pub title: Option<String>,
    /// Distance from tick labels to the title.
    pub title_offset: f64,
    /// Tick label rotation angle in degrees.
    pub label_angle: f64,
}

impl AxisSpec {
    /// Creates a new axis specification with defaults.
    pub fn new(id_base: u64, scale: AxisScaleSpec, orient: AxisOrient) -> Self {
        let tick_padding = if orient.is_horizontal() { 6.0 } else { 4.0 };
        Self {
            id_base,
            scale,
            orient,
            tick_count: 6,
            tick_size: 5.0,
            ticks: true,
            labels: true,
            show_domain: true,
            tick_padding,
            style: AxisStyle::default(),
            grid: None,
            title: None,
            title_offset: 10.0,
            label_angle: 0.0,
        }
    }

    /// Sets the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Enables or disables tick marks.
    pub fn with_ticks(mut self, ticks: bool) -> Self {
        self.ticks = ticks;
        self
    }

    /// Enables or disables tick labels.
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    /// Enables or disables the axis domain line.
    pub fn with_domain(mut self, domain: bool) -> Self {
        self.show_domain = domain;
        self
    }

    /// Sets the axis style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Enables gridlines using the provided style.
    pub fn with_grid(mut self, grid: GridStyle) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Sets the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets tick label rotation in degrees.
    pub fn with_label_angle(mut self, angle_degrees: f64) -> Self {
        self.label_angle = angle_degrees;
        self
    }

    /// Measures the thickness this axis needs along its normal direction.
    ///
    /// This feeds the measure/arrange layout pass; gridlines add no
    /// thickness because they live inside the plot.
    pub fn measure(&self, measurer: &impl TextMeasurer) -> f64 {
        let tick_extent = if self.ticks { self.tick_size.abs() } else { 0.0 };
        let mut out = tick_extent;

        if self.labels {
            let theta = self.label_angle.to_radians();
            let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
            let mut max_extent = 0.0_f64;
            for tick in self.tick_values((0.0, 1.0)) {
                let (w, h) = measurer.measure(&tick.label, self.style.label_font_size);
                let extent = if self.orient.is_horizontal() {
                    sin * w + cos * h
                } else {
                    cos * w + sin * h
                };
                max_extent = max_extent.max(extent);
            }
            if max_extent > 0.0 {
                out += self.tick_padding.max(0.0) + max_extent;
            }
        }

        if let Some(title) = &self.title {
            let thickness = if self.orient.is_horizontal() {
                let (_, h) = measurer.measure(title, self.style.title_font_size);
                h
            } else {
                // Rotated title: height maps to width.
                self.style.title_font_size
            };
            out += self.title_offset.max(0.0) + thickness;
        }
        out
    }

    /// Generates axis marks for the given plot and reserved axis rectangle.
    ///
    /// `axis_rect` is the region the layout pass reserved for this axis,
    /// adjacent to `plot`; the title sits at its outer edge.
    pub fn marks(&self, plot: Rect, axis_rect: Rect) -> Vec<Mark> {
        let range = self.axis_range(plot);
        let ticks = self.tick_values(range);
        let mut out = Vec::new();

        if let Some(grid) = &self.grid {
            out.extend(self.grid_marks(grid, plot, range, &ticks));
        }
        if self.show_domain {
            let (p0, p1) = self.domain_endpoints(plot);
            out.push(line_mark(
                MarkId::from_raw(self.id_base),
                p0,
                p1,
                &self.style.rule,
                z_order::AXIS_RULES,
            ));
        }
        if self.ticks {
            for (i, tick) in ticks.iter().enumerate() {
                let (p0, p1) = self.tick_endpoints(plot, tick.at);
                out.push(line_mark(
                    MarkId::from_raw(self.id_base + 1 + i as u64),
                    p0,
                    p1,
                    &self.style.rule,
                    z_order::AXIS_RULES,
                ));
            }
        }
        if self.labels {
            let len = ticks.len();
            for (i, tick) in ticks.iter().enumerate() {
                out.push(self.label_mark(plot, tick, i, len));
            }
        }
        if let Some(title) = &self.title {
            out.push(self.title_mark(plot, axis_rect, title));
        }
        out
    }

    /// The scene range this axis maps its domain onto.
    ///
    /// Linear vertical axes invert the range so larger values sit higher on
    /// screen; band ranges match the bar layout's band scale.
    fn axis_range(&self, plot: Rect) -> (f64, f64) {
        let linear = matches!(self.scale, AxisScaleSpec::Linear { .. });
        if self.orient.is_horizontal() {
            (plot.x0, plot.x1)
        } else if linear {
            (plot.y1, plot.y0)
        } else {
            (plot.y0, plot.y1)
        }
    }

    fn tick_values(&self, range: (f64, f64)) -> Vec<Tick> {
        match &self.scale {
            AxisScaleSpec::Linear { domain } => {
                let scale = ScaleLinear::new(*domain, range);
                let ticks = nice_ticks(domain.0, domain.1, self.tick_count);
                let step = tick_step(&ticks);
                ticks
                    .into_iter()
                    .map(|v| Tick {
                        at: scale.map(v),
                        label: format_tick(v, step),
                    })
                    .collect()
            }
            AxisScaleSpec::Band {
                categories,
                padding_inner,
                padding_outer,
            } => {
                let band = ScaleBand::new(range, categories.len())
                    .with_padding(*padding_inner, *padding_outer);
                categories
                    .iter()
                    .enumerate()
                    .map(|(i, label)| Tick {
                        at: band.center(i),
                        label: label.clone(),
                    })
                    .collect()
            }
        }
    }

    fn domain_endpoints(&self, plot: Rect) -> (Point, Point) {
        match self.orient {
            AxisOrient::Top => (Point::new(plot.x0, plot.y0), Point::new(plot.x1, plot.y0)),
            AxisOrient::Bottom => (Point::new(plot.x0, plot.y1), Point::new(plot.x1, plot.y1)),
            AxisOrient::Left => (Point::new(plot.x0, plot.y0), Point::new(plot.x0, plot.y1)),
            AxisOrient::Right => (Point::new(plot.x1, plot.y0), Point::new(plot.x1, plot.y1)),
        }
    }

    fn tick_endpoints(&self, plot: Rect, at: f64) -> (Point, Point) {
        let size = self.tick_size.abs();
        match self.orient {
            AxisOrient::Top => (Point::new(at, plot.y0), Point::new(at, plot.y0 - size)),
            AxisOrient::Bottom => (Point::new(at, plot.y1), Point::new(at, plot.y1 + size)),
            AxisOrient::Left => (Point::new(plot.x0, at), Point::new(plot.x0 - size, at)),
            AxisOrient::Right => (Point::new(plot.x1, at), Point::new(plot.x1 + size, at)),
        }
    }

    fn label_mark(&self, plot: Rect, tick: &Tick, index: usize, count: usize) -> Mark {
        let tick_extent = if self.ticks { self.tick_size.abs() } else { 0.0 };
        let gap = tick_extent + self.tick_padding.max(0.0);

        let (pos, anchor, baseline) = match self.orient {
            AxisOrient::Bottom | AxisOrient::Top => {
                // The outermost labels of a continuous axis are pulled
                // inward so they don't spill past the plot edges.
                let (anchor, x) = if matches!(self.scale, AxisScaleSpec::Band { .. }) {
                    (TextAnchor::Middle, tick.at)
                } else if index == 0 {
                    (TextAnchor::Start, tick.at.clamp(plot.x0, plot.x1))
                } else if index + 1 == count {
                    (TextAnchor::End, tick.at.clamp(plot.x0, plot.x1))
                } else {
                    (TextAnchor::Middle, tick.at)
                };
                if self.orient == AxisOrient::Bottom {
                    (Point::new(x, plot.y1 + gap), anchor, TextBaseline::Hanging)
                } else {
                    (
                        Point::new(x, plot.y0 - gap),
                        anchor,
                        TextBaseline::Alphabetic,
                    )
                }
            }
            AxisOrient::Left => (
                Point::new(plot.x0 - gap, tick.at),
                TextAnchor::End,
                TextBaseline::Middle,
            ),
            AxisOrient::Right => (
                Point::new(plot.x1 + gap, tick.at),
                TextAnchor::Start,
                TextBaseline::Middle,
            ),
        };

        Mark::builder(MarkId::from_raw(self.id_base + 1000 + index as u64))
            .z_index(z_order::AXIS_LABELS)
            .text(TextPayload {
                pos,
                text: tick.label.clone(),
                font_size: self.style.label_font_size,
                angle: self.label_angle,
                anchor,
                baseline,
                fill: self.style.label_fill.clone(),
            })
    }

    fn title_mark(&self, plot: Rect, axis_rect: Rect, title: &str) -> Mark {
        // The title sits in the strip at the outer edge of `axis_rect`,
        // which `measure` already reserved past the tick labels.
        let (pos, angle, baseline) = match self.orient {
            AxisOrient::Bottom => (
                Point::new(
                    (plot.x0 + plot.x1) * 0.5,
                    axis_rect.y1 - self.style.title_font_size,
                ),
                0.0,
                TextBaseline::Hanging,
            ),
            AxisOrient::Top => (
                Point::new(
                    (plot.x0 + plot.x1) * 0.5,
                    axis_rect.y0 + self.style.title_font_size,
                ),
                0.0,
                TextBaseline::Alphabetic,
            ),
            AxisOrient::Left => (
                Point::new(
                    axis_rect.x0 + 0.5 * self.style.title_font_size,
                    (plot.y0 + plot.y1) * 0.5,
                ),
                -90.0,
                TextBaseline::Middle,
            ),
            AxisOrient::Right => (
                Point::new(
                    axis_rect.x1 - 0.5 * self.style.title_font_size,
                    (plot.y0 + plot.y1) * 0.5,
                ),
                90.0,
                TextBaseline::Middle,
            ),
        };
        Mark::builder(MarkId::from_raw(self.id_base + 9000))
            .z_index(z_order::AXIS_TITLES)
            .text(TextPayload {
                pos,
                text: String::from(title),
                font_size: self.style.title_font_size,
                angle,
                anchor: TextAnchor::Middle,
                baseline,
                fill: self.style.title_fill.clone(),
            })
    }

    fn grid_marks(
        &self,
        grid: &GridStyle,
        plot: Rect,
        range: (f64, f64),
        ticks: &[Tick],
    ) -> Vec<Mark> {
        let (lo, hi) = if range.0 <= range.1 {
            (range.0, range.1)
        } else {
            (range.1, range.0)
        };
        let mut positions: Vec<f64> = ticks
            .iter()
            .map(|t| t.at)
            .filter(|at| *at >= lo - 1.0e-9 && *at <= hi + 1.0e-9)
            .collect();
        // Gridlines always reach the domain endpoints, even when the tick
        // generator stops short of a non-round bound.
        if matches!(self.scale, AxisScaleSpec::Linear { .. }) {
            push_if_missing(&mut positions, range.0);
            push_if_missing(&mut positions, range.1);
        }

        let base = self.id_base.wrapping_sub(5_000);
        positions
            .iter()
            .enumerate()
            .map(|(i, at)| {
                let (p0, p1) = if self.orient.is_horizontal() {
                    (Point::new(*at, plot.y0), Point::new(*at, plot.y1))
                } else {
                    (Point::new(plot.x0, *at), Point::new(plot.x1, *at))
                };
                line_mark(
                    MarkId::from_raw(base + i as u64),
                    p0,
                    p1,
                    &grid.stroke,
                    z_order::GRID_LINES,
                )
            })
            .collect()
    }
}

fn line_mark(id: MarkId, p0: Point, p1: Point, stroke: &StrokeStyle, z_index: i32) -> Mark {
    let mut path = BezPath::new();
    path.move_to(p0);
    path.line_to(p1);
    Mark::builder(id).z_index(z_index).path(PathPayload {
        path,
        fill: Brush::Solid(peniko::Color::TRANSPARENT),
        stroke: stroke.brush.clone(),
        stroke_width: stroke.stroke_width,
    })
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

/// Formats a tick value with just enough decimals for the tick step.
fn format_tick(v: f64, step: f64) -> String {
    let decimals = decimals_for_step(step);
    format!("{v:.decimals$}")
}

fn decimals_for_step(step: f64) -> usize {
    if step <= 0.0 {
        return 0;
    }
    let mut scaled = step;
    for decimals in 0..6 {
        if (scaled - scaled.round()).abs() < 1.0e-9 {
            return decimals;
        }
        scaled *= 10.0;
    }
    6
}

fn push_if_missing(positions: &mut Vec<f64>, at: f64) {
    if !at.is_finite() {
        return;
    }
    if positions.iter().any(|p| (*p - at).abs() <= 1.0e-6) {
        return;
    }
    positions.push(at);
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use strata_core::MarkPayload;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    fn linear(domain: (f64, f64)) -> AxisScaleSpec {
        AxisScaleSpec::Linear { domain }
    }

    fn text_of(mark: &Mark) -> Option<&TextPayload> {
        match &mark.payload {
            MarkPayload::Text(t) => Some(t),
            _ => None,
        }
    }

    #[test]
    fn measure_respects_ticks_and_labels_toggles() {
        let measurer = HeuristicTextMeasurer;
        let axis = AxisSpec::new(1, linear((0.0, 10.0)), AxisOrient::Left).with_tick_count(3);

        let with_all = axis.measure(&measurer);
        let no_labels = axis.clone().with_labels(false).measure(&measurer);
        let no_ticks = axis.clone().with_ticks(false).measure(&measurer);
        let none = axis
            .clone()
            .with_ticks(false)
            .with_labels(false)
            .measure(&measurer);

        assert!(with_all > 0.0);
        assert!(no_labels < with_all);
        assert!(no_ticks < with_all);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn band_axis_labels_are_the_category_strings() {
        let plot = Rect::new(0.0, 0.0, 300.0, 100.0);
        let axis_rect = Rect::new(0.0, 100.0, 300.0, 130.0);
        let axis = AxisSpec::new(
            1,
            AxisScaleSpec::Band {
                categories: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                padding_inner: 0.2,
                padding_outer: 0.1,
            },
            AxisOrient::Bottom,
        );
        let marks = axis.marks(plot, axis_rect);
        let labels: Vec<&str> = marks
            .iter()
            .filter(|m| m.z_index == z_order::AXIS_LABELS)
            .filter_map(|m| text_of(m).map(|t| t.text.as_str()))
            .collect();
        assert_eq!(labels, ["A", "B", "C"]);

        // Band centers ascend left to right.
        let xs: Vec<f64> = marks
            .iter()
            .filter(|m| m.z_index == z_order::AXIS_LABELS)
            .filter_map(|m| text_of(m).map(|t| t.pos.x))
            .collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn outermost_linear_labels_clamp_their_anchor() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let axis_rect = Rect::new(0.0, 50.0, 100.0, 70.0);
        let axis = AxisSpec::new(1, linear((0.0, 10.0)), AxisOrient::Bottom).with_tick_count(3);

        let labels: Vec<Mark> = axis
            .marks(plot, axis_rect)
            .into_iter()
            .filter(|m| m.z_index == z_order::AXIS_LABELS)
            .collect();
        let first = text_of(&labels[0]).unwrap();
        let last = text_of(labels.last().unwrap()).unwrap();
        assert_eq!(first.anchor, TextAnchor::Start);
        assert_eq!(last.anchor, TextAnchor::End);
        assert!(first.pos.x >= plot.x0);
        assert!(last.pos.x <= plot.x1);
    }

    #[test]
    fn grid_includes_non_round_domain_endpoints() {
        let plot = Rect::new(10.0, 20.0, 110.0, 120.0);
        let axis_rect = Rect::new(0.0, 20.0, 10.0, 120.0);
        let axis = AxisSpec::new(1, linear((0.0, 3.29)), AxisOrient::Left)
            .with_grid(GridStyle::default());

        let marks = axis.marks(plot, axis_rect);
        let mut saw_top_edge = false;
        for m in &marks {
            if m.z_index != z_order::GRID_LINES {
                continue;
            }
            if let Some(b) = m.payload.bounds()
                && (b.y0 - plot.y0).abs() < 1.0e-9
                && (b.y1 - plot.y0).abs() < 1.0e-9
            {
                saw_top_edge = true;
            }
        }
        assert!(saw_top_edge, "expected a grid line at the domain max edge");
    }

    #[test]
    fn tick_labels_use_step_precision() {
        assert_eq!(format_tick(0.5, 0.25), "0.50");
        assert_eq!(format_tick(5.0, 2.5), "5.0");
        assert_eq!(format_tick(5.0, 1.0), "5");
        assert_eq!(format_tick(-5.0, 5.0), "-5");
    }

    #[test]
    fn mark_ids_are_deterministic_offsets_from_the_base() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let axis_rect = Rect::new(0.0, 50.0, 100.0, 80.0);
        let axis = AxisSpec::new(100, linear((0.0, 10.0)), AxisOrient::Bottom)
            .with_tick_count(3)
            .with_title("value");

        let marks = axis.marks(plot, axis_rect);
        assert!(marks.iter().any(|m| m.id == MarkId::from_raw(100)));
        assert!(marks.iter().any(|m| m.id == MarkId::from_raw(101)));
        assert!(marks.iter().any(|m| m.id == MarkId::from_raw(1100)));
        assert!(marks.iter().any(|m| m.id == MarkId::from_raw(9100)));
    }
}
