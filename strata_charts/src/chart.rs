// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart engine.
//!
//! One render call runs the whole pipeline in order: binding validation,
//! pivot, stacking, domains, guide measurement, geometry, labels, overlays,
//! guides. The result is a flat mark list handed to the retained scene for
//! keyed diffing, then to the transition planner. Geometry computation is a
//! pure function of its inputs; the engine only owns the retained scene and
//! the planner.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Brush;
use strata_core::{
    FramePlan, Mark, MarkDiff, MarkId, RectPayload, Scene, TextAnchor, TextBaseline, TextPayload,
    TransitionPlanner,
};

use crate::axis::{AxisOrient, AxisScaleSpec, AxisSpec, AxisStyle, GridStyle};
use crate::bar_layout::{self, BarGeometry, BarLayout};
use crate::color::ColorResolver;
use crate::config::{
    BarMode, ChartSpec, LayoutPreset, Orientation, OverlayLabelMode, OverlaySpec, OverrideMap,
    RenderConfig,
};
use crate::domain::Domains;
use crate::facet::{self, Facet};
use crate::interaction::BarInfo;
use crate::label;
use crate::layout::{ChartLayout, ChartLayoutSpec, LegendPlacement, Size};
use crate::legend::{LegendItem, LegendSwatchesSpec};
use crate::measure::TextMeasurer;
use crate::overlay;
use crate::record::{BindingError, FieldBinding, Record};
use crate::stack::{self, PivotTable, StackSegment};
use crate::z_order;

/// Id of the plot background mark.
const BACKGROUND_ID: u64 = 1;
/// Id base for the value axis (facets stride from here).
const VALUE_AXIS_ID_BASE: u64 = 100_000;
/// Id base for the category axis (facets stride from here).
const CATEGORY_AXIS_ID_BASE: u64 = 200_000;
/// Id base for legend marks.
const LEGEND_ID_BASE: u64 = 300_000;
/// Id stride between facet guide blocks.
const FACET_ID_STRIDE: u64 = 1_000_000;

/// A render-call contract violation, reported before layout begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChartError {
    /// The spec's field names failed to resolve against the dataset.
    Binding(BindingError),
}

impl core::fmt::Display for ChartError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Binding(e) => write!(f, "field binding failed: {e}"),
        }
    }
}

impl core::error::Error for ChartError {}

impl From<BindingError> for ChartError {
    fn from(e: BindingError) -> Self {
        Self::Binding(e)
    }
}

/// Everything one render call produces.
#[derive(Debug)]
pub struct RenderOutput {
    /// Keyed enter/update/exit diffs against the previous render.
    pub diffs: Vec<MarkDiff>,
    /// The transition plan for those diffs.
    pub frame: FramePlan,
    /// Per-bar interaction state, for `InteractionController::sync`.
    pub bars: Vec<BarInfo>,
    /// The arranged guide layout.
    pub layout: ChartLayout,
}

/// One computed frame, before diffing.
struct ChartFrame {
    marks: Vec<Mark>,
    bars: Vec<BarInfo>,
    layout: ChartLayout,
    axis_signature: u64,
}

/// The retained chart engine: a scene plus a transition planner.
#[derive(Debug)]
pub struct ChartEngine {
    scene: Scene,
    planner: TransitionPlanner,
}

impl Default for ChartEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartEngine {
    /// Creates an engine with an empty retained scene.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            planner: TransitionPlanner::default(),
        }
    }

    /// Renders one frame.
    ///
    /// Recomputes all geometry from scratch, diffs it against the retained
    /// scene, and plans transitions with the timing in
    /// `config.transition`. Re-entrant calls interrupt in-flight
    /// transitions for the affected marks.
    pub fn render(
        &mut self,
        now: f64,
        view: Size,
        spec: &ChartSpec,
        config: &RenderConfig,
        records: &[Record],
        overrides: &OverrideMap,
        overlays: &[OverlaySpec],
        selected: Option<&str>,
        measurer: &impl TextMeasurer,
    ) -> Result<RenderOutput, ChartError> {
        let frame = build_frame(
            view, spec, config, records, overrides, overlays, selected, measurer,
        )?;
        let diffs = self.scene.tick(frame.marks);
        self.planner.set_policy(config.transition);
        let plan = self
            .planner
            .plan(now, frame.axis_signature, &diffs, z_order::is_guide_layer);
        Ok(RenderOutput {
            diffs,
            frame: plan,
            bars: frame.bars,
            layout: frame.layout,
        })
    }
}

/// Computes the full mark list for one render, without touching retained
/// state. This is the pure core the scene diffs against.
pub fn build_marks(
    view: Size,
    spec: &ChartSpec,
    config: &RenderConfig,
    records: &[Record],
    overrides: &OverrideMap,
    overlays: &[OverlaySpec],
    selected: Option<&str>,
    measurer: &impl TextMeasurer,
) -> Result<Vec<Mark>, ChartError> {
    build_frame(
        view, spec, config, records, overrides, overlays, selected, measurer,
    )
    .map(|frame| frame.marks)
}

fn build_frame(
    view: Size,
    spec: &ChartSpec,
    config: &RenderConfig,
    records: &[Record],
    overrides: &OverrideMap,
    overlays: &[OverlaySpec],
    selected: Option<&str>,
    measurer: &impl TextMeasurer,
) -> Result<ChartFrame, ChartError> {
    let binding = FieldBinding::resolve(
        &spec.encoding.category,
        &spec.encoding.value,
        spec.encoding.series.as_deref(),
        records,
    )?;

    if spec.layout == LayoutPreset::SmallMultiples && binding.has_series() {
        build_faceted_frame(view, spec, config, records, &binding, overrides, selected, measurer)
    } else {
        build_standard_frame(
            view, spec, config, records, &binding, overrides, overlays, selected, measurer,
        )
    }
}

fn build_standard_frame(
    view: Size,
    spec: &ChartSpec,
    config: &RenderConfig,
    records: &[Record],
    binding: &FieldBinding,
    overrides: &OverrideMap,
    overlays: &[OverlaySpec],
    selected: Option<&str>,
    measurer: &impl TextMeasurer,
) -> Result<ChartFrame, ChartError> {
    let mut table = PivotTable::build(records, binding);
    table.apply_category_order(config);
    let stacks = build_stacks(&table, config);
    let domains = Domains::derive(&table, stacks.as_deref(), config);

    // Guides are measured before geometry so margins derive from actual
    // label text.
    let value_axis = value_axis(VALUE_AXIS_ID_BASE, domains.value, config);
    let category_axis = category_axis(CATEGORY_AXIS_ID_BASE, &domains.categories, config);
    let items = legend_items(spec, config, &domains.series, overlays);
    let legend = (!items.is_empty()).then(|| LegendSwatchesSpec::new(LEGEND_ID_BASE, items));

    let arranged = arrange(view, &value_axis, &category_axis, legend.as_ref(), measurer);
    let data = arranged.data;

    let layout = bar_layout::layout_bars(&table, stacks.as_deref(), &domains, config, data);
    let resolver = ColorResolver::new(
        &config.color_mode,
        overrides,
        &spec.style.palette,
        spec.style.bar_color,
        domains.value,
    );

    let mut marks = Vec::new();
    marks.push(background_mark(BACKGROUND_ID, data, spec));
    let bars = push_bar_marks(
        &mut marks, &layout, &resolver, config, overrides, selected, data, measurer,
    );

    let overlay_out = overlay::compose_overlays(overlays, records, &layout, config.axis_font_size);
    marks.extend(overlay_out.marks);

    push_axis_marks(&mut marks, &value_axis, &category_axis, &arranged, data);
    if let (Some(legend), Some(rect)) = (&legend, arranged.legend) {
        marks.extend(legend.marks(rect.x0, rect.y0));
    }

    Ok(ChartFrame {
        marks,
        bars,
        layout: arranged,
        axis_signature: axis_signature(config, 0),
    })
}

fn build_faceted_frame(
    view: Size,
    spec: &ChartSpec,
    config: &RenderConfig,
    records: &[Record],
    binding: &FieldBinding,
    overrides: &OverrideMap,
    selected: Option<&str>,
    measurer: &impl TextMeasurer,
) -> Result<ChartFrame, ChartError> {
    // Facet margins are measured against the whole dataset's extremes so
    // every panel shares one left edge.
    let mut table = PivotTable::build(records, binding);
    table.apply_category_order(config);
    let probe_config = RenderConfig {
        mode: BarMode::Simple,
        ..config.clone()
    };
    let probe_domains = Domains::derive(&table, None, &probe_config);

    let value_axis = value_axis(VALUE_AXIS_ID_BASE, probe_domains.value, config);
    let category_axis = category_axis(CATEGORY_AXIS_ID_BASE, &probe_domains.categories, config);
    let arranged = arrange(view, &value_axis, &category_axis, None, measurer);

    let facets = facet::layout_facets(records, binding, config, arranged.data);
    let mut marks = Vec::new();
    marks.push(background_mark(BACKGROUND_ID, arranged.data, spec));

    let mut bars = Vec::new();
    for (i, facet) in facets.iter().enumerate() {
        let resolver = ColorResolver::new(
            &config.color_mode,
            overrides,
            &spec.style.palette,
            spec.style.bar_color,
            facet.value_domain,
        );
        bars.extend(push_bar_marks(
            &mut marks,
            &facet.layout,
            &resolver,
            &probe_config,
            overrides,
            selected,
            facet.frame,
            measurer,
        ));
        push_facet_guides(&mut marks, facet, i, config);
    }

    Ok(ChartFrame {
        marks,
        bars,
        layout: arranged,
        axis_signature: axis_signature(config, facets.len()),
    })
}

fn build_stacks(table: &PivotTable, config: &RenderConfig) -> Option<Vec<Vec<StackSegment>>> {
    match config.mode {
        BarMode::Stacked => Some(stack::stack_diverging(table)),
        BarMode::Stacked100 => Some(stack::stack_normalized(table)),
        BarMode::Simple | BarMode::Grouped => None,
    }
}

/// Which plot side each axis sits on: the value axis follows the value
/// screen axis, the category axis the banded one.
fn axis_orients(orientation: Orientation) -> (AxisOrient, AxisOrient) {
    match orientation {
        Orientation::Vertical => (AxisOrient::Left, AxisOrient::Bottom),
        Orientation::Horizontal => (AxisOrient::Bottom, AxisOrient::Left),
    }
}

fn value_axis(id_base: u64, domain: (f64, f64), config: &RenderConfig) -> AxisSpec {
    let (orient, _) = axis_orients(config.orientation);
    let mut axis = AxisSpec::new(id_base, AxisScaleSpec::Linear { domain }, orient)
        .with_tick_count(config.tick_count)
        .with_style(axis_style(config));
    if config.gridlines {
        axis = axis.with_grid(GridStyle::default());
    }
    if !config.show_value_axis {
        axis = axis.with_ticks(false).with_labels(false).with_domain(false);
    }
    axis
}

fn category_axis(id_base: u64, categories: &[String], config: &RenderConfig) -> AxisSpec {
    let (_, orient) = axis_orients(config.orientation);
    let scale = AxisScaleSpec::Band {
        categories: categories.to_vec(),
        padding_inner: config.padding_inner(),
        padding_outer: config.padding_outer(),
    };
    let mut axis = AxisSpec::new(id_base, scale, orient).with_style(axis_style(config));
    if !config.show_category_axis {
        axis = axis.with_ticks(false).with_labels(false).with_domain(false);
    }
    axis
}

fn axis_style(config: &RenderConfig) -> AxisStyle {
    AxisStyle {
        label_font_size: config.axis_font_size,
        ..AxisStyle::default()
    }
}

fn legend_items(
    spec: &ChartSpec,
    config: &RenderConfig,
    series: &[String],
    overlays: &[OverlaySpec],
) -> Vec<LegendItem> {
    let mut items = Vec::new();
    if config.show_legend && !series.is_empty() {
        for (i, name) in series.iter().enumerate() {
            let color = if spec.style.palette.is_empty() {
                spec.style.bar_color
            } else {
                spec.style.palette[i % spec.style.palette.len()]
            };
            items.push(LegendItem::solid(name.clone(), color));
        }
    }
    for overlay in overlays {
        if overlay.visible && overlay.label_mode == OverlayLabelMode::Legend {
            items.push(LegendItem::solid(overlay.name.clone(), overlay.color));
        }
    }
    items
}

fn arrange(
    view: Size,
    value_axis: &AxisSpec,
    category_axis: &AxisSpec,
    legend: Option<&LegendSwatchesSpec>,
    measurer: &impl TextMeasurer,
) -> ChartLayout {
    let mut spec = ChartLayoutSpec {
        view_size: view,
        outer_padding: 8.0,
        ..ChartLayoutSpec::default()
    };
    for axis in [value_axis, category_axis] {
        let thickness = axis.measure(measurer);
        if thickness <= 0.0 {
            continue;
        }
        let side = match axis.orient {
            AxisOrient::Left => &mut spec.axis_left,
            AxisOrient::Right => &mut spec.axis_right,
            AxisOrient::Top => &mut spec.axis_top,
            AxisOrient::Bottom => &mut spec.axis_bottom,
        };
        *side = Some(side.unwrap_or(0.0).max(thickness));
    }
    if let Some(legend) = legend {
        spec.legend = Some((legend.measure(measurer), LegendPlacement::default()));
    }
    ChartLayout::arrange(&spec)
}

fn background_mark(id: u64, data: Rect, spec: &ChartSpec) -> Mark {
    Mark::builder(MarkId::from_raw(id))
        .z_index(z_order::PLOT_BACKGROUND)
        .rect(RectPayload::new(data, spec.style.background))
        .build()
}

/// Emits bar rectangles (and their labels) and collects interaction state.
fn push_bar_marks(
    marks: &mut Vec<Mark>,
    layout: &BarLayout,
    resolver: &ColorResolver<'_>,
    config: &RenderConfig,
    overrides: &OverrideMap,
    selected: Option<&str>,
    data: Rect,
    measurer: &impl TextMeasurer,
) -> Vec<BarInfo> {
    let mut bars = Vec::with_capacity(layout.bars.len());
    for bar in &layout.bars {
        let key = bar.datum.key.key_string();
        let fill = resolver.resolve(&key, bar.datum.ordinal(), bar.datum.value);

        let mut payload = RectPayload::new(bar.rect, fill);
        payload.corner_radius = config.corner_radius;
        if selected == Some(key.as_str()) {
            payload.stroke = Brush::Solid(config.selection_stroke);
            payload.stroke_width = config.selection_stroke_width;
        }
        let id = bar.datum.key.mark_id();
        marks.push(
            Mark::builder(id)
                .z_index(z_order::BARS)
                .rect(payload)
                .enter_from(bar.enter_rect)
                .build(),
        );
        bars.push(BarInfo {
            id,
            category: bar.datum.key.category.clone(),
            series: bar.datum.key.series.clone(),
            value: bar.datum.value,
            fill,
        });

        if config.label.show {
            let override_label = overrides.get(&key).and_then(|o| o.label.as_deref());
            let text = label::label_text(&bar.datum, &config.label, override_label);
            let budget = label_budget(config.orientation, bar, data);
            if let Some(plan) = label::place_label(
                bar,
                config.orientation,
                &config.label,
                text,
                budget,
                measurer,
            ) {
                marks.push(
                    Mark::builder(id.offset(1))
                        .z_index(z_order::BAR_LABELS)
                        .text(TextPayload {
                            pos: plan.pos,
                            text: plan.text,
                            font_size: plan.font_size,
                            angle: plan.angle,
                            anchor: plan.anchor,
                            baseline: plan.baseline,
                            fill: Brush::Solid(peniko::color::palette::css::BLACK),
                        }),
                );
            }
        }
    }
    bars
}

/// How much run a label may occupy before the degrade ladder kicks in.
fn label_budget(orientation: Orientation, bar: &BarGeometry, data: Rect) -> f64 {
    match orientation {
        // Labels may overhang their band slightly before degrading.
        Orientation::Vertical => bar.band_width * 1.5,
        Orientation::Horizontal => (data.width() - bar.rect.width()).max(bar.band_width),
    }
}

fn push_axis_marks(
    marks: &mut Vec<Mark>,
    value_axis: &AxisSpec,
    category_axis: &AxisSpec,
    arranged: &ChartLayout,
    data: Rect,
) {
    for axis in [value_axis, category_axis] {
        let reserved = match axis.orient {
            AxisOrient::Left => arranged.axis_left,
            AxisOrient::Right => arranged.axis_right,
            AxisOrient::Top => arranged.axis_top,
            AxisOrient::Bottom => arranged.axis_bottom,
        };
        // Hidden axes may still carry gridlines, so emit even without a
        // reserved margin strip.
        marks.extend(axis.marks(data, reserved.unwrap_or(data)));
    }
}

fn push_facet_guides(marks: &mut Vec<Mark>, facet: &Facet, index: usize, config: &RenderConfig) {
    let stride = FACET_ID_STRIDE * (index as u64 + 1);
    let value_axis = value_axis(VALUE_AXIS_ID_BASE + stride, facet.value_domain, config);
    let categories: Vec<String> = facet
        .layout
        .bars
        .iter()
        .map(|b| b.datum.key.category.clone())
        .collect();
    let category_axis = category_axis(CATEGORY_AXIS_ID_BASE + stride, &categories, config);
    marks.extend(value_axis.marks(facet.frame, facet.frame));
    marks.extend(category_axis.marks(facet.frame, facet.frame));

    marks.push(
        Mark::builder(MarkId::from_key(&format!("facet/{}", facet.series)))
            .z_index(z_order::FACET_HEADERS)
            .text(TextPayload {
                pos: kurbo::Point::new(facet.frame.x0, facet.frame.y0 - 6.0),
                text: facet.series.clone(),
                font_size: config.axis_font_size + 1.0,
                angle: 0.0,
                anchor: TextAnchor::Start,
                baseline: TextBaseline::Alphabetic,
                fill: Brush::Solid(peniko::color::palette::css::BLACK),
            }),
    );
}

/// The opaque signature the planner compares to decide whether axis/grid
/// layers snap instead of animating.
fn axis_signature(config: &RenderConfig, facet_count: usize) -> u64 {
    config.orientation.signature() | ((facet_count as u64) << 8)
}
