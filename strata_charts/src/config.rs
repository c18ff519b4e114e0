// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart specification and the fully-defaulted render configuration.
//!
//! `RenderConfig` is the canonical defaults table: every knob has a value,
//! the struct is constructed once at the boundary, and layout code never
//! reads an optional field. Per-datum overrides and overlays are separate
//! inputs keyed to the same category/series space.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::palette::css;
use strata_core::TransitionPolicy;

/// How bars are arranged along the value axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarMode {
    /// One bar per category.
    Simple,
    /// Side-by-side bars per series within each category band.
    Grouped,
    /// Series stacked on a shared (possibly diverging) baseline.
    Stacked,
    /// Stacked and normalized so every category totals 1.
    Stacked100,
}

/// Which screen axis carries the category bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Categories along x, values along y.
    Vertical,
    /// Categories along y, values along x.
    Horizontal,
}

impl Orientation {
    /// An opaque discriminant fed to the transition planner's axis-snap
    /// check.
    pub const fn signature(self) -> u64 {
        match self {
            Self::Vertical => 1,
            Self::Horizontal => 2,
        }
    }
}

/// Overall chart arrangement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutPreset {
    /// One plot for all series.
    Standard,
    /// One vertically stacked facet per series value, each with its own
    /// value domain.
    SmallMultiples,
}

/// Where a bar label sits relative to its bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelPosition {
    /// Toward the low end of the value axis.
    Left,
    /// Toward the high end of the value axis.
    Right,
    /// Beyond the bar tip.
    Top,
    /// At the bar base.
    Bottom,
    /// Centered inside the bar.
    Inside,
}

/// What text a bar label shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelSource {
    /// The bar's numeric value.
    Value,
    /// The bar's category label.
    Category,
}

/// Bar label policy.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelConfig {
    /// Whether bar labels are drawn at all.
    pub show: bool,
    /// Label placement relative to the bar.
    pub position: LabelPosition,
    /// Text source.
    pub source: LabelSource,
    /// Rotation in degrees, applied around the label anchor.
    pub rotation: f64,
    /// Gap between the bar edge and the label anchor.
    pub distance: f64,
    /// Label font size.
    pub font_size: f64,
    /// Substitute two-letter category codes with pictographic flag pairs.
    pub flag_substitution: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            show: false,
            position: LabelPosition::Top,
            source: LabelSource::Value,
            rotation: 0.0,
            distance: 4.0,
            font_size: 10.0,
            flag_substitution: false,
        }
    }
}

/// Fill resolution mode, consulted after per-datum overrides.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorMode {
    /// Every bar uses the configured bar color.
    Single,
    /// Ordinal palette over categories (or series, for stacked layers),
    /// cycling when the domain is longer than the palette.
    Palette,
    /// Linear interpolation between two colors across the value domain,
    /// clamped at the edges.
    Gradient {
        /// Color at the domain minimum.
        low: Color,
        /// Color at the domain maximum.
        high: Color,
    },
    /// Three-way split on fixed thresholds. Values equal to a threshold
    /// resolve to the mid color.
    Threshold {
        /// Values strictly below this bound use `low`.
        low_below: f64,
        /// Values strictly above this bound use `high`.
        high_above: f64,
        /// Low-side color.
        low: Color,
        /// In-between (and exact-equality) color.
        mid: Color,
        /// High-side color.
        high: Color,
    },
}

/// Overlay mark shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayKind {
    /// One column; min and max coincide.
    Value,
    /// Two columns giving an explicit [min, max] span.
    Range,
}

/// How an overlay's name is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayLabelMode {
    /// Label next to the first drawn occurrence only.
    FirstOccurrence,
    /// Contribute an entry to the chart legend instead.
    Legend,
    /// No label.
    Hidden,
}

/// A decorative secondary layer bound to the primary category/series keys.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySpec {
    /// Stable overlay id, used to derive mark ids.
    pub id: u64,
    /// Display name for labels/legend entries.
    pub name: String,
    /// Value or range.
    pub kind: OverlayKind,
    /// Column read for value overlays (and as a fallback for ranges).
    pub column: String,
    /// Lower-bound column for range overlays.
    pub range_min_column: Option<String>,
    /// Upper-bound column for range overlays.
    pub range_max_column: Option<String>,
    /// Label rendering mode.
    pub label_mode: OverlayLabelMode,
    /// Overlay fill color.
    pub color: Color,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
    /// Hidden overlays are skipped entirely.
    pub visible: bool,
}

impl OverlaySpec {
    /// Creates a visible value overlay reading one column.
    pub fn value(id: u64, name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: OverlayKind::Value,
            column: column.into(),
            range_min_column: None,
            range_max_column: None,
            label_mode: OverlayLabelMode::Hidden,
            color: css::DARK_SLATE_GRAY,
            opacity: 0.9,
            visible: true,
        }
    }

    /// Creates a visible range overlay reading two columns.
    pub fn range(
        id: u64,
        name: impl Into<String>,
        min_column: impl Into<String>,
        max_column: impl Into<String>,
    ) -> Self {
        let min_column = min_column.into();
        Self {
            id,
            name: name.into(),
            kind: OverlayKind::Range,
            column: min_column.clone(),
            range_min_column: Some(min_column),
            range_max_column: Some(max_column.into()),
            label_mode: OverlayLabelMode::Hidden,
            color: css::DARK_SLATE_GRAY,
            opacity: 0.9,
            visible: true,
        }
    }

    /// Sets the label mode.
    pub fn with_label_mode(mut self, label_mode: OverlayLabelMode) -> Self {
        self.label_mode = label_mode;
        self
    }

    /// Sets fill color and opacity.
    pub fn with_paint(mut self, color: Color, opacity: f64) -> Self {
        self.color = color;
        self.opacity = opacity;
        self
    }

    /// Sets visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Sparse per-datum visual override.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BarOverride {
    /// Replacement fill color.
    pub color: Option<Color>,
    /// Replacement label text.
    pub label: Option<String>,
}

/// Per-datum overrides keyed by `category` or `category|series`.
#[derive(Clone, Debug, Default)]
pub struct OverrideMap {
    entries: HashMap<String, BarOverride>,
}

impl OverrideMap {
    /// Creates an empty override map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The composite key for a datum.
    pub fn key(category: &str, series: Option<&str>) -> String {
        match series {
            Some(series) => format!("{category}|{series}"),
            None => String::from(category),
        }
    }

    /// Inserts an override for a key.
    pub fn insert(&mut self, key: impl Into<String>, entry: BarOverride) {
        self.entries.insert(key.into(), entry);
    }

    /// Looks up the override for a key.
    pub fn get(&self, key: &str) -> Option<&BarOverride> {
        self.entries.get(key)
    }

    /// Returns `true` when no overrides are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Field encodings for the chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartEncoding {
    /// Field supplying category labels.
    pub category: String,
    /// Field supplying numeric values.
    pub value: String,
    /// Optional field supplying series labels.
    pub series: Option<String>,
}

/// Static chart styling.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    /// Ordinal palette for palette color mode and series fills.
    pub palette: Vec<Color>,
    /// Plot background fill.
    pub background: Color,
    /// Fallback single-bar color.
    pub bar_color: Color,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            background: css::WHITE,
            bar_color: css::CORNFLOWER_BLUE,
        }
    }
}

/// The default categorical palette; cycles when the domain is longer.
pub fn default_palette() -> Vec<Color> {
    alloc::vec![
        css::CORNFLOWER_BLUE,
        css::ORANGE,
        css::MEDIUM_SEA_GREEN,
        css::CRIMSON,
        css::GOLDENROD,
        css::SLATE_BLUE,
        css::DARK_CYAN,
        css::HOT_PINK,
    ]
}

/// The declarative chart description, immutable per render call.
#[derive(Clone, Debug)]
pub struct ChartSpec {
    /// Field encodings.
    pub encoding: ChartEncoding,
    /// Overall arrangement.
    pub layout: LayoutPreset,
    /// Palette/background/fallback styling.
    pub style: ChartStyle,
}

impl ChartSpec {
    /// Creates a standard-layout spec with default styling.
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            encoding: ChartEncoding {
                category: category.into(),
                value: value.into(),
                series: None,
            },
            layout: LayoutPreset::Standard,
            style: ChartStyle::default(),
        }
    }

    /// Binds a series field.
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.encoding.series = Some(series.into());
        self
    }

    /// Sets the layout preset.
    pub fn with_layout(mut self, layout: LayoutPreset) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the style block.
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }
}

/// Every visual knob, fully populated.
///
/// `Default` is the canonical defaults table; partial caller configs are
/// expressed as `RenderConfig { <edits>, ..Default::default() }`.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Bar arrangement mode.
    pub mode: BarMode,
    /// Which axis is banded.
    pub orientation: Orientation,
    /// Re-order categories by summed value, descending.
    pub sort_bars: bool,
    /// Reverse the category order after sorting.
    pub reverse_order: bool,
    /// Explicit value-domain lower bound.
    pub value_min: Option<f64>,
    /// Explicit value-domain upper bound.
    pub value_max: Option<f64>,
    /// Bar corner radius.
    pub corner_radius: f64,
    /// Inner band padding in band units; outer padding is half of this.
    pub bar_padding: f64,
    /// Reduce band padding by a fixed delta (floored at zero).
    pub thicker_bars: bool,
    /// Transition timing for the planner.
    pub transition: TransitionPolicy,
    /// Draw value-axis gridlines.
    pub gridlines: bool,
    /// Bar label policy.
    pub label: LabelConfig,
    /// Fill resolution mode.
    pub color_mode: ColorMode,
    /// Draw the category axis.
    pub show_category_axis: bool,
    /// Draw the value axis.
    pub show_value_axis: bool,
    /// Approximate value-axis tick count.
    pub tick_count: usize,
    /// Axis tick label font size.
    pub axis_font_size: f64,
    /// Show a series legend when a series field is bound.
    pub show_legend: bool,
    /// Stroke color for the selected bar.
    pub selection_stroke: Color,
    /// Stroke width for the selected bar.
    pub selection_stroke_width: f64,
}

/// Padding removed from the inner band padding when thicker bars are on.
pub(crate) const THICKER_BARS_DELTA: f64 = 0.15;

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: BarMode::Simple,
            orientation: Orientation::Vertical,
            sort_bars: false,
            reverse_order: false,
            value_min: None,
            value_max: None,
            corner_radius: 0.0,
            bar_padding: 0.2,
            thicker_bars: false,
            transition: TransitionPolicy::default(),
            gridlines: true,
            label: LabelConfig::default(),
            color_mode: ColorMode::Single,
            show_category_axis: true,
            show_value_axis: true,
            tick_count: 6,
            axis_font_size: 10.0,
            show_legend: true,
            selection_stroke: css::BLACK,
            selection_stroke_width: 1.5,
        }
    }
}

impl RenderConfig {
    /// The effective inner band padding after the thicker-bars adjustment,
    /// floored at zero.
    pub fn padding_inner(&self) -> f64 {
        let inner = self.bar_padding.max(0.0);
        if self.thicker_bars {
            (inner - THICKER_BARS_DELTA).max(0.0)
        } else {
            inner
        }
    }

    /// The outer band padding (half the inner padding by convention).
    pub fn padding_outer(&self) -> f64 {
        self.padding_inner() * 0.5
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn thicker_bars_floor_padding_at_zero() {
        let thin = RenderConfig {
            bar_padding: 0.1,
            thicker_bars: true,
            ..RenderConfig::default()
        };
        assert_eq!(thin.padding_inner(), 0.0);
        assert_eq!(thin.padding_outer(), 0.0);

        let normal = RenderConfig {
            bar_padding: 0.3,
            thicker_bars: true,
            ..RenderConfig::default()
        };
        assert!((normal.padding_inner() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn override_keys_compose_category_and_series() {
        assert_eq!(OverrideMap::key("Germany", None), "Germany");
        assert_eq!(
            OverrideMap::key("Germany", Some("exports")),
            "Germany|exports"
        );
    }
}
