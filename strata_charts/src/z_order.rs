// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for chart-generated marks.
//!
//! Every mark carries an explicit `z_index` for render ordering. The chart
//! layer assigns these consistently so callers never hand-tune paint order.
//! Renderers should sort by `(z_index, MarkId)` for a deterministic tie-break.

/// Plot background fill.
pub const PLOT_BACKGROUND: i32 = -100;
/// Gridlines drawn behind series.
pub const GRID_LINES: i32 = -50;

/// Primary bar fills.
pub const BARS: i32 = 0;
/// Bar value/category labels.
pub const BAR_LABELS: i32 = 15;
/// Overlay marks drawn above bars.
pub const OVERLAYS: i32 = 20;
/// Overlay labels.
pub const OVERLAY_LABELS: i32 = 25;

/// Axis domain line and tick marks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;
/// Axis title labels.
pub const AXIS_TITLES: i32 = 50;

/// Legend swatches.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend labels.
pub const LEGEND_LABELS: i32 = 70;
/// Facet header labels.
pub const FACET_HEADERS: i32 = 75;

/// Returns `true` for layers that snap (instead of animating) when the
/// orientation changes: gridlines and axis rules/labels/titles.
///
/// Interpolating between orthogonal axis orientations reads as a shear, so
/// the transition planner consults this predicate per mark.
pub const fn is_guide_layer(z_index: i32) -> bool {
    z_index == GRID_LINES || (z_index >= AXIS_RULES && z_index <= AXIS_TITLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_layers_are_not_guides() {
        assert!(!is_guide_layer(BARS));
        assert!(!is_guide_layer(BAR_LABELS));
        assert!(!is_guide_layer(OVERLAYS));
        assert!(!is_guide_layer(LEGEND_SWATCHES));
        assert!(is_guide_layer(GRID_LINES));
        assert!(is_guide_layer(AXIS_RULES));
        assert!(is_guide_layer(AXIS_LABELS));
    }
}
