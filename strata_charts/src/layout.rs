// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny measure/arrange layout helper for charts.
//!
//! This follows the same basic shape as WPF-style layout:
//! - **Measure**: determine desired extents (margins) for guides (axes,
//!   legends) from measured text.
//! - **Arrange**: place the plot and guide rectangles inside the view.
//!
//! Margins are derived, never hard-coded: the chart engine measures each
//! axis and the legend first, then arranges the largest data rectangle that
//! fits the caller's view size.

use kurbo::Rect;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in scene coordinate units.
    pub width: f64,
    /// Height in scene coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Which side of the plot a legend occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendOrient {
    /// Place the legend to the left of the chart.
    Left,
    /// Place the legend to the right of the chart.
    Right,
    /// Place the legend above the chart.
    Top,
    /// Place the legend below the chart.
    Bottom,
}

/// Legend placement options (orientation + offset).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendPlacement {
    /// Legend orientation.
    pub orient: LegendOrient,
    /// Offset away from the plot-and-axes block.
    pub offset: f64,
}

impl Default for LegendPlacement {
    fn default() -> Self {
        Self {
            orient: LegendOrient::Right,
            offset: 18.0,
        }
    }
}

/// Layout inputs for a single chart: the view plus measured guide extents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChartLayoutSpec {
    /// Outer chart bounds.
    pub view_size: Size,
    /// Extra padding around the whole chart (applied on all sides).
    ///
    /// This keeps tick labels that sit on a plot edge from clipping against
    /// the view boundary.
    pub outer_padding: f64,
    /// Whether to include a left axis, and its measured thickness.
    pub axis_left: Option<f64>,
    /// Whether to include a right axis, and its measured thickness.
    pub axis_right: Option<f64>,
    /// Whether to include a top axis, and its measured thickness.
    pub axis_top: Option<f64>,
    /// Whether to include a bottom axis, and its measured thickness.
    pub axis_bottom: Option<f64>,
    /// An optional legend, given by its measured size and placement.
    pub legend: Option<(Size, LegendPlacement)>,
}

/// Output of the arrange pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds.
    pub view: Rect,
    /// The data rectangle marks are laid out in.
    pub data: Rect,
    /// Reserved rectangle for the left axis (if any).
    pub axis_left: Option<Rect>,
    /// Reserved rectangle for the right axis (if any).
    pub axis_right: Option<Rect>,
    /// Reserved rectangle for the top axis (if any).
    pub axis_top: Option<Rect>,
    /// Reserved rectangle for the bottom axis (if any).
    pub axis_bottom: Option<Rect>,
    /// Legend placement rectangle (if any).
    pub legend: Option<Rect>,
}

impl ChartLayout {
    /// Computes a layout from the provided specification.
    ///
    /// The data rectangle is the largest region left after all margins;
    /// degenerate view sizes floor it at zero extent rather than failing.
    pub fn arrange(spec: &ChartLayoutSpec) -> Self {
        let outer_padding = spec.outer_padding.max(0.0);
        let axis_left_w = spec.axis_left.unwrap_or(0.0).max(0.0);
        let axis_right_w = spec.axis_right.unwrap_or(0.0).max(0.0);
        let axis_top_h = spec.axis_top.unwrap_or(0.0).max(0.0);
        let axis_bottom_h = spec.axis_bottom.unwrap_or(0.0).max(0.0);

        let mut margin_left = outer_padding + axis_left_w;
        let mut margin_right = outer_padding + axis_right_w;
        let mut margin_top = outer_padding + axis_top_h;
        let mut margin_bottom = outer_padding + axis_bottom_h;

        if let Some((legend_size, placement)) = spec.legend {
            let offset = placement.offset.max(0.0);
            match placement.orient {
                LegendOrient::Left => margin_left += legend_size.width.max(0.0) + offset,
                LegendOrient::Right => margin_right += legend_size.width.max(0.0) + offset,
                LegendOrient::Top => margin_top += legend_size.height.max(0.0) + offset,
                LegendOrient::Bottom => margin_bottom += legend_size.height.max(0.0) + offset,
            }
        }

        let data_w = (spec.view_size.width.max(0.0) - margin_left - margin_right).max(0.0);
        let data_h = (spec.view_size.height.max(0.0) - margin_top - margin_bottom).max(0.0);
        let data = Rect::new(
            margin_left,
            margin_top,
            margin_left + data_w,
            margin_top + data_h,
        );

        let axis_left = (axis_left_w > 0.0)
            .then(|| Rect::new(data.x0 - axis_left_w, data.y0, data.x0, data.y1));
        let axis_right = (axis_right_w > 0.0)
            .then(|| Rect::new(data.x1, data.y0, data.x1 + axis_right_w, data.y1));
        let axis_top =
            (axis_top_h > 0.0).then(|| Rect::new(data.x0, data.y0 - axis_top_h, data.x1, data.y0));
        let axis_bottom = (axis_bottom_h > 0.0)
            .then(|| Rect::new(data.x0, data.y1, data.x1, data.y1 + axis_bottom_h));

        // Legends sit outside the axes, relative to the data-and-axes block.
        let legend = spec.legend.map(|(legend_size, placement)| {
            legend_rect(
                data,
                axis_left_w,
                axis_right_w,
                axis_top_h,
                axis_bottom_h,
                legend_size,
                placement,
            )
        });

        Self {
            view: Rect::new(0.0, 0.0, spec.view_size.width, spec.view_size.height),
            data,
            axis_left,
            axis_right,
            axis_top,
            axis_bottom,
            legend,
        }
    }
}

fn legend_rect(
    data: Rect,
    axis_left_w: f64,
    axis_right_w: f64,
    axis_top_h: f64,
    axis_bottom_h: f64,
    size: Size,
    placement: LegendPlacement,
) -> Rect {
    let w = size.width.max(0.0);
    let h = size.height.max(0.0);
    let offset = placement.offset.max(0.0);

    match placement.orient {
        LegendOrient::Right => {
            let x0 = data.x1 + axis_right_w + offset;
            Rect::new(x0, data.y0, x0 + w, data.y0 + h)
        }
        LegendOrient::Left => {
            let x1 = data.x0 - axis_left_w - offset;
            Rect::new(x1 - w, data.y0, x1, data.y0 + h)
        }
        LegendOrient::Top => {
            let y1 = data.y0 - axis_top_h - offset;
            Rect::new(data.x0, y1 - h, data.x0 + w, y1)
        }
        LegendOrient::Bottom => {
            let y0 = data.y1 + axis_bottom_h + offset;
            Rect::new(data.x0, y0, data.x0 + w, y0 + h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_stack_padding_axes_and_legend() {
        let spec = ChartLayoutSpec {
            view_size: Size::new(400.0, 300.0),
            outer_padding: 10.0,
            axis_left: Some(30.0),
            axis_right: None,
            axis_top: None,
            axis_bottom: Some(18.0),
            legend: Some((
                Size::new(60.0, 40.0),
                LegendPlacement {
                    orient: LegendOrient::Right,
                    offset: 18.0,
                },
            )),
        };

        let layout = ChartLayout::arrange(&spec);
        assert!((layout.data.x0 - 40.0).abs() < 1e-9);
        assert!((layout.data.x1 - (400.0 - 10.0 - 60.0 - 18.0)).abs() < 1e-9);
        assert!((layout.data.y1 - (300.0 - 10.0 - 18.0)).abs() < 1e-9);

        let legend = layout.legend.expect("missing legend rect");
        assert!((legend.x0 - (layout.data.x1 + 18.0)).abs() < 1e-9);

        let axis = layout.axis_left.expect("missing left axis rect");
        assert_eq!(axis.x1, layout.data.x0);
        assert_eq!(axis.width(), 30.0);
    }

    #[test]
    fn degenerate_view_floors_the_data_rect_at_zero() {
        let spec = ChartLayoutSpec {
            view_size: Size::new(20.0, 10.0),
            outer_padding: 10.0,
            axis_left: Some(30.0),
            axis_right: None,
            axis_top: None,
            axis_bottom: Some(18.0),
            legend: None,
        };
        let layout = ChartLayout::arrange(&spec);
        assert_eq!(layout.data.width(), 0.0);
        assert_eq!(layout.data.height(), 0.0);
    }
}
