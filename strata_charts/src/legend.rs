// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend mark generation.
//!
//! One swatch legend serves both series legends and overlays in legend
//! label mode. Items are laid out top-to-bottom, then left-to-right into
//! columns; a legend is measured first and positioned once the layout pass
//! has assigned it a corner.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::color::palette::css;
use peniko::{Brush, Color};
use strata_core::{Mark, MarkId, RectPayload, TextAnchor, TextBaseline, TextPayload};

use crate::layout::Size;
use crate::measure::TextMeasurer;
use crate::z_order;

/// A simple legend row item.
#[derive(Clone, Debug)]
pub struct LegendItem {
    /// The label string shown next to the swatch.
    pub label: String,
    /// The swatch fill paint.
    pub fill: Brush,
}

impl LegendItem {
    /// Convenience constructor for a solid-color swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            fill: Brush::Solid(color),
        }
    }
}

/// An unpositioned legend specification (swatches + labels).
///
/// Use this with a measure/arrange layout pass: [`LegendSwatchesSpec::measure`]
/// for the desired size, then [`LegendSwatchesSpec::marks`] once the origin
/// is known.
#[derive(Clone, Debug)]
pub struct LegendSwatchesSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from
    /// this base.
    pub id_base: u64,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Number of columns.
    ///
    /// Items are laid out top-to-bottom, then left-to-right into columns.
    pub columns: usize,
    /// Horizontal gap between columns.
    pub column_gap: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label color.
    pub text_fill: Brush,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatchesSpec {
    /// Creates a new legend specification with defaults.
    pub fn new(id_base: u64, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            swatch_size: 10.0,
            row_gap: 6.0,
            label_dx: 6.0,
            columns: 1,
            column_gap: 12.0,
            font_size: 10.0,
            text_fill: css::BLACK.into(),
            items,
        }
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the number of columns.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Measures the desired legend size (width/height).
    pub fn measure(&self, measurer: &impl TextMeasurer) -> Size {
        let b = self.bounds(0.0, 0.0, measurer);
        Size {
            width: b.width(),
            height: b.height(),
        }
    }

    /// Generates marks for this legend at the given origin (top-left).
    pub fn marks(&self, x: f64, y: f64) -> Vec<Mark> {
        let mut out = Vec::with_capacity(self.items.len() * 2);
        for (i, item) in self.items.iter().enumerate() {
            let row = self.row(i, x, y);
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + i as u64))
                    .z_index(z_order::LEGEND_SWATCHES)
                    .rect(RectPayload::new(row.swatch, item.fill.clone()))
                    .build(),
            );
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 1000 + i as u64))
                    .z_index(z_order::LEGEND_LABELS)
                    .text(TextPayload {
                        pos: row.label_pos,
                        text: item.label.clone(),
                        font_size: self.font_size,
                        angle: 0.0,
                        anchor: TextAnchor::Start,
                        baseline: TextBaseline::Middle,
                        fill: self.text_fill.clone(),
                    }),
            );
        }
        out
    }

    /// Geometry of row `i` for an origin: swatch rect plus label anchor.
    ///
    /// Placement itself is measurer-free; only `bounds` consults measured
    /// label widths.
    fn row(&self, i: usize, x: f64, y: f64) -> LegendRow {
        let columns = self.columns.max(1);
        let rows_per_col = self.items.len().div_ceil(columns).max(1);
        let col = i / rows_per_col;
        let row = i % rows_per_col;
        let row_height = self.swatch_size.max(self.font_size);

        let col_x = x + col as f64 * (self.column_width() + self.column_gap);
        let row_y = y + row as f64 * (row_height + self.row_gap);
        let swatch_y = row_y + (row_height - self.swatch_size) * 0.5;
        LegendRow {
            swatch: Rect::new(
                col_x,
                swatch_y,
                col_x + self.swatch_size,
                swatch_y + self.swatch_size,
            ),
            label_pos: Point::new(
                col_x + self.swatch_size + self.label_dx,
                row_y + row_height * 0.5,
            ),
        }
    }

    /// Width budget of one column: swatch, gap, and the widest label at the
    /// heuristic advance.
    fn column_width(&self) -> f64 {
        self.swatch_size + self.label_dx + self.font_size * 0.6 * self.longest_label() as f64
    }

    fn longest_label(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.label.chars().count())
            .max()
            .unwrap_or(0)
    }

    fn bounds(&self, x: f64, y: f64, measurer: &impl TextMeasurer) -> Rect {
        let mut bounds = Rect::new(x, y, x, y);
        for (i, item) in self.items.iter().enumerate() {
            let row = self.row(i, x, y);
            let (w, h) = measurer.measure(&item.label, self.font_size);
            let label = Rect::new(
                row.label_pos.x,
                row.label_pos.y - h * 0.5,
                row.label_pos.x + w,
                row.label_pos.y + h * 0.5,
            );
            bounds = bounds.union(row.swatch).union(label);
        }
        bounds
    }
}

struct LegendRow {
    swatch: Rect,
    label_pos: Point,
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    #[test]
    fn measure_accounts_for_columns() {
        let measurer = HeuristicTextMeasurer;
        let items = vec![
            LegendItem::solid("A", css::BLACK),
            LegendItem::solid("BBBB", css::BLACK),
            LegendItem::solid("CC", css::BLACK),
            LegendItem::solid("DDDDDD", css::BLACK),
        ];

        let one_col = LegendSwatchesSpec::new(1, items.clone()).with_columns(1);
        let two_col = LegendSwatchesSpec::new(1, items).with_columns(2);

        let s1 = one_col.measure(&measurer);
        let s2 = two_col.measure(&measurer);

        assert!(s2.width > s1.width);
        assert!(s2.height < s1.height);
    }

    #[test]
    fn marks_come_in_swatch_label_pairs_with_stable_ids() {
        let items = vec![
            LegendItem::solid("x", css::ORANGE),
            LegendItem::solid("y", css::CRIMSON),
        ];
        let marks = LegendSwatchesSpec::new(500, items).marks(10.0, 20.0);
        assert_eq!(marks.len(), 4);
        assert_eq!(marks[0].id, MarkId::from_raw(500));
        assert_eq!(marks[1].id, MarkId::from_raw(1500));
        assert_eq!(marks[2].id, MarkId::from_raw(501));
        assert_eq!(marks[3].id, MarkId::from_raw(1501));
        assert_eq!(marks[0].z_index, z_order::LEGEND_SWATCHES);
        assert_eq!(marks[1].z_index, z_order::LEGEND_LABELS);
    }
}
