// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The category × series pivot table and stacking offsets.
//!
//! Records are pivoted into one row per category with one lane per series
//! (missing combinations read as 0). Stacking walks each category's lanes in
//! series order and emits contiguous `[low, high]` segments: the default
//! offset diverges around zero (negatives stack down), the normalized offset
//! rescales each category to total 1.
//!
//! Every segment carries a back-reference to its originating record index,
//! so geometry, labels, and overlays can treat any stacked segment as an
//! independent datum.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::RenderConfig;
use crate::record::{FieldBinding, Record};

/// Records pivoted into category rows × series lanes.
///
/// When no series field is bound there is a single unnamed lane and
/// duplicate categories sum into it.
#[derive(Clone, Debug)]
pub struct PivotTable {
    categories: Vec<String>,
    series: Vec<String>,
    /// `values[category][lane]`, coerced to 0 for missing combinations.
    values: Vec<Vec<f64>>,
    /// Originating record index per cell, `None` for missing combinations.
    records: Vec<Vec<Option<usize>>>,
}

impl PivotTable {
    /// Pivots the dataset. Category and series orders are first-seen.
    pub fn build(records: &[Record], binding: &FieldBinding) -> Self {
        let mut categories: Vec<String> = Vec::new();
        let mut series: Vec<String> = Vec::new();

        for record in records {
            let cat = binding.category_of(record);
            if !categories.contains(&cat) {
                categories.push(cat);
            }
            if let Some(ser) = binding.series_of(record)
                && !series.contains(&ser)
            {
                series.push(ser);
            }
        }

        let lanes = series.len().max(1);
        let mut values = alloc::vec![alloc::vec![0.0; lanes]; categories.len()];
        let mut refs = alloc::vec![alloc::vec![None; lanes]; categories.len()];

        for (index, record) in records.iter().enumerate() {
            let cat = binding.category_of(record);
            let Some(ci) = categories.iter().position(|c| *c == cat) else {
                continue;
            };
            let li = match binding.series_of(record) {
                Some(ser) => match series.iter().position(|s| *s == ser) {
                    Some(li) => li,
                    None => continue,
                },
                None => 0,
            };
            values[ci][li] += binding.value_of(record);
            refs[ci][li] = Some(index);
        }

        Self {
            categories,
            series,
            values,
            records: refs,
        }
    }

    /// Ordered category labels.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Ordered series labels (empty when no series field is bound).
    pub fn series(&self) -> &[String] {
        &self.series
    }

    /// Number of value lanes (`max(1, series count)`).
    pub fn lanes(&self) -> usize {
        self.values.first().map_or(1, Vec::len)
    }

    /// The pivoted value for a cell.
    pub fn value(&self, category: usize, lane: usize) -> f64 {
        self.values
            .get(category)
            .and_then(|row| row.get(lane))
            .copied()
            .unwrap_or(0.0)
    }

    /// The originating record index for a cell, if any record fed it.
    pub fn record_index(&self, category: usize, lane: usize) -> Option<usize> {
        self.records
            .get(category)
            .and_then(|row| row.get(lane))
            .copied()
            .flatten()
    }

    /// Signed total of one category row.
    pub fn category_total(&self, category: usize) -> f64 {
        self.values
            .get(category)
            .map_or(0.0, |row| row.iter().sum())
    }

    /// Finite `(min, max)` over all cell values; `(0, 0)` when empty.
    pub fn value_extent(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in &self.values {
            for v in row {
                min = min.min(*v);
                max = max.max(*v);
            }
        }
        if min.is_finite() && max.is_finite() {
            (min, max)
        } else {
            (0.0, 0.0)
        }
    }

    /// Applies the configured category ordering: sort by summed value
    /// (descending) first, then reverse.
    ///
    /// Must run before stacking so segment order matches category order.
    pub fn apply_category_order(&mut self, config: &RenderConfig) {
        if config.sort_bars {
            self.sort_by_total();
        }
        if config.reverse_order {
            self.reverse();
        }
    }

    /// Stable re-order of categories by signed total, descending.
    pub fn sort_by_total(&mut self) {
        let mut order: Vec<usize> = (0..self.categories.len()).collect();
        let totals: Vec<f64> = order.iter().map(|&i| self.category_total(i)).collect();
        order.sort_by(|&a, &b| {
            totals[b]
                .partial_cmp(&totals[a])
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        self.reorder(&order);
    }

    /// Reverses the category order.
    pub fn reverse(&mut self) {
        self.categories.reverse();
        self.values.reverse();
        self.records.reverse();
    }

    fn reorder(&mut self, order: &[usize]) {
        self.categories = order.iter().map(|&i| self.categories[i].clone()).collect();
        self.values = order.iter().map(|&i| self.values[i].clone()).collect();
        self.records = order.iter().map(|&i| self.records[i].clone()).collect();
    }
}

/// One stacked segment: a `[low, high]` span in domain units plus the
/// originating record index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackSegment {
    /// Lower edge in domain units.
    pub low: f64,
    /// Upper edge in domain units.
    pub high: f64,
    /// Back-reference into the input record slice.
    pub record: Option<usize>,
}

/// Per-lane, per-category segments from the diverging zero offset.
///
/// Positive values accumulate upward from zero and negative values downward,
/// so each category's spans are contiguous on both sides of the baseline.
/// Output is indexed `[lane][category]`.
pub fn stack_diverging(table: &PivotTable) -> Vec<Vec<StackSegment>> {
    let lanes = table.lanes();
    let cats = table.categories().len();
    let mut out = alloc::vec![Vec::with_capacity(cats); lanes];

    for ci in 0..cats {
        let mut up = 0.0_f64;
        let mut down = 0.0_f64;
        for (li, lane) in out.iter_mut().enumerate() {
            let v = table.value(ci, li);
            let (low, high) = if v >= 0.0 {
                let span = (up, up + v);
                up += v;
                span
            } else {
                let span = (down + v, down);
                down += v;
                span
            };
            lane.push(StackSegment {
                low,
                high,
                record: table.record_index(ci, li),
            });
        }
    }
    out
}

/// Per-lane, per-category segments normalized so each category totals 1.
///
/// Shares are `|v| / sum(|v|)` stacked upward from zero, which keeps the
/// output in `[0, 1]` even for diverging input. A category with an all-zero
/// row yields zero-height segments.
pub fn stack_normalized(table: &PivotTable) -> Vec<Vec<StackSegment>> {
    let lanes = table.lanes();
    let cats = table.categories().len();
    let mut out = alloc::vec![Vec::with_capacity(cats); lanes];

    for ci in 0..cats {
        let total: f64 = (0..lanes).map(|li| table.value(ci, li).abs()).sum();
        let mut cursor = 0.0_f64;
        for (li, lane) in out.iter_mut().enumerate() {
            let share = if total == 0.0 {
                0.0
            } else {
                table.value(ci, li).abs() / total
            };
            lane.push(StackSegment {
                low: cursor,
                high: cursor + share,
                record: table.record_index(ci, li),
            });
            cursor += share;
        }
    }
    out
}

/// Finite `(min, max)` over all stacked segment edges; `(0, 0)` when empty.
pub fn stack_extent(stacks: &[Vec<StackSegment>]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for lane in stacks {
        for seg in lane {
            min = min.min(seg.low);
            max = max.max(seg.high);
        }
    }
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}
