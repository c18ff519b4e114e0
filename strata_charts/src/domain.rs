// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Domain derivation.
//!
//! Domains are derived, never caller-owned: category and series orders come
//! from the pivot table (with sort/reverse already applied via
//! [`PivotTable::apply_category_order`]), and the value extent depends on
//! the bar mode. Non-stacked modes always include zero so bars keep a
//! visible baseline; explicit `value_min`/`value_max` override individual
//! bounds.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::{BarMode, RenderConfig};
use crate::stack::{self, PivotTable, StackSegment};

/// Derived domains for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Domains {
    /// Ordered category labels.
    pub categories: Vec<String>,
    /// Ordered series labels (empty without a series field).
    pub series: Vec<String>,
    /// Value-axis `(min, max)` in domain units.
    pub value: (f64, f64),
}

impl Domains {
    /// Derives all three domains from an already-ordered pivot table.
    ///
    /// For stacked mode the caller passes the stacks so the extent covers
    /// cumulative totals rather than individual cell values.
    pub fn derive(
        table: &PivotTable,
        stacks: Option<&[Vec<StackSegment>]>,
        config: &RenderConfig,
    ) -> Self {
        let value = match config.mode {
            BarMode::Stacked100 => (0.0, 1.0),
            BarMode::Stacked => {
                let (min, max) = stacks.map_or((0.0, 0.0), stack::stack_extent);
                apply_explicit_bounds((min.min(0.0), max.max(0.0)), config)
            }
            BarMode::Simple | BarMode::Grouped => {
                let (min, max) = simple_extent(table, config.mode);
                apply_explicit_bounds((min.min(0.0), max.max(0.0)), config)
            }
        };

        Self {
            categories: table.categories().to_vec(),
            series: table.series().to_vec(),
            value,
        }
    }
}

/// Raw data extent for the non-stacked modes.
///
/// Simple mode reads per-category totals (duplicate categories sum into one
/// bar); grouped mode reads individual cells.
fn simple_extent(table: &PivotTable, mode: BarMode) -> (f64, f64) {
    match mode {
        BarMode::Simple => {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for ci in 0..table.categories().len() {
                let v = table.category_total(ci);
                min = min.min(v);
                max = max.max(v);
            }
            if min.is_finite() && max.is_finite() {
                (min, max)
            } else {
                (0.0, 0.0)
            }
        }
        _ => table.value_extent(),
    }
}

fn apply_explicit_bounds(extent: (f64, f64), config: &RenderConfig) -> (f64, f64) {
    (
        config.value_min.unwrap_or(extent.0),
        config.value_max.unwrap_or(extent.1),
    )
}
