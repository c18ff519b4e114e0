// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small-multiples faceting.
//!
//! Faceting is a structurally separate sub-pass, not a flag on the main
//! layout rules: the dataset is partitioned once per series value, and each
//! partition is laid out as an independent simple bar chart in its own
//! vertically stacked frame, with a value domain computed from only that
//! facet's records.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::bar_layout::{self, BarLayout};
use crate::config::{BarMode, RenderConfig};
use crate::domain::Domains;
use crate::record::{FieldBinding, Record};
use crate::stack::PivotTable;

/// Vertical gap between facet frames, in scene coordinates.
pub const FACET_GAP: f64 = 24.0;

/// One small-multiples panel.
#[derive(Clone, Debug)]
pub struct Facet {
    /// The series value this panel shows.
    pub series: String,
    /// The panel's data rectangle.
    pub frame: Rect,
    /// Independent simple-mode layout over this panel's records.
    pub layout: BarLayout,
    /// This panel's own value domain.
    pub value_domain: (f64, f64),
}

/// Partitions the dataset by series value and lays out one panel each.
///
/// Panels keep first-seen series order and split `data` vertically with a
/// fixed gap. Returns an empty list when no series field is bound.
pub fn layout_facets(
    records: &[Record],
    binding: &FieldBinding,
    config: &RenderConfig,
    data: Rect,
) -> Vec<Facet> {
    if !binding.has_series() {
        return Vec::new();
    }

    let mut series: Vec<String> = Vec::new();
    for record in records {
        if let Some(s) = binding.series_of(record)
            && !series.contains(&s)
        {
            series.push(s);
        }
    }
    if series.is_empty() {
        return Vec::new();
    }

    let n = series.len() as f64;
    let frame_h = ((data.height() - FACET_GAP * (n - 1.0)) / n).max(0.0);
    let facet_binding = binding.without_series();
    let facet_config = RenderConfig {
        mode: BarMode::Simple,
        ..config.clone()
    };

    let mut out = Vec::with_capacity(series.len());
    for (i, series_value) in series.into_iter().enumerate() {
        let y0 = data.y0 + i as f64 * (frame_h + FACET_GAP);
        let frame = Rect::new(data.x0, y0, data.x1, y0 + frame_h);

        let partition: Vec<Record> = records
            .iter()
            .filter(|r| binding.series_of(r).as_deref() == Some(series_value.as_str()))
            .cloned()
            .collect();

        let mut table = PivotTable::build(&partition, &facet_binding);
        table.apply_category_order(&facet_config);
        let domains = Domains::derive(&table, None, &facet_config);
        let mut layout = bar_layout::layout_bars(&table, None, &domains, &facet_config, frame);

        // Bars keep their full `category|series` identity even though each
        // panel lays out as a single-series chart; without this, the same
        // category in two panels would collide on one mark id.
        for bar in &mut layout.bars {
            bar.datum.key.series = Some(series_value.clone());
        }

        out.push(Facet {
            series: series_value,
            frame,
            value_domain: domains.value,
            layout,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new().with("c", "A").with("s", "x").with("v", 10.0),
            Record::new().with("c", "B").with("s", "x").with("v", 4.0),
            Record::new().with("c", "A").with("s", "y").with("v", 100.0),
            Record::new().with("c", "B").with("s", "y").with("v", 40.0),
        ]
    }

    #[test]
    fn facets_get_independent_value_domains() {
        let records = records();
        let binding = FieldBinding::resolve("c", "v", Some("s"), &records).unwrap();
        let data = Rect::new(0.0, 0.0, 300.0, 400.0);
        let facets = layout_facets(&records, &binding, &RenderConfig::default(), data);
        assert_eq!(facets.len(), 2);
        assert_eq!(facets[0].value_domain, (0.0, 10.0));
        assert_eq!(facets[1].value_domain, (0.0, 100.0));
    }

    #[test]
    fn frames_stack_vertically_without_overlap() {
        let records = records();
        let binding = FieldBinding::resolve("c", "v", Some("s"), &records).unwrap();
        let data = Rect::new(0.0, 0.0, 300.0, 400.0);
        let facets = layout_facets(&records, &binding, &RenderConfig::default(), data);
        assert!(facets[0].frame.y1 <= facets[1].frame.y0);
        assert!((facets[1].frame.y0 - facets[0].frame.y1 - FACET_GAP).abs() < 1e-9);
        for f in &facets {
            assert!(!f.layout.bars.is_empty());
        }
    }

    #[test]
    fn bars_keep_series_qualified_identity_across_panels() {
        let records = records();
        let binding = FieldBinding::resolve("c", "v", Some("s"), &records).unwrap();
        let data = Rect::new(0.0, 0.0, 300.0, 400.0);
        let facets = layout_facets(&records, &binding, &RenderConfig::default(), data);

        let mut ids: Vec<_> = facets
            .iter()
            .flat_map(|f| f.layout.bars.iter().map(|b| b.datum.key.mark_id()))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(facets[0].layout.bars[0].datum.key.key_string(), "A|x");
    }

    #[test]
    fn no_series_field_means_no_facets() {
        let records = vec![Record::new().with("c", "A").with("v", 1.0)];
        let binding = FieldBinding::resolve("c", "v", None, &records).unwrap();
        let data = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(layout_facets(&records, &binding, &RenderConfig::default(), data).is_empty());
    }
}
