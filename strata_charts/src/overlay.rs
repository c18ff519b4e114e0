// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay composition.
//!
//! Overlays are decorative secondary layers bound to the same
//! category/series keys as the primary bars: benchmarks, targets, error
//! ranges. Each visible overlay derives a `[min, max]` span per record from
//! one or two named columns and draws a narrower rectangle centered over the
//! primary bar's band position, with independent paint.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Brush;
use strata_core::{Mark, MarkId, RectPayload, TextAnchor, TextBaseline, TextPayload};

use crate::bar_layout::{BarLayout, span_rect};
use crate::config::{Orientation, OverlayKind, OverlayLabelMode, OverlaySpec};
use crate::legend::LegendItem;
use crate::record::{FieldBinding, Record};
use crate::z_order;

/// Overlay rectangles take this fraction of the primary bar's band width.
const OVERLAY_WIDTH_FRACTION: f64 = 0.6;

/// Marks and legend contributions from one overlay pass.
#[derive(Debug, Default)]
pub struct OverlayOutput {
    /// Overlay rectangles and first-occurrence labels.
    pub marks: Vec<Mark>,
    /// Items contributed by overlays in legend label mode.
    pub legend_items: Vec<LegendItem>,
}

/// Composes every visible overlay against an already-computed bar layout.
///
/// Records where both bounds are non-finite are skipped; a record with
/// exactly one finite bound keeps it for both, degenerating to a zero-height
/// range mark.
pub fn compose_overlays(
    overlays: &[OverlaySpec],
    records: &[Record],
    layout: &BarLayout,
    label_font_size: f64,
) -> OverlayOutput {
    let mut out = OverlayOutput::default();
    for spec in overlays.iter().filter(|spec| spec.visible) {
        compose_one(spec, records, layout, label_font_size, &mut out);
    }
    out
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "paint alpha only needs f32 precision"
)]
fn compose_one(
    spec: &OverlaySpec,
    records: &[Record],
    layout: &BarLayout,
    label_font_size: f64,
    out: &mut OverlayOutput,
) {
    let fill = Brush::Solid(spec.color.multiply_alpha(spec.opacity as f32));
    let mut labeled = false;

    for bar in &layout.bars {
        let Some(record) = bar.datum.record.and_then(|ri| records.get(ri)) else {
            continue;
        };
        let Some((lo, hi)) = overlay_bounds(spec, record) else {
            continue;
        };

        let half = bar.band_width * OVERLAY_WIDTH_FRACTION * 0.5;
        let rect = span_rect(
            layout.orientation,
            bar.band_center - half,
            bar.band_center + half,
            layout.value_scale.map(lo),
            layout.value_scale.map(hi),
        );
        let id = overlay_mark_id(spec.id, &bar.datum.key.key_string());
        out.marks.push(
            Mark::builder(id)
                .z_index(z_order::OVERLAYS)
                .rect(RectPayload::new(rect, fill.clone()))
                .build(),
        );

        if !labeled && spec.label_mode == OverlayLabelMode::FirstOccurrence {
            labeled = true;
            out.marks.push(first_occurrence_label(
                spec,
                layout.orientation,
                rect,
                label_font_size,
            ));
        }
    }

    if spec.label_mode == OverlayLabelMode::Legend {
        out.legend_items
            .push(LegendItem::solid(spec.name.clone(), spec.color));
    }
}

/// The `[min, max]` span an overlay reads from one record.
///
/// Value overlays duplicate their single column; range overlays read both
/// bound columns (falling back to the primary column for a missing min
/// binding). `None` means neither bound is finite and the record is skipped.
fn overlay_bounds(spec: &OverlaySpec, record: &Record) -> Option<(f64, f64)> {
    let (lo, hi) = match spec.kind {
        OverlayKind::Value => {
            let v = FieldBinding::numeric_column(record, &spec.column);
            (v, v)
        }
        OverlayKind::Range => {
            let min_column = spec.range_min_column.as_deref().unwrap_or(&spec.column);
            let lo = FieldBinding::numeric_column(record, min_column);
            let hi = spec
                .range_max_column
                .as_deref()
                .and_then(|c| FieldBinding::numeric_column(record, c));
            (lo, hi)
        }
    };
    match (lo, hi) {
        (Some(lo), Some(hi)) => Some((lo.min(hi), lo.max(hi))),
        (Some(v), None) | (None, Some(v)) => Some((v, v)),
        (None, None) => None,
    }
}

/// A stable id for one overlay mark, derived from the overlay id and the
/// datum's composite key so dataset reorders keep identity.
fn overlay_mark_id(overlay_id: u64, key: &str) -> MarkId {
    MarkId::from_key(&format!("overlay/{overlay_id}/{key}"))
}

fn first_occurrence_label(
    spec: &OverlaySpec,
    orientation: Orientation,
    rect: kurbo::Rect,
    font_size: f64,
) -> Mark {
    // The label sits just past the high-value edge of the first drawn mark.
    let (pos, anchor, baseline) = match orientation {
        Orientation::Vertical => (
            Point::new(rect.center().x, rect.y0 - 4.0),
            TextAnchor::Middle,
            TextBaseline::Alphabetic,
        ),
        Orientation::Horizontal => (
            Point::new(rect.x1 + 4.0, rect.center().y),
            TextAnchor::Start,
            TextBaseline::Middle,
        ),
    };
    Mark::builder(overlay_mark_id(spec.id, "label"))
        .z_index(z_order::OVERLAY_LABELS)
        .text(TextPayload {
            pos,
            text: spec.name.clone(),
            font_size,
            angle: 0.0,
            anchor,
            baseline,
            fill: Brush::Solid(spec.color),
        })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Rect;
    use peniko::color::palette::css;
    use strata_core::MarkPayload;

    use super::*;
    use crate::bar_layout::layout_bars;
    use crate::config::RenderConfig;
    use crate::domain::Domains;
    use crate::record::FieldBinding;
    use crate::stack::PivotTable;

    fn setup(records: &[Record]) -> BarLayout {
        let binding = FieldBinding::resolve("c", "v", None, records).unwrap();
        let table = PivotTable::build(records, &binding);
        let config = RenderConfig::default();
        let domains = Domains::derive(&table, None, &config);
        layout_bars(&table, None, &domains, &config, Rect::new(0.0, 0.0, 300.0, 200.0))
    }

    fn rect_of(mark: &Mark) -> Rect {
        let MarkPayload::Rect(r) = &mark.payload else {
            panic!("expected rect payload");
        };
        r.rect
    }

    #[test]
    fn overlay_marks_take_a_fraction_of_the_band() {
        let records = vec![
            Record::new().with("c", "A").with("v", 10.0).with("t", 12.0),
            Record::new().with("c", "B").with("v", 5.0).with("t", 6.0),
        ];
        let layout = setup(&records);
        let overlays = [OverlaySpec::value(1, "target", "t")];
        let out = compose_overlays(&overlays, &records, &layout, 10.0);
        assert_eq!(out.marks.len(), 2);

        let bar = &layout.bars[0];
        let r = rect_of(&out.marks[0]);
        assert!((r.width() - bar.band_width * 0.6).abs() < 1e-9);
        assert!((r.center().x - bar.band_center).abs() < 1e-9);
        // Value overlays degenerate to a zero-height span.
        assert_eq!(r.height(), 0.0);
    }

    #[test]
    fn one_finite_bound_is_kept_for_both() {
        let records = vec![
            Record::new()
                .with("c", "A")
                .with("v", 10.0)
                .with("lo", 4.0)
                .with("hi", 8.0),
            Record::new().with("c", "B").with("v", 5.0).with("lo", 3.0),
            Record::new().with("c", "C").with("v", 2.0),
        ];
        let layout = setup(&records);
        let overlays = [OverlaySpec::range(7, "band", "lo", "hi")];
        let out = compose_overlays(&overlays, &records, &layout, 10.0);
        // C has neither bound and is skipped.
        assert_eq!(out.marks.len(), 2);
        assert!(rect_of(&out.marks[0]).height() > 0.0);
        assert_eq!(rect_of(&out.marks[1]).height(), 0.0);
    }

    #[test]
    fn hidden_overlays_are_skipped_entirely() {
        let records = vec![Record::new().with("c", "A").with("v", 10.0).with("t", 2.0)];
        let layout = setup(&records);
        let overlays = [OverlaySpec::value(1, "target", "t").with_visible(false)];
        let out = compose_overlays(&overlays, &records, &layout, 10.0);
        assert!(out.marks.is_empty());
        assert!(out.legend_items.is_empty());
    }

    #[test]
    fn label_modes_route_to_marks_or_legend() {
        let records = vec![
            Record::new().with("c", "A").with("v", 10.0).with("t", 2.0),
            Record::new().with("c", "B").with("v", 5.0).with("t", 3.0),
        ];
        let layout = setup(&records);

        let first = [OverlaySpec::value(1, "target", "t")
            .with_label_mode(OverlayLabelMode::FirstOccurrence)];
        let out = compose_overlays(&first, &records, &layout, 10.0);
        let texts: Vec<_> = out
            .marks
            .iter()
            .filter(|m| matches!(m.payload, MarkPayload::Text(_)))
            .collect();
        assert_eq!(texts.len(), 1);
        assert!(out.legend_items.is_empty());

        let legend =
            [OverlaySpec::value(1, "target", "t").with_label_mode(OverlayLabelMode::Legend)];
        let out = compose_overlays(&legend, &records, &layout, 10.0);
        assert!(out.marks.iter().all(|m| matches!(m.payload, MarkPayload::Rect(_))));
        assert_eq!(out.legend_items.len(), 1);
        assert_eq!(out.legend_items[0].label, "target");
    }

    #[test]
    fn reordering_records_keeps_overlay_mark_ids() {
        let records = vec![
            Record::new().with("c", "A").with("v", 10.0).with("t", 2.0),
            Record::new().with("c", "B").with("v", 5.0).with("t", 3.0),
        ];
        let reordered: Vec<Record> = records.iter().rev().cloned().collect();
        let overlays = [OverlaySpec::value(9, "target", "t")];

        let a = compose_overlays(&overlays, &records, &setup(&records), 10.0);
        let b = compose_overlays(&overlays, &reordered, &setup(&reordered), 10.0);

        let mut ids_a: Vec<_> = a.marks.iter().map(|m| m.id).collect();
        let mut ids_b: Vec<_> = b.marks.iter().map(|m| m.id).collect();
        ids_a.sort_unstable();
        ids_b.sort_unstable();
        assert_eq!(ids_a, ids_b);
    }
}
