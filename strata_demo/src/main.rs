// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static gallery demo: renders one chart per feature area and writes a
//! standalone HTML page with the settled SVG output of each.

mod html;
mod svg;

use std::error::Error;

use peniko::color::palette::css;
use strata_charts::{
    BarMode, ChartEngine, ChartSpec, ColorMode, HeuristicTextMeasurer, LabelConfig, LabelSource,
    LayoutPreset, Orientation, OverlayLabelMode, OverlaySpec, OverrideMap, Record, RenderConfig,
    Size,
};

use crate::html::Section;
use crate::svg::MarkStore;

const VIEW: Size = Size::new(640.0, 360.0);

fn exports() -> Vec<Record> {
    [
        ("Germany", 1_560.0),
        ("France", 830.0),
        ("Italy", 660.0),
        ("Spain", 420.0),
        ("Poland", -120.0),
    ]
    .into_iter()
    .map(|(country, balance)| {
        Record::new()
            .with("country", country)
            .with("balance", balance)
            .with("target", balance * 1.1)
    })
    .collect()
}

fn quarterly() -> Vec<Record> {
    let mut out = Vec::new();
    for (quarter, values) in [
        ("Q1", [120.0, 80.0, 30.0]),
        ("Q2", [140.0, 95.0, -10.0]),
        ("Q3", [110.0, 120.0, 45.0]),
        ("Q4", [160.0, 90.0, 25.0]),
    ] {
        for (segment, value) in ["hardware", "software", "services"].iter().zip(values) {
            out.push(
                Record::new()
                    .with("quarter", quarter)
                    .with("segment", *segment)
                    .with("revenue", value),
            );
        }
    }
    out
}

/// Renders one chart to its settled SVG.
fn render(
    spec: &ChartSpec,
    config: &RenderConfig,
    records: &[Record],
    overlays: &[OverlaySpec],
) -> Result<String, Box<dyn Error>> {
    let mut engine = ChartEngine::new();
    let output = engine.render(
        0.0,
        VIEW,
        spec,
        config,
        records,
        &OverrideMap::new(),
        overlays,
        None,
        &HeuristicTextMeasurer,
    )?;
    let mut store = MarkStore::new();
    store.apply_diffs(&output.diffs);
    Ok(store.to_svg(VIEW.width, VIEW.height))
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut sections = Vec::new();

    let simple = ChartSpec::new("country", "balance");
    let labeled = RenderConfig {
        label: LabelConfig {
            show: true,
            source: LabelSource::Value,
            ..LabelConfig::default()
        },
        ..RenderConfig::default()
    };
    sections.push(Section::new(
        "Trade balance (simple, labeled)",
        render(&simple, &labeled, &exports(), &[])?,
    ));

    sections.push(Section::new(
        "Trade balance (horizontal, gradient)",
        render(
            &simple,
            &RenderConfig {
                orientation: Orientation::Horizontal,
                color_mode: ColorMode::Gradient {
                    low: css::CRIMSON,
                    high: css::MEDIUM_SEA_GREEN,
                },
                ..RenderConfig::default()
            },
            &exports(),
            &[],
        )?,
    ));

    sections.push(Section::new(
        "Trade balance with targets (value overlay)",
        render(
            &simple,
            &RenderConfig::default(),
            &exports(),
            &[OverlaySpec::value(1, "target", "target")
                .with_label_mode(OverlayLabelMode::Legend)
                .with_paint(css::DARK_SLATE_GRAY, 0.8)],
        )?,
    ));

    let revenue = ChartSpec::new("quarter", "revenue").with_series("segment");
    sections.push(Section::new(
        "Quarterly revenue (grouped)",
        render(
            &revenue,
            &RenderConfig {
                mode: BarMode::Grouped,
                color_mode: ColorMode::Palette,
                ..RenderConfig::default()
            },
            &quarterly(),
            &[],
        )?,
    ));

    sections.push(Section::new(
        "Quarterly revenue (stacked, diverging)",
        render(
            &revenue,
            &RenderConfig {
                mode: BarMode::Stacked,
                color_mode: ColorMode::Palette,
                ..RenderConfig::default()
            },
            &quarterly(),
            &[],
        )?,
    ));

    sections.push(Section::new(
        "Quarterly revenue (stacked 100%)",
        render(
            &revenue,
            &RenderConfig {
                mode: BarMode::Stacked100,
                color_mode: ColorMode::Palette,
                ..RenderConfig::default()
            },
            &quarterly(),
            &[],
        )?,
    ));

    sections.push(Section::new(
        "Quarterly revenue (small multiples)",
        render(
            &revenue.clone().with_layout(LayoutPreset::SmallMultiples),
            &RenderConfig {
                color_mode: ColorMode::Palette,
                ..RenderConfig::default()
            },
            &quarterly(),
            &[],
        )?,
    ));

    let page = html::page("strata chart gallery", &sections);
    std::fs::write("strata_gallery.html", &page)?;
    println!("wrote strata_gallery.html ({} sections)", sections.len());
    Ok(())
}
