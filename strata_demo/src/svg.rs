// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal retained SVG surface.
//!
//! The store applies keyed diffs at their settled state; serialization sorts
//! by `(z_index, id)` so paint order matches what an animated renderer would
//! converge to.

use std::collections::HashMap;
use std::fmt::Write as _;

use kurbo::Rect;
use peniko::{Brush, Color};
use strata_core::{MarkDiff, MarkId, MarkPayload, TextAnchor, TextBaseline};

#[derive(Clone, Debug)]
struct MarkSnapshot {
    z_index: i32,
    payload: MarkPayload,
}

/// Retained mark state, fed by scene diffs.
#[derive(Debug, Default)]
pub struct MarkStore {
    marks: HashMap<MarkId, MarkSnapshot>,
}

impl MarkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one frame of diffs at their settled state.
    pub fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter {
                    id, z_index, new, ..
                } => {
                    self.marks.insert(
                        *id,
                        MarkSnapshot {
                            z_index: *z_index,
                            payload: (**new).clone(),
                        },
                    );
                }
                MarkDiff::Update {
                    id,
                    new_z_index,
                    new,
                    ..
                } => {
                    self.marks.insert(
                        *id,
                        MarkSnapshot {
                            z_index: *new_z_index,
                            payload: (**new).clone(),
                        },
                    );
                }
                MarkDiff::Exit { id, .. } => {
                    self.marks.remove(id);
                }
            }
        }
    }

    /// Serializes the retained marks into one `<svg>` element.
    pub fn to_svg(&self, width: f64, height: f64) -> String {
        let mut ordered: Vec<(&MarkId, &MarkSnapshot)> = self.marks.iter().collect();
        ordered.sort_by_key(|(id, snap)| (snap.z_index, **id));

        let mut out = String::new();
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\" font-family=\"sans-serif\">\n"
        );
        for (_, snap) in ordered {
            match &snap.payload {
                MarkPayload::Rect(r) => {
                    let _ = write!(
                        out,
                        "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"",
                        r.rect.x0,
                        r.rect.y0,
                        r.rect.width(),
                        r.rect.height()
                    );
                    if r.corner_radius > 0.0 {
                        let _ = write!(out, " rx=\"{:.2}\"", r.corner_radius);
                    }
                    let _ = write!(out, " fill=\"{}\"", paint(&r.fill));
                    if r.stroke_width > 0.0 {
                        let _ = write!(
                            out,
                            " stroke=\"{}\" stroke-width=\"{:.2}\"",
                            paint(&r.stroke),
                            r.stroke_width
                        );
                    }
                    out.push_str("/>\n");
                }
                MarkPayload::Text(t) => {
                    let _ = write!(
                        out,
                        "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{:.1}\" \
                         text-anchor=\"{}\" dominant-baseline=\"{}\" fill=\"{}\"",
                        t.pos.x,
                        t.pos.y,
                        t.font_size,
                        anchor(t.anchor),
                        baseline(t.baseline),
                        paint(&t.fill)
                    );
                    if t.angle != 0.0 {
                        let _ = write!(
                            out,
                            " transform=\"rotate({:.1} {:.2} {:.2})\"",
                            t.angle, t.pos.x, t.pos.y
                        );
                    }
                    let _ = write!(out, ">{}</text>\n", escape(&t.text));
                }
                MarkPayload::Path(p) => {
                    let _ = write!(out, "  <path d=\"{}\"", p.path.to_svg());
                    let _ = write!(out, " fill=\"{}\"", paint(&p.fill));
                    if p.stroke_width > 0.0 {
                        let _ = write!(
                            out,
                            " stroke=\"{}\" stroke-width=\"{:.2}\"",
                            paint(&p.stroke),
                            p.stroke_width
                        );
                    }
                    out.push_str("/>\n");
                }
            }
        }
        out.push_str("</svg>\n");
        out
    }

    /// Crops a rectangle usable for pointer hit-testing in a viewer.
    pub fn bounds(&self, id: MarkId) -> Option<Rect> {
        self.marks.get(&id).and_then(|s| s.payload.bounds())
    }
}

fn paint(brush: &Brush) -> String {
    match brush {
        Brush::Solid(c) => css_color(*c),
        // Only solid paints reach this surface.
        _ => String::from("none"),
    }
}

fn css_color(color: Color) -> String {
    let c = color.to_rgba8();
    if c.a == 0 {
        return String::from("none");
    }
    if c.a == 255 {
        format!("rgb({},{},{})", c.r, c.g, c.b)
    } else {
        format!("rgba({},{},{},{:.3})", c.r, c.g, c.b, f64::from(c.a) / 255.0)
    }
}

fn anchor(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn baseline(baseline: TextBaseline) -> &'static str {
    match baseline {
        TextBaseline::Middle => "central",
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Hanging => "hanging",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use peniko::color::palette::css;
    use strata_core::{Mark, RectPayload, Scene};

    use super::*;

    #[test]
    fn store_tracks_enters_and_exits() {
        let mut scene = Scene::new();
        let mut store = MarkStore::new();

        let bar = |id: u64, x: f64| {
            Mark::builder(MarkId::from_raw(id))
                .rect(RectPayload::new(
                    Rect::new(x, 0.0, x + 10.0, 40.0),
                    css::ORANGE,
                ))
                .build()
        };
        store.apply_diffs(&scene.tick(vec![bar(1, 0.0), bar(2, 20.0)]));
        assert!(store.bounds(MarkId::from_raw(1)).is_some());

        store.apply_diffs(&scene.tick(vec![bar(2, 25.0)]));
        assert!(store.bounds(MarkId::from_raw(1)).is_none());
        let r = store.bounds(MarkId::from_raw(2)).unwrap();
        assert_eq!(r.x0, 25.0);
    }

    #[test]
    fn svg_output_is_ordered_and_escaped() {
        let mut scene = Scene::new();
        let mut store = MarkStore::new();
        let low = Mark::builder(MarkId::from_raw(2))
            .z_index(-100)
            .rect(RectPayload::new(Rect::new(0.0, 0.0, 50.0, 50.0), css::WHITE))
            .build();
        let high = Mark::builder(MarkId::from_raw(1))
            .z_index(0)
            .rect(RectPayload::new(Rect::new(5.0, 5.0, 15.0, 45.0), css::BLUE))
            .build();
        store.apply_diffs(&scene.tick(vec![high, low]));

        let svg = store.to_svg(50.0, 50.0);
        let background = svg.find("rgb(255,255,255)").unwrap();
        let bar = svg.find("rgb(0,0,255)").unwrap();
        assert!(background < bar);
    }
}
