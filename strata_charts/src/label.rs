// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar label placement.
//!
//! A label plan is an anchor point plus text attributes, computed from the
//! bar's geometry and the sign of its value so diverging bars place labels
//! on the correct side. Overflowing text follows a strict degrade ladder
//! (shrink, then first word, then initials, then hide) rather than
//! truncating with an ellipsis.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use strata_core::{TextAnchor, TextBaseline};

use crate::bar_layout::{BarDatum, BarGeometry};
use crate::config::{LabelConfig, LabelPosition, LabelSource, Orientation};
use crate::measure::TextMeasurer;

/// Labels never shrink below this font size; past it the ladder degrades
/// the text instead.
const MIN_LABEL_FONT_SIZE: f64 = 7.0;

/// Where the regional-indicator block starts, relative to ASCII `A`.
const REGIONAL_INDICATOR_BASE: u32 = 0x1F1E6;

/// A placed label, ready to become a text mark.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPlan {
    /// Label text after source/override/flag resolution.
    pub text: String,
    /// Anchor position in scene coordinates.
    pub pos: Point,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Rotation in degrees, applied around `pos`.
    pub angle: f64,
    /// Font size after any overflow shrink.
    pub font_size: f64,
}

/// Resolves the text a bar label shows.
///
/// An override string wins over both sources; flag substitution applies
/// only to category-sourced text.
pub fn label_text(datum: &BarDatum, config: &LabelConfig, override_label: Option<&str>) -> String {
    if let Some(text) = override_label {
        return String::from(text);
    }
    match config.source {
        LabelSource::Value => format_value(datum.value),
        LabelSource::Category => {
            if config.flag_substitution {
                flag_text(&datum.key.category)
            } else {
                datum.key.category.clone()
            }
        }
    }
}

/// Substitutes a two-ASCII-letter code with its pictographic flag pair.
///
/// Each letter maps to a regional indicator via a fixed code-point offset;
/// anything that is not exactly two ASCII letters passes through unchanged.
pub fn flag_text(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() == 2 && chars.iter().all(char::is_ascii_alphabetic) {
        chars
            .iter()
            .filter_map(|c| {
                let offset = u32::from(c.to_ascii_uppercase()) - u32::from('A');
                char::from_u32(REGIONAL_INDICATOR_BASE + offset)
            })
            .collect()
    } else {
        String::from(code)
    }
}

/// Places one label against its bar.
///
/// Returns `None` when the degrade ladder exhausts every fallback within
/// `available` width (labels hide rather than clip).
pub fn place_label(
    bar: &BarGeometry,
    orientation: Orientation,
    config: &LabelConfig,
    text: String,
    available: f64,
    measurer: &impl TextMeasurer,
) -> Option<LabelPlan> {
    let (text, font_size) = fit_label(text, available, config.font_size, measurer)?;

    // Work in (band, value-pixel) coordinates; orientation maps them onto
    // screen axes at the end. `dir` is the pixel direction of increasing
    // value: up for vertical charts, right for horizontal ones.
    let dir = match orientation {
        Orientation::Vertical => -1.0,
        Orientation::Horizontal => 1.0,
    };
    let (vmin, vmax) = match orientation {
        Orientation::Vertical => (bar.rect.y0, bar.rect.y1),
        Orientation::Horizontal => (bar.rect.x0, bar.rect.x1),
    };
    let (high_edge, low_edge) = if dir > 0.0 {
        (vmax, vmin)
    } else {
        (vmin, vmax)
    };
    // Diverging data flips which edge is the tip.
    let sign = if bar.datum.value >= 0.0 { 1.0 } else { -1.0 };
    let (tip, base) = if sign > 0.0 {
        (high_edge, low_edge)
    } else {
        (low_edge, high_edge)
    };

    let d = config.distance;
    let v = match config.position {
        LabelPosition::Top => tip + d * dir * sign,
        LabelPosition::Bottom => base - d * dir * sign,
        LabelPosition::Left => low_edge - d * dir,
        LabelPosition::Right => high_edge + d * dir,
        LabelPosition::Inside => (vmin + vmax) * 0.5,
    };

    // The pixel side the anchor landed on decides anchor/baseline so text
    // reads away from the bar.
    let side = if matches!(config.position, LabelPosition::Inside) {
        0.0
    } else if v < vmin {
        -1.0
    } else if v > vmax {
        1.0
    } else {
        0.0
    };
    let (pos, anchor, baseline) = match orientation {
        Orientation::Vertical => {
            let baseline = if side < 0.0 {
                TextBaseline::Alphabetic
            } else if side > 0.0 {
                TextBaseline::Hanging
            } else {
                TextBaseline::Middle
            };
            (Point::new(bar.band_center, v), TextAnchor::Middle, baseline)
        }
        Orientation::Horizontal => {
            let anchor = if side < 0.0 {
                TextAnchor::End
            } else if side > 0.0 {
                TextAnchor::Start
            } else {
                TextAnchor::Middle
            };
            (Point::new(v, bar.band_center), anchor, TextBaseline::Middle)
        }
    };

    Some(LabelPlan {
        text,
        pos,
        anchor,
        baseline,
        angle: config.rotation,
        font_size,
    })
}

/// The overflow degrade ladder: shrink within bounds, then first word, then
/// initials, then hide.
pub fn fit_label(
    text: String,
    available: f64,
    font_size: f64,
    measurer: &impl TextMeasurer,
) -> Option<(String, f64)> {
    if available <= 0.0 {
        return None;
    }
    if let Some(fs) = shrink_to_fit(&text, available, font_size, measurer) {
        return Some((text, fs));
    }
    let first_word: String = text.split_whitespace().next().unwrap_or("").into();
    if !first_word.is_empty() && first_word != text {
        if let Some(fs) = shrink_to_fit(&first_word, available, font_size, measurer) {
            return Some((first_word, fs));
        }
    }
    let initials: String = text
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect();
    if !initials.is_empty() && initials != text {
        if let Some(fs) = shrink_to_fit(&initials, available, font_size, measurer) {
            return Some((initials, fs));
        }
    }
    None
}

/// Returns the largest font size at or below `font_size` (bounded by the
/// minimum) at which `text` fits, if any.
fn shrink_to_fit(
    text: &str,
    available: f64,
    font_size: f64,
    measurer: &impl TextMeasurer,
) -> Option<f64> {
    let (width, _) = measurer.measure(text, font_size);
    if width <= available {
        return Some(font_size);
    }
    if width <= 0.0 {
        return None;
    }
    let shrunk = font_size * available / width;
    (shrunk >= MIN_LABEL_FONT_SIZE).then_some(shrunk)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "integral check guards the cast"
)]
fn format_value(value: f64) -> String {
    use alloc::format;
    let rounded = value as i64;
    if rounded as f64 == value {
        format!("{rounded}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use kurbo::Rect;

    use super::*;
    use crate::bar_layout::BarKey;
    use crate::measure::HeuristicTextMeasurer;

    fn bar(value: f64, rect: Rect, band_center: f64) -> BarGeometry {
        BarGeometry {
            datum: BarDatum {
                key: BarKey {
                    category: "A".to_string(),
                    series: None,
                },
                value,
                low: value.min(0.0),
                high: value.max(0.0),
                record: None,
                category_index: 0,
                series_index: None,
            },
            rect,
            enter_rect: rect,
            band_center,
            band_width: rect.width(),
        }
    }

    #[test]
    fn top_labels_flip_sides_with_value_sign() {
        let measurer = HeuristicTextMeasurer;
        let config = LabelConfig {
            show: true,
            ..LabelConfig::default()
        };
        // Vertical chart, baseline at y = 100.
        let positive = bar(10.0, Rect::new(0.0, 40.0, 20.0, 100.0), 10.0);
        let negative = bar(-5.0, Rect::new(30.0, 100.0, 50.0, 130.0), 40.0);

        let p = place_label(
            &positive,
            Orientation::Vertical,
            &config,
            "10".to_string(),
            100.0,
            &measurer,
        )
        .unwrap();
        assert_eq!(p.pos, Point::new(10.0, 36.0));
        assert_eq!(p.baseline, TextBaseline::Alphabetic);

        let n = place_label(
            &negative,
            Orientation::Vertical,
            &config,
            "-5".to_string(),
            100.0,
            &measurer,
        )
        .unwrap();
        assert_eq!(n.pos, Point::new(40.0, 134.0));
        assert_eq!(n.baseline, TextBaseline::Hanging);
    }

    #[test]
    fn horizontal_top_labels_sit_past_the_bar_tip() {
        let measurer = HeuristicTextMeasurer;
        let config = LabelConfig {
            show: true,
            ..LabelConfig::default()
        };
        let positive = bar(10.0, Rect::new(50.0, 0.0, 120.0, 20.0), 10.0);
        let p = place_label(
            &positive,
            Orientation::Horizontal,
            &config,
            "10".to_string(),
            100.0,
            &measurer,
        )
        .unwrap();
        assert_eq!(p.pos, Point::new(124.0, 10.0));
        assert_eq!(p.anchor, TextAnchor::Start);
        assert_eq!(p.baseline, TextBaseline::Middle);
    }

    #[test]
    fn inside_labels_center_in_the_bar() {
        let measurer = HeuristicTextMeasurer;
        let config = LabelConfig {
            show: true,
            position: LabelPosition::Inside,
            ..LabelConfig::default()
        };
        let b = bar(10.0, Rect::new(0.0, 40.0, 20.0, 100.0), 10.0);
        let p = place_label(
            &b,
            Orientation::Vertical,
            &config,
            "10".to_string(),
            100.0,
            &measurer,
        )
        .unwrap();
        assert_eq!(p.pos, Point::new(10.0, 70.0));
        assert_eq!(p.baseline, TextBaseline::Middle);
    }

    #[test]
    fn flags_substitute_only_two_letter_codes() {
        assert_eq!(flag_text("de"), "\u{1F1E9}\u{1F1EA}");
        assert_eq!(flag_text("US"), "\u{1F1FA}\u{1F1F8}");
        assert_eq!(flag_text("USA"), "USA");
        assert_eq!(flag_text("d1"), "d1");
        assert_eq!(flag_text(""), "");
    }

    #[test]
    fn degrade_ladder_never_truncates_with_ellipsis() {
        let measurer = HeuristicTextMeasurer;
        // 0.6 em per char at 10 px: "United Kingdom" is 84 px wide.
        let wide = "United Kingdom".to_string();
        let (text, fs) = fit_label(wide.clone(), 200.0, 10.0, &measurer).unwrap();
        assert_eq!(text, "United Kingdom");
        assert_eq!(fs, 10.0);

        // Too narrow for the phrase even shrunk, wide enough for one word.
        let (text, _) = fit_label(wide.clone(), 40.0, 10.0, &measurer).unwrap();
        assert_eq!(text, "United");

        // Only initials fit.
        let (text, _) = fit_label(wide.clone(), 12.0, 10.0, &measurer).unwrap();
        assert_eq!(text, "UK");

        // Nothing fits: hide.
        assert!(fit_label(wide, 0.5, 10.0, &measurer).is_none());
    }

    #[test]
    fn override_label_beats_both_sources() {
        let b = bar(10.0, Rect::new(0.0, 0.0, 10.0, 10.0), 5.0);
        let config = LabelConfig {
            source: LabelSource::Value,
            ..LabelConfig::default()
        };
        assert_eq!(label_text(&b.datum, &config, Some("custom")), "custom");
        assert_eq!(label_text(&b.datum, &config, None), "10");
        let by_category = LabelConfig {
            source: LabelSource::Category,
            ..LabelConfig::default()
        };
        assert_eq!(label_text(&b.datum, &by_category, None), "A");
    }
}
