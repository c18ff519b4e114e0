// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-datum fill resolution.
//!
//! Color follows a strict precedence chain, first match wins:
//! override → gradient → threshold → palette → single bar color. Hover
//! derives a darkened secondary color from the resolved base without ever
//! mutating it, so hover-out restores the exact original fill.

extern crate alloc;

use peniko::Color;

use crate::config::{ColorMode, OverrideMap};

/// Fixed sRGB multiplier for the hover-darkened variant.
const HOVER_DARKEN: f64 = 0.72;

/// Resolves datum fills for one render pass.
#[derive(Clone, Copy, Debug)]
pub struct ColorResolver<'a> {
    mode: &'a ColorMode,
    overrides: &'a OverrideMap,
    palette: &'a [Color],
    bar_color: Color,
    /// Value domain for gradient interpolation.
    domain: (f64, f64),
}

impl<'a> ColorResolver<'a> {
    /// Creates a resolver over the configured mode and overrides.
    pub fn new(
        mode: &'a ColorMode,
        overrides: &'a OverrideMap,
        palette: &'a [Color],
        bar_color: Color,
        domain: (f64, f64),
    ) -> Self {
        Self {
            mode,
            overrides,
            palette,
            bar_color,
            domain,
        }
    }

    /// Resolves the fill for one datum.
    ///
    /// `key` is the composite override key (`category` or
    /// `category|series`), `ordinal` the palette index (category index, or
    /// series index for stacked layers), and `value` the datum value in
    /// domain units.
    pub fn resolve(&self, key: &str, ordinal: usize, value: f64) -> Color {
        if let Some(over) = self.overrides.get(key)
            && let Some(color) = over.color
        {
            return color;
        }

        match self.mode {
            ColorMode::Gradient { low, high } => {
                let (d0, d1) = self.domain;
                let span = d1 - d0;
                let t = if span == 0.0 {
                    0.0
                } else {
                    ((value - d0) / span).clamp(0.0, 1.0)
                };
                lerp_color(*low, *high, t)
            }
            ColorMode::Threshold {
                low_below,
                high_above,
                low,
                mid,
                high,
            } => {
                // Exact equality with either threshold lands on mid.
                if value < *low_below {
                    *low
                } else if value > *high_above {
                    *high
                } else {
                    *mid
                }
            }
            ColorMode::Palette => {
                if self.palette.is_empty() {
                    self.bar_color
                } else {
                    self.palette[ordinal % self.palette.len()]
                }
            }
            ColorMode::Single => self.bar_color,
        }
    }
}

/// The hover variant of a resolved color: sRGB components scaled by a fixed
/// factor, alpha preserved.
pub fn darken(color: Color) -> Color {
    let c = color.to_rgba8();
    let scale = |x: u8| -> u8 { (f64::from(x) * HOVER_DARKEN + 0.5) as u8 };
    Color::from_rgba8(scale(c.r), scale(c.g), scale(c.b), c.a)
}

fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let ca = a.to_rgba8();
    let cb = b.to_rgba8();
    let c = |x: u8, y: u8| -> u8 {
        (f64::from(x) + (f64::from(y) - f64::from(x)) * t + 0.5) as u8
    };
    Color::from_rgba8(c(ca.r, cb.r), c(ca.g, cb.g), c(ca.b, cb.b), c(ca.a, cb.a))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;

    use super::*;
    use crate::config::BarOverride;

    fn overrides_with(key: &str, color: Color) -> OverrideMap {
        let mut map = OverrideMap::new();
        map.insert(key, BarOverride {
            color: Some(color),
            label: None,
        });
        map
    }

    #[test]
    fn override_beats_every_mode() {
        let overrides = overrides_with("A", css::REBECCA_PURPLE);
        let palette = [css::ORANGE];
        let modes = [
            ColorMode::Single,
            ColorMode::Palette,
            ColorMode::Gradient {
                low: css::WHITE,
                high: css::BLACK,
            },
            ColorMode::Threshold {
                low_below: 0.0,
                high_above: 10.0,
                low: css::BLUE,
                mid: css::GRAY,
                high: css::RED,
            },
        ];
        for mode in &modes {
            let r = ColorResolver::new(mode, &overrides, &palette, css::BLACK, (0.0, 10.0));
            assert_eq!(r.resolve("A", 0, 5.0), css::REBECCA_PURPLE);
        }
    }

    #[test]
    fn gradient_clamps_at_domain_edges() {
        let overrides = OverrideMap::new();
        let mode = ColorMode::Gradient {
            low: css::BLACK,
            high: css::WHITE,
        };
        let r = ColorResolver::new(&mode, &overrides, &[], css::BLACK, (0.0, 10.0));
        assert_eq!(r.resolve("A", 0, -5.0), css::BLACK);
        assert_eq!(r.resolve("A", 0, 15.0), css::WHITE);
        let mid = r.resolve("A", 0, 5.0).to_rgba8();
        assert!(mid.r > 100 && mid.r < 155);
    }

    #[test]
    fn threshold_equality_resolves_to_mid() {
        let overrides = OverrideMap::new();
        let mode = ColorMode::Threshold {
            low_below: 2.0,
            high_above: 8.0,
            low: css::BLUE,
            mid: css::GRAY,
            high: css::RED,
        };
        let r = ColorResolver::new(&mode, &overrides, &[], css::BLACK, (0.0, 10.0));
        assert_eq!(r.resolve("A", 0, 1.9), css::BLUE);
        assert_eq!(r.resolve("A", 0, 2.0), css::GRAY);
        assert_eq!(r.resolve("A", 0, 8.0), css::GRAY);
        assert_eq!(r.resolve("A", 0, 8.1), css::RED);
    }

    #[test]
    fn palette_cycles_past_its_length() {
        let overrides = OverrideMap::new();
        let palette = [css::ORANGE, css::CRIMSON];
        let r = ColorResolver::new(
            &ColorMode::Palette,
            &overrides,
            &palette,
            css::BLACK,
            (0.0, 1.0),
        );
        assert_eq!(r.resolve("A", 0, 0.0), css::ORANGE);
        assert_eq!(r.resolve("B", 1, 0.0), css::CRIMSON);
        assert_eq!(r.resolve("C", 2, 0.0), css::ORANGE);
    }

    #[test]
    fn darken_preserves_alpha_and_is_stable() {
        let base = Color::from_rgba8(200, 100, 50, 128);
        let dark = darken(base);
        let d = dark.to_rgba8();
        assert_eq!(d.a, 128);
        assert!(d.r < 200 && d.g < 100 && d.b < 50);
        // Pure function: darkening twice from the base is identical.
        assert_eq!(darken(base), dark);
    }
}
