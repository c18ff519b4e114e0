// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, selection, and tooltip handling.
//!
//! The controller owns hover state only. Selection is caller-owned: clicks
//! report the hit id outward and the caller feeds the selected key back into
//! the next render. Hover never mutates resolved colors; it derives the
//! darkened variant from the registered base fill so hover-out restores the
//! exact original.

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use peniko::{Brush, Color};
use strata_core::MarkId;

use crate::color;

/// Per-bar state the controller needs for hit reactions.
#[derive(Clone, Debug)]
pub struct BarInfo {
    /// The bar's stable mark id.
    pub id: MarkId,
    /// Category label.
    pub category: String,
    /// Series label, if any.
    pub series: Option<String>,
    /// The datum value.
    pub value: f64,
    /// The resolved base fill.
    pub fill: Color,
}

/// A fill swap the renderer should apply in response to hover.
#[derive(Clone, Debug, PartialEq)]
pub struct FillChange {
    /// The mark to repaint.
    pub id: MarkId,
    /// The new fill.
    pub fill: Brush,
}

/// A tooltip ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Formatted tooltip text.
    pub text: String,
    /// X position relative to the drawing surface origin.
    pub x: f64,
    /// Y position relative to the drawing surface origin.
    pub y: f64,
}

type TooltipFormatter = Box<dyn Fn(&BarInfo) -> String>;

/// Pointer interaction state for one chart.
pub struct InteractionController {
    bars: HashMap<MarkId, BarInfo>,
    hovered: Option<MarkId>,
    formatter: Option<TooltipFormatter>,
}

impl core::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InteractionController")
            .field("bars", &self.bars.len())
            .field("hovered", &self.hovered)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    /// Creates a controller with the default tooltip formatter.
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            hovered: None,
            formatter: None,
        }
    }

    /// Replaces the tooltip formatter.
    pub fn with_formatter(mut self, formatter: impl Fn(&BarInfo) -> String + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Registers the bars of the current render.
    ///
    /// Hover state survives a re-render as long as the hovered id still
    /// exists; a vanished id clears it.
    pub fn sync(&mut self, bars: Vec<BarInfo>) {
        self.bars.clear();
        for bar in bars {
            self.bars.insert(bar.id, bar);
        }
        if let Some(id) = self.hovered
            && !self.bars.contains_key(&id)
        {
            self.hovered = None;
        }
    }

    /// The currently hovered mark, if any.
    pub fn hovered(&self) -> Option<MarkId> {
        self.hovered
    }

    /// Moves hover to `target` (or clears it with `None`).
    ///
    /// Returns the fill swaps to apply: the previous mark restores its exact
    /// base fill, the new mark takes the darkened variant. Repeated calls
    /// with the same target are no-ops.
    pub fn hover(&mut self, target: Option<MarkId>) -> Vec<FillChange> {
        let target = target.filter(|id| self.bars.contains_key(id));
        if target == self.hovered {
            return Vec::new();
        }

        let mut changes = Vec::new();
        if let Some(prev) = self.hovered.take()
            && let Some(bar) = self.bars.get(&prev)
        {
            changes.push(FillChange {
                id: prev,
                fill: Brush::Solid(bar.fill),
            });
        }
        if let Some(next) = target
            && let Some(bar) = self.bars.get(&next)
        {
            changes.push(FillChange {
                id: next,
                fill: Brush::Solid(color::darken(bar.fill)),
            });
            self.hovered = Some(next);
        }
        changes
    }

    /// Reports a click on a mark.
    ///
    /// Selection state is caller-owned; this only echoes the id back when it
    /// hits a known bar.
    pub fn click(&self, id: MarkId) -> Option<MarkId> {
        self.bars.contains_key(&id).then_some(id)
    }

    /// Builds the tooltip for the hovered bar at a pointer position.
    ///
    /// `pointer` arrives in page coordinates; the result is relative to the
    /// drawing surface's bounding box.
    pub fn tooltip(&self, pointer: Point, surface: Rect) -> Option<Tooltip> {
        let bar = self.hovered.and_then(|id| self.bars.get(&id))?;
        let text = match &self.formatter {
            Some(f) => f(bar),
            None => default_tooltip_text(bar),
        };
        Some(Tooltip {
            text,
            x: pointer.x - surface.x0,
            y: pointer.y - surface.y0,
        })
    }
}

fn default_tooltip_text(bar: &BarInfo) -> String {
    match &bar.series {
        Some(series) => format!("{} \u{2014} {}: {}", bar.category, series, bar.value),
        None => format!("{}: {}", bar.category, bar.value),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    fn bar(raw: u64, category: &str, value: f64, fill: Color) -> BarInfo {
        BarInfo {
            id: MarkId::from_raw(raw),
            category: category.to_string(),
            series: None,
            value,
            fill,
        }
    }

    fn controller() -> InteractionController {
        let mut c = InteractionController::new();
        c.sync(vec![
            bar(1, "A", 10.0, Color::from_rgba8(200, 100, 50, 255)),
            bar(2, "B", -5.0, Color::from_rgba8(10, 20, 30, 255)),
        ]);
        c
    }

    #[test]
    fn hover_swaps_to_darkened_and_restores_exactly() {
        let mut c = controller();
        let base = Color::from_rgba8(200, 100, 50, 255);

        let enter = c.hover(Some(MarkId::from_raw(1)));
        assert_eq!(enter.len(), 1);
        assert_eq!(enter[0].fill, Brush::Solid(color::darken(base)));

        let leave = c.hover(None);
        assert_eq!(leave.len(), 1);
        assert_eq!(leave[0].fill, Brush::Solid(base));
    }

    #[test]
    fn repeated_hover_is_idempotent() {
        let mut c = controller();
        let id = MarkId::from_raw(1);
        assert_eq!(c.hover(Some(id)).len(), 1);
        assert!(c.hover(Some(id)).is_empty());
        assert!(c.hover(Some(id)).is_empty());
        assert_eq!(c.hovered(), Some(id));
    }

    #[test]
    fn moving_hover_restores_the_previous_bar() {
        let mut c = controller();
        c.hover(Some(MarkId::from_raw(1)));
        let changes = c.hover(Some(MarkId::from_raw(2)));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].id, MarkId::from_raw(1));
        assert_eq!(
            changes[0].fill,
            Brush::Solid(Color::from_rgba8(200, 100, 50, 255))
        );
        assert_eq!(changes[1].id, MarkId::from_raw(2));
    }

    #[test]
    fn click_reports_without_mutating_state() {
        let mut c = controller();
        c.hover(Some(MarkId::from_raw(1)));
        assert_eq!(c.click(MarkId::from_raw(2)), Some(MarkId::from_raw(2)));
        assert_eq!(c.click(MarkId::from_raw(99)), None);
        // Click never changed hover.
        assert_eq!(c.hovered(), Some(MarkId::from_raw(1)));
    }

    #[test]
    fn tooltip_is_surface_relative_and_overridable() {
        let mut c = controller();
        c.hover(Some(MarkId::from_raw(1)));
        let surface = Rect::new(100.0, 50.0, 500.0, 350.0);
        let tip = c.tooltip(Point::new(130.0, 80.0), surface).unwrap();
        assert_eq!(tip.x, 30.0);
        assert_eq!(tip.y, 30.0);
        assert_eq!(tip.text, "A: 10");

        let mut custom =
            InteractionController::new().with_formatter(|bar| format!("v={}", bar.value));
        custom.sync(vec![bar(1, "A", 10.0, Color::from_rgba8(0, 0, 0, 255))]);
        custom.hover(Some(MarkId::from_raw(1)));
        let tip = custom.tooltip(Point::new(100.0, 50.0), surface).unwrap();
        assert_eq!(tip.text, "v=10");
    }

    #[test]
    fn sync_clears_hover_when_the_bar_vanishes() {
        let mut c = controller();
        c.hover(Some(MarkId::from_raw(1)));
        c.sync(vec![bar(2, "B", -5.0, Color::from_rgba8(0, 0, 0, 255))]);
        assert_eq!(c.hovered(), None);
        assert!(c.tooltip(Point::ZERO, Rect::ZERO).is_none());
    }
}
