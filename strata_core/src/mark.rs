// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved marks.
//!
//! A mark is a fully resolved drawing instruction: geometry in scene
//! coordinates plus paint. The chart layer recomputes marks from scratch on
//! every render; the scene diffs them by id. Keeping payloads resolved (no
//! lazy encodings) is what makes the geometry pipeline a pure function of
//! its inputs and unit-testable without any drawing surface.

extern crate alloc;

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::{Brush, Color};

use crate::id::MarkId;

/// Horizontal text anchoring relative to the text position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the position.
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position.
    End,
}

/// Vertical text baseline relative to the text position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// Vertically centered.
    Middle,
    /// Sits on the alphabetic baseline.
    Alphabetic,
    /// Hangs below the position.
    Hanging,
}

/// A filled (optionally stroked) rectangle.
#[derive(Clone, Debug)]
pub struct RectPayload {
    /// Rectangle geometry in scene coordinates.
    pub rect: Rect,
    /// Corner radius; `0.0` draws square corners.
    pub corner_radius: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint; transparent means no stroke.
    pub stroke: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl RectPayload {
    /// Creates a filled rectangle with no stroke and square corners.
    pub fn new(rect: Rect, fill: impl Into<Brush>) -> Self {
        Self {
            rect,
            corner_radius: 0.0,
            fill: fill.into(),
            stroke: Brush::Solid(Color::TRANSPARENT),
            stroke_width: 0.0,
        }
    }
}

/// An unshaped single line of text anchored at a point.
#[derive(Clone, Debug)]
pub struct TextPayload {
    /// Anchor position in scene coordinates.
    pub pos: Point,
    /// Text content (unshaped).
    pub text: String,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Rotation in degrees, applied around `pos`.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
}

/// A stroked and/or filled path.
#[derive(Clone, Debug)]
pub struct PathPayload {
    /// Path geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint; transparent means stroke-only.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

/// The resolved drawing payload of a mark.
#[derive(Clone, Debug)]
pub enum MarkPayload {
    /// A rectangle.
    Rect(RectPayload),
    /// A text line.
    Text(TextPayload),
    /// A path.
    Path(PathPayload),
}

impl MarkPayload {
    /// Returns geometric bounds where they are well defined.
    ///
    /// Text bounds depend on shaping, which lives downstream, so text
    /// returns `None`.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect),
            Self::Text(_) => None,
            Self::Path(p) => Some(p.path.bounding_box()),
        }
    }
}

/// A mark: stable identity, paint order, payload, and an optional enter
/// state.
///
/// `enter` is the payload an entering mark animates from (for bars: the rect
/// collapsed onto the zero baseline). It is carried on the mark rather than
/// recomputed by the planner so the chart layer stays the single source of
/// geometry.
#[derive(Clone, Debug)]
pub struct Mark {
    /// Stable mark id.
    pub id: MarkId,
    /// Rendering order hint; renderers sort by `(z_index, id)`.
    pub z_index: i32,
    /// Resolved payload.
    pub payload: MarkPayload,
    /// Payload to animate from when this mark first enters.
    pub enter: Option<MarkPayload>,
}

impl Mark {
    /// Starts building a mark with the given id.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder { id, z_index: 0 }
    }
}

/// Builder for [`Mark`] values.
#[derive(Clone, Copy, Debug)]
pub struct MarkBuilder {
    id: MarkId,
    z_index: i32,
}

impl MarkBuilder {
    /// Sets the z-index used for render ordering.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Finishes as a rectangle mark.
    pub fn rect(self, payload: RectPayload) -> RectMarkBuilder {
        RectMarkBuilder {
            inner: self,
            payload,
            enter: None,
        }
    }

    /// Finishes as a text mark.
    pub fn text(self, payload: TextPayload) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Text(payload),
            enter: None,
        }
    }

    /// Finishes as a path mark.
    pub fn path(self, payload: PathPayload) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Path(payload),
            enter: None,
        }
    }
}

/// Builder for rectangle marks, which may carry an enter state.
#[derive(Clone, Debug)]
pub struct RectMarkBuilder {
    inner: MarkBuilder,
    payload: RectPayload,
    enter: Option<RectPayload>,
}

impl RectMarkBuilder {
    /// Sets the rectangle the mark grows from when entering.
    pub fn enter_from(mut self, rect: Rect) -> Self {
        let mut from = self.payload.clone();
        from.rect = rect;
        self.enter = Some(from);
        self
    }

    /// Builds the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.inner.id,
            z_index: self.inner.z_index,
            payload: MarkPayload::Rect(self.payload),
            enter: self.enter.map(MarkPayload::Rect),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Rect;
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn rect_bounds_are_the_rect() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let mark = Mark::builder(MarkId::from_raw(1))
            .rect(RectPayload::new(r, css::ORANGE))
            .build();
        assert_eq!(mark.payload.bounds(), Some(r));
    }

    #[test]
    fn path_bounds_cover_the_path() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((8.0, 6.0));
        let mark = Mark::builder(MarkId::from_raw(2)).path(PathPayload {
            path,
            fill: Brush::Solid(Color::TRANSPARENT),
            stroke: css::BLACK.into(),
            stroke_width: 1.0,
        });
        assert_eq!(mark.payload.bounds(), Some(Rect::new(0.0, 0.0, 8.0, 6.0)));
    }

    #[test]
    fn enter_from_keeps_paint_but_swaps_geometry() {
        let mark = Mark::builder(MarkId::from_raw(1))
            .rect(RectPayload::new(Rect::new(0.0, 0.0, 10.0, 50.0), css::ORANGE))
            .enter_from(Rect::new(0.0, 50.0, 10.0, 50.0))
            .build();
        let Some(MarkPayload::Rect(from)) = mark.enter else {
            panic!("expected rect enter payload");
        };
        assert_eq!(from.rect.height(), 0.0);
    }
}
