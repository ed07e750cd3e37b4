//! Page display lists.
//!
//! A [`PageSurface`] is the drawing handle for exactly one page. Page space is
//! measured in points with the origin at the bottom-left corner and y pointing
//! up, as in PDF. Operations are kept in paint order; serializers replay them
//! without reordering.

use crate::units::Points;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PagePoint {
    pub x: Points,
    pub y: Points,
}

/// Axis-aligned rectangle; `(x, y)` is the bottom-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageRect {
    pub x: Points,
    pub y: Points,
    pub width: Points,
    pub height: Points,
}

impl PageRect {
    pub fn center(&self) -> PagePoint {
        PagePoint {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn top(&self) -> Points {
        self.y + self.height
    }

    /// Rectangle of the given size centered on `c`.
    pub fn centered_on(c: PagePoint, width: Points, height: Points) -> Self {
        PageRect {
            x: c.x - width / 2.0,
            y: c.y - height / 2.0,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f64,
}

impl TextStyle {
    pub fn regular(size: f64) -> Self {
        TextStyle {
            face: FontFace::Regular,
            size,
        }
    }

    pub fn bold(size: f64) -> Self {
        TextStyle {
            face: FontFace::Bold,
            size,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Outline only; the interior stays transparent.
    StrokeRect { rect: PageRect, line_width: f64 },
    /// Single line horizontally centered on `at.x`, baseline at `at.y`.
    CenteredText {
        at: PagePoint,
        text: String,
        style: TextStyle,
    },
    PushClip(PageRect),
    PopClip,
}

/// Mutable drawing handle for one page.
#[derive(Debug)]
pub struct PageSurface {
    width: Points,
    height: Points,
    ops: Vec<DrawOp>,
    clip_depth: usize,
}

impl PageSurface {
    pub fn new(width: Points, height: Points) -> Self {
        PageSurface {
            width,
            height,
            ops: Vec::new(),
            clip_depth: 0,
        }
    }

    pub fn width(&self) -> Points {
        self.width
    }

    pub fn height(&self) -> Points {
        self.height
    }

    pub fn center(&self) -> PagePoint {
        PagePoint {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }

    pub fn stroke_rect(&mut self, rect: PageRect, line_width: f64) {
        self.ops.push(DrawOp::StrokeRect { rect, line_width });
    }

    pub fn centered_text(&mut self, at: PagePoint, text: impl Into<String>, style: TextStyle) {
        self.ops.push(DrawOp::CenteredText {
            at,
            text: text.into(),
            style,
        });
    }

    pub fn push_clip(&mut self, rect: PageRect) {
        self.clip_depth += 1;
        self.ops.push(DrawOp::PushClip(rect));
    }

    pub fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.clip_depth -= 1;
            self.ops.push(DrawOp::PopClip);
        }
    }

    /// Closes any open clip and seals the page. Nothing can be drawn on it afterwards.
    pub fn finish(mut self, name: impl Into<String>) -> Page {
        while self.clip_depth > 0 {
            self.pop_clip();
        }
        Page {
            name: name.into(),
            width: self.width,
            height: self.height,
            ops: self.ops,
        }
    }
}

/// A finalized page.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    name: String,
    width: Points,
    height: Points,
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> Points {
        self.width
    }

    pub fn height(&self) -> Points {
        self.height
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Stroked rectangles in paint order.
    pub fn rects(&self) -> impl Iterator<Item = &PageRect> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::StrokeRect { rect, .. } => Some(rect),
            _ => None,
        })
    }

    /// Text lines in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::CenteredText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
