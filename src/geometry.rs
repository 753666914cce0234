//! Points and rectangles in display and PDF space
//!
//! Both spaces use a top-left origin with y growing downwards. Display space
//! is PDF space multiplied by the zoom factor.

use std::fmt;

/// A position in display or PDF space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp into `[0, width] x [0, height]`
    pub fn clamp_to(self, width: f32, height: f32) -> Self {
        Self {
            x: self.x.clamp(0.0, width.max(0.0)),
            y: self.y.clamp(0.0, height.max(0.0)),
        }
    }
}

/// Axis-aligned rectangle. Normalized when `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle spanned by two corners, normalized so the top-left corner is
    /// the component-wise minimum.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn normalized(self) -> Self {
        Self::from_corners(
            Point::new(self.left, self.top),
            Point::new(self.right, self.bottom),
        )
    }

    pub fn width(&self) -> f32 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f32 {
        (self.bottom - self.top).abs()
    }

    /// Zero width or zero height
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    pub fn scale(self, factor: f32) -> Self {
        Self {
            left: self.left * factor,
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
        }
    }

    /// Convert a display rectangle to PDF space at the given zoom
    pub fn to_pdf_space(self, zoom: f32) -> Self {
        self.scale(1.0 / zoom)
    }

    /// Convert a PDF rectangle to display space at the given zoom
    pub fn to_display_space(self, zoom: f32) -> Self {
        self.scale(zoom)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.0},{:.0}) - ({:.0},{:.0})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Intrinsic page size in PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions of this page rendered at `zoom`, at least 1x1
    pub fn scaled_pixels(&self, zoom: f32) -> (u32, u32) {
        let w = (self.width * zoom).round().max(1.0) as u32;
        let h = (self.height * zoom).round().max(1.0) as u32;
        (w, h)
    }
}
