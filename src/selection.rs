//! Pointer-drag rectangle tracking

use crate::geometry::{Point, Rect};

/// Drag in progress: anchor corner, moving corner and the page bounds
/// positions are clamped to
#[derive(Debug, Clone, Copy)]
struct Drag {
    anchor: Point,
    current: Point,
    width: f32,
    height: f32,
}

impl Drag {
    fn clamp(&self, pos: Point) -> Point {
        pos.clamp_to(self.width, self.height)
    }
}

/// Tracks the rectangle the user drags over a rendered page, in display
/// space.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    drag: Option<Drag>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a rectangle anchored at `pos`. `width` and `height` are the
    /// display size of the page; positions outside it are clamped.
    pub fn pointer_down(&mut self, pos: Point, width: f32, height: f32) {
        let anchor = pos.clamp_to(width, height);
        self.drag = Some(Drag {
            anchor,
            current: anchor,
            width,
            height,
        });
    }

    /// Move the opposite corner. Ignored without a prior pointer-down.
    pub fn pointer_move(&mut self, pos: Point) {
        if let Some(drag) = self.drag.as_mut() {
            drag.current = drag.clamp(pos);
        }
    }

    /// Finish the drag. Returns the normalized rectangle, or `None` when no
    /// drag was active or the rectangle has zero width or height.
    pub fn pointer_up(&mut self, pos: Point) -> Option<Rect> {
        let mut drag = self.drag.take()?;
        drag.current = drag.clamp(pos);
        let rect = Rect::from_corners(drag.anchor, drag.current);
        if rect.is_degenerate() {
            tracing::debug!("discarding degenerate selection");
            return None;
        }
        Some(rect)
    }

    /// Rectangle of the drag in progress, for drawing a preview
    pub fn in_progress(&self) -> Option<Rect> {
        self.drag
            .map(|drag| Rect::from_corners(drag.anchor, drag.current))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Abandon the drag in progress (page change, document switch)
    pub fn cancel(&mut self) {
        self.drag = None;
    }
}
