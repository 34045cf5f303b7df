//! Cursor snapshot passed once per paint cycle.

use crate::geometry::{Point, Rect, Size};

/// Cursor shape as selected by DECSCUSR or the user's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorShape {
    /// Partial block whose height is `height_percent` of the cell
    #[default]
    Legacy,
    VerticalBar,
    Underscore,
    EmptyBox,
    FullBox,
    DoubleUnderscore,
}

/// Everything a backend needs to draw the cursor for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorOptions {
    /// Cell position within the viewport
    pub position: Point,
    /// Cursor is shown at all (DECTCEM)
    pub visible: bool,
    /// Current blink phase
    pub on: bool,
    pub shape: CursorShape,
    /// Height of a `Legacy` cursor, 1-100
    pub height_percent: u8,
    /// Cursor sits on a wide glyph and spans two cells
    pub double_width: bool,
    /// Explicit cursor color; `None` inverts the cell
    pub color: Option<[u8; 3]>,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            visible: true,
            on: true,
            shape: CursorShape::Legacy,
            height_percent: 25,
            double_width: false,
            color: None,
        }
    }
}

impl CursorOptions {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// The cursor is visible and in the "on" blink phase.
    pub fn is_drawn(&self) -> bool {
        self.visible && self.on
    }

    /// Cells covered by the cursor.
    pub fn area(&self) -> Rect {
        let width = if self.double_width { 2 } else { 1 };
        Rect::from_origin_size(self.position, Size::new(width, 1))
    }
}

/// Per-frame information supplied by `prepare_render_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderFrameInfo {
    /// `None` means the cursor is unchanged or not drawn this frame
    pub cursor: Option<CursorOptions>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_width_cursor_area() {
        let mut cursor = CursorOptions::at(Point::new(4, 2));
        assert_eq!(cursor.area(), Rect::new(4, 2, 5, 3));
        cursor.double_width = true;
        assert_eq!(cursor.area(), Rect::new(4, 2, 6, 3));
    }

    #[test]
    fn test_cursor_area_at_coordinate_limit() {
        let mut cursor = CursorOptions::at(Point::new(i32::MAX, i32::MAX));
        cursor.double_width = true;
        let area = cursor.area();
        assert_eq!(area.right, i32::MAX);
        assert_eq!(area.bottom, i32::MAX);
        assert!(area.is_empty());
    }

    #[test]
    fn test_blink_off_is_not_drawn() {
        let cursor = CursorOptions {
            on: false,
            ..CursorOptions::default()
        };
        assert!(!cursor.is_drawn());
    }
}
