//! Cell-space and pixel-space geometry.
//!
//! Rectangles use exclusive right/bottom edges: `Rect::new(0, 0, 10, 1)` is a
//! single row ten cells wide.

use par_term_engine_fonts::PixelSize;

use crate::error::{EngineError, EngineResult};

/// A cell coordinate (or a cell delta, for scrolling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

/// Largest surface, in cells, an engine will track damage for.
pub const MAX_SURFACE_CELLS: usize = 1 << 24;

/// An extent in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of cells, zero for empty sizes.
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.width as usize).saturating_mul(self.height as usize)
        }
    }

    /// Reject surfaces too large to hold a per-cell damage bitmap.
    pub fn validate_surface(&self) -> EngineResult<()> {
        if self.area() > MAX_SURFACE_CELLS {
            return Err(EngineError::InvalidArgument(format!(
                "surface {}x{} exceeds {} cells",
                self.width, self.height, MAX_SURFACE_CELLS
            )));
        }
        Ok(())
    }
}

/// A rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The whole surface of the given size, anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(size.width),
            origin.y.saturating_add(size.height),
        )
    }

    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top).max(0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Covers no cells. Malformed rectangles are also empty.
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Edges are inverted; such a rectangle is not a valid region.
    pub fn is_malformed(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Reject malformed input with `InvalidArgument`.
    pub fn validate(&self) -> EngineResult<()> {
        if self.is_malformed() {
            return Err(EngineError::InvalidArgument(format!(
                "malformed rectangle ({}, {})-({}, {})",
                self.left, self.top, self.right, self.bottom
            )));
        }
        Ok(())
    }

    /// Overlap of two rectangles; empty when they do not intersect.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        if r.is_empty() { Rect::default() } else { r }
    }

    /// Smallest rectangle containing both; empty inputs are ignored.
    pub fn bounding_union(&self, other: &Rect) -> Rect {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Rect::default(),
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => Rect::new(
                self.left.min(other.left),
                self.top.min(other.top),
                self.right.max(other.right),
                self.bottom.max(other.bottom),
            ),
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.left >= self.left
                && other.top >= self.top
                && other.right <= self.right
                && other.bottom <= self.bottom)
    }

    pub fn translate(&self, delta: Point) -> Rect {
        Rect::new(
            self.left.saturating_add(delta.x),
            self.top.saturating_add(delta.y),
            self.right.saturating_add(delta.x),
            self.bottom.saturating_add(delta.y),
        )
    }
}

/// A rectangle in device pixels, as reported by the host window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Convert to the cells it touches, rounding outward.
    pub fn to_cells(&self, cell: PixelSize) -> EngineResult<Rect> {
        if self.is_malformed() {
            return Err(EngineError::InvalidArgument(format!(
                "malformed pixel rectangle ({}, {})-({}, {})",
                self.left, self.top, self.right, self.bottom
            )));
        }
        if cell.width == 0 || cell.height == 0 {
            return Err(EngineError::InvalidArgument(
                "cell size must be non-zero to map pixels to cells".into(),
            ));
        }
        let (w, h) = (i64::from(cell.width), i64::from(cell.height));
        let floor_div = |v: i32, d: i64| i64::from(v).div_euclid(d) as i32;
        let ceil_div = |v: i32, d: i64| (i64::from(v) + d - 1).div_euclid(d) as i32;
        Ok(Rect::new(
            floor_div(self.left, w),
            floor_div(self.top, h),
            ceil_div(self.right, w),
            ceil_div(self.bottom, h),
        ))
    }
}
