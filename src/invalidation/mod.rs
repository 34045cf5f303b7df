//! Dirty-region tracking shared between the model and the paint thread.
//!
//! Invalidations accumulate in a *pending* state. `begin_frame` moves the
//! pending state into the frame being painted, so anything invalidated while
//! a frame is in progress lands in the next frame instead of altering the
//! current one.

mod bitmap;

use std::sync::Arc;

use par_term_engine_fonts::PixelSize;
use parking_lot::Mutex;

use crate::error::EngineResult;
use crate::geometry::{PixelRect, Point, Rect, Size};
use bitmap::DirtyBitmap;

/// Merged dirty region of a frame or of the pending state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirtyArea {
    surface: Rect,
    rects: Vec<Rect>,
    full: bool,
    cursor_only: bool,
}

impl DirtyArea {
    fn from_state(state: &PendingState, surface: Rect) -> Self {
        if state.all {
            return Self::full(surface);
        }
        let rects = state.cells.rects();
        let cursor_only = !rects.is_empty() && state.cursor && !state.content;
        Self {
            surface,
            rects,
            full: false,
            cursor_only,
        }
    }

    fn full(surface: Rect) -> Self {
        let rects = if surface.is_empty() {
            Vec::new()
        } else {
            vec![surface]
        };
        Self {
            surface,
            rects,
            full: true,
            cursor_only: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Surface the area was computed against.
    pub fn surface(&self) -> Rect {
        self.surface
    }

    /// The whole surface is dirty.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Only cursor invalidations contributed to this area.
    pub fn is_cursor_only(&self) -> bool {
        self.cursor_only
    }

    /// Disjoint dirty rectangles sorted by top row. A full area is the
    /// single surface rectangle.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn bounding_rect(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::default(), |acc, r| acc.bounding_union(r))
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rects.iter().any(|r| r.contains_point(point))
    }

    /// Distinct rows touched by the area, ascending.
    pub fn rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .rects
            .iter()
            .flat_map(|r| r.top.max(0) as usize..r.bottom.max(0) as usize)
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// Dirty run of `row`, as the bounding span of its rectangles.
    pub fn row_span(&self, row: usize) -> Option<Rect> {
        let y = row as i32;
        let span = self
            .rects
            .iter()
            .filter(|r| r.top <= y && y < r.bottom)
            .map(|r| Rect::new(r.left, y, r.right, y + 1))
            .fold(Rect::default(), |acc, r| acc.bounding_union(&r));
        (!span.is_empty()).then_some(span)
    }

    pub fn cell_count(&self) -> usize {
        self.rects.iter().map(|r| r.size().area()).sum()
    }
}

#[derive(Debug, Clone)]
struct PendingState {
    cells: DirtyBitmap,
    all: bool,
    content: bool,
    cursor: bool,
    scroll: Point,
    scrolled: bool,
}

impl PendingState {
    fn new(surface: Size) -> Self {
        Self {
            cells: DirtyBitmap::new(surface),
            all: false,
            content: false,
            cursor: false,
            scroll: Point::ZERO,
            scrolled: false,
        }
    }

    fn is_dirty(&self) -> bool {
        self.all || self.cells.any()
    }

    fn mark_all(&mut self) {
        self.all = true;
        self.content = true;
        self.cells.clear();
    }

    fn mark(&mut self, rect: &Rect, cursor: bool) {
        if cursor {
            self.cursor = true;
        } else {
            self.content = true;
        }
        if !self.all {
            self.cells.set_rect(rect);
        }
    }

    fn merge(&mut self, other: PendingState) {
        if other.all {
            self.mark_all();
        } else if !self.all {
            self.cells.merge(&other.cells);
        }
        self.content |= other.content;
        self.cursor |= other.cursor;
    }
}

#[derive(Debug)]
struct Inner {
    surface: Size,
    cell_size: PixelSize,
    pending: PendingState,
    frame: Option<PendingState>,
    title: Option<String>,
}

impl Inner {
    fn surface_rect(&self) -> Rect {
        Rect::from_size(self.surface)
    }

    fn clip(&self, rect: &Rect) -> Rect {
        rect.intersect(&self.surface_rect())
    }
}

/// Cloneable, thread-safe handle to one backend's invalidation state.
///
/// Every method locks internally; clones share the same state.
#[derive(Debug, Clone)]
pub struct InvalidationTracker {
    inner: Arc<Mutex<Inner>>,
}

impl InvalidationTracker {
    pub fn new(surface: Size, cell_size: PixelSize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                surface,
                cell_size,
                pending: PendingState::new(surface),
                frame: None,
                title: None,
            })),
        }
    }

    pub fn surface(&self) -> Size {
        self.inner.lock().surface
    }

    pub fn invalidate_all(&self) {
        let mut inner = self.inner.lock();
        if !inner.pending.all {
            log::debug!("Invalidation collapsed to full surface");
        }
        inner.pending.mark_all();
    }

    /// Mark `region` dirty. Empty regions are ignored; the rest is clipped
    /// to the surface.
    pub fn invalidate(&self, region: &Rect) -> EngineResult<()> {
        region.validate()?;
        let mut inner = self.inner.lock();
        let clipped = inner.clip(region);
        if !clipped.is_empty() {
            inner.pending.mark(&clipped, false);
        }
        Ok(())
    }

    /// Like `invalidate`, but recorded as cursor-only damage.
    pub fn invalidate_cursor(&self, region: &Rect) -> EngineResult<()> {
        region.validate()?;
        let mut inner = self.inner.lock();
        let clipped = inner.clip(region);
        if !clipped.is_empty() {
            inner.pending.mark(&clipped, true);
        }
        Ok(())
    }

    /// Merge every rectangle, or none of them when any is malformed.
    pub fn invalidate_selection(&self, regions: &[Rect]) -> EngineResult<()> {
        for region in regions {
            region.validate()?;
        }
        let mut inner = self.inner.lock();
        for region in regions {
            let clipped = inner.clip(region);
            if !clipped.is_empty() {
                inner.pending.mark(&clipped, false);
            }
        }
        Ok(())
    }

    /// Record that the content moved by `delta` cells since the last frame.
    ///
    /// Pending damage moves with the content and the band uncovered by the
    /// scroll becomes dirty. A scroll of a whole surface dimension or more
    /// invalidates everything.
    pub fn invalidate_scroll(&self, delta: Point) {
        if delta.is_zero() {
            return;
        }
        let mut inner = self.inner.lock();
        let surface = inner.surface;
        let pending = &mut inner.pending;
        pending.scroll = pending.scroll + delta;
        pending.scrolled = true;
        pending.content = true;

        let exceeds = |d: Point| d.x.unsigned_abs() >= surface.width.max(0) as u32
            || d.y.unsigned_abs() >= surface.height.max(0) as u32;
        if exceeds(delta) || exceeds(pending.scroll) {
            if !pending.all {
                log::debug!(
                    "Scroll by ({}, {}) exceeds {}x{} surface, invalidating all",
                    delta.x,
                    delta.y,
                    surface.width,
                    surface.height
                );
            }
            pending.mark_all();
            return;
        }
        if pending.all {
            return;
        }

        pending.cells.shift(delta);
        let (w, h) = (surface.width, surface.height);
        if delta.y > 0 {
            pending.cells.set_rect(&Rect::new(0, 0, w, delta.y));
        } else if delta.y < 0 {
            pending.cells.set_rect(&Rect::new(0, h + delta.y, w, h));
        }
        if delta.x > 0 {
            pending.cells.set_rect(&Rect::new(0, 0, delta.x, h));
        } else if delta.x < 0 {
            pending.cells.set_rect(&Rect::new(w + delta.x, 0, w, h));
        }
    }

    /// Host-reported damage in device pixels.
    pub fn invalidate_system(&self, region: &PixelRect) -> EngineResult<()> {
        let cell_size = self.inner.lock().cell_size;
        let cells = region.to_cells(cell_size)?;
        self.invalidate(&cells)
    }

    pub fn invalidate_title(&self, title: &str) {
        self.inner.lock().title = Some(title.to_string());
    }

    pub fn take_pending_title(&self) -> Option<String> {
        self.inner.lock().title.take()
    }

    /// Returns true when partial damage is pending; its row coordinates
    /// will not survive the buffer rotation, so a frame must be painted first.
    pub fn invalidate_circling(&self) -> bool {
        let inner = self.inner.lock();
        !inner.pending.all && inner.pending.cells.any()
    }

    /// The frame snapshot while painting, otherwise the pending state.
    pub fn dirty_area(&self) -> DirtyArea {
        let inner = self.inner.lock();
        let surface = inner.surface_rect();
        match &inner.frame {
            Some(frame) => DirtyArea::from_state(frame, surface),
            None => DirtyArea::from_state(&inner.pending, surface),
        }
    }

    /// Pending damage exists that no frame has consumed yet.
    pub fn has_pending(&self) -> bool {
        self.inner.lock().pending.is_dirty()
    }

    /// Snapshot the pending state as the frame being painted.
    pub fn begin_frame(&self) -> DirtyArea {
        let mut inner = self.inner.lock();
        let fresh = PendingState::new(inner.surface);
        let frame = std::mem::replace(&mut inner.pending, fresh);
        let area = DirtyArea::from_state(&frame, inner.surface_rect());
        inner.frame = Some(frame);
        area
    }

    /// The frame was drawn; its damage is consumed.
    pub fn end_frame(&self) {
        self.inner.lock().frame = None;
    }

    /// Put an abandoned frame's damage back into the pending state.
    pub fn abort_frame(&self) {
        let mut inner = self.inner.lock();
        let Some(frame) = inner.frame.take() else {
            return;
        };
        // Pending coordinates are relative to the scrolled content.
        let scrolled = frame.scrolled;
        inner.pending.merge(frame);
        if scrolled {
            inner.pending.mark_all();
        }
    }

    /// Consume the scroll offset buffered for the current frame.
    pub fn take_frame_scroll(&self) -> Point {
        let mut inner = self.inner.lock();
        match inner.frame.as_mut() {
            Some(frame) => std::mem::take(&mut frame.scroll),
            None => Point::ZERO,
        }
    }

    /// Change the surface size. Existing damage is clipped, nothing new is
    /// invalidated.
    /// Resize the surface. Oversized surfaces are rejected unchanged.
    pub fn resize(&self, surface: Size) -> EngineResult<()> {
        surface.validate_surface()?;
        let mut inner = self.inner.lock();
        inner.surface = surface;
        inner.pending.cells.resize(surface);
        if let Some(frame) = inner.frame.as_mut() {
            frame.cells.resize(surface);
        }
        Ok(())
    }

    pub fn set_cell_size(&self, cell_size: PixelSize) {
        self.inner.lock().cell_size = cell_size;
    }

    pub fn cell_size(&self) -> PixelSize {
        self.inner.lock().cell_size
    }
}
