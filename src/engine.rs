//! The contract every rendering backend implements.

use par_term_engine_fonts::{FontInfo, FontInfoDesired, PixelSize};

use crate::cluster::Cluster;
use crate::cursor::{CursorOptions, RenderFrameInfo};
use crate::error::EngineResult;
use crate::geometry::{PixelRect, Point, Rect};
use crate::grid_lines::GridLineSet;
use crate::invalidation::DirtyArea;
use crate::line_rendition::LineRendition;

/// A rendering backend driven by the terminal model.
///
/// Invalidation methods take `&self` and may be called from any thread while
/// a frame is being painted; everything else is called by the single owner
/// that drives painting. Painting operations are only valid between
/// `start_paint` and `end_paint` and fail with
/// [`EngineError::InvalidPaintState`](crate::EngineError::InvalidPaintState)
/// otherwise.
pub trait RenderEngine: Send {
    // --- Paint cycle ---

    /// Begin a frame, snapshotting pending invalidations as its dirty area.
    fn start_paint(&mut self) -> EngineResult<()>;

    /// Finish the frame and consume its dirty area.
    fn end_paint(&mut self) -> EngineResult<()>;

    /// Abandon the frame in progress; its dirty area becomes pending again.
    fn abort_paint(&mut self) -> EngineResult<()>;

    /// The backend wants a frame every tick even when nothing is dirty.
    fn requires_continuous_redraw(&self) -> bool;

    /// Block until the backend is ready for the next frame.
    fn wait_until_can_render(&mut self) -> EngineResult<()>;

    /// Show the last ended frame. A no-op when none is waiting.
    fn present(&mut self) -> EngineResult<()>;

    /// Release resources. Returns true when unpainted damage remains and
    /// one more frame should be drawn first.
    fn prepare_for_teardown(&mut self) -> EngineResult<bool>;

    /// Apply the frame's buffered scroll offset to already-drawn content.
    fn scroll_frame(&mut self) -> EngineResult<()>;

    // --- Invalidation ---

    fn invalidate(&self, region: &Rect) -> EngineResult<()>;
    fn invalidate_cursor(&self, region: &Rect) -> EngineResult<()>;
    fn invalidate_system(&self, region: &PixelRect) -> EngineResult<()>;
    fn invalidate_selection(&self, regions: &[Rect]) -> EngineResult<()>;
    fn invalidate_scroll(&self, delta: Point) -> EngineResult<()>;
    fn invalidate_all(&self) -> EngineResult<()>;

    /// The buffer is about to rotate. Returns true when a frame must be
    /// painted before it does.
    fn invalidate_circling(&self) -> EngineResult<bool>;

    fn invalidate_title(&self, title: &str) -> EngineResult<()>;

    // --- Frame content ---

    fn prepare_render_info(&mut self, info: &RenderFrameInfo) -> EngineResult<()>;
    fn reset_line_transform(&mut self) -> EngineResult<()>;
    fn prepare_line_transform(
        &mut self,
        rendition: LineRendition,
        row: usize,
        viewport_left: i32,
    ) -> EngineResult<()>;
    fn paint_background(&mut self) -> EngineResult<()>;

    /// Draw a run of clusters starting at `origin`. `trim_left` marks a
    /// leading wide glyph cut by the left edge; `wrapped` marks a row whose
    /// text logically continues from the previous row. It affects underline
    /// and selection continuity, never geometry.
    fn paint_buffer_line(
        &mut self,
        clusters: &[Cluster],
        origin: Point,
        trim_left: bool,
        wrapped: bool,
    ) -> EngineResult<()>;

    fn paint_buffer_grid_lines(
        &mut self,
        lines: GridLineSet,
        color: [u8; 3],
        length: usize,
        target: Point,
    ) -> EngineResult<()>;

    fn paint_selection(&mut self, rect: &Rect) -> EngineResult<()>;
    fn paint_cursor(&mut self, options: &CursorOptions) -> EngineResult<()>;

    // --- Fonts, viewport and queries ---

    /// Resolve and commit a font at `dpi`.
    fn update_font(&mut self, desired: &FontInfoDesired, dpi: u32) -> EngineResult<FontInfo>;

    /// Register a DRCS soft font, replacing the previous one.
    fn update_soft_font(
        &mut self,
        bit_pattern: &[u16],
        cell_size: PixelSize,
        centering_hint: usize,
    ) -> EngineResult<()>;

    fn update_dpi(&mut self, dpi: u32) -> EngineResult<()>;
    fn update_viewport(&mut self, viewport: &Rect) -> EngineResult<()>;
    fn update_title(&mut self, title: &str) -> EngineResult<()>;

    /// What `update_font` would produce, without committing anything.
    fn proposed_font(&self, desired: &FontInfoDesired, dpi: u32) -> EngineResult<FontInfo>;

    fn dirty_area(&self) -> EngineResult<DirtyArea>;
    fn font_size(&self) -> EngineResult<PixelSize>;
    fn is_glyph_wide_by_font(&self, text: &str) -> EngineResult<bool>;
}
