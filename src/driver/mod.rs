//! Model-side paint loop.
//!
//! `PaintDriver` owns the backends and walks each of them through one paint
//! cycle per tick, reading screen content from a [`RenderData`] source.
//! A backend that reports `BackendUnavailable` is skipped and keeps its
//! pending damage. Any other failure aborts that backend's frame without
//! presenting; the remaining backends are still painted and the first
//! failure is returned to the caller.

use crate::cluster::Cluster;
use crate::cursor::{CursorOptions, RenderFrameInfo};
use crate::engine::RenderEngine;
use crate::error::{EngineError, EngineResult};
use crate::geometry::{PixelRect, Point, Rect};
use crate::grid_lines::GridLineSet;
use crate::line_rendition::LineRendition;

/// A run of decorations on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLineRun {
    pub lines: GridLineSet,
    pub color: [u8; 3],
    /// First column, relative to the viewport's left edge
    pub start: usize,
    pub length: usize,
}

/// Read-only view of the screen the driver paints from.
///
/// Rows are viewport rows, 0 at the top.
pub trait RenderData {
    fn viewport(&self) -> Rect;

    fn row_clusters(&self, row: usize) -> Vec<Cluster>;

    fn row_rendition(&self, _row: usize) -> LineRendition {
        LineRendition::SingleWidth
    }

    /// The row's text logically continues from the previous row.
    fn row_wrapped(&self, _row: usize) -> bool {
        false
    }

    fn row_grid_lines(&self, _row: usize) -> Vec<GridLineRun> {
        Vec::new()
    }

    fn cursor(&self) -> Option<CursorOptions> {
        None
    }

    fn selection(&self) -> Vec<Rect> {
        Vec::new()
    }

    fn title(&self) -> Option<String> {
        None
    }
}

/// What happened to one backend during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOutcome {
    /// A frame was painted and presented
    Painted,
    /// Nothing was dirty
    Skipped,
    /// The backend was unavailable; its damage stays queued
    Retry,
    /// The frame was aborted after an error; its damage stays queued
    Failed,
}

/// Per-backend outcomes of one `paint_frame` call, in engine order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub outcomes: Vec<EngineOutcome>,
}

impl FrameReport {
    pub fn painted(&self) -> usize {
        self.count(EngineOutcome::Painted)
    }

    pub fn count(&self, outcome: EngineOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }

    /// Some backend still holds damage that was not presented.
    pub fn needs_retry(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, EngineOutcome::Retry | EngineOutcome::Failed))
    }
}

/// Drives one or more backends through paint cycles.
#[derive(Default)]
pub struct PaintDriver {
    engines: Vec<Box<dyn RenderEngine>>,
    last_title: Option<String>,
    last_report: FrameReport,
}

impl PaintDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_engine(&mut self, engine: Box<dyn RenderEngine>) {
        self.engines.push(engine);
    }

    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    /// Paint one frame on every backend that has something to draw.
    ///
    /// A failing backend does not stop the others. The first error is
    /// returned once every backend has been visited; [`last_report`]
    /// still holds the outcome of each.
    ///
    /// [`last_report`]: PaintDriver::last_report
    pub fn paint_frame(&mut self, data: &dyn RenderData) -> EngineResult<FrameReport> {
        self.sync_title(data)?;

        let mut report = FrameReport::default();
        let mut first_error: Option<EngineError> = None;
        for (index, engine) in self.engines.iter_mut().enumerate() {
            match Self::paint_engine(engine.as_mut(), data) {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    log::warn!("Paint failed on engine {}: {}", index, e);
                    report.outcomes.push(EngineOutcome::Failed);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        self.last_report = report.clone();
        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Outcomes of the most recent `paint_frame`, including failed ones.
    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    fn sync_title(&mut self, data: &dyn RenderData) -> EngineResult<()> {
        let title = data.title();
        if title.is_none() || title == self.last_title {
            return Ok(());
        }
        if let Some(text) = title.as_deref() {
            for engine in &mut self.engines {
                engine.update_title(text)?;
            }
        }
        self.last_title = title;
        Ok(())
    }

    fn paint_engine(
        engine: &mut dyn RenderEngine,
        data: &dyn RenderData,
    ) -> EngineResult<EngineOutcome> {
        if engine.dirty_area()?.is_empty() && !engine.requires_continuous_redraw() {
            return Ok(EngineOutcome::Skipped);
        }
        engine.wait_until_can_render()?;

        match engine.start_paint() {
            Ok(()) => {}
            Err(e) if e.is_retryable() => {
                log::debug!("Backend not ready, retrying next tick: {}", e);
                return Ok(EngineOutcome::Retry);
            }
            Err(e) => return Err(e),
        }

        if let Err(e) = Self::paint_cycle(engine, data) {
            // The frame is discarded; its damage goes back to pending
            if let Err(abort_err) = engine.abort_paint() {
                log::warn!("Abort after failed paint also failed: {}", abort_err);
            }
            return Err(e);
        }
        engine.present()?;
        Ok(EngineOutcome::Painted)
    }

    fn paint_cycle(engine: &mut dyn RenderEngine, data: &dyn RenderData) -> EngineResult<()> {
        let cursor = data.cursor();
        engine.prepare_render_info(&RenderFrameInfo { cursor })?;
        engine.scroll_frame()?;
        engine.paint_background()?;

        let viewport = data.viewport();
        let dirty = engine.dirty_area()?;
        for row in dirty.rows() {
            if row >= viewport.height().max(0) as usize {
                break;
            }
            engine.prepare_line_transform(data.row_rendition(row), row, viewport.left)?;
            let origin = Point::new(viewport.left, row as i32);
            let clusters = data.row_clusters(row);
            engine.paint_buffer_line(&clusters, origin, false, data.row_wrapped(row))?;
            for run in data.row_grid_lines(row) {
                let start = i32::try_from(run.start).unwrap_or(i32::MAX);
                let target = Point::new(viewport.left.saturating_add(start), row as i32);
                engine.paint_buffer_grid_lines(run.lines, run.color, run.length, target)?;
            }
        }

        for rect in data.selection() {
            engine.paint_selection(&rect)?;
        }
        if let Some(cursor) = cursor.filter(CursorOptions::is_drawn) {
            engine.paint_cursor(&cursor)?;
        }
        engine.end_paint()
    }

    /// Resize every backend's surface and repaint everything.
    pub fn update_viewport(&mut self, viewport: &Rect) -> EngineResult<()> {
        for engine in &mut self.engines {
            engine.update_viewport(viewport)?;
            engine.invalidate_all()?;
        }
        Ok(())
    }

    // --- Invalidation fan-out ---

    pub fn trigger_redraw(&self, region: &Rect) -> EngineResult<()> {
        self.engines.iter().try_for_each(|e| e.invalidate(region))
    }

    pub fn trigger_redraw_all(&self) -> EngineResult<()> {
        self.engines.iter().try_for_each(|e| e.invalidate_all())
    }

    pub fn trigger_cursor(&self, region: &Rect) -> EngineResult<()> {
        self.engines.iter().try_for_each(|e| e.invalidate_cursor(region))
    }

    pub fn trigger_selection(&self, regions: &[Rect]) -> EngineResult<()> {
        self.engines
            .iter()
            .try_for_each(|e| e.invalidate_selection(regions))
    }

    pub fn trigger_scroll(&self, delta: Point) -> EngineResult<()> {
        self.engines.iter().try_for_each(|e| e.invalidate_scroll(delta))
    }

    pub fn trigger_system(&self, region: &PixelRect) -> EngineResult<()> {
        self.engines.iter().try_for_each(|e| e.invalidate_system(region))
    }

    pub fn trigger_title_change(&self, title: &str) -> EngineResult<()> {
        self.engines.iter().try_for_each(|e| e.invalidate_title(title))
    }

    /// The buffer is about to rotate. Every backend is asked; if any needs
    /// its partial damage painted first, a frame is painted now.
    pub fn trigger_circling(&mut self, data: &dyn RenderData) -> EngineResult<bool> {
        let mut force_paint = false;
        for engine in &self.engines {
            force_paint |= engine.invalidate_circling()?;
        }
        if force_paint {
            log::debug!("Buffer circling with pending damage, painting now");
            self.paint_frame(data)?;
        }
        Ok(force_paint)
    }

    /// Prepare every backend for teardown, painting one last frame when
    /// any of them still has unpainted damage.
    pub fn trigger_teardown(&mut self, data: &dyn RenderData) -> EngineResult<bool> {
        let mut force_paint = false;
        for engine in &mut self.engines {
            force_paint |= engine.prepare_for_teardown()?;
        }
        if force_paint {
            self.paint_frame(data)?;
        }
        Ok(force_paint)
    }
}
