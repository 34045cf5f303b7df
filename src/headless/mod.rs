//! A backend that records draw calls instead of rasterizing them.
//!
//! `HeadlessEngine` implements the full `RenderEngine` contract on top of the
//! shared building blocks (invalidation tracker, paint cycle, line transforms,
//! font state). Each paint cycle produces a [`Frame`]; `present` moves it into
//! the presented history visible through a [`HeadlessHandle`].

mod commands;

pub use commands::{DrawCommand, Frame};

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use par_term_engine_config::EngineConfig;
use par_term_engine_fonts::{FontInfo, FontInfoDesired, FontState, PixelSize};
use parking_lot::Mutex;

use crate::cluster::Cluster;
use crate::cursor::{CursorOptions, RenderFrameInfo};
use crate::engine::RenderEngine;
use crate::error::{EngineError, EngineResult};
use crate::geometry::{PixelRect, Point, Rect, Size};
use crate::grid_lines::GridLineSet;
use crate::invalidation::{DirtyArea, InvalidationTracker};
use crate::line_rendition::{LineRendition, LineTransforms};
use crate::paint_state::{PaintCycle, PaintState};

#[derive(Debug)]
struct Shared {
    unavailable: Option<String>,
    faults: HashMap<&'static str, EngineError>,
    /// Most recent frames, oldest first, at most `history_limit` long
    presented: VecDeque<Frame>,
    history_limit: usize,
    presented_total: usize,
    title: Option<String>,
}

/// Observer and control handle for a `HeadlessEngine`.
///
/// Stays usable after the engine is boxed into a driver.
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessHandle {
    fn new(history_limit: usize) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                unavailable: None,
                faults: HashMap::new(),
                presented: VecDeque::with_capacity(history_limit.min(64)),
                history_limit: history_limit.max(1),
                presented_total: 0,
                title: None,
            })),
        }
    }

    /// Simulate an occluded surface; `start_paint` reports
    /// `BackendUnavailable` until made available again.
    pub fn set_available(&self, available: bool) {
        self.shared.lock().unavailable = (!available).then(|| "surface occluded".to_string());
    }

    pub fn is_available(&self) -> bool {
        self.shared.lock().unavailable.is_none()
    }

    /// Make the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: &'static str, error: EngineError) {
        self.shared.lock().faults.insert(operation, error);
    }

    fn take_fault(&self, operation: &'static str) -> EngineResult<()> {
        match self.shared.lock().faults.remove(operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Retained frames, oldest first.
    pub fn presented_frames(&self) -> Vec<Frame> {
        self.shared.lock().presented.iter().cloned().collect()
    }

    pub fn last_presented(&self) -> Option<Frame> {
        self.shared.lock().presented.back().cloned()
    }

    /// Frames presented over the engine's lifetime, including ones no
    /// longer retained.
    pub fn presented_count(&self) -> usize {
        self.shared.lock().presented_total
    }

    fn push_presented(&self, frame: Frame) {
        let mut shared = self.shared.lock();
        shared.presented_total += 1;
        shared.presented.push_back(frame);
        while shared.presented.len() > shared.history_limit {
            shared.presented.pop_front();
        }
    }

    /// Title last committed by `update_title`.
    pub fn title(&self) -> Option<String> {
        self.shared.lock().title.clone()
    }
}

/// Recording backend.
#[derive(Debug)]
pub struct HeadlessEngine {
    tracker: InvalidationTracker,
    cycle: PaintCycle,
    transforms: LineTransforms,
    fonts: FontState,
    viewport: Rect,
    frame_interval: Duration,
    continuous: bool,
    last_present: Option<Instant>,
    current: Option<Frame>,
    ended: Option<Frame>,
    handle: HeadlessHandle,
}

impl HeadlessEngine {
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let fonts = FontState::from_config(config)?;
        let surface = Size::new(config.columns as i32, config.rows as i32);
        surface.validate_surface()?;
        log::debug!(
            "Headless engine created: {}x{} cells, {}x{}px per cell",
            surface.width,
            surface.height,
            fonts.font_size().width,
            fonts.font_size().height
        );
        Ok(Self {
            tracker: InvalidationTracker::new(surface, fonts.font_size()),
            cycle: PaintCycle::new(),
            transforms: LineTransforms::new(),
            fonts,
            viewport: Rect::from_size(surface),
            frame_interval: Duration::from_millis(config.frame_interval_ms),
            continuous: config.continuous_redraw,
            last_present: None,
            current: None,
            ended: None,
            handle: HeadlessHandle::new(config.history_limit),
        })
    }

    /// Handle for invalidating from another thread.
    pub fn tracker(&self) -> InvalidationTracker {
        self.tracker.clone()
    }

    pub fn handle(&self) -> HeadlessHandle {
        self.handle.clone()
    }

    pub fn paint_state(&self) -> PaintState {
        self.cycle.state()
    }

    pub fn line_transforms(&self) -> &LineTransforms {
        &self.transforms
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn active_font(&self) -> &FontInfo {
        self.fonts.active()
    }

    /// Frame being drawn, if painting.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    /// Frame ended but not yet presented.
    pub fn ended_frame(&self) -> Option<&Frame> {
        self.ended.as_ref()
    }

    pub fn font_state(&self) -> &FontState {
        &self.fonts
    }

    fn guard(&self, operation: &'static str) -> EngineResult<()> {
        self.cycle.require_painting(operation)?;
        self.handle.take_fault(operation)
    }

    fn record(&mut self, command: DrawCommand) {
        log::trace!("Recorded {}", command.kind());
        if let Some(frame) = self.current.as_mut() {
            frame.commands.push(command);
        }
    }
}

impl RenderEngine for HeadlessEngine {
    fn start_paint(&mut self) -> EngineResult<()> {
        if self.cycle.is_painting() {
            return Err(EngineError::EngineBusy);
        }
        if let Some(reason) = self.handle.shared.lock().unavailable.clone() {
            return Err(EngineError::BackendUnavailable(reason));
        }
        self.handle.take_fault("start_paint")?;
        self.cycle.start()?;
        self.ended = None;
        let dirty = self.tracker.begin_frame();
        log::debug!(
            "Paint cycle {} started: {} dirty rect(s){}",
            self.cycle.frames_started(),
            dirty.rects().len(),
            if dirty.is_full() { " (full)" } else { "" }
        );
        self.current = Some(Frame::new(self.cycle.frames_started(), dirty));
        Ok(())
    }

    fn end_paint(&mut self) -> EngineResult<()> {
        if !self.cycle.is_painting() {
            return Err(EngineError::PaintNotStarted);
        }
        self.handle.take_fault("end_paint")?;
        self.cycle.end()?;
        self.tracker.end_frame();
        self.transforms.clear_active();
        self.ended = self.current.take();
        Ok(())
    }

    fn abort_paint(&mut self) -> EngineResult<()> {
        self.cycle.abort()?;
        self.tracker.abort_frame();
        self.transforms.clear_active();
        if let Some(frame) = self.current.take() {
            log::debug!(
                "Paint cycle {} aborted after {} command(s)",
                frame.number,
                frame.commands.len()
            );
        }
        Ok(())
    }

    fn requires_continuous_redraw(&self) -> bool {
        self.continuous
    }

    fn wait_until_can_render(&mut self) -> EngineResult<()> {
        self.cycle.require_not_painting("wait_until_can_render")?;
        if let Some(last) = self.last_present {
            let elapsed = last.elapsed();
            if elapsed < self.frame_interval {
                std::thread::sleep(self.frame_interval - elapsed);
            }
        }
        Ok(())
    }

    fn present(&mut self) -> EngineResult<()> {
        self.cycle.require_not_painting("present")?;
        self.handle.take_fault("present")?;
        if !self.cycle.present()? {
            return Ok(());
        }
        if let Some(frame) = self.ended.take() {
            log::trace!("Presented frame {}", frame.number);
            self.handle.push_presented(frame);
        }
        self.last_present = Some(Instant::now());
        Ok(())
    }

    fn prepare_for_teardown(&mut self) -> EngineResult<bool> {
        self.cycle.require_not_painting("prepare_for_teardown")?;
        let force_paint = self.tracker.has_pending();
        log::debug!("Teardown requested, force paint: {}", force_paint);
        Ok(force_paint)
    }

    fn scroll_frame(&mut self) -> EngineResult<()> {
        self.guard("scroll_frame")?;
        let delta = self.tracker.take_frame_scroll();
        if !delta.is_zero() {
            self.record(DrawCommand::ScrollFrame { delta });
        }
        Ok(())
    }

    fn invalidate(&self, region: &Rect) -> EngineResult<()> {
        self.tracker.invalidate(region)
    }

    fn invalidate_cursor(&self, region: &Rect) -> EngineResult<()> {
        self.tracker.invalidate_cursor(region)
    }

    fn invalidate_system(&self, region: &PixelRect) -> EngineResult<()> {
        self.tracker.invalidate_system(region)
    }

    fn invalidate_selection(&self, regions: &[Rect]) -> EngineResult<()> {
        self.tracker.invalidate_selection(regions)
    }

    fn invalidate_scroll(&self, delta: Point) -> EngineResult<()> {
        self.tracker.invalidate_scroll(delta);
        Ok(())
    }

    fn invalidate_all(&self) -> EngineResult<()> {
        self.tracker.invalidate_all();
        Ok(())
    }

    fn invalidate_circling(&self) -> EngineResult<bool> {
        Ok(self.tracker.invalidate_circling())
    }

    fn invalidate_title(&self, title: &str) -> EngineResult<()> {
        self.tracker.invalidate_title(title);
        Ok(())
    }

    fn prepare_render_info(&mut self, info: &RenderFrameInfo) -> EngineResult<()> {
        self.guard("prepare_render_info")?;
        if let Some(frame) = self.current.as_mut() {
            frame.cursor = info.cursor;
        }
        Ok(())
    }

    fn reset_line_transform(&mut self) -> EngineResult<()> {
        self.guard("reset_line_transform")?;
        self.transforms.reset();
        Ok(())
    }

    fn prepare_line_transform(
        &mut self,
        rendition: LineRendition,
        row: usize,
        viewport_left: i32,
    ) -> EngineResult<()> {
        self.guard("prepare_line_transform")?;
        self.transforms.prepare(rendition, row, viewport_left);
        Ok(())
    }

    fn paint_background(&mut self) -> EngineResult<()> {
        self.guard("paint_background")?;
        self.record(DrawCommand::Background);
        Ok(())
    }

    fn paint_buffer_line(
        &mut self,
        clusters: &[Cluster],
        origin: Point,
        trim_left: bool,
        wrapped: bool,
    ) -> EngineResult<()> {
        self.guard("paint_buffer_line")?;
        if clusters.is_empty() {
            return Ok(());
        }
        let rendition = self
            .transforms
            .active()
            .map_or(LineRendition::SingleWidth, |t| t.rendition);
        self.record(DrawCommand::BufferLine {
            clusters: clusters.to_vec(),
            origin,
            device_origin: self.transforms.map_point(origin),
            rendition,
            trim_left,
            wrapped,
        });
        Ok(())
    }

    fn paint_buffer_grid_lines(
        &mut self,
        lines: GridLineSet,
        color: [u8; 3],
        length: usize,
        target: Point,
    ) -> EngineResult<()> {
        self.guard("paint_buffer_grid_lines")?;
        if lines.is_empty() || length == 0 {
            return Ok(());
        }
        self.record(DrawCommand::GridLines {
            lines,
            color,
            length,
            target,
            device_target: self.transforms.map_point(target),
            device_length: self.transforms.map_columns(length),
        });
        Ok(())
    }

    fn paint_selection(&mut self, rect: &Rect) -> EngineResult<()> {
        self.guard("paint_selection")?;
        rect.validate()?;
        if !rect.is_empty() {
            self.record(DrawCommand::Selection(*rect));
        }
        Ok(())
    }

    fn paint_cursor(&mut self, options: &CursorOptions) -> EngineResult<()> {
        self.guard("paint_cursor")?;
        if !(1..=100).contains(&options.height_percent) {
            return Err(EngineError::InvalidArgument(format!(
                "cursor height must be 1-100%, got {}",
                options.height_percent
            )));
        }
        self.record(DrawCommand::Cursor(*options));
        Ok(())
    }

    fn update_font(&mut self, desired: &FontInfoDesired, dpi: u32) -> EngineResult<FontInfo> {
        self.cycle.require_not_painting("update_font")?;
        let info = self.fonts.update_font(desired, dpi)?;
        self.tracker.set_cell_size(info.cell_size);
        Ok(info)
    }

    fn update_soft_font(
        &mut self,
        bit_pattern: &[u16],
        cell_size: PixelSize,
        centering_hint: usize,
    ) -> EngineResult<()> {
        self.cycle.require_not_painting("update_soft_font")?;
        self.fonts
            .update_soft_font(bit_pattern, cell_size, centering_hint)?;
        Ok(())
    }

    fn update_dpi(&mut self, dpi: u32) -> EngineResult<()> {
        self.cycle.require_not_painting("update_dpi")?;
        if dpi == 0 {
            return Err(EngineError::InvalidArgument("dpi must be non-zero".into()));
        }
        let info = self.fonts.update_dpi(dpi)?;
        self.tracker.set_cell_size(info.cell_size);
        Ok(())
    }

    fn update_viewport(&mut self, viewport: &Rect) -> EngineResult<()> {
        self.cycle.require_not_painting("update_viewport")?;
        viewport.validate()?;
        let size = viewport.size();
        size.validate_surface()?;
        if size != self.viewport.size() {
            log::debug!(
                "Viewport resized {}x{} -> {}x{}",
                self.viewport.width(),
                self.viewport.height(),
                size.width,
                size.height
            );
            self.tracker.resize(size)?;
            self.transforms.truncate(size.height as usize);
        }
        self.viewport = *viewport;
        Ok(())
    }

    fn update_title(&mut self, title: &str) -> EngineResult<()> {
        self.tracker.take_pending_title();
        self.handle.shared.lock().title = Some(title.to_string());
        Ok(())
    }

    fn proposed_font(&self, desired: &FontInfoDesired, dpi: u32) -> EngineResult<FontInfo> {
        Ok(self.fonts.proposed_font(desired, dpi)?)
    }

    fn dirty_area(&self) -> EngineResult<DirtyArea> {
        Ok(self.tracker.dirty_area())
    }

    fn font_size(&self) -> EngineResult<PixelSize> {
        Ok(self.fonts.font_size())
    }

    fn is_glyph_wide_by_font(&self, text: &str) -> EngineResult<bool> {
        Ok(self.fonts.is_glyph_wide(text))
    }
}
