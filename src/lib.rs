//! Rendering engine contract for the par-term terminal emulator.
//!
//! One terminal model drives many interchangeable backends (GPU, software,
//! headless). This crate defines what the model calls, in which order, and
//! what every backend must track to answer dirty-region queries correctly:
//!
//! - Geometry and cell types (`Rect`, `Cluster`, `GridLineSet`, `CursorOptions`)
//! - Invalidation tracking with a thread-safe, cloneable tracker handle
//! - The paint-cycle state machine (Start → Prepare → Draw → End → Present)
//! - Per-row line transforms for double-width/double-height text
//! - The `RenderEngine` trait every backend implements
//! - `HeadlessEngine`, a recording backend used for testing
//! - `PaintDriver`, which walks engines through a frame from a `RenderData`
//!
//! # Frame sequence
//!
//! ```text
//! invalidate*  ─┐ (any thread, any time)
//!               ▼
//! wait_until_can_render → start_paint → prepare_render_info → scroll_frame
//!   → paint_background → [prepare_line_transform → paint_buffer_line
//!   → paint_buffer_grid_lines]* → paint_selection* → paint_cursor
//!   → end_paint → present
//! ```

pub mod cluster;
pub mod cursor;
pub mod driver;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid_lines;
pub mod headless;
pub mod invalidation;
pub mod line_rendition;
pub mod paint_state;

// Re-export main public types
pub use cluster::Cluster;
pub use cursor::{CursorOptions, CursorShape, RenderFrameInfo};
pub use driver::{EngineOutcome, FrameReport, GridLineRun, PaintDriver, RenderData};
pub use engine::RenderEngine;
pub use error::{EngineError, EngineResult};
pub use geometry::{MAX_SURFACE_CELLS, PixelRect, Point, Rect, Size};
pub use grid_lines::{GridLine, GridLineSet};
pub use headless::{DrawCommand, Frame, HeadlessEngine, HeadlessHandle};
pub use invalidation::{DirtyArea, InvalidationTracker};
pub use line_rendition::{LineRendition, LineTransform, LineTransforms};
pub use paint_state::{PaintCycle, PaintState};

// Re-export font negotiation types used in the engine signature
pub use par_term_engine_config::EngineConfig;
pub use par_term_engine_fonts::{FontInfo, FontInfoDesired, FontSource, PixelSize};
