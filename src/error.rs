//! Typed error types for par-term-engine.
//!
//! Every engine operation returns `EngineResult`; nothing panics and nothing
//! is silently dropped. Drivers branch on `EngineError::is_retryable` to
//! decide between retrying next tick and aborting the frame.

use par_term_engine_fonts::FontError;
use thiserror::Error;

use crate::paint_state::PaintState;

/// Closed set of failures an engine may report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A region, size or other input is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A call arrived out of sequence for the paint cycle.
    #[error("{operation} is not valid while {state}")]
    InvalidPaintState {
        /// Name of the rejected operation
        operation: &'static str,
        /// State the engine was in
        state: PaintState,
    },

    /// `start_paint` was called while a frame is already being painted.
    #[error("engine is busy: a paint cycle is already in progress")]
    EngineBusy,

    /// The surface cannot accept drawing right now (occluded, suspended).
    /// Retry on a later tick.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// No renderable font exists, not even a fallback.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// `end_paint` or `abort_paint` without a matching `start_paint`.
    #[error("paint cycle was not started")]
    PaintNotStarted,
}

impl EngineError {
    /// Only `BackendUnavailable` may be retried; everything else is fatal to the frame.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::BackendUnavailable(_))
    }
}

impl From<FontError> for EngineError {
    fn from(e: FontError) -> Self {
        match e {
            FontError::InvalidRequest(msg) | FontError::InvalidSoftFont(msg) => {
                EngineError::InvalidArgument(msg)
            }
            FontError::Unavailable(family) => EngineError::FontUnavailable(family),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
