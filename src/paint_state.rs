//! Paint-cycle state machine.
//!
//! Every painting operation checks the cycle state first and rejects
//! out-of-order calls instead of tolerating them.

use std::fmt;

use crate::error::{EngineError, EngineResult};

/// Where an engine is in its paint cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaintState {
    /// No frame in progress and nothing awaiting presentation
    #[default]
    Idle,
    /// Between `start_paint` and `end_paint`
    Painting,
    /// A frame was ended and has not been presented yet
    Ended,
}

impl fmt::Display for PaintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaintState::Idle => "idle",
            PaintState::Painting => "painting",
            PaintState::Ended => "awaiting present",
        };
        f.write_str(name)
    }
}

/// Guarded transitions of the paint cycle.
#[derive(Debug, Clone, Default)]
pub struct PaintCycle {
    state: PaintState,
    frames_started: u64,
}

impl PaintCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PaintState {
        self.state
    }

    pub fn is_painting(&self) -> bool {
        self.state == PaintState::Painting
    }

    /// Number of `start` calls that succeeded.
    pub fn frames_started(&self) -> u64 {
        self.frames_started
    }

    /// Idle/Ended → Painting.
    pub fn start(&mut self) -> EngineResult<()> {
        if self.is_painting() {
            return Err(EngineError::EngineBusy);
        }
        if self.state == PaintState::Ended {
            log::debug!("Starting a new frame; the previous frame was never presented");
        }
        self.state = PaintState::Painting;
        self.frames_started += 1;
        Ok(())
    }

    /// Guard for Painting-only operations.
    pub fn require_painting(&self, operation: &'static str) -> EngineResult<()> {
        if self.is_painting() {
            Ok(())
        } else {
            Err(EngineError::InvalidPaintState {
                operation,
                state: self.state,
            })
        }
    }

    /// Guard for operations that must not run mid-frame.
    pub fn require_not_painting(&self, operation: &'static str) -> EngineResult<()> {
        if self.is_painting() {
            Err(EngineError::InvalidPaintState {
                operation,
                state: self.state,
            })
        } else {
            Ok(())
        }
    }

    /// Painting → Ended.
    pub fn end(&mut self) -> EngineResult<()> {
        if !self.is_painting() {
            return Err(EngineError::PaintNotStarted);
        }
        self.state = PaintState::Ended;
        Ok(())
    }

    /// Painting → Idle, discarding the frame.
    pub fn abort(&mut self) -> EngineResult<()> {
        if !self.is_painting() {
            return Err(EngineError::PaintNotStarted);
        }
        self.state = PaintState::Idle;
        Ok(())
    }

    /// Ended → Idle. Returns whether a frame was waiting to be presented.
    pub fn present(&mut self) -> EngineResult<bool> {
        match self.state {
            PaintState::Painting => Err(EngineError::InvalidPaintState {
                operation: "present",
                state: self.state,
            }),
            PaintState::Ended => {
                self.state = PaintState::Idle;
                Ok(true)
            }
            PaintState::Idle => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut cycle = PaintCycle::new();
        cycle.start().unwrap();
        assert!(cycle.require_painting("paint_background").is_ok());
        cycle.end().unwrap();
        assert_eq!(cycle.state(), PaintState::Ended);
        assert!(cycle.present().unwrap());
        assert_eq!(cycle.state(), PaintState::Idle);
        assert!(!cycle.present().unwrap());
        assert_eq!(cycle.frames_started(), 1);
    }

    #[test]
    fn test_double_start_is_busy() {
        let mut cycle = PaintCycle::new();
        cycle.start().unwrap();
        assert_eq!(cycle.start(), Err(EngineError::EngineBusy));
    }

    #[test]
    fn test_end_without_start() {
        let mut cycle = PaintCycle::new();
        assert_eq!(cycle.end(), Err(EngineError::PaintNotStarted));
        assert_eq!(cycle.abort(), Err(EngineError::PaintNotStarted));
    }

    #[test]
    fn test_present_while_painting_rejected() {
        let mut cycle = PaintCycle::new();
        cycle.start().unwrap();
        assert!(matches!(
            cycle.present(),
            Err(EngineError::InvalidPaintState {
                operation: "present",
                state: PaintState::Painting
            })
        ));
    }

    #[test]
    fn test_ended_frame_can_be_restarted() {
        let mut cycle = PaintCycle::new();
        cycle.start().unwrap();
        cycle.end().unwrap();
        cycle.start().unwrap();
        assert!(cycle.is_painting());
    }
}
