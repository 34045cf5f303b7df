//! Typed error types for par-term-engine-fonts.

use thiserror::Error;

/// Errors produced while negotiating fonts or registering soft fonts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    /// The desired font or DPI is malformed (non-finite size, zero DPI, ...).
    #[error("invalid font request: {0}")]
    InvalidRequest(String),

    /// No renderable face exists, only the synthesized last-resort metrics.
    #[error("no usable font available for '{0}'")]
    Unavailable(String),

    /// The soft font bit pattern or cell size is inconsistent.
    #[error("invalid soft font: {0}")]
    InvalidSoftFont(String),
}
