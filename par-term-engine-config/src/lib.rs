//! Configuration for the par-term rendering engine contract.
//!
//! This crate provides loading, saving, and default values for the settings
//! that every rendering backend reads at construction time:
//!
//! - Initial font request (family, size, weight) and DPI
//! - Initial surface size in cells
//! - Frame pacing and continuous-redraw behavior
//! - Glyph width cache sizing and ambiguous-width handling
//! - Additional monospace faces for the font catalog

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use error::ConfigError;
pub use types::{FaceConfig, FontConfig};
