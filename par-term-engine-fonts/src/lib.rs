//! Font negotiation for the par-term rendering engine contract.
//!
//! This crate provides:
//! - Desired-vs-resolved font metric negotiation against a catalog of
//!   monospace faces, with fallback instead of failure
//! - DRCS soft font registration and rasterization into terminal cells
//! - Wide-glyph queries backed by an LRU cache that is dropped whenever the
//!   active font changes
//!
//! # Architecture
//!
//! `FontCatalog` knows which faces exist and how their metrics scale.
//! `FontState` owns the active font, the soft font and the glyph width cache;
//! every rendering backend embeds one and answers the font half of the engine
//! contract through it.

pub mod error;
pub mod font_catalog;
pub mod font_state;
pub mod soft_font;

// Re-export main types for convenience
pub use error::FontError;
pub use font_catalog::{BUILTIN_FACES, FaceMetrics, FontCatalog};
pub use font_state::{FontInfo, FontInfoDesired, FontSource, FontState, PixelSize};
pub use soft_font::{SOFT_FONT_BASE, SoftFont};
