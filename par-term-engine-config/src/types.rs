//! Font request and font catalog configuration types.

use serde::{Deserialize, Serialize};

/// The font the engine requests at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font family name, e.g. "JetBrains Mono"
    #[serde(default = "crate::defaults::font_family")]
    pub family: String,
    /// Size in points
    #[serde(default = "crate::defaults::font_size")]
    pub size: f32,
    /// CSS-style weight (100-900)
    #[serde(default = "crate::defaults::font_weight")]
    pub weight: u16,
}

impl Default for FontConfig {
    fn default() -> Self {
        crate::defaults::font()
    }
}

/// An additional monospace face made available to font negotiation.
///
/// Ratios are relative to the em size in pixels: a face with
/// `advance_ratio: 0.6` at 16px produces cells 10px wide (rounded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceConfig {
    /// Family name matched case-insensitively against requests
    pub family: String,
    /// Horizontal advance of one cell as a fraction of the em size
    pub advance_ratio: f32,
    /// Line height as a fraction of the em size
    pub line_ratio: f32,
    /// Weights this face ships with
    #[serde(default = "crate::defaults::face_weights")]
    pub weights: Vec<u16>,
}
