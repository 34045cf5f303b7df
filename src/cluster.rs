//! Glyph clusters handed from the model to the backend.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::error::{EngineError, EngineResult};

/// One or more code points drawn as a single glyph over 1 or 2 columns.
///
/// Immutable once built; backends only read it during a draw call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cluster {
    text: String,
    columns: u8,
}

impl Cluster {
    pub fn new(text: impl Into<String>, columns: u8) -> EngineResult<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(EngineError::InvalidArgument(
                "cluster must contain at least one code point".into(),
            ));
        }
        if !(1..=2).contains(&columns) {
            return Err(EngineError::InvalidArgument(format!(
                "cluster width must be 1 or 2 columns, got {columns}"
            )));
        }
        Ok(Self { text, columns })
    }

    /// Split `text` into grapheme clusters with their display widths.
    ///
    /// Zero-width graphemes (a lone combining mark, a control character)
    /// still occupy one column.
    pub fn from_text(text: &str) -> Vec<Cluster> {
        text.graphemes(true)
            .map(|g| Cluster {
                text: g.to_string(),
                columns: g.width().clamp(1, 2) as u8,
            })
            .collect()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn is_wide(&self) -> bool {
        self.columns == 2
    }

    pub fn code_points(&self) -> impl Iterator<Item = char> + '_ {
        self.text.chars()
    }
}

/// Total column width of a run of clusters.
pub fn total_columns(clusters: &[Cluster]) -> usize {
    clusters.iter().map(|c| c.columns as usize).sum()
}
