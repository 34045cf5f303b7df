//! Default values for engine settings.

use crate::types::FontConfig;

pub fn font_family() -> String {
    "JetBrains Mono".to_string()
}

pub fn font_size() -> f32 {
    12.0
}

pub fn font_weight() -> u16 {
    400 // Regular
}

pub fn font() -> FontConfig {
    FontConfig {
        family: font_family(),
        size: font_size(),
        weight: font_weight(),
    }
}

pub fn dpi() -> u32 {
    96 // Logical baseline; 1 point = 96/72 pixels
}

pub fn columns() -> u16 {
    80
}

pub fn rows() -> u16 {
    24
}

pub fn frame_interval_ms() -> u64 {
    0 // No pacing
}

pub fn glyph_cache_capacity() -> usize {
    1024
}

pub fn history_limit() -> usize {
    16
}

pub fn face_weights() -> Vec<u16> {
    vec![400, 700]
}
