//! Built-in monospace faces.
//!
//! Metrics are expressed relative to the em size so a single table entry
//! serves every point size and DPI.

use super::FaceMetrics;

/// Faces every backend can resolve without configuration, in priority order.
///
/// The first entry is the catalog default used when a requested family is
/// unknown.
pub const BUILTIN_FACES: &[FaceMetrics] = &[
    FaceMetrics::new_static("JetBrains Mono", 0.600, 1.320, &[100, 200, 300, 400, 500, 600, 700, 800]),
    FaceMetrics::new_static("Fira Code", 0.600, 1.310, &[300, 400, 500, 600, 700]),
    FaceMetrics::new_static("Cascadia Mono", 0.586, 1.172, &[200, 300, 400, 600, 700]),
    FaceMetrics::new_static("Consolas", 0.550, 1.170, &[400, 700]),
    FaceMetrics::new_static("Menlo", 0.602, 1.164, &[400, 700]),
    FaceMetrics::new_static("DejaVu Sans Mono", 0.602, 1.164, &[400, 700]),
    FaceMetrics::new_static("Courier New", 0.600, 1.133, &[400, 700]),
];
