//! Catalog of monospace faces available to font negotiation.
//!
//! The catalog answers two questions for the resolver: which face serves a
//! requested family, and how that face's cell metrics scale with size.

mod builtin;

use std::borrow::Cow;

use par_term_engine_config::FaceConfig;

pub use builtin::BUILTIN_FACES;

/// Scalable metrics for one face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMetrics {
    /// Family name as reported back to callers
    pub family: Cow<'static, str>,
    /// Cell advance as a fraction of the em size
    pub advance_ratio: f32,
    /// Line height as a fraction of the em size
    pub line_ratio: f32,
    /// Available weights, ascending
    pub weights: Cow<'static, [u16]>,
}

impl FaceMetrics {
    pub const fn new_static(
        family: &'static str,
        advance_ratio: f32,
        line_ratio: f32,
        weights: &'static [u16],
    ) -> Self {
        Self {
            family: Cow::Borrowed(family),
            advance_ratio,
            line_ratio,
            weights: Cow::Borrowed(weights),
        }
    }

    /// Pick the available weight closest to `requested` (lighter wins ties).
    pub fn nearest_weight(&self, requested: u16) -> u16 {
        self.weights
            .iter()
            .copied()
            .min_by_key(|w| (w.abs_diff(requested), *w))
            .unwrap_or(requested)
    }

    fn matches(&self, family: &str) -> bool {
        self.family.eq_ignore_ascii_case(family.trim())
    }
}

impl From<&FaceConfig> for FaceMetrics {
    fn from(face: &FaceConfig) -> Self {
        let mut weights = face.weights.clone();
        weights.sort_unstable();
        weights.dedup();
        Self {
            family: Cow::Owned(face.family.trim().to_string()),
            advance_ratio: face.advance_ratio,
            line_ratio: face.line_ratio,
            weights: Cow::Owned(weights),
        }
    }
}

/// Ordered list of faces; the first face is the default.
#[derive(Debug, Clone, PartialEq)]
pub struct FontCatalog {
    faces: Vec<FaceMetrics>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontCatalog {
    /// The built-in faces only.
    pub fn builtin() -> Self {
        Self {
            faces: BUILTIN_FACES.to_vec(),
        }
    }

    /// A catalog with no faces; every resolution is synthesized.
    pub fn empty() -> Self {
        Self { faces: Vec::new() }
    }

    /// Built-in faces plus configured extras.
    ///
    /// A configured face replaces a built-in face with the same family name.
    pub fn with_extra_faces(extra: &[FaceConfig]) -> Self {
        let mut catalog = Self::builtin();
        for face in extra {
            catalog.insert(FaceMetrics::from(face));
        }
        catalog
    }

    /// Add a face, replacing any face of the same family in place.
    pub fn insert(&mut self, face: FaceMetrics) {
        if let Some(existing) = self.faces.iter_mut().find(|f| f.matches(&face.family)) {
            log::debug!("Replacing catalog face '{}'", face.family);
            *existing = face;
        } else {
            log::debug!("Adding catalog face '{}'", face.family);
            self.faces.push(face);
        }
    }

    /// Look up a face by family name, case-insensitively.
    pub fn find(&self, family: &str) -> Option<&FaceMetrics> {
        self.faces.iter().find(|f| f.matches(family))
    }

    /// The face used when a requested family is unknown.
    pub fn default_face(&self) -> Option<&FaceMetrics> {
        self.faces.first()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.family.as_ref())
    }
}
