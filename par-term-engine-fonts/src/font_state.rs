//! Desired-vs-resolved font negotiation and the per-backend font state.

use std::num::NonZeroUsize;

use lru::LruCache;
use par_term_engine_config::{EngineConfig, FontConfig};
use parking_lot::Mutex;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::error::FontError;
use crate::font_catalog::FontCatalog;
use crate::soft_font::SoftFont;

/// Typographic points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Metrics assumed when the catalog has no face at all.
const SYNTHESIZED_ADVANCE_RATIO: f32 = 0.6;
const SYNTHESIZED_LINE_RATIO: f32 = 1.2;

/// Weights outside this range are malformed rather than merely unsupported.
const WEIGHT_RANGE: std::ops::RangeInclusive<u16> = 1..=1000;

/// A size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The font a caller asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfoDesired {
    /// Family name; empty selects the catalog default
    pub family: String,
    /// Size in points
    pub size: f32,
    /// CSS-style weight
    pub weight: u16,
}

impl FontInfoDesired {
    pub fn new(family: impl Into<String>, size: f32, weight: u16) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
        }
    }

    fn validate(&self) -> Result<(), FontError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(FontError::InvalidRequest(format!(
                "font size must be positive, got {}",
                self.size
            )));
        }
        if !WEIGHT_RANGE.contains(&self.weight) {
            return Err(FontError::InvalidRequest(format!(
                "font weight must be within 1-1000, got {}",
                self.weight
            )));
        }
        Ok(())
    }
}

impl From<&FontConfig> for FontInfoDesired {
    fn from(config: &FontConfig) -> Self {
        Self::new(config.family.clone(), config.size, config.weight)
    }
}

/// How a resolved font relates to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    /// The requested family was found
    Exact,
    /// The requested family is unknown; the catalog default was used
    FallbackFace,
    /// No face exists; metrics were synthesized
    Synthesized,
}

/// Metrics a backend can actually render.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub family: String,
    /// Size in points, as requested
    pub size: f32,
    /// Weight after snapping to an available weight
    pub weight: u16,
    pub dpi: u32,
    /// Cell size in device pixels
    pub cell_size: PixelSize,
    pub source: FontSource,
}

impl FontInfo {
    pub fn is_fallback(&self) -> bool {
        self.source != FontSource::Exact
    }
}

/// Resolve `desired` at `dpi` against `catalog`.
///
/// Never fails for a well-formed request: unknown families fall back to the
/// catalog default and an empty catalog yields synthesized metrics.
pub fn resolve(
    catalog: &FontCatalog,
    desired: &FontInfoDesired,
    dpi: u32,
) -> Result<FontInfo, FontError> {
    desired.validate()?;
    if dpi == 0 {
        return Err(FontError::InvalidRequest("dpi must be non-zero".into()));
    }

    let pixels = desired.size * dpi as f32 / POINTS_PER_INCH;
    let requested = desired.family.trim();

    let (face, source) = match catalog.find(requested) {
        Some(face) => (Some(face), FontSource::Exact),
        None => (catalog.default_face(), FontSource::FallbackFace),
    };

    let info = match face {
        Some(face) => FontInfo {
            family: face.family.to_string(),
            size: desired.size,
            weight: face.nearest_weight(desired.weight),
            dpi,
            cell_size: cell_size(pixels, face.advance_ratio, face.line_ratio),
            source,
        },
        None => FontInfo {
            family: requested.to_string(),
            size: desired.size,
            weight: desired.weight,
            dpi,
            cell_size: cell_size(pixels, SYNTHESIZED_ADVANCE_RATIO, SYNTHESIZED_LINE_RATIO),
            source: FontSource::Synthesized,
        },
    };
    Ok(info)
}

fn cell_size(pixels: f32, advance_ratio: f32, line_ratio: f32) -> PixelSize {
    let scale = |ratio: f32| ((pixels * ratio).round() as u32).max(1);
    PixelSize::new(scale(advance_ratio), scale(line_ratio))
}

/// Active font, soft font and glyph width cache owned by one backend.
pub struct FontState {
    catalog: FontCatalog,
    desired: FontInfoDesired,
    active: FontInfo,
    soft_font: Option<SoftFont>,
    ambiguous_wide: bool,
    width_cache: Mutex<LruCache<String, bool>>,
}

impl std::fmt::Debug for FontState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontState")
            .field("active", &self.active)
            .field("soft_font_glyphs", &self.soft_font.as_ref().map(SoftFont::glyph_count))
            .field("ambiguous_wide", &self.ambiguous_wide)
            .field("cached_widths", &self.width_cache.lock().len())
            .finish()
    }
}

impl FontState {
    /// Build the font state described by an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, FontError> {
        Self::new(
            FontCatalog::with_extra_faces(&config.extra_faces),
            FontInfoDesired::from(&config.font),
            config.dpi,
            config.ambiguous_width_wide,
            config.glyph_cache_capacity,
        )
    }

    /// Create font state with `desired` committed as the active font.
    pub fn new(
        catalog: FontCatalog,
        desired: FontInfoDesired,
        dpi: u32,
        ambiguous_wide: bool,
        cache_capacity: usize,
    ) -> Result<Self, FontError> {
        let active = Self::committable(&catalog, &desired, dpi)?;
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        log::info!(
            "Initial font: {} {}pt weight {} -> {}x{}px cells",
            active.family,
            active.size,
            active.weight,
            active.cell_size.width,
            active.cell_size.height
        );
        Ok(Self {
            catalog,
            desired,
            active,
            soft_font: None,
            ambiguous_wide,
            width_cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    fn committable(
        catalog: &FontCatalog,
        desired: &FontInfoDesired,
        dpi: u32,
    ) -> Result<FontInfo, FontError> {
        let info = resolve(catalog, desired, dpi)?;
        match info.source {
            FontSource::Synthesized => Err(FontError::Unavailable(desired.family.clone())),
            FontSource::FallbackFace => {
                log::warn!(
                    "Font '{}' not found, using fallback '{}'",
                    desired.family,
                    info.family
                );
                Ok(info)
            }
            FontSource::Exact => Ok(info),
        }
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    /// Resolve without committing.
    pub fn proposed_font(&self, desired: &FontInfoDesired, dpi: u32) -> Result<FontInfo, FontError> {
        resolve(&self.catalog, desired, dpi)
    }

    /// Resolve and commit; drops cached glyph metrics.
    pub fn update_font(&mut self, desired: &FontInfoDesired, dpi: u32) -> Result<FontInfo, FontError> {
        let info = Self::committable(&self.catalog, desired, dpi)?;
        log::info!(
            "Font updated: {} {}pt weight {} @ {}dpi -> {}x{}px cells",
            info.family,
            info.size,
            info.weight,
            dpi,
            info.cell_size.width,
            info.cell_size.height
        );
        self.desired = desired.clone();
        self.active = info.clone();
        self.width_cache.lock().clear();
        Ok(info)
    }

    /// Re-resolve the last committed request at a new DPI.
    pub fn update_dpi(&mut self, dpi: u32) -> Result<FontInfo, FontError> {
        let desired = self.desired.clone();
        self.update_font(&desired, dpi)
    }

    /// Register a soft font, replacing any previous one.
    pub fn update_soft_font(
        &mut self,
        bit_pattern: &[u16],
        cell_size: PixelSize,
        centering_hint: usize,
    ) -> Result<(), FontError> {
        let font = SoftFont::new(bit_pattern, cell_size, centering_hint)?;
        log::debug!(
            "Soft font registered: {} glyphs of {}x{}",
            font.glyph_count(),
            cell_size.width,
            cell_size.height
        );
        self.soft_font = Some(font);
        self.width_cache.lock().clear();
        Ok(())
    }

    pub fn soft_font(&self) -> Option<&SoftFont> {
        self.soft_font.as_ref()
    }

    pub fn active(&self) -> &FontInfo {
        &self.active
    }

    pub fn desired(&self) -> &FontInfoDesired {
        &self.desired
    }

    pub fn dpi(&self) -> u32 {
        self.active.dpi
    }

    /// Cell size of the active font in device pixels.
    pub fn font_size(&self) -> PixelSize {
        self.active.cell_size
    }

    /// Whether the first grapheme of `text` occupies two cells.
    pub fn is_glyph_wide(&self, text: &str) -> bool {
        let Some(grapheme) = text.graphemes(true).next() else {
            return false;
        };

        let mut cache = self.width_cache.lock();
        if let Some(&wide) = cache.get(grapheme) {
            return wide;
        }

        let soft = self
            .soft_font
            .as_ref()
            .is_some_and(|font| grapheme.chars().all(|ch| font.covers(ch)));
        let wide = !soft && self.display_width(grapheme) >= 2;
        cache.put(grapheme.to_string(), wide);
        wide
    }

    fn display_width(&self, grapheme: &str) -> usize {
        if self.ambiguous_wide {
            grapheme.width_cjk()
        } else {
            grapheme.width()
        }
    }

    /// Number of memoized glyph width answers.
    pub fn cached_glyph_count(&self) -> usize {
        self.width_cache.lock().len()
    }
}
