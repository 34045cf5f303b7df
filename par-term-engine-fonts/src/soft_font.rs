//! DRCS soft fonts.
//!
//! A soft font is a bitmap glyph set downloaded by the application. Each glyph
//! is `cell_size.height` scanlines; each scanline is one `u16` with the
//! leftmost pixel in the most significant bit.

use crate::error::FontError;
use crate::font_state::PixelSize;

/// Code point of soft font glyph 0. Glyph `n` lives at `SOFT_FONT_BASE + n`.
pub const SOFT_FONT_BASE: char = '\u{EF20}';

/// Widest glyph a `u16` scanline can describe.
const MAX_GLYPH_WIDTH: u32 = u16::BITS;

/// A registered bitmap font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftFont {
    bit_pattern: Vec<u16>,
    cell_size: PixelSize,
    centering_hint: usize,
}

impl SoftFont {
    /// Validate and store a soft font.
    ///
    /// # Arguments
    /// * `bit_pattern` - Scanlines of every glyph, glyph after glyph
    /// * `cell_size` - Source glyph size in pixels (width at most 16)
    /// * `centering_hint` - Columns of left padding when drawn into a wider cell
    pub fn new(
        bit_pattern: &[u16],
        cell_size: PixelSize,
        centering_hint: usize,
    ) -> Result<Self, FontError> {
        if cell_size.width == 0 || cell_size.width > MAX_GLYPH_WIDTH {
            return Err(FontError::InvalidSoftFont(format!(
                "glyph width must be 1-{MAX_GLYPH_WIDTH}, got {}",
                cell_size.width
            )));
        }
        if cell_size.height == 0 {
            return Err(FontError::InvalidSoftFont(
                "glyph height must be at least 1".into(),
            ));
        }
        let height = cell_size.height as usize;
        if bit_pattern.is_empty() || bit_pattern.len() % height != 0 {
            return Err(FontError::InvalidSoftFont(format!(
                "bit pattern of {} scanlines is not a whole number of {}-line glyphs",
                bit_pattern.len(),
                height
            )));
        }
        Ok(Self {
            bit_pattern: bit_pattern.to_vec(),
            cell_size,
            centering_hint,
        })
    }

    pub fn cell_size(&self) -> PixelSize {
        self.cell_size
    }

    pub fn centering_hint(&self) -> usize {
        self.centering_hint
    }

    pub fn glyph_count(&self) -> usize {
        self.bit_pattern.len() / self.cell_size.height as usize
    }

    /// Map a code point to a glyph index in this font.
    pub fn glyph_index(&self, ch: char) -> Option<usize> {
        let offset = (ch as u32).checked_sub(SOFT_FONT_BASE as u32)? as usize;
        (offset < self.glyph_count()).then_some(offset)
    }

    pub fn covers(&self, ch: char) -> bool {
        self.glyph_index(ch).is_some()
    }

    /// Scanlines of one glyph.
    pub fn glyph_rows(&self, index: usize) -> Option<&[u16]> {
        let height = self.cell_size.height as usize;
        let start = index.checked_mul(height)?;
        let end = start.checked_add(height)?;
        self.bit_pattern.get(start..end)
    }

    /// Whether the source pixel at `(x, y)` of glyph `index` is set.
    pub fn pixel(&self, index: usize, x: u32, y: u32) -> bool {
        if x >= self.cell_size.width {
            return false;
        }
        self.glyph_rows(index)
            .and_then(|rows| rows.get(y as usize))
            .is_some_and(|row| row & (0x8000 >> x) != 0)
    }

    /// Render glyph `index` into a `target`-sized cell, row-major.
    ///
    /// Rows scale by nearest neighbor. A target wider than the glyph keeps the
    /// glyph unscaled and shifts it right by the centering hint (clamped so the
    /// glyph stays inside the cell); a narrower target scales down.
    pub fn rasterize(&self, index: usize, target: PixelSize) -> Option<Vec<bool>> {
        if target.width == 0 || target.height == 0 || index >= self.glyph_count() {
            return None;
        }
        let src = self.cell_size;
        let (tw, th) = (target.width as u64, target.height as u64);
        let mut out = Vec::with_capacity((tw * th) as usize);
        let offset = if target.width >= src.width {
            (self.centering_hint as u64).min((target.width - src.width) as u64)
        } else {
            0
        };

        for ty in 0..th {
            let sy = (ty * src.height as u64 / th) as u32;
            for tx in 0..tw {
                let set = if target.width >= src.width {
                    tx.checked_sub(offset)
                        .is_some_and(|sx| self.pixel(index, sx as u32, sy))
                } else {
                    let sx = (tx * src.width as u64 / tw) as u32;
                    self.pixel(index, sx, sy)
                };
                out.push(set);
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32) -> PixelSize {
        PixelSize { width, height }
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(SoftFont::new(&[0; 4], size(0, 2), 0).is_err());
        assert!(SoftFont::new(&[0; 4], size(17, 2), 0).is_err());
        assert!(SoftFont::new(&[0; 4], size(8, 0), 0).is_err());
        assert!(SoftFont::new(&[0; 5], size(8, 2), 0).is_err());
        assert!(SoftFont::new(&[], size(8, 2), 0).is_err());
    }

    #[test]
    fn test_glyph_index_range() {
        let font = SoftFont::new(&[0; 6], size(8, 2), 0).unwrap();
        assert_eq!(font.glyph_count(), 3);
        assert_eq!(font.glyph_index(SOFT_FONT_BASE), Some(0));
        assert_eq!(font.glyph_index('\u{EF22}'), Some(2));
        assert_eq!(font.glyph_index('\u{EF23}'), None);
        assert_eq!(font.glyph_index('A'), None);
    }

    #[test]
    fn test_pixel_reads_msb_first() {
        let font = SoftFont::new(&[0b1000_0000_0000_0001, 0x4000], size(16, 2), 0).unwrap();
        assert!(font.pixel(0, 0, 0));
        assert!(font.pixel(0, 15, 0));
        assert!(!font.pixel(0, 1, 0));
        assert!(font.pixel(0, 1, 1));
        assert!(!font.pixel(0, 16, 0));
    }

    #[test]
    fn test_rasterize_applies_centering_hint() {
        // 2x1 glyph, both pixels set, drawn into a 5x1 cell with hint 2
        let font = SoftFont::new(&[0xC000], size(2, 1), 2).unwrap();
        let pixels = font.rasterize(0, size(5, 1)).unwrap();
        assert_eq!(pixels, vec![false, false, true, true, false]);
    }

    #[test]
    fn test_rasterize_clamps_hint_inside_cell() {
        let font = SoftFont::new(&[0xC000], size(2, 1), 10).unwrap();
        let pixels = font.rasterize(0, size(3, 1)).unwrap();
        assert_eq!(pixels, vec![false, true, true]);
    }

    #[test]
    fn test_rasterize_scales_rows() {
        // Top scanline set, bottom clear; doubled height keeps the split
        let font = SoftFont::new(&[0x8000, 0x0000], size(1, 2), 0).unwrap();
        let pixels = font.rasterize(0, size(1, 4)).unwrap();
        assert_eq!(pixels, vec![true, true, false, false]);
    }

    #[test]
    fn test_rasterize_scales_down_narrow_target() {
        // 4-wide glyph with alternating pixels into a 2-wide cell
        let font = SoftFont::new(&[0b1010_0000_0000_0000], size(4, 1), 0).unwrap();
        let pixels = font.rasterize(0, size(2, 1)).unwrap();
        assert_eq!(pixels, vec![true, true]);
    }
}
