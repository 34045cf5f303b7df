//! Per-row line renditions (DECDWL / DECDHL) and the active line transform.

use std::collections::BTreeMap;

use crate::geometry::Point;

/// Display transform of one terminal row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineRendition {
    #[default]
    SingleWidth,
    DoubleWidth,
    DoubleHeightTop,
    DoubleHeightBottom,
}

impl LineRendition {
    /// Every non-single rendition doubles the horizontal scale.
    pub fn is_double_width(&self) -> bool {
        *self != LineRendition::SingleWidth
    }

    pub fn is_double_height(&self) -> bool {
        matches!(
            self,
            LineRendition::DoubleHeightTop | LineRendition::DoubleHeightBottom
        )
    }

    pub fn scale_x(&self) -> i32 {
        if self.is_double_width() { 2 } else { 1 }
    }

    pub fn scale_y(&self) -> i32 {
        if self.is_double_height() { 2 } else { 1 }
    }
}

/// The transform applied to paint calls for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTransform {
    pub rendition: LineRendition,
    pub row: usize,
    pub viewport_left: i32,
}

impl LineTransform {
    /// Map a logical cell to the device cell it is drawn at.
    ///
    /// Columns are scaled about the viewport's left edge; rows are unchanged
    /// (a double-height row draws the top or bottom half of a doubled glyph
    /// in its own row).
    pub fn map_point(&self, point: Point) -> Point {
        let sx = self.rendition.scale_x();
        let x = point
            .x
            .saturating_sub(self.viewport_left)
            .saturating_mul(sx)
            .saturating_add(self.viewport_left);
        Point::new(x, point.y)
    }

    /// Device width of `columns` logical columns.
    pub fn map_columns(&self, columns: usize) -> usize {
        columns.saturating_mul(self.rendition.scale_x() as usize)
    }
}

/// Recorded renditions per row plus the transform currently in effect.
///
/// Records persist across paint cycles until reset or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTransforms {
    rows: BTreeMap<usize, LineRendition>,
    active: Option<LineTransform>,
    /// Row of the most recent `prepare`, kept after the active transform
    /// is cleared at frame end
    last_row: Option<usize>,
}

impl LineTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `rendition` the transform for `row` and record it.
    ///
    /// `SingleWidth` is the identity: it clears both the record and the
    /// active transform.
    pub fn prepare(&mut self, rendition: LineRendition, row: usize, viewport_left: i32) {
        if rendition == LineRendition::SingleWidth {
            self.rows.remove(&row);
            self.active = None;
            self.last_row = None;
            return;
        }
        log::trace!("Line transform {:?} for row {}", rendition, row);
        self.rows.insert(row, rendition);
        self.last_row = Some(row);
        self.active = Some(LineTransform {
            rendition,
            row,
            viewport_left,
        });
    }

    /// Drop the active transform and the record of the row it applied to.
    ///
    /// Outside the frame that prepared it, the last prepared row is reset.
    pub fn reset(&mut self) {
        let row = self.active.take().map(|t| t.row).or(self.last_row);
        self.last_row = None;
        if let Some(row) = row {
            log::trace!("Line transform reset for row {}", row);
            self.rows.remove(&row);
        }
    }

    /// Drop the active transform but keep every row's record.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn rendition(&self, row: usize) -> LineRendition {
        self.rows.get(&row).copied().unwrap_or_default()
    }

    pub fn active(&self) -> Option<&LineTransform> {
        self.active.as_ref()
    }

    /// Map a logical cell through the active transform (identity when none).
    pub fn map_point(&self, point: Point) -> Point {
        self.active.map_or(point, |t| t.map_point(point))
    }

    pub fn map_columns(&self, columns: usize) -> usize {
        self.active.map_or(columns, |t| t.map_columns(columns))
    }

    /// Forget rows at or beyond `height` after the viewport shrinks.
    pub fn truncate(&mut self, height: usize) {
        self.rows.retain(|row, _| *row < height);
        if self.active.is_some_and(|t| t.row >= height) {
            self.active = None;
        }
        if self.last_row.is_some_and(|row| row >= height) {
            self.last_row = None;
        }
    }

    pub fn recorded_rows(&self) -> impl Iterator<Item = (usize, LineRendition)> + '_ {
        self.rows.iter().map(|(row, rendition)| (*row, *rendition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_width_maps_about_viewport_left() {
        let t = LineTransform {
            rendition: LineRendition::DoubleWidth,
            row: 0,
            viewport_left: 10,
        };
        assert_eq!(t.map_point(Point::new(10, 3)), Point::new(10, 3));
        assert_eq!(t.map_point(Point::new(13, 3)), Point::new(16, 3));
        assert_eq!(t.map_columns(5), 10);
    }

    #[test]
    fn test_single_width_prepare_clears_record() {
        let mut transforms = LineTransforms::new();
        transforms.prepare(LineRendition::DoubleHeightTop, 2, 0);
        assert_eq!(transforms.rendition(2), LineRendition::DoubleHeightTop);
        transforms.prepare(LineRendition::SingleWidth, 2, 0);
        assert_eq!(transforms.rendition(2), LineRendition::SingleWidth);
        assert!(transforms.active().is_none());
    }

    #[test]
    fn test_reset_only_drops_active_row() {
        let mut transforms = LineTransforms::new();
        transforms.prepare(LineRendition::DoubleWidth, 1, 0);
        transforms.prepare(LineRendition::DoubleWidth, 4, 0);
        transforms.reset();
        assert_eq!(transforms.rendition(1), LineRendition::DoubleWidth);
        assert_eq!(transforms.rendition(4), LineRendition::SingleWidth);
        assert_eq!(transforms.map_point(Point::new(3, 4)), Point::new(3, 4));
    }

    #[test]
    fn test_reset_after_frame_end_clears_last_row() {
        let mut transforms = LineTransforms::new();
        transforms.prepare(LineRendition::DoubleWidth, 3, 0);
        transforms.clear_active();
        assert_eq!(transforms.rendition(3), LineRendition::DoubleWidth);
        transforms.reset();
        assert_eq!(transforms.rendition(3), LineRendition::SingleWidth);
    }

    #[test]
    fn test_mapping_saturates_at_extremes() {
        let t = LineTransform {
            rendition: LineRendition::DoubleWidth,
            row: 0,
            viewport_left: 0,
        };
        assert_eq!(t.map_point(Point::new(i32::MAX, 0)).x, i32::MAX);
        assert_eq!(t.map_point(Point::new(i32::MIN, 0)).x, i32::MIN);
        assert_eq!(t.map_columns(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_truncate_drops_rows_outside_viewport() {
        let mut transforms = LineTransforms::new();
        transforms.prepare(LineRendition::DoubleWidth, 1, 0);
        transforms.prepare(LineRendition::DoubleHeightBottom, 9, 0);
        transforms.truncate(5);
        assert_eq!(transforms.recorded_rows().count(), 1);
        assert!(transforms.active().is_none());
    }
}
