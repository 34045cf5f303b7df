//! Per-cell dirty bitmap backing the invalidation tracker.

use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DirtyBitmap {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl DirtyBitmap {
    pub(crate) fn new(size: Size) -> Self {
        let width = size.width.max(0) as usize;
        let height = size.height.max(0) as usize;
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub(crate) fn clear(&mut self) {
        self.bits.fill(false);
    }

    pub(crate) fn any(&self) -> bool {
        self.bits.iter().any(|b| *b)
    }

    pub(crate) fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub(crate) fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    /// Mark every cell of `rect` that lies on the surface.
    pub(crate) fn set_rect(&mut self, rect: &Rect) {
        let clipped = rect.intersect(&self.bounds());
        if clipped.is_empty() {
            return;
        }
        for y in clipped.top as usize..clipped.bottom as usize {
            let row = y * self.width;
            self.bits[row + clipped.left as usize..row + clipped.right as usize].fill(true);
        }
    }

    /// OR another bitmap of any size into this one; cells outside are dropped.
    pub(crate) fn merge(&mut self, other: &DirtyBitmap) {
        let rows = self.height.min(other.height);
        let cols = self.width.min(other.width);
        for y in 0..rows {
            for x in 0..cols {
                if other.bits[y * other.width + x] {
                    self.bits[y * self.width + x] = true;
                }
            }
        }
    }

    /// Change dimensions keeping the overlapping cells.
    pub(crate) fn resize(&mut self, size: Size) {
        let mut resized = DirtyBitmap::new(size);
        resized.merge(self);
        *self = resized;
    }

    /// Move marked cells by `delta`; cells pushed off the surface are dropped
    /// and vacated cells come back clean.
    pub(crate) fn shift(&mut self, delta: Point) {
        let mut shifted = DirtyBitmap::new(Size::new(self.width as i32, self.height as i32));
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.bits[y * self.width + x] {
                    continue;
                }
                let nx = x as i64 + delta.x as i64;
                let ny = y as i64 + delta.y as i64;
                if nx >= 0 && ny >= 0 && (nx as usize) < self.width && (ny as usize) < self.height
                {
                    shifted.bits[ny as usize * self.width + nx as usize] = true;
                }
            }
        }
        *self = shifted;
    }

    /// Contiguous dirty runs per row, with identical runs on consecutive rows
    /// merged into one rectangle. The result is disjoint and sorted by top row.
    pub(crate) fn rects(&self) -> Vec<Rect> {
        let mut done: Vec<Rect> = Vec::new();
        let mut open: Vec<Rect> = Vec::new();

        for y in 0..self.height {
            let runs = self.row_runs(y);
            let mut still_open = Vec::with_capacity(runs.len());
            for (left, right) in runs {
                let matched = open
                    .iter()
                    .position(|r| r.left == left && r.right == right);
                match matched {
                    Some(i) => {
                        let mut rect = open.swap_remove(i);
                        rect.bottom = y as i32 + 1;
                        still_open.push(rect);
                    }
                    None => still_open.push(Rect::new(left, y as i32, right, y as i32 + 1)),
                }
            }
            done.append(&mut open);
            open = still_open;
        }
        done.append(&mut open);
        done.sort_by_key(|r| (r.top, r.left));
        done
    }

    fn row_runs(&self, y: usize) -> Vec<(i32, i32)> {
        let row = &self.bits[y * self.width..(y + 1) * self.width];
        let mut runs = Vec::new();
        let mut start = None;
        for (x, dirty) in row.iter().enumerate() {
            match (start, *dirty) {
                (None, true) => start = Some(x),
                (Some(s), false) => {
                    runs.push((s as i32, x as i32));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s as i32, self.width as i32));
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rect_clips_to_surface() {
        let mut bitmap = DirtyBitmap::new(Size::new(4, 3));
        bitmap.set_rect(&Rect::new(2, 1, 10, 10));
        assert_eq!(bitmap.count(), 4);
        assert_eq!(bitmap.rects(), vec![Rect::new(2, 1, 4, 3)]);
    }

    #[test]
    fn test_rects_merge_identical_runs_vertically() {
        let mut bitmap = DirtyBitmap::new(Size::new(10, 5));
        bitmap.set_rect(&Rect::new(0, 0, 3, 2));
        bitmap.set_rect(&Rect::new(5, 1, 7, 2));
        assert_eq!(
            bitmap.rects(),
            vec![Rect::new(0, 0, 3, 2), Rect::new(5, 1, 7, 2)]
        );
    }

    #[test]
    fn test_shift_drops_cells_pushed_off() {
        let mut bitmap = DirtyBitmap::new(Size::new(5, 5));
        bitmap.set_rect(&Rect::new(0, 0, 5, 1));
        bitmap.set_rect(&Rect::new(0, 4, 5, 5));
        bitmap.shift(Point::new(0, -1));
        assert_eq!(bitmap.rects(), vec![Rect::new(0, 3, 5, 4)]);
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut bitmap = DirtyBitmap::new(Size::new(5, 5));
        bitmap.set_rect(&Rect::new(3, 3, 5, 5));
        bitmap.resize(Size::new(4, 4));
        assert_eq!(bitmap.rects(), vec![Rect::new(3, 3, 4, 4)]);
        assert!(bitmap.get(3, 3));
        assert!(!bitmap.get(4, 4));
    }
}
