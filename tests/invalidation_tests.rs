//! Dirty-area bookkeeping across paint cycles.

mod common;

use common::headless;
use par_term_engine::{
    EngineError, InvalidationTracker, PixelRect, PixelSize, Point, Rect, RenderEngine, Size,
};

#[test]
fn test_single_row_region_is_exact() {
    let mut engine = headless();
    engine.invalidate(&Rect::new(0, 0, 10, 1)).unwrap();
    engine.start_paint().unwrap();

    let area = engine.dirty_area().unwrap();
    assert_eq!(area.rects(), &[Rect::new(0, 0, 10, 1)]);
    assert!(!area.is_full());

    engine.end_paint().unwrap();
    assert!(engine.dirty_area().unwrap().is_empty());
}

#[test]
fn test_invalidate_all_absorbs_partial_regions() {
    let engine = headless();
    engine.invalidate_all().unwrap();
    engine.invalidate(&Rect::new(2, 2, 4, 4)).unwrap();
    let area = engine.dirty_area().unwrap();
    assert!(area.is_full());
    assert_eq!(area.rects(), &[Rect::new(0, 0, 20, 5)]);

    let engine = headless();
    engine.invalidate(&Rect::new(2, 2, 4, 4)).unwrap();
    engine.invalidate_all().unwrap();
    assert!(engine.dirty_area().unwrap().is_full());
}

#[test]
fn test_dirty_area_is_union_of_regions() {
    let mut engine = headless();
    engine.invalidate(&Rect::new(0, 0, 2, 1)).unwrap();
    engine.invalidate(&Rect::new(1, 0, 4, 1)).unwrap();
    engine.invalidate(&Rect::new(10, 3, 12, 5)).unwrap();
    engine.start_paint().unwrap();

    let area = engine.dirty_area().unwrap();
    assert_eq!(
        area.rects(),
        &[Rect::new(0, 0, 4, 1), Rect::new(10, 3, 12, 5)]
    );
    assert_eq!(area.cell_count(), 8);
    assert_eq!(area.rows(), vec![0, 3, 4]);
    assert_eq!(area.bounding_rect(), Rect::new(0, 0, 12, 5));
}

#[test]
fn test_empty_region_is_noop() {
    let engine = headless();
    engine.invalidate(&Rect::new(1, 1, 3, 2)).unwrap();
    let before = engine.dirty_area().unwrap();
    engine.invalidate(&Rect::new(5, 5, 5, 9)).unwrap();
    engine.invalidate(&Rect::default()).unwrap();
    assert_eq!(engine.dirty_area().unwrap(), before);
}

#[test]
fn test_malformed_region_rejected() {
    let engine = headless();
    assert!(matches!(
        engine.invalidate(&Rect::new(5, 0, 1, 1)),
        Err(EngineError::InvalidArgument(_))
    ));
    assert!(engine.dirty_area().unwrap().is_empty());
}

#[test]
fn test_regions_clipped_to_surface() {
    let engine = headless();
    engine.invalidate(&Rect::new(18, 4, 30, 9)).unwrap();
    engine.invalidate(&Rect::new(-5, -5, -1, -1)).unwrap();
    assert_eq!(
        engine.dirty_area().unwrap().rects(),
        &[Rect::new(18, 4, 20, 5)]
    );
}

#[test]
fn test_selection_all_or_nothing() {
    let engine = headless();
    let regions = [Rect::new(0, 0, 3, 1), Rect::new(4, 2, 1, 3)];
    assert!(engine.invalidate_selection(&regions).is_err());
    assert!(engine.dirty_area().unwrap().is_empty());

    let regions = [Rect::new(0, 0, 3, 1), Rect::new(0, 1, 1, 2)];
    engine.invalidate_selection(&regions).unwrap();
    assert_eq!(engine.dirty_area().unwrap().cell_count(), 4);
}

#[test]
fn test_invalidations_during_paint_land_in_next_frame() {
    let mut engine = headless();
    engine.invalidate(&Rect::new(0, 0, 1, 1)).unwrap();
    engine.start_paint().unwrap();

    engine.invalidate(&Rect::new(5, 4, 6, 5)).unwrap();
    engine.invalidate_all().unwrap();
    let frame_area = engine.dirty_area().unwrap();
    assert_eq!(frame_area.rects(), &[Rect::new(0, 0, 1, 1)]);

    engine.end_paint().unwrap();
    assert!(engine.dirty_area().unwrap().is_full());
}

#[test]
fn test_abort_restores_frame_damage() {
    let mut engine = headless();
    engine.invalidate(&Rect::new(0, 0, 3, 1)).unwrap();
    engine.start_paint().unwrap();
    engine.invalidate(&Rect::new(0, 2, 3, 3)).unwrap();
    engine.abort_paint().unwrap();

    let area = engine.dirty_area().unwrap();
    assert_eq!(
        area.rects(),
        &[Rect::new(0, 0, 3, 1), Rect::new(0, 2, 3, 3)]
    );
}

#[test]
fn test_abort_after_scroll_repaints_everything() {
    let mut engine = headless();
    engine.invalidate_scroll(Point::new(0, 1)).unwrap();
    engine.start_paint().unwrap();
    engine.abort_paint().unwrap();
    assert!(engine.dirty_area().unwrap().is_full());
}

#[test]
fn test_zero_scroll_is_noop() {
    let engine = headless();
    engine.invalidate_scroll(Point::ZERO).unwrap();
    assert!(engine.dirty_area().unwrap().is_empty());
}

#[test]
fn test_scroll_up_marks_bottom_rows() {
    let engine = headless();
    engine.invalidate_scroll(Point::new(0, -2)).unwrap();
    let area = engine.dirty_area().unwrap();
    assert_eq!(area.rects(), &[Rect::new(0, 3, 20, 5)]);
}

#[test]
fn test_system_invalidation_uses_font_cell_size() {
    let engine = headless();
    let cell = engine.font_size().unwrap();
    let px = PixelRect::new(0, 0, cell.width as i32 + 1, cell.height as i32);
    engine.invalidate_system(&px).unwrap();
    assert_eq!(
        engine.dirty_area().unwrap().rects(),
        &[Rect::new(0, 0, 2, 1)]
    );
    assert!(engine
        .invalidate_system(&PixelRect::new(10, 0, 0, 5))
        .is_err());
}

#[test]
fn test_cursor_only_damage_is_flagged() {
    let engine = headless();
    engine.invalidate_cursor(&Rect::new(4, 1, 5, 2)).unwrap();
    assert!(engine.dirty_area().unwrap().is_cursor_only());
}

#[test]
fn test_title_does_not_touch_cells() {
    let mut engine = headless();
    engine.invalidate_title("vim").unwrap();
    assert!(engine.dirty_area().unwrap().is_empty());
    engine.update_title("vim").unwrap();
    assert_eq!(engine.handle().title().as_deref(), Some("vim"));
}

#[test]
fn test_circling_and_teardown_are_independent() {
    let mut engine = headless();
    assert!(!engine.invalidate_circling().unwrap());
    assert!(!engine.prepare_for_teardown().unwrap());

    engine.invalidate_all().unwrap();
    assert!(!engine.invalidate_circling().unwrap());
    assert!(engine.prepare_for_teardown().unwrap());

    let mut engine = headless();
    engine.invalidate(&Rect::new(0, 0, 1, 1)).unwrap();
    assert!(engine.invalidate_circling().unwrap());
    assert!(engine.prepare_for_teardown().unwrap());
}

#[test]
fn test_viewport_shrink_clips_damage_without_invalidating() {
    let mut engine = headless();
    engine.invalidate(&Rect::new(0, 4, 20, 5)).unwrap();
    engine.invalidate(&Rect::new(0, 0, 2, 1)).unwrap();
    engine.update_viewport(&Rect::new(0, 0, 10, 3)).unwrap();
    assert_eq!(
        engine.dirty_area().unwrap().rects(),
        &[Rect::new(0, 0, 2, 1)]
    );
    assert!(engine.update_viewport(&Rect::new(0, 0, -1, 3)).is_err());
}

#[test]
fn test_concurrent_invalidation_while_painting() {
    let mut engine = headless();
    let tracker: InvalidationTracker = engine.tracker();
    engine.invalidate(&Rect::new(0, 0, 1, 1)).unwrap();
    engine.start_paint().unwrap();

    std::thread::scope(|scope| {
        for row in 0..5 {
            let tracker = tracker.clone();
            scope.spawn(move || {
                tracker
                    .invalidate(&Rect::new(10, row, 12, row + 1))
                    .unwrap();
            });
        }
    });

    assert_eq!(
        engine.dirty_area().unwrap().rects(),
        &[Rect::new(0, 0, 1, 1)]
    );
    engine.end_paint().unwrap();
    assert_eq!(
        engine.dirty_area().unwrap().rects(),
        &[Rect::new(10, 0, 12, 5)]
    );
}

#[test]
fn test_tracker_standalone_frame_lifecycle() {
    let tracker = InvalidationTracker::new(Size::new(8, 4), PixelSize::new(8, 16));
    tracker.invalidate(&Rect::new(1, 1, 2, 2)).unwrap();
    let frame = tracker.begin_frame();
    assert!(frame.contains(Point::new(1, 1)));
    assert!(!tracker.has_pending());
    tracker.end_frame();
    assert!(tracker.dirty_area().is_empty());
}
