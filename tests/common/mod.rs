//! Shared integration test helpers for par-term-engine.
//!
//! Include with `mod common;` at the top of a test file.

#![allow(dead_code)]

use par_term_engine::driver::RenderData;
use par_term_engine::{
    Cluster, CursorOptions, EngineConfig, GridLineRun, HeadlessEngine, HeadlessHandle,
    LineRendition, Rect,
};

/// A headless engine with a 20x5 cell surface.
pub fn headless() -> HeadlessEngine {
    headless_with(EngineConfig::default().with_dimensions(20, 5))
}

pub fn headless_with(config: EngineConfig) -> HeadlessEngine {
    HeadlessEngine::new(&config).expect("Failed to create headless engine")
}

/// Boxed headless engine plus its observer handle, for driver tests.
pub fn boxed_headless() -> (Box<HeadlessEngine>, HeadlessHandle) {
    let engine = headless();
    let handle = engine.handle();
    (Box::new(engine), handle)
}

/// In-memory screen content.
#[derive(Debug, Clone)]
pub struct TestScreen {
    pub viewport: Rect,
    pub rows: Vec<String>,
    pub renditions: Vec<LineRendition>,
    /// Rows whose text continues from the row above
    pub continued: Vec<usize>,
    pub decorations: Vec<(usize, GridLineRun)>,
    pub cursor: Option<CursorOptions>,
    pub selection: Vec<Rect>,
    pub title: Option<String>,
}

impl TestScreen {
    pub fn new(columns: i32, lines: &[&str]) -> Self {
        let height = lines.len() as i32;
        Self {
            viewport: Rect::new(0, 0, columns, height),
            rows: lines.iter().map(|l| l.to_string()).collect(),
            renditions: vec![LineRendition::SingleWidth; lines.len()],
            continued: Vec::new(),
            decorations: Vec::new(),
            cursor: None,
            selection: Vec::new(),
            title: None,
        }
    }

    /// Blank 20x5 screen matching `headless()`.
    pub fn blank() -> Self {
        Self::new(20, &["", "", "", "", ""])
    }
}

impl RenderData for TestScreen {
    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn row_clusters(&self, row: usize) -> Vec<Cluster> {
        self.rows
            .get(row)
            .map(|text| Cluster::from_text(text))
            .unwrap_or_default()
    }

    fn row_rendition(&self, row: usize) -> LineRendition {
        self.renditions.get(row).copied().unwrap_or_default()
    }

    fn row_wrapped(&self, row: usize) -> bool {
        self.continued.contains(&row)
    }

    fn row_grid_lines(&self, row: usize) -> Vec<GridLineRun> {
        self.decorations
            .iter()
            .filter(|(r, _)| *r == row)
            .map(|(_, run)| *run)
            .collect()
    }

    fn cursor(&self) -> Option<CursorOptions> {
        self.cursor
    }

    fn selection(&self) -> Vec<Rect> {
        self.selection.clone()
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }
}
