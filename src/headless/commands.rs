use crate::cluster::Cluster;
use crate::cursor::CursorOptions;
use crate::geometry::{Point, Rect};
use crate::grid_lines::GridLineSet;
use crate::invalidation::DirtyArea;
use crate::line_rendition::LineRendition;

/// One recorded draw call.
///
/// Positions are kept both in logical cells and in device cells after the
/// active line transform was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Background,
    ScrollFrame {
        delta: Point,
    },
    BufferLine {
        clusters: Vec<Cluster>,
        origin: Point,
        device_origin: Point,
        rendition: LineRendition,
        trim_left: bool,
        wrapped: bool,
    },
    GridLines {
        lines: GridLineSet,
        color: [u8; 3],
        length: usize,
        target: Point,
        device_target: Point,
        device_length: usize,
    },
    Selection(Rect),
    Cursor(CursorOptions),
}

impl DrawCommand {
    /// Short name used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::Background => "background",
            DrawCommand::ScrollFrame { .. } => "scroll_frame",
            DrawCommand::BufferLine { .. } => "buffer_line",
            DrawCommand::GridLines { .. } => "grid_lines",
            DrawCommand::Selection(_) => "selection",
            DrawCommand::Cursor(_) => "cursor",
        }
    }
}

/// Everything drawn during one paint cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 1-based sequence number of the paint cycle
    pub number: u64,
    /// Dirty area snapshotted by `start_paint`
    pub dirty: DirtyArea,
    pub cursor: Option<CursorOptions>,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub(crate) fn new(number: u64, dirty: DirtyArea) -> Self {
        Self {
            number,
            dirty,
            cursor: None,
            commands: Vec::new(),
        }
    }

    /// Text of every buffer line drawn on `row`, concatenated in draw order.
    pub fn row_text(&self, row: i32) -> String {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::BufferLine {
                    clusters, origin, ..
                } if origin.y == row => Some(clusters),
                _ => None,
            })
            .flatten()
            .map(Cluster::text)
            .collect()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.commands.iter().filter(|cmd| cmd.kind() == kind).count()
    }
}
