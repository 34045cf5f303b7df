//! Cell decorations drawn by `paint_buffer_grid_lines`.

/// One decoration kind. `None` names the empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridLine {
    None,
    Top,
    Bottom,
    Left,
    Right,
    Underline,
    DoubleUnderline,
    Strikethrough,
    HyperlinkUnderline,
}

impl GridLine {
    pub const ALL: [GridLine; 9] = [
        GridLine::None,
        GridLine::Top,
        GridLine::Bottom,
        GridLine::Left,
        GridLine::Right,
        GridLine::Underline,
        GridLine::DoubleUnderline,
        GridLine::Strikethrough,
        GridLine::HyperlinkUnderline,
    ];
}

bitflags::bitflags! {
    /// A set of decorations.
    ///
    /// Combine with bitwise OR: `GridLineSet::TOP | GridLineSet::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GridLineSet: u16 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const UNDERLINE = 1 << 4;
        const DOUBLE_UNDERLINE = 1 << 5;
        const STRIKETHROUGH = 1 << 6;
        const HYPERLINK_UNDERLINE = 1 << 7;
    }
}

impl From<GridLine> for GridLineSet {
    fn from(line: GridLine) -> Self {
        match line {
            GridLine::None => GridLineSet::empty(),
            GridLine::Top => GridLineSet::TOP,
            GridLine::Bottom => GridLineSet::BOTTOM,
            GridLine::Left => GridLineSet::LEFT,
            GridLine::Right => GridLineSet::RIGHT,
            GridLine::Underline => GridLineSet::UNDERLINE,
            GridLine::DoubleUnderline => GridLineSet::DOUBLE_UNDERLINE,
            GridLine::Strikethrough => GridLineSet::STRIKETHROUGH,
            GridLine::HyperlinkUnderline => GridLineSet::HYPERLINK_UNDERLINE,
        }
    }
}

impl FromIterator<GridLine> for GridLineSet {
    fn from_iter<I: IntoIterator<Item = GridLine>>(iter: I) -> Self {
        iter.into_iter()
            .fold(GridLineSet::empty(), |set, line| set | line.into())
    }
}

impl GridLineSet {
    /// Membership test by enumeration value; `None` matches only the empty set.
    pub fn contains_line(&self, line: GridLine) -> bool {
        match line {
            GridLine::None => self.is_empty(),
            other => self.contains(other.into()),
        }
    }

    /// Decorations in the set, in enumeration order.
    pub fn lines(&self) -> impl Iterator<Item = GridLine> + '_ {
        GridLine::ALL
            .into_iter()
            .filter(|line| *line != GridLine::None && self.contains_line(*line))
    }
}
