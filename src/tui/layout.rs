/// Responsive breakpoints and the split-pane geometry.
///
/// Single source of truth for width thresholds - no magic numbers scattered in render code.
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// < 60 cols: part list hidden, compact status bar
    Compact,
    /// 60-99 cols: Half-screen
    Normal,
    /// 100-139 cols: Full terminal
    Wide,
    /// 140+ cols: Ultrawide monitor
    UltraWide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            100..=139 => Breakpoint::Wide,
            _ => Breakpoint::UltraWide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        self.ordinal() >= min.ordinal()
    }

    fn ordinal(&self) -> u8 {
        match self {
            Breakpoint::Compact => 0,
            Breakpoint::Normal => 1,
            Breakpoint::Wide => 2,
            Breakpoint::UltraWide => 3,
        }
    }
}

/// Width of the part list column
pub fn part_list_width(bp: Breakpoint) -> u16 {
    match bp {
        Breakpoint::Compact => 0,
        Breakpoint::Normal => 20,
        Breakpoint::Wide | Breakpoint::UltraWide => 26,
    }
}

/// Left pane, one-column divider, right pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitColumns {
    pub left: Rect,
    pub divider: Rect,
    pub right: Rect,
}

/// Split `area` so the left pane takes `ratio` percent of its width
pub fn split_columns(area: Rect, ratio: f64) -> SplitColumns {
    if area.width < 3 {
        return SplitColumns {
            left: area,
            divider: Rect::new(area.right(), area.y, 0, area.height),
            right: Rect::new(area.right(), area.y, 0, area.height),
        };
    }

    let left_width = ((area.width as f64) * ratio / 100.0).round() as u16;
    let left_width = left_width.clamp(1, area.width - 2);
    let right_width = area.width - left_width - 1;

    SplitColumns {
        left: Rect::new(area.x, area.y, left_width, area.height),
        divider: Rect::new(area.x + left_width, area.y, 1, area.height),
        right: Rect::new(area.x + left_width + 1, area.y, right_width, area.height),
    }
}

/// Whether the cell at (column, row) lies inside `area`
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}
