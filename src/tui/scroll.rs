// Scroll window over a list panel
//
// Parts, rules and pins are read from the top and follow the cursor row.
// The logs panel tails the buffer: new lines keep the newest entry in view
// until the user moves away from the bottom, and reaching it again resumes.

use ratatui::{
    layout::Rect,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Debug, Clone)]
pub struct ScrollState {
    /// First visible row
    offset: usize,
    len: usize,
    height: usize,
    /// Logs-style window that can stick to the newest row
    tails: bool,
    following: bool,
}

impl ScrollState {
    /// Window anchored at the first row
    pub fn top() -> Self {
        Self {
            offset: 0,
            len: 0,
            height: 0,
            tails: false,
            following: false,
        }
    }

    /// Window that sticks to the newest row
    pub fn tail() -> Self {
        Self {
            tails: true,
            following: true,
            ..Self::top()
        }
    }

    /// New row count and visible height, once per frame
    pub fn resize(&mut self, len: usize, height: usize) {
        self.len = len;
        self.height = height;
        self.offset = if self.following {
            self.last_offset()
        } else {
            self.offset.min(self.last_offset())
        };
    }

    /// Move by `rows` (negative is up)
    pub fn step(&mut self, rows: isize) {
        let target = self.offset.saturating_add_signed(rows);
        self.offset = target.min(self.last_offset());
        self.following = self.tails && self.offset == self.last_offset();
    }

    /// Move by whole pages (negative is up)
    pub fn page(&mut self, pages: isize) {
        self.step(pages * self.height.max(1) as isize);
    }

    pub fn home(&mut self) {
        self.offset = 0;
        self.following = false;
    }

    pub fn end(&mut self) {
        self.offset = self.last_offset();
        self.following = self.tails;
    }

    /// Resume tailing without moving the cursor
    pub fn follow(&mut self) {
        if self.tails {
            self.following = true;
            self.offset = self.last_offset();
        }
    }

    /// Scroll just enough to bring `row` into view
    pub fn reveal(&mut self, row: usize) {
        if row < self.offset {
            self.offset = row;
        } else if self.height > 0 && row >= self.offset + self.height {
            self.offset = row + 1 - self.height;
        }
        self.offset = self.offset.min(self.last_offset());
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Visible rows as `(start, end)`
    pub fn window(&self) -> (usize, usize) {
        (self.offset, (self.offset + self.height).min(self.len))
    }

    fn last_offset(&self) -> usize {
        self.len.saturating_sub(self.height)
    }

    /// Scrollbar on the right border, only when rows overflow.
    /// Tailing windows get arrows so the direction of new rows is visible.
    pub fn render_scrollbar(&self, f: &mut Frame, area: Rect) {
        if self.len <= self.height {
            return;
        }
        let (begin, end) = if self.tails {
            (Some("↑"), Some("↓"))
        } else {
            (None, None)
        };
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(begin)
            .end_symbol(end);
        let mut state = ScrollbarState::new(self.last_offset()).position(self.offset);
        f.render_stateful_widget(scrollbar, area, &mut state);
    }
}
