//! Input contract for focusable panels
//!
//! The App routes a key to the focused panel first; anything the panel
//! returns `Handled::No` for falls through to the App's own handlers.

use crossterm::event::KeyEvent;

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the component
    Yes,
    /// Event was not handled, should bubble up
    No,
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Components that handle keyboard input while focused
pub trait Interactive {
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Key hint shown in the status bar while focused
    fn focus_hint(&self) -> Option<&'static str> {
        None
    }
}

/// Keyboard selection over a list of `item_count` rows
pub trait Selectable {
    fn selected_index(&self) -> Option<usize>;
    fn select(&mut self, index: usize);
    fn item_count(&self) -> usize;

    fn select_next(&mut self) {
        let count = self.item_count();
        if count == 0 {
            return;
        }
        let next = match self.selected_index() {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        };
        self.select(next);
    }

    fn select_previous(&mut self) {
        if self.item_count() == 0 {
            return;
        }
        let prev = self.selected_index().map_or(0, |i| i.saturating_sub(1));
        self.select(prev);
    }

    fn select_first(&mut self) {
        if self.item_count() > 0 {
            self.select(0);
        }
    }

    fn select_last(&mut self) {
        let count = self.item_count();
        if count > 0 {
            self.select(count - 1);
        }
    }
}
