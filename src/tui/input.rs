// Input handling: key behaviors and the search box text buffer
//
// - State-change only keys (trigger once per press)
// - Repeatable keys (trigger on press, then repeat while held)
// - `TextInput`, a cursor-aware line buffer for the search box. Typed text
//   bypasses `InputHandler` so repeated letters are never debounced.

use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Defines how a key should behave when pressed/held
#[derive(Debug, Clone, Copy)]
pub enum KeyBehavior {
    /// Trigger only on state change (press -> release)
    /// Use for: Enter, Tab, single-action keys
    StateChange,

    /// Trigger on press, then repeat after initial delay
    /// Use for: Arrow keys, PageUp/Down, navigation
    Repeatable {
        /// Delay before starting to repeat (e.g., 500ms)
        initial_delay: Duration,
        /// Time between repeats (e.g., 50ms)
        repeat_interval: Duration,
    },
}

impl KeyBehavior {
    /// Standard navigation key behavior (like arrow keys)
    pub fn navigation() -> Self {
        Self::Repeatable {
            initial_delay: Duration::from_millis(500),
            repeat_interval: Duration::from_millis(50),
        }
    }

    /// Fast navigation (for PageUp/PageDown)
    pub fn fast_navigation() -> Self {
        Self::Repeatable {
            initial_delay: Duration::from_millis(300),
            repeat_interval: Duration::from_millis(30),
        }
    }
}

/// Tracks the state of a single key
#[derive(Debug)]
struct KeyState {
    /// Whether the key is currently pressed
    is_pressed: bool,
    /// When the key was first pressed
    press_started: Option<Instant>,
    /// When the action was last triggered
    last_triggered: Option<Instant>,
}

impl KeyState {
    fn new() -> Self {
        Self {
            is_pressed: false,
            press_started: None,
            last_triggered: None,
        }
    }

    /// Reset state when key is released
    fn release(&mut self) {
        self.is_pressed = false;
        self.press_started = None;
        self.last_triggered = None;
    }
}

/// Input handler that manages key behaviors
pub struct InputHandler {
    /// Map of key code to its current state
    key_states: HashMap<KeyCode, KeyState>,
    /// Map of key code to its behavior configuration
    key_behaviors: HashMap<KeyCode, KeyBehavior>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            key_states: HashMap::new(),
            key_behaviors: HashMap::new(),
        }
    }

    /// Configure a key's behavior
    pub fn configure_key(&mut self, key: KeyCode, behavior: KeyBehavior) {
        self.key_behaviors.insert(key, behavior);
    }

    /// Configure multiple keys with the same behavior
    pub fn configure_keys(&mut self, keys: &[KeyCode], behavior: KeyBehavior) {
        for key in keys {
            self.configure_key(*key, behavior);
        }
    }

    /// Handle a key press event
    /// Returns true if the action should be triggered
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        let now = Instant::now();
        let behavior = self
            .key_behaviors
            .get(&key)
            .copied()
            .unwrap_or(KeyBehavior::StateChange);

        let state = self.key_states.entry(key).or_insert_with(KeyState::new);

        // If key was already pressed, check if we should repeat
        if state.is_pressed {
            match behavior {
                KeyBehavior::StateChange => {
                    // Debounce: only trigger if enough time passed since last trigger
                    // This handles terminals that don't send Release events
                    if let Some(last) = state.last_triggered {
                        if now.duration_since(last) >= Duration::from_millis(150) {
                            state.last_triggered = Some(now);
                            return true;
                        }
                    }
                    false
                }
                KeyBehavior::Repeatable {
                    initial_delay,
                    repeat_interval,
                } => {
                    // Check if we should trigger based on timing
                    if let (Some(press_start), Some(last_trigger)) =
                        (state.press_started, state.last_triggered)
                    {
                        let time_since_press = now.duration_since(press_start);
                        let time_since_last = now.duration_since(last_trigger);

                        // After initial delay, repeat at interval
                        if time_since_press >= initial_delay && time_since_last >= repeat_interval {
                            state.last_triggered = Some(now);
                            return true;
                        }
                    }
                    false
                }
            }
        } else {
            // New key press - always trigger
            state.is_pressed = true;
            state.press_started = Some(now);
            state.last_triggered = Some(now);
            true
        }
    }

    /// Handle a key release event
    pub fn handle_key_release(&mut self, key: KeyCode) {
        if let Some(state) = self.key_states.get_mut(&key) {
            state.release();
        }
    }

    /// Get default configuration for common keys
    pub fn with_default_config() -> Self {
        let mut handler = Self::new();

        // Navigation keys - repeatable
        handler.configure_keys(
            &[KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right],
            KeyBehavior::navigation(),
        );

        // Vim keys - repeatable
        handler.configure_keys(
            &[
                KeyCode::Char('j'),
                KeyCode::Char('k'),
                KeyCode::Char('h'),
                KeyCode::Char('l'),
            ],
            KeyBehavior::navigation(),
        );

        // Page navigation - fast repeatable
        handler.configure_keys(
            &[
                KeyCode::PageUp,
                KeyCode::PageDown,
                KeyCode::Home,
                KeyCode::End,
            ],
            KeyBehavior::fast_navigation(),
        );

        // Split divider nudging - repeatable while held
        handler.configure_keys(
            &[KeyCode::Char('['), KeyCode::Char(']')],
            KeyBehavior::navigation(),
        );

        // Action keys - state change only (trigger once per press)
        handler.configure_keys(
            &[
                // Core actions
                KeyCode::Enter,
                KeyCode::Esc,
                KeyCode::Tab,
                KeyCode::BackTab,
                KeyCode::Char(' '),
                // Quit
                KeyCode::Char('q'),
                KeyCode::Char('Q'),
                // Panels
                KeyCode::Char('/'),
                KeyCode::Char('c'),
                KeyCode::Char('L'),
                KeyCode::Char('='),
                // Datasheet: open / copy link
                KeyCode::Char('o'),
                KeyCode::Char('y'),
                // Help
                KeyCode::Char('?'),
                KeyCode::F(1),
            ],
            KeyBehavior::StateChange,
        );

        handler
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Single-line text buffer with a byte-offset cursor kept on char boundaries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character at the cursor position
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor
    pub fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete the character at the cursor
    pub fn delete_char_at(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.text.drain(self.cursor..self.cursor + c.len_utf8());
        }
    }

    pub fn move_left(&mut self) {
        if let Some((i, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = i;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace the contents, cursor at the end
    #[cfg(test)]
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    /// Display columns left of the cursor
    pub fn cursor_column(&self) -> usize {
        unicode_width::UnicodeWidthStr::width(&self.text[..self.cursor])
    }
}
