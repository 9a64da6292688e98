//! Draggable split between the datasheet pane and the details pane
//!
//! The ratio is the left pane's share of the container in percent and
//! always stays within [`MIN_RATIO`, `MAX_RATIO`].

pub const DEFAULT_RATIO: f64 = 50.0;
pub const MIN_RATIO: f64 = 20.0;
pub const MAX_RATIO: f64 = 80.0;

/// Keyboard resize step
pub const NUDGE_STEP: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SplitPane {
    ratio: f64,
    dragging: bool,
}

impl Default for SplitPane {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO,
            dragging: false,
        }
    }
}

fn clamp(ratio: f64) -> f64 {
    ratio.clamp(MIN_RATIO, MAX_RATIO)
}

impl SplitPane {
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer went down on the divider
    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Pointer moved; returns whether the ratio changed
    pub fn drag_to(&mut self, pointer_x: f64, container_left: f64, container_width: f64) -> bool {
        if !self.dragging || container_width <= 0.0 || !pointer_x.is_finite() {
            return false;
        }
        let ratio = clamp((pointer_x - container_left) * 100.0 / container_width);
        let changed = ratio != self.ratio;
        self.ratio = ratio;
        changed
    }

    /// Pointer went up anywhere
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Move the divider by `delta` percentage points
    pub fn nudge(&mut self, delta: f64) -> bool {
        let ratio = clamp(self.ratio + delta);
        let changed = ratio != self.ratio;
        self.ratio = ratio;
        changed
    }

    pub fn reset(&mut self) {
        self.ratio = DEFAULT_RATIO;
    }
}
