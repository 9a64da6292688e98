// Events that flow from loader tasks back to the viewer
//
// Every per-part event carries the selection token captured when its load
// chain started. The session drops events whose token is no longer current,
// so a slow response for an earlier pick can never overwrite a later one.

use crate::catalog::{Part, PartSummary, Rule};
use std::time::Duration;

/// Identifies one selection; increases with every new pick
pub type SelectionToken = u64;

/// Results published by the data loader
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// Startup part listing succeeded
    PartsListed { parts: Vec<PartSummary> },

    /// Startup part listing failed (list stays empty)
    PartsListFailed { message: String },

    /// Part, checklist and rules all resolved
    PartDataLoaded {
        token: SelectionToken,
        part: Part,
        rules: Vec<Rule>,
        elapsed: Duration,
    },

    /// Part, checklist or rules lookup failed
    PartDataFailed {
        token: SelectionToken,
        message: String,
    },

    /// Signed datasheet URL is available
    PdfUrlReady {
        token: SelectionToken,
        url: String,
        elapsed: Duration,
    },

    /// Signed datasheet URL could not be obtained
    PdfUrlFailed {
        token: SelectionToken,
        message: String,
    },
}

impl ViewerEvent {
    /// Selection the event belongs to (`None` for list events)
    pub fn token(&self) -> Option<SelectionToken> {
        match self {
            ViewerEvent::PartsListed { .. } | ViewerEvent::PartsListFailed { .. } => None,
            ViewerEvent::PartDataLoaded { token, .. }
            | ViewerEvent::PartDataFailed { token, .. }
            | ViewerEvent::PdfUrlReady { token, .. }
            | ViewerEvent::PdfUrlFailed { token, .. } => Some(*token),
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ViewerEvent::PartsListed { .. } => "PartsListed",
            ViewerEvent::PartsListFailed { .. } => "PartsListFailed",
            ViewerEvent::PartDataLoaded { .. } => "PartDataLoaded",
            ViewerEvent::PartDataFailed { .. } => "PartDataFailed",
            ViewerEvent::PdfUrlReady { .. } => "PdfUrlReady",
            ViewerEvent::PdfUrlFailed { .. } => "PdfUrlFailed",
        }
    }
}

/// Counters for the status bar
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub part_loads: usize,
    pub failed_part_loads: usize,
    pub url_fetches: usize,
    pub failed_url_fetches: usize,
    /// Results dropped because a newer selection was made
    pub stale_discarded: usize,
    pub total_load_time: Duration,
}

impl LoadStats {
    pub fn avg_load_time(&self) -> Duration {
        if self.part_loads == 0 {
            Duration::default()
        } else {
            self.total_load_time / self.part_loads as u32
        }
    }
}
