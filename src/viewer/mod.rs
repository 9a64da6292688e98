//! Viewer core: everything the TUI drives, none of it drawing code
//!
//! ```text
//! key/mouse ──▶ SessionState ──LoadRequest──▶ DataLoader (tokio task)
//!                    ▲                               │
//!                    └──────── ViewerEvent (mpsc) ◀──┘
//! ```
//!
//! - [`search`] - suggestion filtering and dropdown state
//! - [`split`] - draggable split ratio
//! - [`rules`] - grouping and collapse state for design rules
//! - [`pins`] - pin table payload parsing
//! - [`session`] - the observable state that ties them together
//! - [`loader`] - part → checklist → rules → signed URL sequencing

pub mod loader;
pub mod pins;
pub mod rules;
pub mod search;
pub mod session;
pub mod split;

pub use loader::DataLoader;
pub use session::{LoadRequest, PdfPane, SessionChange, SessionState};
