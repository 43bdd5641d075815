// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. context::ContextOptions)
    clippy::module_name_repetitions
)]

//! # Snapcard
//!
//! Selection resolution and anchoring for turning page text into flashcards.
//!
//! Given a document tree and a raw selection, snapcard:
//! - Snaps the selection out to whole words
//! - Detects overlap with spans captured earlier
//! - Pulls surrounding context for the flashcard back side
//! - Places the floating capture panel next to the selection
//!
//! ## Architecture
//!
//! The engine functions are stateless and take the [`document::Tree`] they
//! read from. The capture session on top uses The Elm Architecture (TEA):
//! - **Model**: Pending capture, saved captures, toasts
//! - **Message**: Pointer and panel events
//! - **Update**: Pure state transitions
//!
//! ## Modules
//!
//! - [`document`]: Arena document tree and markdown loader
//! - [`selection`]: Positions, boundary expansion, normalization, overlap
//! - [`context`]: Context extraction and sentence splitting
//! - [`ui`]: Panel anchoring geometry
//! - [`app`]: Capture session state
//! - [`config`]: Flags and rc files
//! - [`perf`]: Timing and event log

pub mod app;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod perf;
pub mod selection;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{Message, Model, update};
    pub use crate::context::{
        ContextOptions, Notifier, PunctuationSentenceSplitter, SentenceSplitter, extract_context,
    };
    pub use crate::document::{ContainerKind, NodeId, Tree, parse};
    pub use crate::error::CaptureError;
    pub use crate::selection::{
        Position, Selection, expand_to_word_boundary, normalize_selection_boundaries,
        selections_overlap,
    };
    pub use crate::ui::anchor::{
        AnchorPoint, PanelSize, Rect, ViewportMetrics, anchor_position,
    };
}
