//! Capture session state.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Model`]: Pending selection, captured spans, and toasts
//! - [`Message`]: Pointer and panel events coming from the page
//! - [`update`]: Pure function for state transitions

mod model;
mod update;

pub use model::{Capture, Model, PendingCapture, ToastLevel};
pub use update::{Message, update};
