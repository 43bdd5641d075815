use std::time::Instant;

use crate::app::Model;
use crate::app::model::{Capture, PendingCapture, ToastLevel};
use crate::context::{PunctuationSentenceSplitter, extract_context};
use crate::document::Tree;
use crate::perf;
use crate::selection::{
    Selection, normalize_selection_boundaries, selection_text, selections_overlap,
};
use crate::ui::anchor::{Rect, ViewportMetrics, anchor_position_with_margin};

/// All events the capture session reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Pointer released over a text selection
    SelectionFinished {
        selection: Selection,
        /// Bounding box of the selection, viewport-relative
        rect: Rect,
        viewport: ViewportMetrics,
    },
    /// The page selection moved while the panel was open
    SelectionChanged,
    /// Save the pending capture
    ConfirmCapture,
    /// Click landed outside the panel
    ClickOutside,
    /// Drop the toast if it has expired by `now`
    Tick(Instant),
}

/// Apply `msg` to `model`, reading page text from `tree`.
pub fn update(mut model: Model, tree: &Tree, msg: Message) -> Model {
    match msg {
        Message::SelectionFinished {
            selection,
            rect,
            viewport,
        } => {
            let _scope = perf::scope("selection_finished");
            model.pending = None;
            if selection.is_collapsed() {
                return model;
            }
            let normalized = normalize_selection_boundaries(tree, &selection);

            let before = model.captures.len();
            model
                .captures
                .retain(|capture| !selections_overlap(tree, &capture.selection, &normalized));
            let removed = before - model.captures.len();
            if removed > 0 {
                tracing::debug!(removed, "toggled captures off");
                model.show_toast(ToastLevel::Info, "Removed from flashcards");
                return model;
            }

            let Some(text) = selection_text(tree, &normalized) else {
                return model;
            };
            if text.trim().is_empty() {
                return model;
            }
            let options = model.context_options;
            let Some(context) = extract_context(
                tree,
                &normalized,
                &options,
                &PunctuationSentenceSplitter,
                &mut model,
            ) else {
                // Rejected or stale: the selection is cleared.
                return model;
            };
            let anchor = anchor_position_with_margin(rect, model.panel, viewport, model.margin);
            perf::log_event("pending", format!("{text:?} at ({}, {})", anchor.x, anchor.y));
            model.pending = Some(PendingCapture {
                selection: normalized,
                text: text.trim().to_string(),
                context: Some(context),
                anchor,
            });
        }
        Message::SelectionChanged | Message::ClickOutside => {
            model.pending = None;
        }
        Message::ConfirmCapture => {
            if let Some(pending) = model.pending.take() {
                model.captures.push(Capture {
                    selection: pending.selection,
                    text: pending.text,
                    context: pending.context,
                });
                model.show_toast(ToastLevel::Info, "Saved to flashcards");
            }
        }
        Message::Tick(now) => {
            model.expire_toast(now);
        }
    }
    model
}
