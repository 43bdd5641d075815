//! Selection resolution.
//!
//! Provides:
//! - [`Position`] and [`Selection`] over a [`Tree`](crate::document::Tree)
//! - Absolute offset mapping under an ancestor container
//! - Word boundary expansion and selection normalization
//! - Half-open overlap tests used to toggle captured spans

mod boundary;
mod normalize;
mod overlap;
mod position;

pub use boundary::{Direction, PUNCTUATION, expand_to_word_boundary, is_separator};
pub use normalize::normalize_selection_boundaries;
pub use overlap::selections_overlap;
pub use position::{
    Affinity, Position, Selection, absolute_offset, absolute_offsets, compare_positions,
    position_at, selection_text,
};
