//! Snapping selections to whole words.

use std::cmp::Ordering;

use crate::document::Tree;
use crate::error::CaptureError;

use super::boundary::{Direction, expand_to_word_boundary};
use super::position::{Position, Selection, compare_positions};

/// Expand both ends of `selection` outward to word boundaries.
///
/// Each end is expanded inside its own leaf only; a word that continues into
/// a neighbouring leaf is not followed. Reversed selections are put into
/// document order first. Collapsed selections, selections anchored on
/// containers and stale positions are returned unchanged. A span holding
/// nothing but separators collapses to an empty selection.
pub fn normalize_selection_boundaries(tree: &Tree, selection: &Selection) -> Selection {
    match try_normalize(tree, selection) {
        Ok(Some(normalized)) => normalized,
        Ok(None) => *selection,
        Err(err) => {
            tracing::debug!(%err, "keeping selection as captured");
            *selection
        }
    }
}

fn try_normalize(tree: &Tree, selection: &Selection) -> Result<Option<Selection>, CaptureError> {
    for position in [selection.start, selection.end] {
        if !tree.contains_node(position.leaf) {
            return Err(CaptureError::StaleTreeReference {
                node: position.leaf,
            });
        }
    }
    if !tree.is_leaf(selection.start.leaf) || !tree.is_leaf(selection.end.leaf) {
        return Ok(None);
    }
    if selection.is_collapsed() {
        return Ok(None);
    }

    let ordered = selection.ordered(tree).ok_or(CaptureError::StaleTreeReference {
        node: selection.start.leaf,
    })?;
    let start = expand(tree, ordered.start, Direction::Backward)?;
    let end = expand(tree, ordered.end, Direction::Forward)?;

    match compare_positions(tree, start, end) {
        Some(Ordering::Less | Ordering::Equal) => Ok(Some(Selection::new(start, end))),
        // Trimming separators pushed the ends past each other: the selection
        // held nothing but separators.
        Some(Ordering::Greater) => Ok(Some(Selection::new(end, end))),
        None => Err(CaptureError::StaleTreeReference { node: start.leaf }),
    }
}

fn expand(tree: &Tree, position: Position, direction: Direction) -> Result<Position, CaptureError> {
    let stale = CaptureError::StaleTreeReference {
        node: position.leaf,
    };
    let text = tree.leaf_text(position.leaf).ok_or_else(|| stale.clone())?;
    if position.offset > text.chars().count() {
        return Err(stale);
    }
    let offset = expand_to_word_boundary(text, position.offset, direction);
    Ok(Position::new(position.leaf, offset))
}
