//! Positions, selections and absolute offset mapping.

use std::cmp::Ordering;

use crate::document::{NodeId, Tree};

/// A point inside a leaf's text, counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub leaf: NodeId,
    pub offset: usize,
}

impl Position {
    pub const fn new(leaf: NodeId, offset: usize) -> Self {
        Self { leaf, offset }
    }
}

/// A span of text between two positions, `start` first in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Selection within a single leaf.
    pub const fn in_leaf(leaf: NodeId, start: usize, end: usize) -> Self {
        Self::new(Position::new(leaf, start), Position::new(leaf, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Swap the endpoints if `end` precedes `start` in document order.
    ///
    /// Returns `None` when the order cannot be established, e.g. because one
    /// of the leaves has been removed.
    pub fn ordered(&self, tree: &Tree) -> Option<Self> {
        match compare_positions(tree, self.start, self.end)? {
            Ordering::Greater => Some(Self::new(self.end, self.start)),
            Ordering::Less | Ordering::Equal => Some(*self),
        }
    }
}

/// Which leaf wins when an absolute offset falls exactly between two leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// End of the preceding leaf (selection ends).
    Upstream,
    /// Start of the following leaf (selection starts).
    Downstream,
}

/// Absolute offset of `position` under `ancestor`.
///
/// `None` is the not-found sentinel: the leaf is not in the subtree, no
/// longer exists, or the offset runs past its text. It is never the same as
/// offset zero.
pub fn absolute_offset(tree: &Tree, ancestor: NodeId, position: Position) -> Option<usize> {
    absolute_offsets(tree, ancestor, &[position])
        .pop()
        .flatten()
}

/// Map several positions in one in-order pass over `ancestor`.
///
/// The walk stops as soon as every position has been located.
pub fn absolute_offsets(tree: &Tree, ancestor: NodeId, positions: &[Position]) -> Vec<Option<usize>> {
    let mut found = vec![None; positions.len()];
    let mut pending: Vec<usize> = (0..positions.len()).collect();
    let mut before = 0;
    for leaf in tree.leaves(ancestor) {
        if pending.is_empty() {
            break;
        }
        let len = tree.leaf_len(leaf).unwrap_or(0);
        pending.retain(|&index| {
            let position = positions[index];
            if position.leaf != leaf {
                return true;
            }
            if position.offset <= len {
                found[index] = Some(before + position.offset);
            }
            false
        });
        before += len;
    }
    found
}

/// Resolve an absolute offset under `ancestor` back to a leaf position.
pub fn position_at(
    tree: &Tree,
    ancestor: NodeId,
    absolute: usize,
    affinity: Affinity,
) -> Option<Position> {
    let mut before = 0;
    let mut last = None;
    for leaf in tree.leaves(ancestor) {
        let len = tree.leaf_len(leaf).unwrap_or(0);
        if len == 0 {
            continue;
        }
        let end = before + len;
        let inside = match affinity {
            Affinity::Upstream => absolute <= end,
            Affinity::Downstream => absolute < end,
        };
        if inside && absolute >= before {
            return Some(Position::new(leaf, absolute - before));
        }
        before = end;
        last = Some(Position::new(leaf, len));
    }
    if absolute == before { last } else { None }
}

/// Document order of two positions, `None` if either is stale.
pub fn compare_positions(tree: &Tree, a: Position, b: Position) -> Option<Ordering> {
    let common = tree.common_ancestor(a.leaf, b.leaf)?;
    let offsets = absolute_offsets(tree, common, &[a, b]);
    match offsets.as_slice() {
        [Some(first), Some(second)] => Some(first.cmp(second)),
        _ => None,
    }
}

/// The text covered by a selection, `None` if an endpoint is stale.
pub fn selection_text(tree: &Tree, selection: &Selection) -> Option<String> {
    let Selection { start, end } = selection.ordered(tree)?;
    if start.leaf == end.leaf {
        let text = tree.leaf_text(start.leaf)?;
        return char_slice(text, start.offset, end.offset).map(ToOwned::to_owned);
    }

    let common = tree.common_ancestor(start.leaf, end.leaf)?;
    let mut out = String::new();
    let mut inside = false;
    for leaf in tree.leaves(common) {
        let text = tree.leaf_text(leaf).unwrap_or_default();
        if leaf == start.leaf {
            out.push_str(char_slice(text, start.offset, text.chars().count())?);
            inside = true;
        } else if leaf == end.leaf {
            out.push_str(char_slice(text, 0, end.offset)?);
            return Some(out);
        } else if inside {
            out.push_str(text);
        }
    }
    None
}

/// Slice `text` by char offsets.
pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> Option<&str> {
    if from > to {
        return None;
    }
    let start = byte_index(text, from)?;
    let end = byte_index(text, to)?;
    text.get(start..end)
}

fn byte_index(text: &str, char_offset: usize) -> Option<usize> {
    text.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
}
