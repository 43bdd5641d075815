//! Overlap tests between two selections.

use crate::document::{NodeId, Tree};
use crate::error::CaptureError;

use super::position::{Selection, absolute_offsets};

/// Whether `a` and `b` share at least one character.
///
/// Both selections are mapped to absolute offsets under a container holding
/// all four endpoints and compared as half-open intervals, so selections that
/// merely touch do not overlap. Anything that cannot be mapped (different
/// trees, removed leaves) counts as no overlap.
pub fn selections_overlap(tree: &Tree, a: &Selection, b: &Selection) -> bool {
    match overlap_intervals(tree, a, b) {
        Ok(Some(((a_start, a_end), (b_start, b_end)))) => a_start < b_end && b_start < a_end,
        Ok(None) => false,
        Err(err) => {
            tracing::debug!(%err, "treating selections as disjoint");
            false
        }
    }
}

type Interval = (usize, usize);

fn overlap_intervals(
    tree: &Tree,
    a: &Selection,
    b: &Selection,
) -> Result<Option<(Interval, Interval)>, CaptureError> {
    let Some(ancestor) = shared_container(tree, a, b) else {
        return Ok(None);
    };
    let positions = [a.start, a.end, b.start, b.end];
    let offsets = absolute_offsets(tree, ancestor, &positions);
    let mut mapped = [0; 4];
    for ((slot, offset), position) in mapped.iter_mut().zip(offsets).zip(positions) {
        *slot = offset.ok_or(CaptureError::NotFoundInAncestor {
            node: position.leaf,
            ancestor,
        })?;
    }
    let [a_start, a_end, b_start, b_end] = mapped;
    Ok(Some((
        (a_start.min(a_end), a_start.max(a_end)),
        (b_start.min(b_end), b_start.max(b_end)),
    )))
}

/// Climb from `a`'s common container until it also holds `b`'s endpoints.
fn shared_container(tree: &Tree, a: &Selection, b: &Selection) -> Option<NodeId> {
    let natural = tree.common_container(a.start.leaf, a.end.leaf)?;
    tree.ancestors(natural)
        .find(|id| tree.contains(*id, b.start.leaf) && tree.contains(*id, b.end.leaf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContainerKind;
    use crate::selection::position::Position;

    const PARAGRAPH: &str = "We needed to find good naming for things";

    fn paragraph() -> (Tree, NodeId) {
        let mut tree = Tree::new(ContainerKind::Document);
        let para = tree
            .append_container(tree.root(), ContainerKind::Paragraph)
            .unwrap();
        let leaf = tree.append_leaf(para, PARAGRAPH).unwrap();
        (tree, leaf)
    }

    fn span(leaf: NodeId, phrase: &str) -> Selection {
        let start = PARAGRAPH.find(phrase).unwrap();
        Selection::in_leaf(leaf, start, start + phrase.len())
    }

    #[test]
    fn test_shared_words_overlap() {
        let (tree, leaf) = paragraph();
        let a = span(leaf, "We needed");
        let b = span(leaf, "needed to find");
        assert!(selections_overlap(&tree, &a, &b));
    }

    #[test]
    fn test_disjoint_phrases_do_not_overlap() {
        let (tree, leaf) = paragraph();
        let a = span(leaf, "good naming");
        let b = span(leaf, "We needed");
        assert!(!selections_overlap(&tree, &a, &b));
    }

    #[test]
    fn test_touching_selections_do_not_overlap() {
        let (tree, leaf) = paragraph();
        let a = Selection::in_leaf(leaf, 0, 9);
        let b = Selection::in_leaf(leaf, 9, 12);
        assert!(!selections_overlap(&tree, &a, &b));
        assert!(!selections_overlap(&tree, &b, &a));
    }

    #[test]
    fn test_containment_overlaps() {
        let (tree, leaf) = paragraph();
        let outer = span(leaf, "needed to find good");
        let inner = span(leaf, "find");
        assert!(selections_overlap(&tree, &outer, &inner));
        assert!(selections_overlap(&tree, &inner, &outer));
    }

    #[test]
    fn test_overlap_across_paragraphs_climbs_to_shared_ancestor() {
        let mut tree = Tree::new(ContainerKind::Document);
        let p1 = tree
            .append_container(tree.root(), ContainerKind::Paragraph)
            .unwrap();
        let first = tree.append_leaf(p1, "alpha beta").unwrap();
        let p2 = tree
            .append_container(tree.root(), ContainerKind::Paragraph)
            .unwrap();
        let second = tree.append_leaf(p2, "gamma delta").unwrap();

        let spanning = Selection::new(Position::new(first, 6), Position::new(second, 5));
        let in_second = Selection::in_leaf(second, 0, 5);
        let in_first = Selection::in_leaf(first, 0, 5);
        assert!(selections_overlap(&tree, &in_second, &spanning));
        assert!(!selections_overlap(&tree, &in_first, &spanning));
    }

    #[test]
    fn test_separate_trees_never_overlap() {
        let (tree, leaf) = paragraph();
        let (other, other_leaf) = paragraph();
        let a = span(leaf, "We needed");
        // Same ids, but one of them was removed from this tree.
        let mut pruned = other;
        pruned.remove(other_leaf).unwrap();
        assert!(selections_overlap(&tree, &a, &a));
        assert!(!selections_overlap(&pruned, &a, &a));
    }

    #[test]
    fn test_stale_offset_never_overlaps() {
        let (mut tree, leaf) = paragraph();
        let a = span(leaf, "naming for things");
        let b = span(leaf, "for");
        tree.set_text(leaf, "We needed").unwrap();
        assert!(!selections_overlap(&tree, &a, &b));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overlap_is_symmetric(
                a in 0..=40usize,
                b in 0..=40usize,
                c in 0..=40usize,
                d in 0..=40usize,
            ) {
                let (tree, leaf) = paragraph();
                let first = Selection::in_leaf(leaf, a, b);
                let second = Selection::in_leaf(leaf, c, d);
                prop_assert_eq!(
                    selections_overlap(&tree, &first, &second),
                    selections_overlap(&tree, &second, &first)
                );
            }
        }
    }
}
