//! Context extraction around a selection.
//!
//! Short selections (a word or a phrase) get the largest enclosing block
//! whose text stays under a length cap, so a flashcard shows the word in its
//! sentence or paragraph. Longer selections already carry their own context
//! and only get their immediate block.

mod sentences;

pub use sentences::{PunctuationSentenceSplitter, SentenceSplitter};

use crate::document::{NodeId, Tree, collapse_whitespace};
use crate::error::CaptureError;
use crate::selection::{Selection, selection_text};

/// Selections with at most this many words take the climbing path.
pub const WORD_THRESHOLD: usize = 5;
/// Upper bound, in chars, for context gathered by climbing.
pub const MAX_CONTEXT_LENGTH: usize = 600;

/// Tunables for [`extract_context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    pub word_threshold: usize,
    pub max_length: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            word_threshold: WORD_THRESHOLD,
            max_length: MAX_CONTEXT_LENGTH,
        }
    }
}

/// Reports a capture problem to the user.
pub trait Notifier {
    fn notify(&mut self, problem: &CaptureError);
}

/// Context text for `selection`, or `None` when there is none to give.
///
/// Selections inside kinds that may not be captured are reported through
/// `notifier`; stale selections are dropped silently.
pub fn extract_context(
    tree: &Tree,
    selection: &Selection,
    options: &ContextOptions,
    splitter: &dyn SentenceSplitter,
    notifier: &mut dyn Notifier,
) -> Option<String> {
    match resolve_context(tree, selection, options, splitter) {
        Ok(context) => Some(context),
        Err(err @ CaptureError::UnsupportedSelectionKind { .. }) => {
            tracing::warn!(%err, "rejecting selection");
            notifier.notify(&err);
            None
        }
        Err(err) => {
            tracing::debug!(%err, "no context for selection");
            None
        }
    }
}

/// Like [`extract_context`], but hands every failure back to the caller.
///
/// # Errors
/// [`CaptureError::UnsupportedSelectionKind`] when the selection's common
/// container may not be captured, [`CaptureError::StaleTreeReference`] when
/// an endpoint no longer resolves.
pub fn resolve_context(
    tree: &Tree,
    selection: &Selection,
    options: &ContextOptions,
    splitter: &dyn SentenceSplitter,
) -> Result<String, CaptureError> {
    let stale = || CaptureError::StaleTreeReference {
        node: selection.start.leaf,
    };
    let selected = selection_text(tree, selection).ok_or_else(stale)?;
    let container = tree
        .common_container(selection.start.leaf, selection.end.leaf)
        .ok_or_else(stale)?;
    let kind = tree.container_kind(container).ok_or_else(stale)?;
    if !kind.accepts_capture() {
        return Err(CaptureError::UnsupportedSelectionKind { kind });
    }

    let words = selected.split_whitespace().count();
    if words > options.word_threshold {
        let block = tree.nearest_block(container).unwrap_or(container);
        return tree.normalized_text(block).ok_or_else(stale);
    }
    climb(tree, container, &selected, options, splitter).ok_or_else(stale)
}

/// Walk up from `container`, keeping the last ancestor text under the cap.
fn climb(
    tree: &Tree,
    container: NodeId,
    selected: &str,
    options: &ContextOptions,
    splitter: &dyn SentenceSplitter,
) -> Option<String> {
    let mut accepted: Option<String> = None;
    for ancestor in tree.ancestors(container) {
        let candidate = tree.normalized_text(ancestor)?;
        if candidate.chars().count() < options.max_length {
            accepted = Some(candidate);
            continue;
        }
        if accepted.is_none() {
            // Even the innermost block is too long: cut it down to the
            // sentences around the selection instead.
            tracing::debug!(%ancestor, "refining oversized context");
            return Some(refine_excerpt(&candidate, selected, options.max_length, splitter));
        }
        break;
    }
    accepted
}

/// Sentences around `selected`, grown alternately forward and backward while
/// the excerpt fits in `max_length` chars.
///
/// A single sentence longer than the cap is returned whole.
pub fn refine_excerpt(
    text: &str,
    selected: &str,
    max_length: usize,
    splitter: &dyn SentenceSplitter,
) -> String {
    let sentences = splitter.split(text);
    if sentences.is_empty() {
        return text.chars().take(max_length).collect();
    }

    let needle = collapse_whitespace(selected);
    let first_word = needle.split(' ').next().unwrap_or_default();
    let anchor = sentences
        .iter()
        .position(|sentence| sentence.contains(&needle))
        .or_else(|| sentences.iter().position(|sentence| sentence.contains(first_word)))
        .unwrap_or(0);

    let lengths: Vec<usize> = sentences.iter().map(|s| s.chars().count()).collect();
    let (mut lo, mut hi) = (anchor, anchor);
    let mut length = lengths[anchor];
    loop {
        let mut grew = false;
        if let Some(next) = lengths.get(hi + 1)
            && length + 1 + next <= max_length
        {
            hi += 1;
            length += 1 + next;
            grew = true;
        }
        if lo > 0 && length + 1 + lengths[lo - 1] <= max_length {
            lo -= 1;
            length += 1 + lengths[lo];
            grew = true;
        }
        if !grew {
            break;
        }
    }
    sentences[lo..=hi].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContainerKind;
    use crate::selection::Position;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Notifier for Recorder {
        fn notify(&mut self, problem: &CaptureError) {
            self.0.push(problem.to_string());
        }
    }

    fn context_of(tree: &Tree, selection: &Selection) -> (Option<String>, Recorder) {
        let mut recorder = Recorder::default();
        let context = extract_context(
            tree,
            selection,
            &ContextOptions::default(),
            &PunctuationSentenceSplitter,
            &mut recorder,
        );
        (context, recorder)
    }

    fn filler(len: usize) -> String {
        "Lorem ipsum dolor sit amet. ".repeat(len / 28 + 1)[..len].to_string()
    }

    #[test]
    fn test_short_selection_stops_before_oversized_parent() {
        let mut tree = Tree::new(ContainerKind::Document);
        let article = tree
            .append_container(tree.root(), ContainerKind::Article)
            .unwrap();
        let para = tree.append_container(article, ContainerKind::Paragraph).unwrap();
        let text = "The quick brown fox jumps over the sleeping dog.";
        let leaf = tree.append_leaf(para, text).unwrap();
        let rest = tree.append_container(article, ContainerKind::Paragraph).unwrap();
        tree.append_leaf(rest, filler(1950)).unwrap();

        let selection = Selection::in_leaf(leaf, 4, 19);
        let (context, recorder) = context_of(&tree, &selection);
        assert_eq!(context.as_deref(), Some(text));
        assert!(recorder.0.is_empty());
    }

    #[test]
    fn test_short_selection_climbs_to_largest_fitting_ancestor() {
        let mut tree = Tree::new(ContainerKind::Document);
        let article = tree
            .append_container(tree.root(), ContainerKind::Article)
            .unwrap();
        let para = tree.append_container(article, ContainerKind::Paragraph).unwrap();
        let em = tree.append_container(para, ContainerKind::Emphasis).unwrap();
        let leaf = tree.append_leaf(em, "vivid").unwrap();
        tree.append_leaf(para, " colours").unwrap();
        let second = tree.append_container(article, ContainerKind::Paragraph).unwrap();
        tree.append_leaf(second, "Another   paragraph.").unwrap();

        let selection = Selection::in_leaf(leaf, 0, 5);
        let (context, _) = context_of(&tree, &selection);
        assert_eq!(context.as_deref(), Some("vivid colours Another paragraph."));
    }

    #[test]
    fn test_oversized_first_container_is_refined_to_sentences() {
        let mut tree = Tree::new(ContainerKind::Document);
        let para = tree
            .append_container(tree.root(), ContainerKind::Paragraph)
            .unwrap();
        let mut text = String::new();
        for i in 0..40 {
            text.push_str(&format!("Sentence number {i} talks about things. "));
        }
        text.push_str("Here lies the target word. ");
        for i in 40..80 {
            text.push_str(&format!("Sentence number {i} talks about things. "));
        }
        let leaf = tree.append_leaf(para, text.as_str()).unwrap();
        let start = text.find("target").unwrap();
        let selection = Selection::in_leaf(leaf, start, start + 6);

        let (context, _) = context_of(&tree, &selection);
        let context = context.unwrap();
        assert!(context.contains("Here lies the target word."));
        assert!(context.chars().count() <= MAX_CONTEXT_LENGTH);
        assert!(context.ends_with('.'));
        assert!(context.starts_with("Sentence number"));
    }

    #[test]
    fn test_long_selection_uses_immediate_block_only() {
        let mut tree = Tree::new(ContainerKind::Document);
        let para = tree
            .append_container(tree.root(), ContainerKind::Paragraph)
            .unwrap();
        let strong = tree.append_container(para, ContainerKind::Strong).unwrap();
        let leaf = tree
            .append_leaf(strong, "one two three four five six seven")
            .unwrap();
        tree.append_leaf(para, " tail").unwrap();
        let sibling = tree
            .append_container(tree.root(), ContainerKind::Paragraph)
            .unwrap();
        tree.append_leaf(sibling, "unrelated").unwrap();

        let selection = Selection::in_leaf(leaf, 0, 27);
        let (context, _) = context_of(&tree, &selection);
        assert_eq!(
            context.as_deref(),
            Some("one two three four five six seven tail")
        );
    }

    #[test]
    fn test_code_block_selection_is_rejected_and_reported() {
        let tree = crate::document::parse("```\nlet answer = 42;\n```").unwrap();
        let block = tree.children(tree.root())[0];
        let leaf = tree.children(block)[0];
        let selection = Selection::in_leaf(leaf, 4, 10);

        let (context, recorder) = context_of(&tree, &selection);
        assert_eq!(context, None);
        assert_eq!(recorder.0, vec!["text inside a code block cannot be captured"]);
    }

    #[test]
    fn test_stale_selection_yields_nothing_quietly() {
        let mut tree = Tree::new(ContainerKind::Document);
        let para = tree
            .append_container(tree.root(), ContainerKind::Paragraph)
            .unwrap();
        let leaf = tree.append_leaf(para, "fleeting words").unwrap();
        let selection = Selection::new(Position::new(leaf, 0), Position::new(leaf, 8));
        tree.remove(para).unwrap();

        let (context, recorder) = context_of(&tree, &selection);
        assert_eq!(context, None);
        assert!(recorder.0.is_empty());
    }

    #[test]
    fn test_refine_excerpt_returns_long_sentence_whole() {
        let sentence = format!("{} end.", "word ".repeat(200));
        let excerpt = refine_excerpt(&sentence, "word", 100, &PunctuationSentenceSplitter);
        assert_eq!(excerpt, sentence.trim());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn climbed_context_stays_under_cap(
                first_len in 10..500usize,
                sibling_lens in proptest::collection::vec(1..400usize, 0..6),
            ) {
                let mut tree = Tree::new(ContainerKind::Document);
                let article = tree
                    .append_container(tree.root(), ContainerKind::Article)
                    .unwrap();
                let para = tree.append_container(article, ContainerKind::Paragraph).unwrap();
                let leaf = tree.append_leaf(para, filler(first_len)).unwrap();
                for len in sibling_lens {
                    let sibling = tree.append_container(article, ContainerKind::Paragraph).unwrap();
                    tree.append_leaf(sibling, filler(len)).unwrap();
                }
                let selection = Selection::in_leaf(leaf, 0, 5);
                let (context, _) = context_of(&tree, &selection);
                let context = context.unwrap();
                prop_assert!(context.chars().count() < MAX_CONTEXT_LENGTH);
            }
        }
    }
}
