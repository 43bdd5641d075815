//! Sentence splitting for context refinement.

use std::sync::LazyLock;

use regex::Regex;

/// Terminal punctuation, optional closing quotes or brackets, then whitespace.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]+["'\u{2019}\u{201D})\]]*\s+"#).expect("sentence boundary pattern is valid")
});

/// Splits text into sentences.
pub trait SentenceSplitter {
    /// Sentences of `text` in order, trimmed, without empty entries.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Punctuation-driven splitter good enough for prose on web pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct PunctuationSentenceSplitter;

impl SentenceSplitter for PunctuationSentenceSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut last = 0;
        for boundary in SENTENCE_END.find_iter(text) {
            push_trimmed(&mut sentences, &text[last..boundary.end()]);
            last = boundary.end();
        }
        push_trimmed(&mut sentences, &text[last..]);
        sentences
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
