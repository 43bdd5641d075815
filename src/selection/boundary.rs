//! Word boundary expansion within a single leaf.

/// Punctuation that ends a word alongside whitespace.
pub const PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?'];

/// Which way to widen an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the text (selection starts).
    Backward,
    /// Towards the end of the text (selection ends).
    Forward,
}

/// True for whitespace and the word-ending punctuation set.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION.contains(&c)
}

/// Widen `offset` (in chars) to the nearest word boundary in `text`.
///
/// The scan moves one char at a time until it meets a separator or the end
/// of the string, then steps back over any separators sitting right at the
/// boundary, so the selected span never starts or ends on one. Text made
/// only of separators leaves `offset` untouched, as does an offset past the
/// end of the text.
///
/// # Example
///
/// ```
/// use snapcard::selection::{Direction, expand_to_word_boundary};
///
/// let text = "Hello beautiful world";
/// assert_eq!(expand_to_word_boundary(text, 8, Direction::Backward), 6);
/// assert_eq!(expand_to_word_boundary(text, 13, Direction::Forward), 15);
/// ```
pub fn expand_to_word_boundary(text: &str, offset: usize, direction: Direction) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if offset > len || chars.iter().all(|c| is_separator(*c)) {
        return offset;
    }

    let mut index = offset;
    match direction {
        Direction::Backward => {
            while index > 0 && !is_separator(chars[index - 1]) {
                index -= 1;
            }
            while index < len && is_separator(chars[index]) {
                index += 1;
            }
        }
        Direction::Forward => {
            while index < len && !is_separator(chars[index]) {
                index += 1;
            }
            while index > 0 && is_separator(chars[index - 1]) {
                index -= 1;
            }
        }
    }
    index
}
