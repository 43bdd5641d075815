//! Core document types.

use serde::Serialize;
use thiserror::Error;

use super::tree::NodeId;

/// What a container node represents on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Document,
    Article,
    Section,
    Heading(u8),
    Paragraph,
    BlockQuote,
    List,
    ListItem,
    Table,
    TableRow,
    TableCell,
    /// Fenced or indented code block
    CodeBlock,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    /// Inline code span
    Code,
    /// Generic inline wrapper
    Span,
    /// Form field or other user-editable region
    Editable,
}

impl ContainerKind {
    /// Block-level kinds start a new line of rendered text.
    pub const fn is_block(self) -> bool {
        !matches!(
            self,
            Self::Emphasis
                | Self::Strong
                | Self::Strikethrough
                | Self::Link
                | Self::Code
                | Self::Span
        )
    }

    /// Whether text selected inside this kind may be captured.
    pub const fn accepts_capture(self) -> bool {
        !matches!(self, Self::CodeBlock | Self::Code | Self::Editable)
    }

    /// Human readable name used in notifications.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Article => "article",
            Self::Section => "section",
            Self::Heading(_) => "heading",
            Self::Paragraph => "paragraph",
            Self::BlockQuote => "block quote",
            Self::List => "list",
            Self::ListItem => "list item",
            Self::Table => "table",
            Self::TableRow => "table row",
            Self::TableCell => "table cell",
            Self::CodeBlock => "code block",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong text",
            Self::Strikethrough => "struck-through text",
            Self::Link => "link",
            Self::Code => "inline code",
            Self::Span => "inline text",
            Self::Editable => "editable field",
        }
    }
}

/// Errors raised when mutating a [`Tree`](super::Tree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("node {0} is a leaf and cannot hold children")]
    LeafParent(NodeId),
    #[error("node {0} is not a text leaf")]
    NotALeaf(NodeId),
    #[error("the root node cannot be removed")]
    RemoveRoot,
    #[error("tree has no room for more nodes")]
    Full,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_kinds_are_not_blocks() {
        assert!(!ContainerKind::Emphasis.is_block());
        assert!(!ContainerKind::Link.is_block());
        assert!(ContainerKind::Paragraph.is_block());
        assert!(ContainerKind::Heading(2).is_block());
    }

    #[test]
    fn test_code_and_editable_reject_capture() {
        assert!(!ContainerKind::CodeBlock.accepts_capture());
        assert!(!ContainerKind::Code.accepts_capture());
        assert!(!ContainerKind::Editable.accepts_capture());
        assert!(ContainerKind::Paragraph.accepts_capture());
        assert!(ContainerKind::Strong.accepts_capture());
    }
}
