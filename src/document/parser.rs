//! Markdown loading with comrak.

use anyhow::Result;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, Options, parse_document};

use super::tree::{NodeId, Tree};
use super::types::ContainerKind;

/// Parse markdown source into a text [`Tree`].
///
/// Block and inline elements become containers, text becomes leaves. Soft
/// and hard line breaks turn into single-space leaves so words on adjacent
/// source lines stay apart.
///
/// # Example
///
/// ```
/// let tree = snapcard::document::parse("# Title\n\nSome *brave* words").unwrap();
/// assert_eq!(
///     tree.normalized_text(tree.root()).as_deref(),
///     Some("Title Some brave words")
/// );
/// ```
///
/// # Errors
/// Returns an error if the parsed structure cannot be mirrored into the tree.
pub fn parse(source: &str) -> Result<Tree> {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut tree = Tree::new(ContainerKind::Document);
    let tree_root = tree.root();
    for child in root.children() {
        process_node(child, &mut tree, tree_root)?;
    }
    tracing::debug!(nodes = tree.len(), "parsed markdown tree");
    Ok(tree)
}

fn create_options() -> Options {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options
}

fn process_node<'a>(node: &'a AstNode<'a>, tree: &mut Tree, parent: NodeId) -> Result<()> {
    let kind = match &node.data.borrow().value {
        NodeValue::Text(text) => {
            tree.append_leaf(parent, text.clone())?;
            return Ok(());
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            tree.append_leaf(parent, " ")?;
            return Ok(());
        }
        NodeValue::Code(code) => {
            let span = tree.append_container(parent, ContainerKind::Code)?;
            tree.append_leaf(span, code.literal.clone())?;
            return Ok(());
        }
        NodeValue::CodeBlock(block) => {
            let container = tree.append_container(parent, ContainerKind::CodeBlock)?;
            tree.append_leaf(container, block.literal.clone())?;
            return Ok(());
        }
        NodeValue::HtmlBlock(_) | NodeValue::HtmlInline(_) | NodeValue::ThematicBreak => {
            return Ok(());
        }
        NodeValue::Heading(heading) => Some(ContainerKind::Heading(heading.level)),
        NodeValue::Paragraph => Some(ContainerKind::Paragraph),
        NodeValue::BlockQuote => Some(ContainerKind::BlockQuote),
        NodeValue::List(_) => Some(ContainerKind::List),
        NodeValue::Item(_) => Some(ContainerKind::ListItem),
        NodeValue::Table(_) => Some(ContainerKind::Table),
        NodeValue::TableRow(_) => Some(ContainerKind::TableRow),
        NodeValue::TableCell => Some(ContainerKind::TableCell),
        NodeValue::FootnoteDefinition(_) => Some(ContainerKind::Section),
        NodeValue::Emph => Some(ContainerKind::Emphasis),
        NodeValue::Strong => Some(ContainerKind::Strong),
        NodeValue::Strikethrough => Some(ContainerKind::Strikethrough),
        NodeValue::Link(_) => Some(ContainerKind::Link),
        NodeValue::Image(_) => Some(ContainerKind::Span),
        // Task markers, footnote references and the like carry no text of
        // their own; their children (if any) are hoisted into the parent.
        _ => None,
    };

    let target = match kind {
        Some(kind) => tree.append_container(parent, kind)?,
        None => parent,
    };
    for child in node.children() {
        process_node(child, tree, target)?;
    }
    Ok(())
}
