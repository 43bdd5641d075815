//! Document trees the engine reads from.
//!
//! This module handles:
//! - The arena tree of containers and text leaves
//! - Loading markdown into such a tree with comrak
//! - Rendering subtree text for context extraction

mod parser;
mod tree;
mod types;

pub use parser::parse;
pub use tree::{Ancestors, Leaves, Node, NodeId, NodeKind, Tree, collapse_whitespace};
pub use types::{ContainerKind, TreeError};
