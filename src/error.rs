//! Failure taxonomy for selection capture.
//!
//! None of these are fatal. Engine entry points recover from them locally
//! and hand back a fallback value; the variants exist so the recovery sites
//! can log what happened and so [`Notifier`](crate::context::Notifier)
//! implementations get a readable message.

use thiserror::Error;

use crate::document::{ContainerKind, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The selection sits inside a node kind that may not be captured.
    #[error("text inside a {} cannot be captured", kind.label())]
    UnsupportedSelectionKind { kind: ContainerKind },

    /// A position refers to a node that no longer exists (or whose text
    /// shrank underneath it).
    #[error("node {node} is no longer part of the document")]
    StaleTreeReference { node: NodeId },

    /// A position's leaf is not inside the ancestor it was mapped against.
    #[error("node {node} is not inside ancestor {ancestor}")]
    NotFoundInAncestor { node: NodeId, ancestor: NodeId },
}
