// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use crate::NodeId;

/// Errors returned by [`SceneHost`](crate::SceneHost) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// No element constructor is registered for the tag.
    #[error("unknown element type `{0}`")]
    UnknownElement(String),
    /// The node does not exist (never created, or already destroyed).
    #[error("node {0:?} does not exist")]
    MissingNode(NodeId),
    /// `child` is not a child of `parent`.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node that was not found among its children.
        child: NodeId,
    },
    /// Appending `child` under `parent` would make a node its own ancestor.
    #[error("appending {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// The requested parent.
        parent: NodeId,
        /// The requested child.
        child: NodeId,
    },
}
