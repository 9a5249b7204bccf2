// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::NodeId;

/// A structural mutation recorded by a scene host.
///
/// Hosts queue these as children are inserted or removed; layout containers drain the queue
/// with [`SceneHost::drain_events`](crate::SceneHost::drain_events). Attribute writes do not
/// produce events, so a layout pass never re-triggers itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    /// `child` was appended to `parent` at `index`.
    Inserted {
        /// The node whose child list changed.
        parent: NodeId,
        /// The inserted node.
        child: NodeId,
        /// Position of `child` in the child list after insertion.
        index: usize,
    },
    /// `child` was detached from `parent`.
    Removed {
        /// The node whose child list changed.
        parent: NodeId,
        /// The detached node.
        child: NodeId,
    },
}

impl SceneEvent {
    /// Returns the node whose child list changed.
    pub fn parent(&self) -> NodeId {
        match *self {
            Self::Inserted { parent, .. } | Self::Removed { parent, .. } => parent,
        }
    }

    /// Returns the node that was inserted or removed.
    pub fn child(&self) -> NodeId {
        match *self {
            Self::Inserted { child, .. } | Self::Removed { child, .. } => child,
        }
    }
}
