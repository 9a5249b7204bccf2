// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use plinth_core::{NodeId, SceneError};
use plinth_layout::LayoutError;

/// Errors raised while laying out containers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoxError {
    /// The container's attributes hold an invalid or unsupported layout configuration.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// The scene rejected a read or write.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// The node is not registered as a container in the [`LayoutTree`](crate::LayoutTree).
    #[error("node {0:?} is not a layout container")]
    UnknownContainer(NodeId),
}
