// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use kurbo::Rect;
use plinth_core::NodeId;
use plinth_layout::Spacing;

use crate::Throttle;

/// Box-model state of one container node.
///
/// The flex configuration itself lives on the node as attributes; the container holds what the
/// scene does not: margin, padding and the pass throttle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxContainer {
    node: NodeId,
    margin: Spacing,
    padding: Spacing,
    throttle: Throttle,
}

impl BoxContainer {
    /// Creates a container for `node` with no margin or padding and the default throttle.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            margin: Spacing::ZERO,
            padding: Spacing::ZERO,
            throttle: Throttle::default(),
        }
    }

    /// Sets the margin (see [`BoxContainer::set_margin`]).
    #[must_use]
    pub fn with_margin(mut self, margin: impl Into<Spacing>) -> Self {
        self.set_margin(margin);
        self
    }

    /// Sets the padding (see [`BoxContainer::set_padding`]).
    #[must_use]
    pub fn with_padding(mut self, padding: impl Into<Spacing>) -> Self {
        self.set_padding(padding);
        self
    }

    /// Replaces the throttle with one using `window`.
    #[must_use]
    pub fn with_throttle_window(mut self, window: Duration) -> Self {
        self.throttle = Throttle::new(window);
        self
    }

    /// The scene node this container lays out.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Space outside the container, reported by [`LayoutTree::outer_bbox`].
    ///
    /// [`LayoutTree::outer_bbox`]: crate::LayoutTree::outer_bbox
    pub fn margin(&self) -> Spacing {
        self.margin
    }

    /// Space between the container edge and its children.
    pub fn padding(&self) -> Spacing {
        self.padding
    }

    /// Sets the margin from any shorthand form (`4.0`, `[4.0, 8.0]`, ...).
    pub fn set_margin(&mut self, margin: impl Into<Spacing>) {
        self.margin = margin.into();
    }

    /// Sets the padding from any shorthand form.
    pub fn set_padding(&mut self, padding: impl Into<Spacing>) {
        self.padding = padding.into();
    }

    /// The pass throttle.
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    pub(crate) fn throttle_mut(&mut self) -> &mut Throttle {
        &mut self.throttle
    }

    /// The space children are laid out in, for a container of `width` by `height`.
    pub fn available(&self, width: f64, height: f64) -> Rect {
        self.padding
            .shrink(Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0)))
    }

    /// Grows a container's own bounds by its margin.
    pub fn outer(&self, bbox: Rect) -> Rect {
        self.margin.grow(bbox)
    }
}
