// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use kurbo::Rect;

use crate::{NodeId, SceneError, SceneEvent, Value};

/// The capability set Plinth requires from a retained-mode scene graph.
///
/// Layout containers and data joins are written against this trait only. Implementations own
/// painting, hit-testing and animation; none of that is visible here.
pub trait SceneHost {
    /// Creates a detached element for a registered tag.
    ///
    /// Fails with [`SceneError::UnknownElement`] if the tag is not registered.
    fn create_element(&mut self, tag: &str) -> Result<NodeId, SceneError>;

    /// Appends `child` to `parent` (at `index`, or last), detaching it from any previous parent.
    ///
    /// Queues a [`SceneEvent::Inserted`] (and a [`SceneEvent::Removed`] if it was re-parented).
    fn append_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
    ) -> Result<(), SceneError>;

    /// Detaches `child` from `parent`, queueing a [`SceneEvent::Removed`].
    ///
    /// The detached subtree stays alive and can be re-appended.
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError>;

    /// Detaches `node` if attached and drops it together with its descendants.
    fn destroy(&mut self, node: NodeId) -> Result<(), SceneError>;

    /// Returns the parent of `node`, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Returns the children of `node` in paint order (empty for unknown nodes).
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Returns the tag the node was created from, or `None` for unknown nodes.
    fn tag(&self, node: NodeId) -> Option<&str>;

    /// Returns `true` if the node exists.
    fn contains(&self, node: NodeId) -> bool {
        self.tag(node).is_some()
    }

    /// Returns the bounds of `node` and its descendants in the parent's coordinate space.
    ///
    /// The result reflects the current attributes of the whole subtree, so nested layouts must
    /// be resolved before a parent queries its children.
    fn bbox(&self, node: NodeId) -> Result<Rect, SceneError>;

    /// Reads an attribute.
    fn attr(&self, node: NodeId, key: &str) -> Option<&Value>;

    /// Writes an attribute. Does not queue an event.
    fn set_attr(&mut self, node: NodeId, key: &str, value: Value) -> Result<(), SceneError>;

    /// Returns the datum bound to `node`, if any.
    fn datum(&self, node: NodeId) -> Option<&dyn Any>;

    /// Binds (or replaces) the datum of `node`.
    fn bind_datum(&mut self, node: NodeId, datum: Box<dyn Any>) -> Result<(), SceneError>;

    /// Takes all queued mutation events, oldest first.
    fn drain_events(&mut self) -> Vec<SceneEvent>;

    /// Reads a numeric attribute.
    fn attr_f64(&self, node: NodeId, key: &str) -> Option<f64> {
        self.attr(node, key).and_then(Value::as_f64)
    }

    /// Reads a string attribute.
    fn attr_str(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attr(node, key).and_then(Value::as_str)
    }
}
