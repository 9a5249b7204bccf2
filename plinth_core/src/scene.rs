// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory retained scene implementing [`SceneHost`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Circle, Line, Rect, Shape};
use smallvec::SmallVec;

use crate::{
    ElementKind, ElementRegistry, HeuristicTextMeasurer, NodeId, SceneError, SceneEvent,
    SceneHost, TextMeasurer, Value,
};

/// Default font size used for text bounds when `font-size` is not set.
const DEFAULT_FONT_SIZE: f64 = 12.0;

struct Node {
    tag: String,
    kind: ElementKind,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    attrs: SmallVec<[(String, Value); 6]>,
    datum: Option<Box<dyn Any>>,
}

impl Node {
    fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.attr(key).and_then(Value::as_f64)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("attrs", &self.attrs)
            .field("bound", &self.datum.is_some())
            .finish()
    }
}

/// A minimal retained scene: a tree of tagged elements with attributes and bound data.
///
/// The scene is created with a root [`ElementKind::Group`] (see [`Scene::root`]). Structural
/// mutations queue [`SceneEvent`]s which layout containers drain.
pub struct Scene {
    registry: ElementRegistry,
    measurer: Box<dyn TextMeasurer>,
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
    events: Vec<SceneEvent>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("registry", &self.registry)
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates a scene with the default registry and the heuristic text measurer.
    pub fn new() -> Self {
        Self::with_registry(ElementRegistry::default())
    }

    /// Creates a scene with a custom element registry.
    pub fn with_registry(registry: ElementRegistry) -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                tag: String::from("g"),
                kind: ElementKind::Group,
                parent: None,
                children: SmallVec::new(),
                attrs: SmallVec::new(),
                datum: None,
            },
        );
        Self {
            registry,
            measurer: Box::new(HeuristicTextMeasurer),
            nodes,
            root,
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// Replaces the text measurer used for [`ElementKind::Text`] bounds.
    pub fn set_measurer(&mut self, measurer: impl TextMeasurer + 'static) {
        self.measurer = Box::new(measurer);
    }

    /// The root group. It has no parent and cannot be destroyed.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The element registry.
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Mutable access to the element registry (e.g. to register widget tags).
    pub fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.registry
    }

    /// Number of live nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns the kind of a node.
    pub fn kind(&self, node: NodeId) -> Option<ElementKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    /// Returns all attributes of a node in insertion order.
    pub fn attrs(&self, node: NodeId) -> impl Iterator<Item = (&str, &Value)> {
        self.nodes
            .get(&node)
            .into_iter()
            .flat_map(|n| n.attrs.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Creates an element and appends it to `parent` in one step.
    pub fn append_new(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, SceneError> {
        let node = self.create_element(tag)?;
        self.append_child(parent, node, None)?;
        Ok(node)
    }

    /// Returns the number of queued, undrained events.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(&id).ok_or(SceneError::MissingNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(&id).ok_or(SceneError::MissingNode(id))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(&node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let p = self.node_mut(parent)?;
        let Some(pos) = p.children.iter().position(|&c| c == child) else {
            return Err(SceneError::NotAChild { parent, child });
        };
        p.children.remove(pos);
        self.node_mut(child)?.parent = None;
        self.events.push(SceneEvent::Removed { parent, child });
        Ok(())
    }

    fn local_geometry(&self, node: &Node) -> Option<Rect> {
        let n = |key: &str| node.number(key).unwrap_or(0.0);
        match node.kind {
            ElementKind::Group => match (node.number("width"), node.number("height")) {
                (Some(w), Some(h)) => Some(Rect::new(0.0, 0.0, w.max(0.0), h.max(0.0))),
                _ => None,
            },
            ElementKind::Rect => Some(Rect::new(
                0.0,
                0.0,
                n("width").max(0.0),
                n("height").max(0.0),
            )),
            ElementKind::Circle => {
                Some(Circle::new((n("cx"), n("cy")), n("r").max(0.0)).bounding_box())
            }
            ElementKind::Line => {
                Some(Line::new((n("x1"), n("y1")), (n("x2"), n("y2"))).bounding_box())
            }
            ElementKind::Text => {
                let text = node.attr("text").and_then(Value::as_str).unwrap_or("");
                let font_size = node.number("font-size").unwrap_or(DEFAULT_FONT_SIZE);
                let (w, h) = self.measurer.measure(text, font_size);
                Some(Rect::new(0.0, 0.0, w, h))
            }
        }
    }
}

impl SceneHost for Scene {
    fn create_element(&mut self, tag: &str) -> Result<NodeId, SceneError> {
        let kind = self.registry.resolve(tag)?;
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                tag: tag.into(),
                kind,
                parent: None,
                children: SmallVec::new(),
                attrs: SmallVec::new(),
                datum: None,
            },
        );
        Ok(id)
    }

    fn append_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
    ) -> Result<(), SceneError> {
        self.node(parent)?;
        let previous = self.node(child)?.parent;
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        if let Some(previous) = previous {
            self.detach(previous, child)?;
        }
        let p = self.node_mut(parent)?;
        let index = index.map_or(p.children.len(), |i| i.min(p.children.len()));
        p.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.events.push(SceneEvent::Inserted {
            parent,
            child,
            index,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(child)?;
        self.detach(parent, child)
    }

    fn destroy(&mut self, node: NodeId) -> Result<(), SceneError> {
        if node == self.root {
            tracing::warn!(?node, "refusing to destroy the scene root");
            return Ok(());
        }
        if let Some(parent) = self.node(node)?.parent {
            self.detach(parent, node)?;
        }
        let mut stack = alloc::vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&id) {
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.tag.as_str())
    }

    fn bbox(&self, node: NodeId) -> Result<Rect, SceneError> {
        let n = self.node(node)?;
        let mut bounds = self.local_geometry(n);
        for &child in &n.children {
            let b = self.bbox(child)?;
            bounds = Some(bounds.map_or(b, |r| r.union(b)));
        }
        let x = n.number("x").unwrap_or(0.0);
        let y = n.number("y").unwrap_or(0.0);
        let local = bounds.unwrap_or(Rect::ZERO);
        Ok(Rect::new(local.x0 + x, local.y0 + y, local.x1 + x, local.y1 + y))
    }

    fn attr(&self, node: NodeId, key: &str) -> Option<&Value> {
        self.nodes.get(&node).and_then(|n| n.attr(key))
    }

    fn set_attr(&mut self, node: NodeId, key: &str, value: Value) -> Result<(), SceneError> {
        let n = self.node_mut(node)?;
        match n.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => n.attrs.push((key.into(), value)),
        }
        Ok(())
    }

    fn datum(&self, node: NodeId) -> Option<&dyn Any> {
        self.nodes.get(&node).and_then(|n| n.datum.as_deref())
    }

    fn bind_datum(&mut self, node: NodeId, datum: Box<dyn Any>) -> Result<(), SceneError> {
        self.node_mut(node)?.datum = Some(datum);
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<SceneEvent> {
        core::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn approx(a: Rect, b: Rect) -> bool {
        (a.x0 - b.x0).abs() < 1e-9
            && (a.y0 - b.y0).abs() < 1e-9
            && (a.x1 - b.x1).abs() < 1e-9
            && (a.y1 - b.y1).abs() < 1e-9
    }

    #[test]
    fn append_and_remove_queue_events() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.append_new(root, "rect").unwrap();
        let b = scene.create_element("circle").unwrap();
        scene.append_child(root, b, Some(0)).unwrap();
        scene.remove_child(root, a).unwrap();

        assert_eq!(scene.children(root), &[b]);
        let events = scene.drain_events();
        assert_eq!(
            events,
            vec![
                SceneEvent::Inserted {
                    parent: root,
                    child: a,
                    index: 0,
                },
                SceneEvent::Inserted {
                    parent: root,
                    child: b,
                    index: 0,
                },
                SceneEvent::Removed {
                    parent: root,
                    child: a,
                },
            ]
        );
        let touched: Vec<_> = events.iter().map(SceneEvent::child).collect();
        assert_eq!(touched, vec![a, b, a]);
        assert_eq!(scene.pending_events(), 0);
        // Detached nodes stay alive until destroyed.
        assert!(scene.contains(a));
        assert_eq!(scene.parent(a), None);
    }

    #[test]
    fn reparenting_detaches_first() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g1 = scene.append_new(root, "g").unwrap();
        let g2 = scene.append_new(root, "g").unwrap();
        let r = scene.append_new(g1, "rect").unwrap();
        scene.drain_events();

        scene.append_child(g2, r, None).unwrap();
        assert!(scene.children(g1).is_empty());
        assert_eq!(scene.parent(r), Some(g2));
        assert_eq!(
            scene.drain_events(),
            vec![
                SceneEvent::Removed {
                    parent: g1,
                    child: r,
                },
                SceneEvent::Inserted {
                    parent: g2,
                    child: r,
                    index: 0,
                },
            ]
        );
    }

    #[test]
    fn cycles_are_rejected() {
        let mut scene = Scene::new();
        let root = scene.root();
        let outer = scene.append_new(root, "g").unwrap();
        let inner = scene.append_new(outer, "g").unwrap();
        assert_eq!(
            scene.append_child(inner, outer, None),
            Err(SceneError::Cycle {
                parent: inner,
                child: outer,
            })
        );
    }

    #[test]
    fn remove_requires_parent_link() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.append_new(root, "g").unwrap();
        let r = scene.append_new(root, "rect").unwrap();
        assert_eq!(
            scene.remove_child(g, r),
            Err(SceneError::NotAChild {
                parent: g,
                child: r,
            })
        );
    }

    #[test]
    fn destroy_drops_subtree() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.append_new(root, "g").unwrap();
        let r = scene.append_new(g, "rect").unwrap();
        scene.destroy(g).unwrap();
        assert!(!scene.contains(g));
        assert!(!scene.contains(r));
        assert!(scene.is_empty());
        assert_eq!(scene.bbox(r), Err(SceneError::MissingNode(r)));
    }

    #[test]
    fn bbox_unions_children_and_translates() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.append_new(root, "g").unwrap();
        scene.set_attr(g, "x", Value::Number(10.0)).unwrap();
        scene.set_attr(g, "y", Value::Number(5.0)).unwrap();

        let r = scene.append_new(g, "rect").unwrap();
        scene.set_attr(r, "width", Value::Number(20.0)).unwrap();
        scene.set_attr(r, "height", Value::Number(4.0)).unwrap();

        let c = scene.append_new(g, "circle").unwrap();
        scene.set_attr(c, "cx", Value::Number(30.0)).unwrap();
        scene.set_attr(c, "cy", Value::Number(0.0)).unwrap();
        scene.set_attr(c, "r", Value::Number(2.0)).unwrap();

        assert!(approx(scene.bbox(r).unwrap(), Rect::new(0.0, 0.0, 20.0, 4.0)));
        assert!(approx(scene.bbox(c).unwrap(), Rect::new(28.0, -2.0, 32.0, 2.0)));
        assert!(approx(scene.bbox(g).unwrap(), Rect::new(10.0, 3.0, 42.0, 9.0)));
    }

    #[test]
    fn empty_group_is_zero_sized_at_its_origin() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.append_new(root, "g").unwrap();
        scene.set_attr(g, "x", Value::Number(7.0)).unwrap();
        assert!(approx(scene.bbox(g).unwrap(), Rect::new(7.0, 0.0, 7.0, 0.0)));

        scene.set_attr(g, "width", Value::Number(40.0)).unwrap();
        scene.set_attr(g, "height", Value::Number(8.0)).unwrap();
        assert!(approx(scene.bbox(g).unwrap(), Rect::new(7.0, 0.0, 47.0, 8.0)));
    }

    #[test]
    fn text_bounds_use_the_measurer() {
        let mut scene = Scene::new();
        let root = scene.root();
        let t = scene.append_new(root, "text").unwrap();
        scene.set_attr(t, "text", "abcd".into()).unwrap();
        scene.set_attr(t, "font-size", Value::Number(10.0)).unwrap();
        assert!(approx(scene.bbox(t).unwrap(), Rect::new(0.0, 0.0, 24.0, 10.0)));

        struct Monospace;
        impl TextMeasurer for Monospace {
            fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
                (font_size * text.len() as f64, font_size * 1.5)
            }
        }
        scene.set_measurer(Monospace);
        assert!(approx(scene.bbox(t).unwrap(), Rect::new(0.0, 0.0, 40.0, 15.0)));
    }

    #[test]
    fn attributes_and_data_round_trip() {
        let mut scene = Scene::new();
        let root = scene.root();
        let r = scene.append_new(root, "rect").unwrap();
        scene.set_attr(r, "fill", "red".into()).unwrap();
        scene.set_attr(r, "fill", "blue".into()).unwrap();
        assert_eq!(scene.attr_str(r, "fill"), Some("blue"));
        assert_eq!(scene.attrs(r).count(), 1);

        scene.set_attr(r, "visible", false.into()).unwrap();
        assert_eq!(scene.attr(r, "visible").and_then(Value::as_bool), Some(false));
        assert_eq!(scene.attr(r, "fill").and_then(Value::as_bool), None);

        scene.bind_datum(r, Box::new(42_u32)).unwrap();
        let d = scene.datum(r).and_then(|d| d.downcast_ref::<u32>());
        assert_eq!(d, Some(&42));
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let mut scene = Scene::new();
        assert_eq!(
            scene.create_element("blink"),
            Err(SceneError::UnknownElement("blink".into()))
        );
        assert!(!scene.registry().contains("blink"));

        scene.registry_mut().register("blink", ElementKind::Text);
        assert_eq!(scene.registry().get("blink"), Some(ElementKind::Text));
        let node = scene.create_element("blink").unwrap();
        assert_eq!(scene.kind(node), Some(ElementKind::Text));
    }
}
