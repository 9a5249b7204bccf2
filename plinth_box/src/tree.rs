// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ownership of containers and the bottom-up layout pass.

use alloc::vec::Vec;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::Rect;
use plinth_core::{NodeId, SceneHost, Value};
use plinth_layout::{LayoutConfig, bounds_of, flow, layout};
use smallvec::SmallVec;

use crate::{BoxContainer, BoxError};

type NodeList = SmallVec<[NodeId; 8]>;

/// All layout containers of one scene, keyed by node.
#[derive(Clone, Debug, Default)]
pub struct LayoutTree {
    containers: HashMap<NodeId, BoxContainer>,
}

impl LayoutTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container, replacing (and returning) any previous one for the same node.
    pub fn insert(&mut self, container: BoxContainer) -> Option<BoxContainer> {
        self.containers.insert(container.node(), container)
    }

    /// Unregisters the container of `node`. The node itself is left alone.
    pub fn remove(&mut self, node: NodeId) -> Option<BoxContainer> {
        self.containers.remove(&node)
    }

    /// Returns the container of `node`.
    pub fn get(&self, node: NodeId) -> Option<&BoxContainer> {
        self.containers.get(&node)
    }

    /// Returns the container of `node` for changing its margin or padding.
    ///
    /// Changes take effect on the next pass; call [`LayoutTree::layout`] or
    /// [`LayoutTree::request`] to apply them.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut BoxContainer> {
        self.containers.get_mut(&node)
    }

    /// Returns `true` if `node` is a container.
    pub fn contains(&self, node: NodeId) -> bool {
        self.containers.contains_key(&node)
    }

    /// Number of containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Returns `true` if there are no containers.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// The box `node` occupies in its parent: its scene bounds, grown by its margin if it is a
    /// container.
    ///
    /// A container's bounds also cover its resolved size, so padding around shrink-to-fit
    /// content takes up space in the parent.
    pub fn outer_bbox<H>(&self, host: &H, node: NodeId) -> Result<Rect, BoxError>
    where
        H: SceneHost + ?Sized,
    {
        let bbox = host.bbox(node)?;
        let Some(container) = self.containers.get(&node) else {
            return Ok(bbox);
        };
        let (width, height) = self.resolve(host, node, container)?.size;
        let x = host.attr_f64(node, "x").unwrap_or(0.0);
        let y = host.attr_f64(node, "y").unwrap_or(0.0);
        let own = Rect::new(x, y, x + width, y + height);
        Ok(container.outer(bbox.union(own)))
    }

    /// Lays out `node` and every container below it, innermost first, ignoring throttles.
    pub fn layout<H>(&self, host: &mut H, node: NodeId) -> Result<(), BoxError>
    where
        H: SceneHost + ?Sized,
    {
        if !self.contains(node) {
            return Err(BoxError::UnknownContainer(node));
        }
        self.layout_subtree(host, node)
    }

    /// Asks the container of `node` for a pass at `now`, running it unless throttled.
    ///
    /// Returns whether the pass ran. A throttled request is picked up by [`LayoutTree::poll`].
    pub fn request<H>(
        &mut self,
        host: &mut H,
        node: NodeId,
        now: Duration,
    ) -> Result<bool, BoxError>
    where
        H: SceneHost + ?Sized,
    {
        let container = self
            .containers
            .get_mut(&node)
            .ok_or(BoxError::UnknownContainer(node))?;
        if !container.throttle_mut().request(now) {
            return Ok(false);
        }
        self.apply(host, node)?;
        Ok(true)
    }

    /// Drains the host's mutation events and re-lays out every affected container.
    ///
    /// A container is affected when an event's parent is the container or lies anywhere below
    /// it. Affected containers are requested innermost first, so an outer pass sees the final
    /// size of its nested containers. Containers whose node no longer exists are dropped.
    /// Returns the number of passes that ran.
    pub fn handle_events<H>(&mut self, host: &mut H, now: Duration) -> Result<usize, BoxError>
    where
        H: SceneHost + ?Sized,
    {
        let events = host.drain_events();
        self.containers.retain(|node, _| {
            let alive = host.contains(*node);
            if !alive {
                tracing::debug!(?node, "dropping container of a destroyed node");
            }
            alive
        });

        let mut dirty = NodeList::new();
        for event in &events {
            let parent = event.parent();
            if !host.contains(parent) {
                tracing::warn!(?event, "ignoring mutation event for a node that no longer exists");
                continue;
            }
            self.collect_containers(&*host, parent, &mut dirty);
        }
        self.request_all(host, dirty, now)
    }

    /// Runs the trailing passes that are due at `now`.
    ///
    /// A trailing pass can change a container's size, so its enclosing containers are requested
    /// again afterwards. Returns the number of passes that ran.
    pub fn poll<H>(&mut self, host: &mut H, now: Duration) -> Result<usize, BoxError>
    where
        H: SceneHost + ?Sized,
    {
        let mut nodes: NodeList = self.containers.keys().copied().collect();
        nodes.sort_unstable_by_key(|&node| core::cmp::Reverse(depth(&*host, node)));

        let mut fired = NodeList::new();
        let mut ancestors = NodeList::new();
        for node in nodes {
            let Some(container) = self.containers.get_mut(&node) else {
                continue;
            };
            if !container.throttle_mut().poll(now) {
                continue;
            }
            self.apply(host, node)?;
            fired.push(node);
            if let Some(parent) = host.parent(node) {
                self.collect_containers(&*host, parent, &mut ancestors);
            }
        }
        // Ancestors that fired in this loop ran after their descendants and are up to date.
        ancestors.retain(|node| !fired.contains(node));
        Ok(fired.len() + self.request_all(host, ancestors, now)?)
    }

    /// The earliest time a trailing pass is due, if any container has one pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.containers
            .values()
            .filter_map(|c| c.throttle().deadline())
            .min()
    }

    fn collect_containers<H>(&self, host: &H, start: NodeId, out: &mut NodeList)
    where
        H: SceneHost + ?Sized,
    {
        let mut cursor = Some(start);
        while let Some(node) = cursor {
            if self.contains(node) && !out.contains(&node) {
                out.push(node);
            }
            cursor = host.parent(node);
        }
    }

    fn request_all<H>(
        &mut self,
        host: &mut H,
        mut nodes: NodeList,
        now: Duration,
    ) -> Result<usize, BoxError>
    where
        H: SceneHost + ?Sized,
    {
        nodes.sort_unstable_by_key(|&node| core::cmp::Reverse(depth(&*host, node)));
        let mut ran = 0;
        for node in nodes {
            if self.request(host, node, now)? {
                ran += 1;
            }
        }
        Ok(ran)
    }

    fn layout_subtree<H>(&self, host: &mut H, node: NodeId) -> Result<(), BoxError>
    where
        H: SceneHost + ?Sized,
    {
        let children: NodeList = host.children(node).iter().copied().collect();
        for child in children {
            self.layout_subtree(host, child)?;
        }
        if self.contains(node) {
            self.apply(host, node)?;
        }
        Ok(())
    }

    /// Reads the configuration of a container and sizes it.
    ///
    /// A missing `width` or `height` shrinks that axis to the flow extent of the children plus
    /// padding.
    fn resolve<H>(
        &self,
        host: &H,
        node: NodeId,
        container: &BoxContainer,
    ) -> Result<Resolved, BoxError>
    where
        H: SceneHost + ?Sized,
    {
        let config = read_config(host, node)?;
        let children: NodeList = host.children(node).iter().copied().collect();
        let outers = children
            .iter()
            .map(|&child| self.outer_bbox(host, child))
            .collect::<Result<Vec<_>, _>>()?;

        let width = host.attr_f64(node, "width");
        let height = host.attr_f64(node, "height");
        let size = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                let extent = bounds_of(&flow(&outers, &config));
                let padding = container.padding();
                (
                    width.unwrap_or(extent.width() + padding.horizontal()),
                    height.unwrap_or(extent.height() + padding.vertical()),
                )
            }
        };
        Ok(Resolved {
            config,
            children,
            outers,
            size,
        })
    }

    /// One pass over the direct children of a container.
    fn apply<H>(&self, host: &mut H, node: NodeId) -> Result<(), BoxError>
    where
        H: SceneHost + ?Sized,
    {
        let container = self
            .containers
            .get(&node)
            .ok_or(BoxError::UnknownContainer(node))?;
        let Resolved {
            config,
            children,
            outers,
            size: (width, height),
        } = self.resolve(&*host, node, container)?;

        let available = container.available(width, height);
        let targets = layout(available, &outers, &config)?;

        for ((&child, outer), target) in children.iter().zip(&outers).zip(&targets) {
            let x = host.attr_f64(child, "x").unwrap_or(0.0) + (target.x0 - outer.x0);
            let y = host.attr_f64(child, "y").unwrap_or(0.0) + (target.y0 - outer.y0);
            host.set_attr(child, "x", Value::Number(x))?;
            host.set_attr(child, "y", Value::Number(y))?;
        }
        tracing::debug!(
            ?node,
            children = children.len(),
            ?available,
            direction = config.direction.as_str(),
            "layout pass"
        );
        Ok(())
    }
}

/// A container's configuration, children and size, as seen by one pass.
struct Resolved {
    config: LayoutConfig,
    children: NodeList,
    outers: Vec<Rect>,
    size: (f64, f64),
}

fn read_config<H>(host: &H, node: NodeId) -> Result<LayoutConfig, BoxError>
where
    H: SceneHost + ?Sized,
{
    let config = LayoutConfig::from_attrs(|field| host.attr_str(node, field))?;
    Ok(match host.attr_f64(node, LayoutConfig::GAP_FIELD) {
        Some(gap) => config.with_gap(gap),
        None => config,
    })
}

fn depth<H>(host: &H, mut node: NodeId) -> usize
where
    H: SceneHost + ?Sized,
{
    let mut depth = 0;
    while let Some(parent) = host.parent(node) {
        depth += 1;
        node = parent;
    }
    depth
}

#[cfg(test)]
mod tests {
    extern crate std;

    use plinth_core::Scene;
    use plinth_layout::LayoutError;

    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn group(scene: &mut Scene, parent: NodeId, width: f64, height: f64) -> NodeId {
        let g = scene.append_new(parent, "g").unwrap();
        scene.set_attr(g, "width", Value::Number(width)).unwrap();
        scene.set_attr(g, "height", Value::Number(height)).unwrap();
        g
    }

    fn rect(scene: &mut Scene, parent: NodeId, width: f64, height: f64) -> NodeId {
        let r = scene.append_new(parent, "rect").unwrap();
        scene.set_attr(r, "width", Value::Number(width)).unwrap();
        scene.set_attr(r, "height", Value::Number(height)).unwrap();
        r
    }

    fn origin(scene: &Scene, node: NodeId) -> (f64, f64) {
        let b = scene.bbox(node).unwrap();
        (b.x0, b.y0)
    }

    #[test]
    fn inserted_children_are_centered_and_bottom_aligned() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = group(&mut scene, root, 100.0, 100.0);
        scene.set_attr(g, "justify-content", "center".into()).unwrap();
        scene.set_attr(g, "align-items", "flex-end".into()).unwrap();
        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(g));

        let kids: Vec<_> = (0..3).map(|_| rect(&mut scene, g, 10.0, 10.0)).collect();
        assert_eq!(tree.handle_events(&mut scene, ms(0)), Ok(1));

        let placed: Vec<_> = kids.iter().map(|&k| origin(&scene, k)).collect();
        assert_eq!(placed, [(35.0, 90.0), (45.0, 90.0), (55.0, 90.0)]);
    }

    #[test]
    fn padding_offsets_children() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = group(&mut scene, root, 100.0, 100.0);
        scene.set_attr(g, "flex-direction", "column".into()).unwrap();
        let a = rect(&mut scene, g, 10.0, 20.0);
        let b = rect(&mut scene, g, 10.0, 20.0);
        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(g).with_padding([10.0, 5.0]));

        tree.layout(&mut scene, g).unwrap();
        assert_eq!(origin(&scene, a), (5.0, 10.0));
        assert_eq!(origin(&scene, b), (5.0, 30.0));
        // Padding never grows the container.
        assert_eq!(tree.outer_bbox(&scene, g), Ok(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn margin_pushes_siblings_apart() {
        let mut scene = Scene::new();
        let root = scene.root();
        let outer = group(&mut scene, root, 200.0, 50.0);
        let inner = scene.append_new(outer, "g").unwrap();
        rect(&mut scene, inner, 20.0, 10.0);
        let sibling = rect(&mut scene, outer, 10.0, 10.0);

        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(outer));
        tree.insert(BoxContainer::new(inner).with_margin(5.0));
        tree.layout(&mut scene, outer).unwrap();

        assert_eq!(scene.bbox(inner), Ok(Rect::new(5.0, 5.0, 25.0, 15.0)));
        assert_eq!(
            tree.outer_bbox(&scene, inner),
            Ok(Rect::new(0.0, 0.0, 30.0, 20.0))
        );
        assert_eq!(origin(&scene, sibling), (30.0, 0.0));
    }

    #[test]
    fn nested_containers_settle_bottom_up() {
        let mut scene = Scene::new();
        let root = scene.root();
        let outer = group(&mut scene, root, 200.0, 50.0);
        let inner = scene.append_new(outer, "g").unwrap();
        rect(&mut scene, inner, 20.0, 10.0);
        let sibling = rect(&mut scene, outer, 10.0, 10.0);

        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(outer));
        tree.insert(BoxContainer::new(inner));
        assert_eq!(tree.handle_events(&mut scene, ms(0)), Ok(2));
        assert_eq!(origin(&scene, sibling), (20.0, 0.0));

        // Growing the inner container moves the outer container's later children.
        let extra = rect(&mut scene, inner, 15.0, 10.0);
        assert_eq!(tree.handle_events(&mut scene, ms(100)), Ok(2));
        assert_eq!(origin(&scene, extra), (20.0, 0.0));
        assert_eq!(origin(&scene, sibling), (35.0, 0.0));
    }

    #[test]
    fn padding_of_shrink_to_fit_container_reserves_space() {
        let mut scene = Scene::new();
        let root = scene.root();
        let outer = group(&mut scene, root, 200.0, 50.0);
        let inner = scene.append_new(outer, "g").unwrap();
        let content = rect(&mut scene, inner, 20.0, 10.0);
        let sibling = rect(&mut scene, outer, 10.0, 10.0);

        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(outer));
        tree.insert(BoxContainer::new(inner).with_padding(10.0));
        assert_eq!(tree.handle_events(&mut scene, ms(0)), Ok(2));

        assert_eq!(scene.attr_f64(inner, "x"), Some(0.0));
        assert_eq!(origin(&scene, content), (10.0, 10.0));
        assert_eq!(tree.outer_bbox(&scene, inner), Ok(Rect::new(0.0, 0.0, 40.0, 30.0)));
        assert_eq!(origin(&scene, sibling), (40.0, 0.0));
    }

    #[test]
    fn missing_size_shrinks_to_content() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.append_new(root, "g").unwrap();
        scene.set_attr(g, "width", Value::Number(100.0)).unwrap();
        scene.set_attr(g, "justify-content", "center".into()).unwrap();
        scene.set_attr(g, "align-items", "flex-end".into()).unwrap();
        let small = rect(&mut scene, g, 10.0, 10.0);
        let tall = rect(&mut scene, g, 10.0, 30.0);
        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(g).with_padding([0.0, 5.0]));

        tree.layout(&mut scene, g).unwrap();
        // Width is declared; height shrinks to the tallest child, so the line already fills it.
        assert_eq!(origin(&scene, small), (40.0, 0.0));
        assert_eq!(origin(&scene, tall), (50.0, 0.0));
        assert_eq!(scene.bbox(g), Ok(Rect::new(40.0, 0.0, 60.0, 30.0)));
        assert_eq!(tree.outer_bbox(&scene, g), Ok(Rect::new(0.0, 0.0, 100.0, 30.0)));
    }

    #[test]
    fn gap_attribute_is_applied() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = group(&mut scene, root, 100.0, 10.0);
        scene.set_attr(g, "gap", Value::Number(4.0)).unwrap();
        let a = rect(&mut scene, g, 10.0, 10.0);
        let b = rect(&mut scene, g, 10.0, 10.0);
        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(g));
        tree.layout(&mut scene, g).unwrap();
        assert_eq!(origin(&scene, a), (0.0, 0.0));
        assert_eq!(origin(&scene, b), (14.0, 0.0));
    }

    #[test]
    fn burst_is_coalesced_and_settled_once() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = group(&mut scene, root, 100.0, 10.0);
        scene.set_attr(g, "justify-content", "flex-end".into()).unwrap();
        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(g));

        let first = rect(&mut scene, g, 10.0, 10.0);
        assert_eq!(tree.handle_events(&mut scene, ms(0)), Ok(1));
        assert_eq!(origin(&scene, first), (90.0, 0.0));

        rect(&mut scene, g, 10.0, 10.0);
        assert_eq!(tree.handle_events(&mut scene, ms(4)), Ok(0));
        let last = rect(&mut scene, g, 10.0, 10.0);
        assert_eq!(tree.handle_events(&mut scene, ms(8)), Ok(0));
        // Not yet re-laid out.
        assert_eq!(origin(&scene, first), (90.0, 0.0));
        assert_eq!(tree.next_deadline(), Some(ms(16)));

        assert_eq!(tree.poll(&mut scene, ms(12)), Ok(0));
        assert_eq!(tree.poll(&mut scene, ms(16)), Ok(1));
        assert_eq!(origin(&scene, first), (70.0, 0.0));
        assert_eq!(origin(&scene, last), (90.0, 0.0));
        assert_eq!(tree.next_deadline(), None);
        assert_eq!(tree.poll(&mut scene, ms(40)), Ok(0));
    }

    #[test]
    fn invalid_attributes_are_errors() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = group(&mut scene, root, 100.0, 10.0);
        rect(&mut scene, g, 10.0, 10.0);
        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(g));

        scene.set_attr(g, "justify-content", "middle".into()).unwrap();
        assert_eq!(
            tree.layout(&mut scene, g),
            Err(BoxError::Layout(LayoutError::InvalidValue {
                field: "justify-content",
                value: "middle".into(),
            }))
        );

        scene.set_attr(g, "justify-content", "center".into()).unwrap();
        scene.set_attr(g, "flex-wrap", "wrap".into()).unwrap();
        assert_eq!(
            tree.layout(&mut scene, g),
            Err(BoxError::Layout(LayoutError::Unsupported {
                field: "flex-wrap",
                value: "wrap".into(),
            }))
        );
    }

    #[test]
    fn unknown_container_is_an_error() {
        let mut scene = Scene::new();
        let root = scene.root();
        let mut tree = LayoutTree::new();
        assert_eq!(
            tree.layout(&mut scene, root),
            Err(BoxError::UnknownContainer(root))
        );
        assert_eq!(
            tree.request(&mut scene, root, ms(0)),
            Err(BoxError::UnknownContainer(root))
        );
    }

    #[test]
    fn destroyed_containers_are_dropped() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = group(&mut scene, root, 100.0, 10.0);
        rect(&mut scene, g, 10.0, 10.0);
        let mut tree = LayoutTree::new();
        tree.insert(BoxContainer::new(g));

        scene.destroy(g).unwrap();
        assert_eq!(tree.handle_events(&mut scene, ms(0)), Ok(0));
        assert!(tree.is_empty());
    }
}
