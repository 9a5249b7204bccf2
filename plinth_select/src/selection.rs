// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selections: ordered `(element, datum)` pairs and their structural operations.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::hash::Hash;

use plinth_core::{NodeId, SceneError, SceneHost, Value};

use crate::{Join, diff};

/// An ordered set of scene elements, each paired with its bound datum.
///
/// Selections are transient handles: they are built from the scene, transformed, and dropped.
/// The datum of each element lives in the scene (see [`SceneHost::datum`]), so a later
/// [`Selection::select_all`] sees what this one bound.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection<D> {
    parent: Option<NodeId>,
    items: Vec<(NodeId, D)>,
}

/// The entering part of a [`Join`]: data that has no element yet.
#[derive(Clone, Debug, PartialEq)]
pub struct Enter<D> {
    parent: Option<NodeId>,
    data: Vec<D>,
}

impl<D> Selection<D> {
    /// An empty selection under `parent`.
    pub fn empty(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            items: Vec::new(),
        }
    }

    /// A selection over explicit pairs. The data is not bound to the elements.
    pub fn from_items(parent: Option<NodeId>, items: Vec<(NodeId, D)>) -> Self {
        Self { parent, items }
    }

    /// The common parent new elements are appended to, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the selection has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The `(element, datum)` pairs in order.
    pub fn items(&self) -> &[(NodeId, D)] {
        &self.items
    }

    /// The elements in order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().map(|(node, _)| *node)
    }

    /// The data in order.
    pub fn datums(&self) -> impl Iterator<Item = &D> + '_ {
        self.items.iter().map(|(_, d)| d)
    }

    /// Appends the elements of `other` after those of `self`, keeping `self`'s parent.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.items.extend(other.items);
        self
    }

    /// Binds new data to this selection's elements by key.
    ///
    /// `key(datum, index)` is applied to the currently bound data (with their index in this
    /// selection) and to `data` (with their index in `data`). Consumes the selection; the
    /// returned [`Join`] holds the three partitions until [`Join::join`] applies them.
    pub fn data<K, F>(self, data: Vec<D>, mut key: F) -> Join<D>
    where
        K: Hash + Eq,
        F: FnMut(&D, usize) -> K,
    {
        let live: Vec<(K, (NodeId, D))> = self
            .items
            .into_iter()
            .enumerate()
            .map(|(i, (node, d))| (key(&d, i), (node, d)))
            .collect();
        let live_len = live.len();
        let data_len = data.len();
        let d = diff(live, data, key);
        tracing::trace!(
            live = live_len,
            data = data_len,
            enter = d.enter.len(),
            update = d.update.len(),
            exit = d.exit.len(),
            "data diff"
        );
        Join::new(
            self.parent,
            Enter {
                parent: self.parent,
                data: d.enter,
            },
            Self {
                parent: self.parent,
                items: d
                    .update
                    .into_iter()
                    .map(|((node, _old), new)| (node, new))
                    .collect(),
            },
            Self {
                parent: self.parent,
                items: d.exit,
            },
        )
    }

    /// Sets the same attribute value on every element.
    pub fn attr<H>(
        self,
        host: &mut H,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<Self, SceneError>
    where
        H: SceneHost + ?Sized,
    {
        let value = value.into();
        for (node, _) in &self.items {
            host.set_attr(*node, key, value.clone())?;
        }
        Ok(self)
    }

    /// Sets a per-element attribute computed from `(datum, index)`.
    ///
    /// Returning `None` leaves that element's current value untouched.
    pub fn attr_with<H, F>(self, host: &mut H, key: &str, mut f: F) -> Result<Self, SceneError>
    where
        H: SceneHost + ?Sized,
        F: FnMut(&D, usize) -> Option<Value>,
    {
        for (i, (node, d)) in self.items.iter().enumerate() {
            if let Some(value) = f(d, i) {
                host.set_attr(*node, key, value)?;
            }
        }
        Ok(self)
    }

    /// Calls `f(host, element, datum, index)` for every element.
    pub fn each<H, F>(self, host: &mut H, mut f: F) -> Result<Self, SceneError>
    where
        H: SceneHost + ?Sized,
        F: FnMut(&mut H, NodeId, &D, usize) -> Result<(), SceneError>,
    {
        for (i, (node, d)) in self.items.iter().enumerate() {
            f(host, *node, d, i)?;
        }
        Ok(self)
    }

    /// Detaches every element from its parent.
    ///
    /// The elements stay alive (and keep their data), so the returned selection can still be
    /// used, e.g. to [`destroy`](Selection::destroy) them. Already-detached elements are skipped.
    pub fn remove<H>(self, host: &mut H) -> Result<Self, SceneError>
    where
        H: SceneHost + ?Sized,
    {
        for (node, _) in &self.items {
            if let Some(parent) = host.parent(*node) {
                host.remove_child(parent, *node)?;
            }
        }
        Ok(self)
    }

    /// Destroys every element (and its subtree).
    pub fn destroy<H>(self, host: &mut H) -> Result<(), SceneError>
    where
        H: SceneHost + ?Sized,
    {
        for (node, _) in self.items {
            host.destroy(node)?;
        }
        Ok(())
    }
}

impl<D: Clone + 'static> Selection<D> {
    /// Selects the children of `parent` whose bound datum is a `D`, in child order.
    ///
    /// Children without a datum of this type belong to someone else and are left out.
    pub fn select_all<H>(host: &H, parent: NodeId) -> Self
    where
        H: SceneHost + ?Sized,
    {
        Self::select_matching(host, parent, |_| true)
    }

    /// Like [`Selection::select_all`], restricted to children created from `tag`.
    pub fn select_all_tagged<H>(host: &H, parent: NodeId, tag: &str) -> Self
    where
        H: SceneHost + ?Sized,
    {
        Self::select_matching(host, parent, |t| t == tag)
    }

    fn select_matching<H>(
        host: &H,
        parent: NodeId,
        mut tag_filter: impl FnMut(&str) -> bool,
    ) -> Self
    where
        H: SceneHost + ?Sized,
    {
        let items = host
            .children(parent)
            .iter()
            .filter(|&&child| host.tag(child).is_some_and(&mut tag_filter))
            .filter_map(|&child| {
                let d = host.datum(child)?.downcast_ref::<D>()?;
                Some((child, d.clone()))
            })
            .collect();
        Self {
            parent: Some(parent),
            items,
        }
    }

    /// Appends one new `tag` child to every element, bound to that element's datum.
    ///
    /// This is composition, not a data join: the returned selection holds the new children
    /// and has no common parent.
    pub fn append<H>(self, host: &mut H, tag: &str) -> Result<Self, SceneError>
    where
        H: SceneHost + ?Sized,
    {
        self.append_with(host, |host, _, _| host.create_element(tag))
    }

    /// Like [`Selection::append`], with children built by `factory(host, datum, index)`.
    ///
    /// If any step fails, every child created by this call is destroyed again.
    pub fn append_with<H, F>(self, host: &mut H, mut factory: F) -> Result<Self, SceneError>
    where
        H: SceneHost + ?Sized,
        F: FnMut(&mut H, &D, usize) -> Result<NodeId, SceneError>,
    {
        let mut items = Vec::with_capacity(self.items.len());
        for (i, (node, d)) in self.items.into_iter().enumerate() {
            let child = match factory(host, &d, i) {
                Ok(child) => child,
                Err(err) => return Err(rollback(host, &items, err)),
            };
            let attached = attach(host, Some(node), child, &d);
            items.push((child, d));
            if let Err(err) = attached {
                return Err(rollback(host, &items, err));
            }
        }
        Ok(Self {
            parent: None,
            items,
        })
    }

    /// Writes each element's datum into the scene.
    pub(crate) fn bind<H>(&self, host: &mut H) -> Result<(), SceneError>
    where
        H: SceneHost + ?Sized,
    {
        for (node, d) in &self.items {
            host.bind_datum(*node, Box::new(d.clone()))?;
        }
        Ok(())
    }
}

impl<D> Enter<D> {
    /// The parent new elements are appended to.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The entering data in order.
    pub fn data(&self) -> &[D] {
        &self.data
    }

    /// Number of entering data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing enters.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<D: Clone + 'static> Enter<D> {
    /// Creates one `tag` element per datum, binds the datum, and appends it to the parent.
    ///
    /// Fails with [`SceneError::UnknownElement`] if the tag is not registered. Without a parent
    /// the elements are created detached.
    pub fn append<H>(self, host: &mut H, tag: &str) -> Result<Selection<D>, SceneError>
    where
        H: SceneHost + ?Sized,
    {
        self.append_with(host, |host, _, _| host.create_element(tag))
    }

    /// Like [`Enter::append`], with elements built by `factory(host, datum, index)`.
    ///
    /// The factory may build a whole subtree; only the returned root is bound and appended.
    /// If any step fails, every element created by this call is destroyed again.
    pub fn append_with<H, F>(
        self,
        host: &mut H,
        mut factory: F,
    ) -> Result<Selection<D>, SceneError>
    where
        H: SceneHost + ?Sized,
        F: FnMut(&mut H, &D, usize) -> Result<NodeId, SceneError>,
    {
        let mut items = Vec::with_capacity(self.data.len());
        for (i, d) in self.data.into_iter().enumerate() {
            let node = match factory(host, &d, i) {
                Ok(node) => node,
                Err(err) => return Err(rollback(host, &items, err)),
            };
            let attached = attach(host, self.parent, node, &d);
            items.push((node, d));
            if let Err(err) = attached {
                return Err(rollback(host, &items, err));
            }
        }
        Ok(Selection {
            parent: self.parent,
            items,
        })
    }
}

/// Binds `datum` to a freshly created `node` and appends it to `parent`, if any.
fn attach<H, D>(
    host: &mut H,
    parent: Option<NodeId>,
    node: NodeId,
    datum: &D,
) -> Result<(), SceneError>
where
    H: SceneHost + ?Sized,
    D: Clone + 'static,
{
    host.bind_datum(node, Box::new(datum.clone()))?;
    if let Some(parent) = parent {
        host.append_child(parent, node, None)?;
    }
    Ok(())
}

/// Destroys the elements created by a failed append and hands back the original error.
fn rollback<H, D>(host: &mut H, created: &[(NodeId, D)], err: SceneError) -> SceneError
where
    H: SceneHost + ?Sized,
{
    for &(node, _) in created {
        if let Err(cleanup) = host.destroy(node) {
            tracing::warn!(?node, %cleanup, "could not destroy a partially appended element");
        }
    }
    err
}
