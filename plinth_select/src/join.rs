// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applying a diff: the `join` step and its default partition transforms.

use plinth_core::{NodeId, SceneError, SceneHost};

use crate::{Enter, Selection};

/// The three partitions produced by [`Selection::data`], waiting to be applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Join<D> {
    parent: Option<NodeId>,
    enter: Enter<D>,
    update: Selection<D>,
    exit: Selection<D>,
}

impl<D> Join<D> {
    pub(crate) fn new(
        parent: Option<NodeId>,
        enter: Enter<D>,
        update: Selection<D>,
        exit: Selection<D>,
    ) -> Self {
        Self {
            parent,
            enter,
            update,
            exit,
        }
    }

    /// Data without a matching element.
    pub fn enter(&self) -> &Enter<D> {
        &self.enter
    }

    /// Matched elements paired with their new data (not yet bound in the scene).
    pub fn update(&self) -> &Selection<D> {
        &self.update
    }

    /// Elements whose key disappeared, with their old data.
    pub fn exit(&self) -> &Selection<D> {
        &self.exit
    }
}

impl<D: Clone + 'static> Join<D> {
    /// Applies the partitions and merges the results.
    ///
    /// New data is bound to the updated elements first. Then `update`, `enter` and `exit` run
    /// in that order, and their results are merged in the same order (update, enter, exit),
    /// which is also the order callers see when relying on z-order. Use [`keep`], [`discard`]
    /// and [`remove`] for the default behaviour of a partition.
    pub fn join<H, FE, FU, FX>(
        self,
        host: &mut H,
        enter: FE,
        update: FU,
        exit: FX,
    ) -> Result<Selection<D>, SceneError>
    where
        H: SceneHost + ?Sized,
        FE: FnOnce(&mut H, Enter<D>) -> Result<Selection<D>, SceneError>,
        FU: FnOnce(&mut H, Selection<D>) -> Result<Selection<D>, SceneError>,
        FX: FnOnce(&mut H, Selection<D>) -> Result<Selection<D>, SceneError>,
    {
        let counts = (self.enter.len(), self.update.len(), self.exit.len());
        self.update.bind(host)?;
        let updated = update(host, self.update)?;
        let entered = enter(host, self.enter)?;
        let exited = exit(host, self.exit)?;
        tracing::debug!(
            parent = ?self.parent,
            enter = counts.0,
            update = counts.1,
            exit = counts.2,
            "data join"
        );
        Ok(Selection::empty(self.parent)
            .merge(updated)
            .merge(entered)
            .merge(exited))
    }

    /// Joins with the default transforms: keep updates, create nothing, remove exits.
    ///
    /// Entering data is dropped without creating elements; use [`Join::join`] with an enter
    /// transform to create them.
    pub fn join_default<H>(self, host: &mut H) -> Result<Selection<D>, SceneError>
    where
        H: SceneHost + ?Sized,
    {
        self.join(host, discard, keep, remove)
    }
}

/// Update/exit transform that leaves the selection as it is.
pub fn keep<H, D>(_host: &mut H, selection: Selection<D>) -> Result<Selection<D>, SceneError>
where
    H: SceneHost + ?Sized,
{
    Ok(selection)
}

/// Enter transform that creates no elements.
pub fn discard<H, D>(_host: &mut H, enter: Enter<D>) -> Result<Selection<D>, SceneError>
where
    H: SceneHost + ?Sized,
{
    Ok(Selection::empty(enter.parent()))
}

/// Exit transform that detaches the elements (see [`Selection::remove`]).
pub fn remove<H, D>(host: &mut H, selection: Selection<D>) -> Result<Selection<D>, SceneError>
where
    H: SceneHost + ?Sized,
{
    selection.remove(host)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use alloc::vec::Vec;

    use plinth_core::{Scene, Value};

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Tick {
        id: &'static str,
        label: &'static str,
    }

    fn tick(id: &'static str, label: &'static str) -> Tick {
        Tick { id, label }
    }

    fn render(scene: &mut Scene, parent: NodeId, data: Vec<Tick>) -> Selection<Tick> {
        Selection::<Tick>::select_all(scene, parent)
            .data(data, |d, _| d.id)
            .join(scene, |h, e| e.append(h, "text"), keep, remove)
            .unwrap()
            .attr_with(scene, "text", |d, _| Some(Value::from(d.label)))
            .unwrap()
    }

    fn ids(scene: &Scene, parent: NodeId) -> Vec<&'static str> {
        Selection::<Tick>::select_all(scene, parent)
            .datums()
            .map(|d| d.id)
            .collect()
    }

    #[test]
    fn shifted_window_keeps_identity() {
        let mut scene = Scene::new();
        let root = scene.root();
        let first = render(
            &mut scene,
            root,
            vec![tick("a", "A"), tick("b", "B"), tick("c", "C")],
        );
        let old: Vec<_> = first.nodes().collect();

        let join = Selection::<Tick>::select_all(&scene, root).data(
            vec![tick("b", "B2"), tick("c", "C2"), tick("d", "D")],
            |d, _| d.id,
        );
        assert_eq!(join.enter().data(), &[tick("d", "D")]);
        assert_eq!(
            join.update().items(),
            &[(old[1], tick("b", "B2")), (old[2], tick("c", "C2"))]
        );
        assert_eq!(join.exit().items(), &[(old[0], tick("a", "A"))]);

        let merged = join
            .join(&mut scene, |h, e| e.append(h, "text"), keep, remove)
            .unwrap();
        let nodes: Vec<_> = merged.nodes().collect();
        // update, then enter, then exit.
        assert_eq!(nodes.len(), 4);
        assert_eq!(&nodes[..2], &old[1..]);
        assert_eq!(nodes[3], old[0]);

        assert_eq!(ids(&scene, root), vec!["b", "c", "d"]);
        assert_eq!(scene.parent(old[0]), None);
        let rebound = scene.datum(old[1]).and_then(|d| d.downcast_ref::<Tick>());
        assert_eq!(rebound, Some(&tick("b", "B2")));
    }

    #[test]
    fn identical_data_round_trips() {
        let mut scene = Scene::new();
        let root = scene.root();
        let data = vec![tick("x", "X"), tick("y", "Y")];
        let first: Vec<_> = render(&mut scene, root, data.clone()).nodes().collect();

        let join = Selection::<Tick>::select_all(&scene, root).data(data, |d, _| d.id);
        assert!(join.enter().is_empty());
        assert!(join.exit().is_empty());
        let updated: Vec<_> = join.update().nodes().collect();
        assert_eq!(updated, first);
    }

    #[test]
    fn duplicate_keys_create_duplicates() {
        let mut scene = Scene::new();
        let root = scene.root();
        render(&mut scene, root, vec![tick("a", "A")]);
        render(&mut scene, root, vec![tick("a", "A"), tick("a", "A again")]);
        assert_eq!(ids(&scene, root), vec!["a", "a"]);
    }

    #[test]
    fn default_join_removes_exits_and_creates_nothing() {
        let mut scene = Scene::new();
        let root = scene.root();
        render(&mut scene, root, vec![tick("a", "A"), tick("b", "B")]);

        let merged = Selection::<Tick>::select_all(&scene, root)
            .data(vec![tick("b", "B"), tick("z", "Z")], |d, _| d.id)
            .join_default(&mut scene)
            .unwrap();
        // update + exit; entering data had nothing created.
        assert_eq!(merged.len(), 2);
        assert_eq!(ids(&scene, root), vec!["b"]);
    }

    #[test]
    fn exit_transforms_can_destroy() {
        let mut scene = Scene::new();
        let root = scene.root();
        let old: Vec<_> = render(&mut scene, root, vec![tick("a", "A")]).nodes().collect();
        Selection::<Tick>::select_all(&scene, root)
            .data(Vec::new(), |d, _| d.id)
            .join(&mut scene, discard, keep, |h, exit| {
                exit.remove(h)?.destroy(h)?;
                Ok(Selection::empty(None))
            })
            .unwrap();
        assert!(!scene.contains(old[0]));
    }
}
