// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The keyed enter/update/exit partition.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// The result of [`diff`].
#[derive(Clone, Debug, PartialEq)]
pub struct Diff<E, D> {
    /// New data with no matching live element, in data order.
    pub enter: Vec<D>,
    /// Live elements paired with their new datum, in data order.
    pub update: Vec<(E, D)>,
    /// Live elements whose key no longer appears, in live order.
    pub exit: Vec<E>,
}

/// Partitions `live` elements against `data` by key.
///
/// `live` pairs each element with the key of its currently bound datum. `key(datum, index)` is
/// evaluated once per entry of `data`.
///
/// When a key repeats, the first occurrence wins on both sides: a later live element with the
/// same key goes to `exit`, and a later datum with the same key goes to `enter`.
pub fn diff<E, D, K, F>(live: Vec<(K, E)>, data: Vec<D>, mut key: F) -> Diff<E, D>
where
    K: Hash + Eq,
    F: FnMut(&D, usize) -> K,
{
    let mut by_key: HashMap<K, usize> = HashMap::with_capacity(live.len());
    let mut slots: Vec<Option<E>> = Vec::with_capacity(live.len());
    for (i, (k, element)) in live.into_iter().enumerate() {
        by_key.entry(k).or_insert(i);
        slots.push(Some(element));
    }

    let mut enter = Vec::new();
    let mut update = Vec::with_capacity(slots.len().min(data.len()));
    for (i, datum) in data.into_iter().enumerate() {
        let k = key(&datum, i);
        match by_key.remove(&k).and_then(|slot| slots[slot].take()) {
            Some(element) => update.push((element, datum)),
            None => enter.push(datum),
        }
    }

    let exit = slots.into_iter().flatten().collect();
    Diff {
        enter,
        update,
        exit,
    }
}
