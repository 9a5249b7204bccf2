// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Stable identity of an element in a scene host.
///
/// Ids are never reused by [`Scene`](crate::Scene), so a stale id refers to nothing rather than
/// to a newer element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);
