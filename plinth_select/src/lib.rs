// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed data joins over a [`SceneHost`](plinth_core::SceneHost).
//!
//! Guides that draw one element per datum (ticks, legend items, timeline marks) reconcile their
//! elements against fresh data on every update instead of rebuilding them:
//!
//! ```ignore
//! let items = Selection::<Item>::select_all(&scene, group)
//!     .data(new_items, |d, _| d.id)
//!     .join(
//!         &mut scene,
//!         |host, enter| enter.append(host, "rect"),
//!         keep,
//!         remove,
//!     )?
//!     .attr_with(&mut scene, "width", |d, _| Some(d.value.into()))?;
//! ```
//!
//! - [`diff`] is the pure keyed partition into enter/update/exit.
//! - [`Selection`] is an ordered set of `(element, datum)` pairs with structural operations.
//! - [`Selection::data`] consumes a selection and produces a [`Join`], which can only be
//!   joined, so a selection is never diffed twice.
//!
//! [`Join::join`] merges its results in the order update, enter, exit. [`Join::join_default`]
//! keeps updates and removes exits, but creates nothing for entering data (its enter transform
//! is [`discard`]). Pass an enter transform such as `|host, enter| enter.append(host, "rect")`
//! to [`Join::join`] when new data should get elements.
//!
//! Keys must be unique within one pass. With duplicates the first match wins and later
//! duplicates enter as new elements.

#![no_std]

extern crate alloc;

mod diff;
mod join;
mod selection;

pub use diff::{Diff, diff};
pub use join::{Join, discard, keep, remove};
pub use selection::{Enter, Selection};
