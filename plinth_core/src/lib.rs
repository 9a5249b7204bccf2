// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene host capabilities for Plinth guide widgets.
//!
//! Guides (axes, legends, sliders, scrollbars, tooltips) are built on top of a retained-mode
//! scene graph owned by some renderer. Plinth never paints or hit-tests; it only needs a small
//! capability set from that scene:
//! - **Tree mutation**: create elements from a tag, append/remove children.
//! - **Geometry**: a parent-local bounding box per element.
//! - **Attributes**: imperative property reads/writes.
//! - **Bound data**: one opaque datum per element, used by data joins.
//! - **Mutation events**: `Inserted`/`Removed` notifications, drained by layout containers.
//!
//! [`SceneHost`] is that capability set. [`Scene`] is a small in-memory host that stores the
//! tree and computes bounds from simple geometry, suitable for tests, demos, and as a staging
//! tree that a renderer mirrors.

#![no_std]

extern crate alloc;

mod element;
mod error;
mod event;
mod host;
mod id;
mod measure;
mod scene;
mod value;

pub use element::{ElementKind, ElementRegistry};
pub use error::SceneError;
pub use event::SceneEvent;
pub use host::SceneHost;
pub use id::NodeId;
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use scene::Scene;
pub use value::Value;
