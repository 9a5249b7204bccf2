// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout containers for Plinth guides.
//!
//! A [`BoxContainer`] turns a scene group into a flex container with CSS-style margin and
//! padding. A [`LayoutTree`] owns every container of a scene and keeps them laid out:
//! - it drains the host's mutation events ([`LayoutTree::handle_events`]) and re-runs the
//!   flex engine for each container whose subtree changed, innermost first,
//! - each container rate-limits its passes with a [`Throttle`], and a later
//!   [`LayoutTree::poll`] runs the trailing pass of a coalesced burst,
//! - [`LayoutTree::layout`] forces a full bottom-up pass regardless of throttling.
//!
//! Positions are written back as the children's `x`/`y` attributes. Configuration is read from
//! the container's own attributes (`flex-direction`, `flex-wrap`, `justify-content`,
//! `align-items`, `gap`, `width`, `height`) on every pass.

#![no_std]

extern crate alloc;

mod container;
mod error;
mod throttle;
mod tree;

pub use container::BoxContainer;
pub use error::BoxError;
pub use throttle::{Throttle, ThrottleState};
pub use tree::LayoutTree;
