// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny flex-style layout engine for chart guides.
//!
//! Given a container rectangle, the sizes of its children and a [`LayoutConfig`], [`layout`]
//! positions the children along a single line:
//! - **Flow**: children are stacked along the main axis in order (see [`flow`]).
//! - **Justify**: the whole line is shifted (or spread) along the main axis.
//! - **Align**: the whole line is shifted along the cross axis.
//!
//! The engine is pure and order-preserving: output rectangle `i` belongs to input child `i`.
//! It knows nothing about scenes; see `plinth_box` for containers that drive it from scene
//! mutations. [`Spacing`] provides CSS-style margin/padding shorthand normalization.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod flex;
mod spacing;

pub use config::{AlignItems, Axis, FlexDirection, FlexWrap, JustifyContent, LayoutConfig};
pub use error::LayoutError;
pub use flex::{bounds_of, flow, layout};
pub use spacing::Spacing;
