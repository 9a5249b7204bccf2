// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// Configuration errors raised by layout parsing and [`layout`](crate::layout).
///
/// These indicate a programming error in the calling widget (a typo in a declarative chart
/// description), so they are never replaced by defaults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The value is not a recognized keyword for the field.
    #[error("invalid value `{value}` for `{field}`")]
    InvalidValue {
        /// The attribute name, e.g. `"justify-content"`.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The value is recognized but not supported by this engine.
    #[error("unsupported value `{value}` for `{field}`")]
    Unsupported {
        /// The attribute name, e.g. `"flex-wrap"`.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// Spacing shorthand must have between one and four components.
    #[error("spacing shorthand needs 1 to 4 values, got {len}")]
    InvalidSpacing {
        /// Number of components supplied.
        len: usize,
    },
}
