// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box-model spacing (margin/padding) with CSS shorthand normalization.

use kurbo::Rect;

use crate::LayoutError;

/// Per-side spacing, in `(top, right, bottom, left)` order like CSS.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spacing {
    /// Space above.
    pub top: f64,
    /// Space to the right.
    pub right: f64,
    /// Space below.
    pub bottom: f64,
    /// Space to the left.
    pub left: f64,
}

impl Spacing {
    /// No spacing on any side.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates spacing from explicit sides.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same spacing on every side.
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// Normalizes CSS shorthand:
    /// - `[a]`: all sides,
    /// - `[v, h]`: vertical, horizontal,
    /// - `[t, h, b]`: top, horizontal, bottom,
    /// - `[t, r, b, l]`: each side.
    pub fn from_slice(values: &[f64]) -> Result<Self, LayoutError> {
        match *values {
            [a] => Ok(Self::uniform(a)),
            [v, h] => Ok(Self::new(v, h, v, h)),
            [t, h, b] => Ok(Self::new(t, h, b, h)),
            [t, r, b, l] => Ok(Self::new(t, r, b, l)),
            _ => Err(LayoutError::InvalidSpacing { len: values.len() }),
        }
    }

    /// `left + right`.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// `top + bottom`.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Moves each edge of `rect` inward. Never produces a negative size.
    #[must_use]
    pub fn shrink(&self, rect: Rect) -> Rect {
        let x0 = rect.x0 + self.left;
        let y0 = rect.y0 + self.top;
        let x1 = (rect.x1 - self.right).max(x0);
        let y1 = (rect.y1 - self.bottom).max(y0);
        Rect::new(x0, y0, x1, y1)
    }

    /// Moves each edge of `rect` outward.
    #[must_use]
    pub fn grow(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x0 - self.left,
            rect.y0 - self.top,
            rect.x1 + self.right,
            rect.y1 + self.bottom,
        )
    }
}

impl From<f64> for Spacing {
    fn from(v: f64) -> Self {
        Self::uniform(v)
    }
}

impl From<[f64; 2]> for Spacing {
    fn from([v, h]: [f64; 2]) -> Self {
        Self::new(v, h, v, h)
    }
}

impl From<[f64; 3]> for Spacing {
    fn from([t, h, b]: [f64; 3]) -> Self {
        Self::new(t, h, b, h)
    }
}

impl From<[f64; 4]> for Spacing {
    fn from([t, r, b, l]: [f64; 4]) -> Self {
        Self::new(t, r, b, l)
    }
}
