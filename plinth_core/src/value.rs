// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use peniko::{Brush, Color};

/// An attribute value stored on a scene element.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A number (positions, sizes, font sizes, opacity).
    Number(f64),
    /// A string (text content, layout keywords such as `"row"`).
    Text(String),
    /// A boolean flag.
    Bool(bool),
    /// A fill or stroke paint.
    Paint(Brush),
}

impl Value {
    /// Returns the number, if this is [`Value::Number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string, if this is [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag, if this is [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the paint, if this is [`Value::Paint`].
    pub fn as_paint(&self) -> Option<&Brush> {
        match self {
            Self::Paint(b) => Some(b),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Brush> for Value {
    fn from(v: Brush) -> Self {
        Self::Paint(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Self::Paint(Brush::Solid(v))
    }
}
