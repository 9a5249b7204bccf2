// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element kinds and the tag registry used to create them.

use alloc::string::String;

use hashbrown::HashMap;

use crate::SceneError;

/// The geometry model of a scene element.
///
/// Every kind is positioned by its `x`/`y` attributes (a translation in the parent's space);
/// the attributes listed per variant describe the local geometry before translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A container. Optional `width`/`height` declare a box at the local origin.
    Group,
    /// An axis-aligned rectangle: `width`, `height`.
    Rect,
    /// A circle: `cx`, `cy`, `r`.
    Circle,
    /// A line segment: `x1`, `y1`, `x2`, `y2`.
    Line,
    /// A single line of text: `text`, `font-size`, with its top-left at the local origin.
    Text,
}

/// Maps element tags (e.g. `"rect"`) to [`ElementKind`]s.
///
/// Widgets may register their own tags (e.g. `"legend-item"` as a [`ElementKind::Group`]) so
/// that their elements can be selected by tag.
#[derive(Clone, Debug)]
pub struct ElementRegistry {
    kinds: HashMap<String, ElementKind>,
}

impl ElementRegistry {
    /// Creates a registry with no tags.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Registers (or replaces) a tag.
    pub fn register(&mut self, tag: impl Into<String>, kind: ElementKind) {
        self.kinds.insert(tag.into(), kind);
    }

    /// Builder-style variant of [`ElementRegistry::register`].
    pub fn with(mut self, tag: impl Into<String>, kind: ElementKind) -> Self {
        self.register(tag, kind);
        self
    }

    /// Looks up a tag.
    pub fn get(&self, tag: &str) -> Option<ElementKind> {
        self.kinds.get(tag).copied()
    }

    /// Resolves a tag, failing with [`SceneError::UnknownElement`] if it is not registered.
    pub fn resolve(&self, tag: &str) -> Result<ElementKind, SceneError> {
        self.get(tag)
            .ok_or_else(|| SceneError::UnknownElement(tag.into()))
    }

    /// Returns `true` if the tag is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.kinds.contains_key(tag)
    }
}

impl Default for ElementRegistry {
    /// The SVG-like built-in tags: `g`, `group`, `rect`, `circle`, `line`, `text`.
    fn default() -> Self {
        Self::empty()
            .with("g", ElementKind::Group)
            .with("group", ElementKind::Group)
            .with("rect", ElementKind::Rect)
            .with("circle", ElementKind::Circle)
            .with("line", ElementKind::Line)
            .with("text", ElementKind::Text)
    }
}
