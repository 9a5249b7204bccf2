// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout policy types and their keyword parsing.

use core::str::FromStr;

use crate::LayoutError;

/// One of the two layout axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// Returns the perpendicular axis.
    #[must_use]
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Main-axis direction, matching CSS `flex-direction`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlexDirection {
    /// Left to right.
    #[default]
    Row,
    /// Right to left.
    RowReverse,
    /// Top to bottom.
    Column,
    /// Bottom to top.
    ColumnReverse,
}

impl FlexDirection {
    /// The attribute name used when parsing.
    pub const FIELD: &'static str = "flex-direction";

    /// The main axis.
    pub fn main_axis(self) -> Axis {
        match self {
            Self::Row | Self::RowReverse => Axis::Horizontal,
            Self::Column | Self::ColumnReverse => Axis::Vertical,
        }
    }

    /// Returns `true` for the reversed variants.
    pub fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    /// The CSS keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::RowReverse => "row-reverse",
            Self::Column => "column",
            Self::ColumnReverse => "column-reverse",
        }
    }
}

impl FromStr for FlexDirection {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row" => Ok(Self::Row),
            "row-reverse" => Ok(Self::RowReverse),
            "column" => Ok(Self::Column),
            "column-reverse" => Ok(Self::ColumnReverse),
            _ => Err(invalid(Self::FIELD, s)),
        }
    }
}

/// Line wrapping policy, matching CSS `flex-wrap`.
///
/// Only [`FlexWrap::NoWrap`] is laid out; the other keywords parse so that the error raised by
/// [`layout`](crate::layout) can say they are unsupported rather than unknown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlexWrap {
    /// A single line.
    #[default]
    NoWrap,
    /// Multiple lines, cross-start to cross-end.
    Wrap,
    /// Multiple lines, cross-end to cross-start.
    WrapReverse,
}

impl FlexWrap {
    /// The attribute name used when parsing.
    pub const FIELD: &'static str = "flex-wrap";

    /// The CSS keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoWrap => "nowrap",
            Self::Wrap => "wrap",
            Self::WrapReverse => "wrap-reverse",
        }
    }
}

impl FromStr for FlexWrap {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nowrap" => Ok(Self::NoWrap),
            "wrap" => Ok(Self::Wrap),
            "wrap-reverse" => Ok(Self::WrapReverse),
            _ => Err(invalid(Self::FIELD, s)),
        }
    }
}

/// Main-axis placement of the line, matching CSS `justify-content`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JustifyContent {
    /// Pack at the container's main start.
    #[default]
    FlexStart,
    /// Pack at the container's main end.
    FlexEnd,
    /// Center in the container.
    Center,
    /// First and last child on the edges, free space split evenly between children.
    SpaceBetween,
    /// Free space split evenly around each child (half-size gaps at the edges).
    SpaceAround,
    /// Free space split evenly between children and edges.
    SpaceEvenly,
}

impl JustifyContent {
    /// The attribute name used when parsing.
    pub const FIELD: &'static str = "justify-content";

    /// The CSS keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FlexStart => "flex-start",
            Self::FlexEnd => "flex-end",
            Self::Center => "center",
            Self::SpaceBetween => "space-between",
            Self::SpaceAround => "space-around",
            Self::SpaceEvenly => "space-evenly",
        }
    }
}

impl FromStr for JustifyContent {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flex-start" => Ok(Self::FlexStart),
            "flex-end" => Ok(Self::FlexEnd),
            "center" => Ok(Self::Center),
            "space-between" => Ok(Self::SpaceBetween),
            "space-around" => Ok(Self::SpaceAround),
            "space-evenly" => Ok(Self::SpaceEvenly),
            _ => Err(invalid(Self::FIELD, s)),
        }
    }
}

/// Cross-axis placement of the line, matching CSS `align-items`.
///
/// The whole line moves by one offset computed from its bounding box; children are not
/// aligned individually.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignItems {
    /// Pack at the container's cross start.
    #[default]
    FlexStart,
    /// Pack at the container's cross end.
    FlexEnd,
    /// Center in the container.
    Center,
}

impl AlignItems {
    /// The attribute name used when parsing.
    pub const FIELD: &'static str = "align-items";

    /// The CSS keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FlexStart => "flex-start",
            Self::FlexEnd => "flex-end",
            Self::Center => "center",
        }
    }
}

impl FromStr for AlignItems {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flex-start" => Ok(Self::FlexStart),
            "flex-end" => Ok(Self::FlexEnd),
            "center" => Ok(Self::Center),
            _ => Err(invalid(Self::FIELD, s)),
        }
    }
}

fn invalid(field: &'static str, value: &str) -> LayoutError {
    LayoutError::InvalidValue {
        field,
        value: value.into(),
    }
}

/// Layout policy for one [`layout`](crate::layout) invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutConfig {
    /// Main-axis direction.
    pub direction: FlexDirection,
    /// Wrapping policy.
    pub wrap: FlexWrap,
    /// Main-axis placement.
    pub justify_content: JustifyContent,
    /// Cross-axis placement.
    pub align_items: AlignItems,
    /// Main-axis space inserted between adjacent children.
    pub gap: f64,
}

impl LayoutConfig {
    /// The attribute name of [`LayoutConfig::gap`].
    pub const GAP_FIELD: &'static str = "gap";

    /// Creates the default configuration (row, nowrap, flex-start, flex-start, no gap).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the direction.
    pub fn with_direction(mut self, direction: FlexDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the wrapping policy.
    pub fn with_wrap(mut self, wrap: FlexWrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Sets the main-axis placement.
    pub fn with_justify_content(mut self, justify_content: JustifyContent) -> Self {
        self.justify_content = justify_content;
        self
    }

    /// Sets the cross-axis placement.
    pub fn with_align_items(mut self, align_items: AlignItems) -> Self {
        self.align_items = align_items;
        self
    }

    /// Sets the gap between adjacent children (negative values are clamped to zero).
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap.max(0.0);
        self
    }

    /// Builds a configuration from keyword attributes.
    ///
    /// `lookup` is called with each attribute name (`flex-direction`, `flex-wrap`,
    /// `justify-content`, `align-items`). Absent attributes keep their defaults; present but
    /// unrecognized keywords fail with [`LayoutError::InvalidValue`] naming the attribute.
    /// The gap is numeric and is left at zero; set it with [`LayoutConfig::with_gap`].
    pub fn from_attrs<'a>(
        lookup: impl Fn(&'static str) -> Option<&'a str>,
    ) -> Result<Self, LayoutError> {
        let mut config = Self::default();
        if let Some(v) = lookup(FlexDirection::FIELD) {
            config.direction = v.parse()?;
        }
        if let Some(v) = lookup(FlexWrap::FIELD) {
            config.wrap = v.parse()?;
        }
        if let Some(v) = lookup(JustifyContent::FIELD) {
            config.justify_content = v.parse()?;
        }
        if let Some(v) = lookup(AlignItems::FIELD) {
            config.align_items = v.parse()?;
        }
        Ok(config)
    }
}
