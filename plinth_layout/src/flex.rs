// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single-line flex pass: flow, justify, align.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::{AlignItems, Axis, FlexWrap, JustifyContent, LayoutConfig, LayoutError};

/// Returns the union of `rects`, or [`Rect::ZERO`] for an empty slice.
pub fn bounds_of(rects: &[Rect]) -> Rect {
    rects
        .iter()
        .copied()
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}

fn extent(r: Rect, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => r.width(),
        Axis::Vertical => r.height(),
    }
}

fn start(r: Rect, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => r.x0,
        Axis::Vertical => r.y0,
    }
}

fn shifted(r: Rect, axis: Axis, delta: f64) -> Rect {
    match axis {
        Axis::Horizontal => Rect::new(r.x0 + delta, r.y0, r.x1 + delta, r.y1),
        Axis::Vertical => Rect::new(r.x0, r.y0 + delta, r.x1, r.y1 + delta),
    }
}

/// Places children along the main axis only, ignoring any container.
///
/// Each child is sized by `children[i]` and stacked after the previous one (plus `gap`), so the
/// line spans from the origin to the sum of the sizes and gaps. Reversed directions fill the
/// same span from its far end: the first child ends at the far end and each later child abuts
/// the previous one on its near side. Every child's cross-axis coordinate is zero.
pub fn flow(children: &[Rect], config: &LayoutConfig) -> Vec<Rect> {
    let main = config.direction.main_axis();
    let reverse = config.direction.is_reverse();
    let gap = config.gap.max(0.0);

    let sizes: Vec<(f64, f64)> = children
        .iter()
        .map(|child| (child.width().max(0.0), child.height().max(0.0)))
        .collect();
    let main_size = |&(w, h): &(f64, f64)| match main {
        Axis::Horizontal => w,
        Axis::Vertical => h,
    };
    let total = sizes.iter().map(main_size).sum::<f64>()
        + gap * sizes.len().saturating_sub(1) as f64;

    let mut offset = 0.0;
    let mut out = Vec::with_capacity(sizes.len());
    for (i, wh) in sizes.iter().enumerate() {
        if i > 0 {
            offset += gap;
        }
        let (w, h) = *wh;
        let size = main_size(wh);
        let pos = if reverse { total - (offset + size) } else { offset };
        offset += size;
        out.push(match main {
            Axis::Horizontal => Rect::new(pos, 0.0, pos + w, h),
            Axis::Vertical => Rect::new(0.0, pos, w, pos + h),
        });
    }
    out
}

/// Main-axis placement: the offset of the line start from the container start, plus extra
/// spacing added per visual slot.
fn justify_offsets(policy: JustifyContent, free: f64, n: usize) -> (f64, f64) {
    let count = n as f64;
    match policy {
        JustifyContent::FlexStart => (0.0, 0.0),
        JustifyContent::FlexEnd => (free, 0.0),
        JustifyContent::Center => (free * 0.5, 0.0),
        JustifyContent::SpaceBetween => {
            if n > 1 && free > 0.0 {
                (0.0, free / (count - 1.0))
            } else {
                (0.0, 0.0)
            }
        }
        JustifyContent::SpaceAround => {
            if free > 0.0 {
                let extra = free / count;
                (extra * 0.5, extra)
            } else {
                (free * 0.5, 0.0)
            }
        }
        JustifyContent::SpaceEvenly => {
            if free > 0.0 {
                let extra = free / (count + 1.0);
                (extra, extra)
            } else {
                (free * 0.5, 0.0)
            }
        }
    }
}

fn align_offset(policy: AlignItems, free: f64) -> f64 {
    match policy {
        AlignItems::FlexStart => 0.0,
        AlignItems::FlexEnd => free,
        AlignItems::Center => free * 0.5,
    }
}

/// Positions `children` inside `container`.
///
/// Only the sizes of `children` are read. The result has one rectangle per child, in input
/// order. Children that do not fit overflow the container (offsets may go negative); nothing
/// is clipped or shrunk.
///
/// Fails with [`LayoutError::Unsupported`] for any wrapping policy other than
/// [`FlexWrap::NoWrap`].
pub fn layout(
    container: Rect,
    children: &[Rect],
    config: &LayoutConfig,
) -> Result<Vec<Rect>, LayoutError> {
    if config.wrap != FlexWrap::NoWrap {
        return Err(LayoutError::Unsupported {
            field: FlexWrap::FIELD,
            value: config.wrap.as_str().into(),
        });
    }
    if children.is_empty() {
        return Ok(Vec::new());
    }

    let main = config.direction.main_axis();
    let cross = main.cross();
    let reverse = config.direction.is_reverse();
    let n = children.len();

    let placed = flow(children, config);
    tracing::trace!(children = n, direction = config.direction.as_str(), "flow placement");

    // Justify: the flowed line starts at zero, so shift it to the computed main offset.
    let line = bounds_of(&placed);
    let free_main = extent(container, main) - extent(line, main);
    let (base, extra) = justify_offsets(config.justify_content, free_main, n);
    let container_main = start(container, main);
    let justified: Vec<Rect> = placed
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let slot = if reverse { n - 1 - i } else { i };
            let delta = container_main + base + extra * slot as f64;
            shifted(r, main, delta)
        })
        .collect();

    // Align: one offset for the whole line on the cross axis.
    let line = bounds_of(&justified);
    let free_cross = extent(container, cross) - extent(line, cross);
    let delta =
        start(container, cross) + align_offset(config.align_items, free_cross) - start(line, cross);
    Ok(justified
        .into_iter()
        .map(|r| shifted(r, cross, delta))
        .collect())
}
