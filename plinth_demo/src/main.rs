// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend demo for Plinth.
//!
//! Builds a framed legend out of nested layout containers, fills it with a keyed data join,
//! updates the data twice (once inside a throttle window) and prints the settled scene as SVG.
mod svg;

use std::time::Duration;

use peniko::Color;
use peniko::color::palette::css;
use plinth_box::{BoxContainer, BoxError, LayoutTree};
use plinth_core::{ElementKind, ElementRegistry, NodeId, Scene, SceneHost, Value};
use plinth_select::{Selection, keep};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Item {
    id: &'static str,
    label: String,
    color: Color,
}

fn item(id: &'static str, label: &str, color: Color) -> Item {
    Item {
        id,
        label: label.to_string(),
        color,
    }
}

/// Reconciles the legend items under `legend` with `items`.
///
/// Entering items become `legend-item` containers holding a swatch and a label; exiting items
/// are destroyed. Every surviving item is refreshed from its new datum.
fn render_legend(
    scene: &mut Scene,
    tree: &mut LayoutTree,
    legend: NodeId,
    items: Vec<Item>,
) -> Result<Selection<Item>, BoxError> {
    let join = Selection::<Item>::select_all_tagged(scene, legend, "legend-item")
        .data(items, |d, _| d.id);
    tracing::info!(
        enter = join.enter().len(),
        update = join.update().len(),
        exit = join.exit().len(),
        "legend data"
    );

    let merged = join.join(
        scene,
        |h, enter| {
            let entered = enter
                .append(h, "legend-item")?
                .attr(h, "align-items", "center")?
                .attr(h, "gap", 4.0)?;
            for node in entered.nodes() {
                tree.insert(BoxContainer::new(node).with_padding([2.0, 4.0]));
            }
            entered
                .clone()
                .append(h, "rect")?
                .attr(h, "width", 10.0)?
                .attr(h, "height", 10.0)?;
            entered.clone().append(h, "text")?.attr(h, "font-size", 10.0)?;
            Ok(entered)
        },
        keep,
        |h, exit| {
            exit.remove(h)?.destroy(h)?;
            Ok(Selection::empty(None))
        },
    )?;

    Ok(merged.each(scene, |h, node, d, _| {
        // Nested joins rebind the parts to the item's new datum.
        Selection::<Item>::select_all_tagged(h, node, "rect")
            .data(vec![d.clone()], |d, _| d.id)
            .join_default(h)?
            .attr(h, "fill", d.color)?;
        Selection::<Item>::select_all_tagged(h, node, "text")
            .data(vec![d.clone()], |d, _| d.id)
            .join_default(h)?
            .attr(h, "text", d.label.as_str())?;
        Ok(())
    })?)
}

/// Runs every pending trailing pass, jumping straight to each deadline.
fn settle(scene: &mut Scene, tree: &mut LayoutTree) -> Result<Duration, BoxError> {
    let mut now = Duration::ZERO;
    while let Some(deadline) = tree.next_deadline() {
        now = deadline;
        let ran = tree.poll(scene, now)?;
        tracing::debug!(?now, ran, "settle");
    }
    Ok(now)
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let registry = ElementRegistry::default().with("legend-item", ElementKind::Group);
    let mut scene = Scene::with_registry(registry);
    let mut tree = LayoutTree::new();
    let root = scene.root();

    // frame (fixed size, centers its content) > legend (shrinks to fit) > items.
    let frame = scene.append_new(root, "g")?;
    scene.set_attr(frame, "width", Value::Number(360.0))?;
    scene.set_attr(frame, "height", Value::Number(48.0))?;
    scene.set_attr(frame, "justify-content", "center".into())?;
    scene.set_attr(frame, "align-items", "center".into())?;
    tree.insert(BoxContainer::new(frame).with_padding(8.0));

    let legend = scene.append_new(frame, "g")?;
    scene.set_attr(legend, "align-items", "center".into())?;
    scene.set_attr(legend, "gap", Value::Number(12.0))?;
    tree.insert(BoxContainer::new(legend).with_margin([0.0, 6.0]));

    let mut now = Duration::ZERO;
    render_legend(
        &mut scene,
        &mut tree,
        legend,
        vec![
            item("a", "Apples", css::FIREBRICK),
            item("b", "Bananas", css::GOLD),
            item("c", "Cherries", css::CRIMSON),
        ],
    )?;
    let ran = tree.handle_events(&mut scene, now)?;
    tracing::info!(ran, "initial layout");

    // Shift the window: `a` exits, `b` and `c` are updated in place, `d` enters.
    now += Duration::from_millis(5);
    render_legend(
        &mut scene,
        &mut tree,
        legend,
        vec![
            item("b", "Bananas", css::GOLD),
            item("c", "Cherries (new)", css::CRIMSON),
            item("d", "Dates", css::SADDLE_BROWN),
        ],
    )?;
    let ran = tree.handle_events(&mut scene, now)?;
    tracing::info!(ran, deadline = ?tree.next_deadline(), "update inside throttle window");

    let settled = settle(&mut scene, &mut tree)?;
    tracing::info!(?settled, "settled");

    println!("{}", svg::scene_to_svg(&scene));
    Ok(())
}
