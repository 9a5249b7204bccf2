// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a [`Scene`] for `plinth_demo`.

use kurbo::Rect;
use peniko::Brush;
use plinth_core::{ElementKind, NodeId, Scene, SceneHost, Value};

/// Serializes the whole scene, with a view box fitted to the root's bounds.
pub(crate) fn scene_to_svg(scene: &Scene) -> String {
    let view_box = scene
        .bbox(scene.root())
        .map(|r| {
            // Add a small padding margin.
            let pad = 10.0;
            Rect::new(r.x0 - pad, r.y0 - pad, r.x1 + pad, r.y1 + pad)
        })
        .unwrap_or_else(|_| Rect::new(0.0, 0.0, 100.0, 100.0));

    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
        view_box.x0,
        view_box.y0,
        view_box.width(),
        view_box.height(),
        view_box.width(),
        view_box.height()
    ));
    out.push('\n');
    for &child in scene.children(scene.root()) {
        write_node(scene, child, 1, &mut out);
    }
    out.push_str("</svg>\n");
    out
}

fn write_node(scene: &Scene, node: NodeId, depth: usize, out: &mut String) {
    let Some(kind) = scene.kind(node) else {
        return;
    };
    let num = |key: &str| scene.attr_f64(node, key).unwrap_or(0.0);
    for _ in 0..depth {
        out.push_str("  ");
    }
    match kind {
        ElementKind::Group => {
            out.push_str("<g");
            write_translate(out, num("x"), num("y"));
            out.push_str(">\n");
            for &child in scene.children(node) {
                write_node(scene, child, depth + 1, out);
            }
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str("</g>\n");
        }
        ElementKind::Rect => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                num("x"),
                num("y"),
                num("width"),
                num("height"),
            ));
            write_paints(scene, node, out);
            out.push_str("/>\n");
        }
        ElementKind::Circle => {
            out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}""#,
                num("cx") + num("x"),
                num("cy") + num("y"),
                num("r"),
            ));
            write_paints(scene, node, out);
            out.push_str("/>\n");
        }
        ElementKind::Line => {
            out.push_str(&format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                num("x1"),
                num("y1"),
                num("x2"),
                num("y2"),
            ));
            write_translate(out, num("x"), num("y"));
            write_paints(scene, node, out);
            out.push_str("/>\n");
        }
        ElementKind::Text => {
            let font_size = scene.attr_f64(node, "font-size").unwrap_or(12.0);
            // Text bounds start at the top-left corner, so hang the glyphs from `y`.
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="hanging""#,
                num("x"),
                num("y"),
                font_size
            ));
            write_paints(scene, node, out);
            out.push('>');
            out.push_str(&escape_xml(scene.attr_str(node, "text").unwrap_or("")));
            out.push_str("</text>\n");
        }
    }
}

fn write_translate(out: &mut String, x: f64, y: f64) {
    if x != 0.0 || y != 0.0 {
        out.push_str(&format!(r#" transform="translate({x} {y})""#));
    }
}

fn write_paints(scene: &Scene, node: NodeId, out: &mut String) {
    for name in ["fill", "stroke"] {
        if let Some(brush) = scene.attr(node, name).and_then(Value::as_paint) {
            write_paint_attr(out, name, brush);
        }
    }
    if let Some(w) = scene.attr_f64(node, "stroke-width") {
        out.push_str(&format!(r#" stroke-width="{w}""#));
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
