//! SVG serialization of a composed [`Scene`].

use crate::scene::Scene;
use crate::surface::{Affine, Attributes, Primitive, SceneNode};
use diagraphe_core::Classes;
use std::fmt::Write as _;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

pub fn render_scene_svg(scene: &Scene) -> String {
    let mut out = String::new();
    let _ = write!(&mut out, r#"<svg xmlns="{SVG_NS}""#);
    if scene.responsive {
        out.push_str(r#" style="width:100%;height:auto""#);
    } else {
        let _ = write!(
            &mut out,
            r#" width="{}" height="{}""#,
            escape_attr(&scene.width.to_string()),
            escape_attr(&scene.height.to_string())
        );
    }
    let vb = &scene.frame.view_box;
    let _ = write!(
        &mut out,
        r#" viewBox="{} {} {} {}" preserveAspectRatio="{}""#,
        fmt(vb.min_x),
        fmt(vb.min_y),
        fmt(vb.width),
        fmt(vb.height),
        scene.frame.preserve_aspect_ratio
    );
    write_classes(&mut out, &scene.classes);
    out.push_str(">\n");
    write_node(&mut out, &scene.root);
    out.push_str("\n</svg>\n");
    out
}

fn write_node(out: &mut String, node: &SceneNode) {
    match &node.primitive {
        Primitive::Group => {
            out.push_str("<g");
            write_attrs(out, &node.attrs);
            if node.children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in &node.children {
                write_node(out, child);
            }
            out.push_str("</g>");
        }
        Primitive::Rect {
            x,
            y,
            width,
            height,
            rx,
        } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt(*x),
                fmt(*y),
                fmt(*width),
                fmt(*height)
            );
            if *rx > 0.0 {
                let _ = write!(out, r#" rx="{}" ry="{}""#, fmt(*rx), fmt(*rx));
            }
            write_attrs(out, &node.attrs);
            out.push_str("/>");
        }
        Primitive::Circle { cx, cy, r } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                fmt(*cx),
                fmt(*cy),
                fmt(*r)
            );
            write_attrs(out, &node.attrs);
            out.push_str("/>");
        }
        Primitive::Line { x1, y1, x2, y2 } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                fmt(*x1),
                fmt(*y1),
                fmt(*x2),
                fmt(*y2)
            );
            write_attrs(out, &node.attrs);
            out.push_str("/>");
        }
        Primitive::Path { d } => {
            let _ = write!(out, r#"<path d="{}""#, escape_attr(d));
            write_attrs(out, &node.attrs);
            out.push_str("/>");
        }
        Primitive::Text {
            x,
            y,
            content,
            style,
        } => {
            let _ = write!(out, r#"<text x="{}" y="{}""#, fmt(*x), fmt(*y));
            write_attrs(out, &node.attrs);
            let _ = write!(
                out,
                r#" font-size="{}" text-anchor="{}""#,
                fmt(style.font_size),
                style.anchor.as_str()
            );
            if let Some(baseline) = style.baseline {
                let _ = write!(out, r#" dominant-baseline="{}""#, baseline.as_str());
            }
            let _ = write!(out, ">{}</text>", escape_xml(content));
        }
        Primitive::RichContent { region, html } => {
            let _ = write!(
                out,
                r#"<foreignObject x="{}" y="{}" width="{}" height="{}""#,
                fmt(region.x),
                fmt(region.y),
                fmt(region.width),
                fmt(region.height)
            );
            write_attrs(out, &node.attrs);
            if region.centered {
                out.push_str(r#" style="overflow: visible;""#);
            }
            let _ = write!(out, r#"><div xmlns="{XHTML_NS}""#);
            write_classes(out, &region.content_classes);
            if region.centered {
                out.push_str(
                    r#" style="display: inline-block; transform: translate(-50%, -50%); overflow: visible;""#,
                );
            }
            let _ = write!(out, ">{html}</div></foreignObject>");
        }
        Primitive::Marker(m) => {
            let _ = write!(
                out,
                r#"<defs><marker id="{}" markerWidth="{}" markerHeight="{}" refX="{}" refY="{}" orient="auto"><path d="{}" fill="{}"/></marker></defs>"#,
                escape_attr(&m.id),
                fmt(m.width),
                fmt(m.height),
                fmt(m.ref_x),
                fmt(m.ref_y),
                escape_attr(&m.path),
                escape_attr(&m.fill)
            );
        }
    }
}

fn write_classes(out: &mut String, classes: &Classes) {
    if classes.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#" class="{}""#,
        escape_attr(&classes.as_slice().join(" "))
    );
}

fn write_attrs(out: &mut String, attrs: &Attributes) {
    write_classes(out, &attrs.classes);
    if let Some(v) = attrs.opacity {
        let _ = write!(out, r#" opacity="{}""#, fmt(v));
    }
    if let Some(v) = &attrs.stroke {
        let _ = write!(out, r#" stroke="{}""#, escape_attr(v));
    }
    if let Some(v) = attrs.stroke_width {
        let _ = write!(out, r#" stroke-width="{}""#, fmt(v));
    }
    if let Some(v) = &attrs.fill {
        let _ = write!(out, r#" fill="{}""#, escape_attr(v));
    }
    if let Some(v) = &attrs.marker_end {
        let _ = write!(out, r#" marker-end="url(#{})""#, escape_attr(v));
    }
    if let Some(t) = &attrs.transform {
        let _ = write!(out, r#" transform="{}""#, transform_attr(t));
    }
}

fn transform_attr(t: &Affine) -> String {
    if t.is_translation() {
        format!("translate({}, {})", fmt(t.e), fmt(t.f))
    } else {
        format!(
            "matrix({} {} {} {} {} {})",
            fmt(t.a),
            fmt(t.b),
            fmt(t.c),
            fmt(t.d),
            fmt(t.e),
            fmt(t.f)
        )
    }
}

/// Number formatting for SVG attributes: shortest round-trip decimal, without `-0` or tiny
/// float noise from our own arithmetic.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
