use super::render_element;
use crate::frame::ContentFrame;
use crate::rich::RichContentRenderer;
use crate::scene::{RenderContext, RenderOptions, resolve_geometry};
use crate::surface::{Baseline, Primitive, SceneNode, SceneSurface};
use diagraphe_core::{Classes, DiagramConfig, TextAnchor};
use serde_json::{Value, json};
use std::sync::Arc;

fn render_with(document: Value, options: &RenderOptions) -> SceneNode {
    let config = DiagramConfig::from_value(&document).unwrap();
    let frame = ContentFrame::resolve(&config, &options.frame).unwrap();
    let mut ctx = RenderContext::new(&frame, options);
    let mut surface = SceneSurface::new();
    let element = &config.elements[0];
    let geometry = resolve_geometry(&element.common, &frame);
    let handle = render_element(&mut surface, &mut ctx, element, geometry).unwrap();
    surface.finish(handle)
}

fn render_one(element: Value) -> SceneNode {
    let options = RenderOptions::default().with_diagram_id("t");
    render_with(
        json!({ "width": 200, "height": 100, "elements": [element] }),
        &options,
    )
}

fn texts(node: &SceneNode) -> Vec<(f64, f64, String, TextAnchor, Option<Baseline>)> {
    let mut out = Vec::new();
    node.walk(&mut |n| {
        if let Primitive::Text {
            x,
            y,
            content,
            style,
        } = &n.primitive
        {
            out.push((*x, *y, content.clone(), style.anchor, style.baseline));
        }
    });
    out
}

#[test]
fn rect_defaults_to_the_content_frame() {
    let options = RenderOptions::default();
    let node = render_with(
        json!({
            "width": 200,
            "height": 100,
            "margin": { "top": 10, "right": 15, "bottom": 25, "left": 35 },
            "elements": [{ "nature": "rect", "classes": "fill-base-200", "opacity": 50 }]
        }),
        &options,
    );
    assert_eq!(node.primitive, Primitive::Group);
    assert_eq!(node.children.len(), 1);
    let rect = &node.children[0];
    assert_eq!(
        rect.primitive,
        Primitive::Rect {
            x: 0.0,
            y: 0.0,
            width: 150.0,
            height: 65.0,
            rx: 0.0
        }
    );
    assert_eq!(rect.attrs.opacity, Some(0.5));
    assert_eq!(rect.attrs.classes, Classes::new(["fill-base-200"]));
}

#[test]
fn element_label_is_middle_anchored_at_the_shape_origin() {
    let node = render_one(json!({
        "nature": "circle", "x": 20, "y": 30, "radius": 8, "label": "c"
    }));
    assert_eq!(node.children.len(), 2);
    let label = &node.children[1];
    assert_eq!(label.attrs.classes, Classes::new(["fill-base-content"]));
    assert_eq!(
        texts(&node),
        vec![(
            20.0,
            30.0,
            "c".to_string(),
            TextAnchor::Middle,
            Some(Baseline::Middle)
        )]
    );
}

#[test]
fn empty_label_is_not_drawn() {
    let node = render_one(json!({ "nature": "circle", "radius": 3, "label": "" }));
    assert_eq!(node.children.len(), 1);
}

#[test]
fn line_label_is_offset_along_the_normal() {
    let node = render_one(json!({
        "nature": "line",
        "x1": 0, "y1": 60, "x2": 150, "y2": 60,
        "strokeWidth": 2,
        "label": "base",
        "labelPosition": "end"
    }));
    let line = &node.children[0];
    assert_eq!(line.attrs.stroke_width, Some(2.0));
    let labels = texts(&node);
    let [(x, y, text, _, baseline)] = &labels[..] else {
        panic!("expected one label");
    };
    assert_eq!((*x, *y), (150.0, 70.0));
    assert_eq!(text, "base");
    assert_eq!(*baseline, None);
}

#[test]
fn dot_is_mapped_and_labelled_to_the_lower_right() {
    let node = render_one(json!({
        "nature": "cartesian_dot", "x": 0, "y": 0, "label": "O"
    }));
    assert_eq!(
        node.children[0].primitive,
        Primitive::Circle {
            cx: 100.0,
            cy: 50.0,
            r: 5.0
        }
    );
    let labels = texts(&node);
    assert_eq!((labels[0].0, labels[0].1), (115.0, 45.0));
}

#[test]
fn function_is_sampled_into_a_path() {
    let node = render_one(json!({
        "nature": "function",
        "f": "x^2",
        "xMin": -1, "xMax": 1, "yMin": -1, "yMax": 1,
        "xStep": 0.5,
        "classes": ["stroke-primary"]
    }));
    let path = &node.children[0];
    let Primitive::Path { d } = &path.primitive else {
        panic!("expected a path, got {:?}", path.primitive);
    };
    assert_eq!(d, "M 0 0 L 50 37.5 L 100 50 L 150 37.5 L 200 0");
    assert_eq!(path.attrs.fill.as_deref(), Some("none"));
    assert_eq!(path.attrs.stroke_width, Some(2.0));
    assert_eq!(path.attrs.classes, Classes::new(["stroke-primary"]));
}

#[test]
fn parametric_curve_uses_its_own_parameter_range() {
    let node = render_one(json!({
        "nature": "parametric_curve",
        "x": "cos(t)", "y": "sin(t)",
        "tMin": 0, "tMax": 6.283185307179586, "tStep": 1.5707963267948966,
        "xMin": -2, "xMax": 2, "yMin": -2, "yMax": 2
    }));
    let Primitive::Path { d } = &node.children[0].primitive else {
        panic!("expected a path");
    };
    assert!(d.starts_with("M 150 50 L 100 25"), "{d}");
    assert_eq!(d.matches('L').count(), 4);
}

#[test]
fn axes_draw_grid_marker_ticks_and_labels() {
    let node = render_one(json!({
        "nature": "axes",
        "xMin": -2, "xMax": 2, "yMin": -2, "yMax": 2,
        "grid": true,
        "xTicks": [-1, 0, 1, 5],
        "yTicks": [0, 1],
        "showTickLabels": true,
        "showAxisLabels": true
    }));
    assert_eq!(node.attrs.opacity, Some(1.0));

    let grid: Vec<_> = node
        .children
        .iter()
        .filter(|c| c.attrs.opacity == Some(0.2))
        .collect();
    assert_eq!(grid.len(), 10);

    let markers: Vec<_> = node
        .children
        .iter()
        .filter_map(|c| match &c.primitive {
            Primitive::Marker(m) => Some(m.id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(markers, vec!["t-arrow-0".to_string()]);
    let arrowed = node
        .children
        .iter()
        .filter(|c| c.attrs.marker_end.as_deref() == Some("t-arrow-0"))
        .count();
    assert_eq!(arrowed, 2);

    let labels = texts(&node);
    let contents: Vec<&str> = labels.iter().map(|l| l.2.as_str()).collect();
    assert_eq!(contents, vec!["-1", "0", "1", "1", "x", "y"]);
    // The x-axis zero sits below-left of the origin (100, 50).
    assert_eq!((labels[1].0, labels[1].1, labels[1].3), (90.0, 72.0, TextAnchor::End));
    assert_eq!((labels[0].0, labels[0].1, labels[0].3), (50.0, 72.0, TextAnchor::Middle));
    assert_eq!((labels[3].0, labels[3].1, labels[3].3), (90.0, 29.0, TextAnchor::End));
    assert_eq!((labels[4].0, labels[4].1, labels[4].3), (200.0, 79.0, TextAnchor::End));
    assert_eq!((labels[5].0, labels[5].1, labels[5].3), (115.0, 14.0, TextAnchor::Start));
}

#[test]
fn random_marker_ids_without_a_diagram_id() {
    let node = render_with(
        json!({ "elements": [{ "nature": "axes" }] }),
        &RenderOptions::default(),
    );
    let id = node
        .children
        .iter()
        .find_map(|c| match &c.primitive {
            Primitive::Marker(m) => Some(m.id.clone()),
            _ => None,
        })
        .unwrap();
    assert!(id.starts_with("arrow-"), "{id}");
    assert_eq!(id.len(), "arrow-".len() + 9);
}

#[test]
fn tree_labels_follow_the_rendering_policy() {
    let node = render_one(json!({
        "nature": "probability_tree",
        "data": {
            "label": "",
            "children": [
                { "label": "A", "probability": 0.4 },
                { "label": "B", "probability": null }
            ]
        }
    }));
    // Two branch groups, then leaf labels (the unlabeled root is skipped).
    assert_eq!(node.children.len(), 4);
    let branch = &node.children[0];
    assert_eq!(branch.children[0].attrs.classes, Classes::new(["stroke-base-content"]));
    assert_eq!(branch.children[0].attrs.stroke_width, Some(2.0));

    let labels = texts(&node);
    let contents: Vec<&str> = labels.iter().map(|l| l.2.as_str()).collect();
    assert_eq!(contents, vec!["0.4", "", "A", "B"]);
    assert_eq!(
        labels[2],
        (
            145.0,
            20.0,
            "A".to_string(),
            TextAnchor::Start,
            Some(Baseline::Middle)
        )
    );
}

#[test]
fn vertical_tree_leaf_labels_hang_below() {
    let node = render_one(json!({
        "nature": "probability_tree",
        "direction": "vertical",
        "data": { "label": "root", "children": [{ "label": "A" }, { "label": "B" }] }
    }));
    let labels = texts(&node);
    let root = labels.iter().find(|l| l.2 == "root").unwrap();
    assert_eq!((root.3, root.4), (TextAnchor::Middle, Some(Baseline::Middle)));
    let a = labels.iter().find(|l| l.2 == "A").unwrap();
    assert_eq!((a.0, a.1), (20.0, 145.0));
    assert_eq!(a.4, Some(Baseline::Hanging));
}

#[test]
fn heatmap_cells_are_shaded_by_intensity() {
    let node = render_one(json!({
        "nature": "heatmap",
        "data": [[0, 1], [null, 2]],
        "classes": ["fill-primary"],
        "zeroClasses": ["zero"],
        "nanClasses": ["nan"],
        "width": 100,
        "height": 100
    }));
    let t = node.attrs.transform.unwrap();
    // Cell size 49, total 100: nothing to centre.
    assert_eq!((t.e, t.f), (0.0, 0.0));
    assert_eq!(node.attrs.classes, Classes::new(["fill-primary"]));

    let cells = &node.children;
    assert_eq!(cells.len(), 4);
    assert_eq!(cells[0].attrs.classes, Classes::new(["zero"]));
    assert_eq!(cells[0].attrs.opacity, None);
    assert_eq!(cells[1].attrs.opacity, Some(0.5));
    assert_eq!(cells[1].attrs.classes, Classes::new(["fill-primary"]));
    assert_eq!(cells[2].attrs.classes, Classes::new(["nan"]));
    assert_eq!(cells[3].attrs.opacity, Some(1.0));
    assert_eq!(
        cells[3].primitive,
        Primitive::Rect {
            x: 51.0,
            y: 51.0,
            width: 49.0,
            height: 49.0,
            rx: 2.0
        }
    );
}

#[test]
fn uniform_heatmap_is_fully_opaque() {
    let node = render_one(json!({ "nature": "heatmap", "data": [[3, 3]] }));
    assert!(node.children.iter().all(|c| c.attrs.opacity == Some(1.0)));
}

#[test]
fn calendar_heatmap_renders_a_week_grid() {
    let node = render_one(json!({
        "nature": "calendar_heatmap", "year": 2024, "month": 2, "values": [1, 2, 3]
    }));
    assert_eq!(node.children.len(), 5 * 7);
}

struct Shout;

impl RichContentRenderer for Shout {
    fn render(&self, html: &str) -> String {
        html.to_uppercase()
    }
}

#[test]
fn canvas_rich_content_cancels_the_margin() {
    let options = RenderOptions::default().with_rich_content(Arc::new(Shout));
    let node = render_with(
        json!({
            "margin": { "top": 10, "left": 35 },
            "elements": [{
                "nature": "foreign_object",
                "x": 5, "y": 6, "foWidth": 80, "foHeight": 20,
                "html": "<b>hi</b>",
                "position": "canvas",
                "label": "note"
            }]
        }),
        &options,
    );
    let t = node.attrs.transform.unwrap();
    assert_eq!((t.e, t.f), (-35.0, -10.0));

    let inner = &node.children[0];
    let Primitive::RichContent { region, html } = &inner.children[0].primitive else {
        panic!("expected rich content");
    };
    assert_eq!(html, "<B>HI</B>");
    assert_eq!((region.width, region.height), (80.0, 20.0));
    let labels = texts(&node);
    assert_eq!((labels[0].0, labels[0].1), (95.0, -4.0));
}

#[test]
fn centred_rich_content_is_a_unit_anchor() {
    let node = render_one(json!({
        "nature": "foreign_object", "x": 40, "y": 40, "centered": true, "html": "x"
    }));
    let Primitive::RichContent { region, html } = &node.children[0].primitive else {
        panic!("expected rich content");
    };
    assert!(region.centered);
    assert_eq!((region.width, region.height), (1.0, 1.0));
    assert_eq!(html, "x");
}
