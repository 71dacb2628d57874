use crate::*;
use diagraphe_core::geom::vector;
use diagraphe_core::{
    CurveFn, DiagramConfig, DisplaySize, Element, ElementCommon, ElementKind, FunctionSpec,
};
use serde_json::json;

fn config(v: serde_json::Value) -> DiagramConfig {
    DiagramConfig::from_value(&v).unwrap()
}

#[test]
fn content_group_is_translated_by_the_margins() {
    let cfg = config(json!({
        "width": 200,
        "height": 100,
        "margin": { "top": 10, "right": 15, "bottom": 25, "left": 35 },
        "elements": [{ "nature": "rect" }, { "nature": "circle", "radius": 4 }]
    }));
    let scene = compose_scene(&cfg, &RenderOptions::default()).unwrap();
    let t = scene.root.attrs.transform.unwrap();
    assert_eq!((t.e, t.f), (35.0, 10.0));
    assert_eq!(scene.frame.translation(), vector(35.0, 10.0));
    assert_eq!(scene.root.children.len(), 2);
}

#[test]
fn paint_order_is_document_order() {
    let cfg = config(json!({
        "elements": [
            { "nature": "circle", "radius": 1 },
            { "nature": "rect" },
            { "nature": "line", "x1": 0, "y1": 0, "x2": 1, "y2": 1 }
        ]
    }));
    let scene = compose_scene(&cfg, &RenderOptions::default()).unwrap();
    let kinds: Vec<_> = scene
        .root
        .children
        .iter()
        .map(|g| match &g.children[0].primitive {
            Primitive::Circle { .. } => "circle",
            Primitive::Rect { .. } => "rect",
            Primitive::Line { .. } => "line",
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(kinds, vec!["circle", "rect", "line"]);
}

#[test]
fn geometry_defaults_come_from_the_frame() {
    let cfg = config(json!({
        "width": 300,
        "height": 200,
        "margin": { "left": 20, "right": 30 },
        "elements": [{ "nature": "rect", "height": 40 }]
    }));
    let frame = ContentFrame::resolve(&cfg, &FrameOptions::default()).unwrap();
    let g = resolve_geometry(&cfg.elements[0].common, &frame);
    assert_eq!(g, ElementGeometry { width: 250.0, height: 40.0 });
}

#[test]
fn negative_content_area_fails_before_rendering() {
    let cfg = config(json!({
        "width": 100,
        "height": 100,
        "margin": { "left": 80, "right": 30 },
        "elements": [{ "nature": "rect" }]
    }));
    let err = compose_scene(&cfg, &RenderOptions::default()).unwrap_err();
    assert!(
        matches!(
            err,
            Error::Config(diagraphe_core::Error::NegativeContentArea { .. })
        ),
        "{err}"
    );
}

#[test]
fn render_errors_name_the_element() {
    // Parsing rejects this step, so build the element directly.
    let mut cfg = config(json!({ "elements": [{ "nature": "rect" }] }));
    let mut f = FunctionSpec::new(CurveFn::identity());
    f.x_step = 1e-7;
    cfg.elements.push(Element::new(ElementCommon::default(), ElementKind::Function(f)));
    let err = compose_scene(&cfg, &RenderOptions::default()).unwrap_err();
    let Error::Config(diagraphe_core::Error::InvalidElement {
        index,
        nature,
        message,
    }) = &err
    else {
        panic!("expected an element error, got {err:?}");
    };
    assert_eq!(*index, 1);
    assert_eq!(nature, "function");
    assert!(message.contains("exceed"), "{message}");
}

#[test]
fn diagram_id_makes_output_deterministic() {
    let cfg = config(json!({
        "elements": [{ "nature": "axes" }, { "nature": "axes" }]
    }));
    let options = RenderOptions::default().with_diagram_id("fig");
    let a = render_svg(&cfg, &options).unwrap();
    let b = render_svg(&cfg, &options).unwrap();
    assert_eq!(a, b);
    assert!(a.contains(r#"id="fig-arrow-0""#));
    assert!(a.contains(r#"id="fig-arrow-1""#));
    assert!(a.contains("url(#fig-arrow-1)"));
}

#[test]
fn svg_root_carries_size_view_box_and_classes() {
    let cfg = config(json!({
        "width": 200,
        "height": 100,
        "viewBox": { "minX": -10, "minY": 0, "width": 400 },
        "preserveAspectRatio": "xMinYMid slice",
        "svg": { "classes": ["chart", "dark"] }
    }));
    let svg = render_svg(&cfg, &RenderOptions::default()).unwrap();
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="-10 0 400 100" preserveAspectRatio="xMinYMid slice" class="chart dark">"#), "{svg}");
    assert!(svg.contains(r#"<g transform="translate(0, 0)"/>"#), "{svg}");
}

#[test]
fn responsive_svg_drops_fixed_size() {
    let cfg = config(json!({ "width": "100%", "height": 300, "responsive": true }));
    let svg = render_svg(&cfg, &RenderOptions::default()).unwrap();
    assert!(svg.contains(r#"style="width:100%;height:auto""#));
    assert!(!svg.contains("width=\"100%\""));
    assert!(svg.contains(r#"viewBox="0 0 400 300""#), "{svg}");
}

#[test]
fn resolved_size_pins_fill_dimensions() {
    let cfg = config(json!({ "width": "fill", "height": 120 }));
    let options = RenderOptions {
        frame: FrameOptions {
            fill_fallback: 640.0,
        },
        ..RenderOptions::default()
    };
    let scene = compose_scene(&cfg, &options).unwrap().with_resolved_size();
    assert_eq!(scene.width, DisplaySize::Pixels(640.0));
    assert_eq!(scene.height, DisplaySize::Pixels(120.0));
}

#[test]
fn scene_json_is_tagged_by_kind() {
    let cfg = config(json!({ "elements": [{ "nature": "circle", "radius": 2 }] }));
    let scene = compose_scene(&cfg, &RenderOptions::default()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&scene_json(&scene, false).unwrap()).unwrap();
    assert_eq!(v["root"]["kind"], "group");
    assert_eq!(v["root"]["children"][0]["children"][0]["kind"], "circle");
    assert_eq!(v["frame"]["contentWidth"], 400.0);
    assert!(scene_json(&scene, true).unwrap().contains('\n'));
}

#[test]
fn labels_and_text_are_escaped() {
    let cfg = config(json!({
        "elements": [{ "nature": "circle", "radius": 2, "label": "a < b & c" }]
    }));
    let svg = render_svg(&cfg, &RenderOptions::default()).unwrap();
    assert!(svg.contains(">a &lt; b &amp; c</text>"), "{svg}");
}

#[test]
fn rich_content_is_embedded_as_xhtml() {
    let cfg = config(json!({
        "elements": [{
            "nature": "foreign_object",
            "x": 10, "y": 20, "foWidth": 100, "foHeight": 40,
            "html": "<p>E = mc<sup>2</sup></p>",
            "contentClasses": ["prose"]
        }]
    }));
    let svg = render_svg(&cfg, &RenderOptions::default()).unwrap();
    assert!(svg.contains(r#"<foreignObject x="10" y="20" width="100" height="40" opacity="1"><div xmlns="http://www.w3.org/1999/xhtml" class="prose"><p>E = mc<sup>2</sup></p></div></foreignObject>"#), "{svg}");
}

#[test]
fn custom_surface_receives_every_element() {
    #[derive(Default)]
    struct Counting {
        nodes: usize,
        appends: usize,
    }

    impl DrawingSurface for Counting {
        type Handle = usize;

        fn group(&mut self) -> usize {
            self.nodes += 1;
            self.nodes
        }
        fn rect(&mut self, _: diagraphe_core::geom::Rect, _: f64) -> usize {
            self.group()
        }
        fn circle(&mut self, _: diagraphe_core::geom::Point, _: f64) -> usize {
            self.group()
        }
        fn line(&mut self, _: diagraphe_core::geom::Point, _: diagraphe_core::geom::Point) -> usize {
            self.group()
        }
        fn path(&mut self, _: &str) -> usize {
            self.group()
        }
        fn text(&mut self, _: diagraphe_core::geom::Point, _: &str, _: &surface::TextStyle) -> usize {
            self.group()
        }
        fn rich_content(&mut self, _: &surface::RichContentRegion, _: &str) -> usize {
            self.group()
        }
        fn marker(&mut self, _: &surface::MarkerDef) -> usize {
            self.group()
        }
        fn set_classes(&mut self, _: &usize, _: &diagraphe_core::Classes) {}
        fn set_opacity(&mut self, _: &usize, _: f64) {}
        fn set_stroke(&mut self, _: &usize, _: &str) {}
        fn set_stroke_width(&mut self, _: &usize, _: f64) {}
        fn set_fill(&mut self, _: &usize, _: &str) {}
        fn set_marker_end(&mut self, _: &usize, _: &str) {}
        fn set_transform(&mut self, _: &usize, _: &diagraphe_core::geom::Transform) {}
        fn append_child(&mut self, _: &usize, _: usize) {
            self.appends += 1;
        }
    }

    let cfg = config(json!({
        "elements": [{ "nature": "rect" }, { "nature": "circle", "radius": 1 }]
    }));
    let mut surface = Counting::default();
    let root = render_scene(&cfg, &RenderOptions::default(), &mut surface).unwrap();
    assert_eq!(root, 1);
    // content group + 2 x (group + shape)
    assert_eq!(surface.nodes, 5);
    assert_eq!(surface.appends, 4);
}
