use crate::*;
use serde_json::json;

#[test]
fn empty_document_uses_defaults() {
    let cfg = DiagramConfig::from_value(&json!({})).unwrap();
    assert_eq!(cfg.width, DisplaySize::Pixels(400.0));
    assert_eq!(cfg.height, DisplaySize::Pixels(400.0));
    assert_eq!(cfg.view_box, None);
    assert_eq!(cfg.margin, Margin::default());
    assert_eq!(cfg.preserve_aspect_ratio.to_string(), "xMidYMid meet");
    assert!(!cfg.responsive);
    assert!(cfg.svg.classes.is_empty());
    assert!(cfg.elements.is_empty());
}

#[test]
fn non_object_document_is_rejected() {
    let err = DiagramConfig::from_value(&json!([1, 2])).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }), "{err}");
}

#[test]
fn display_sizes_accept_fill_markers() {
    let cfg = DiagramConfig::from_value(&json!({ "width": "100%", "height": "fill" })).unwrap();
    assert_eq!(cfg.width, DisplaySize::Fill);
    assert_eq!(cfg.height, DisplaySize::Fill);
    assert_eq!(cfg.width.resolve(640.0), 640.0);

    let cfg = DiagramConfig::from_value(&json!({ "width": "320px", "height": 200 })).unwrap();
    assert_eq!(cfg.width, DisplaySize::Pixels(320.0));
    assert_eq!(cfg.height, DisplaySize::Pixels(200.0));

    assert!(DiagramConfig::from_value(&json!({ "width": "wide" })).is_err());
    assert!(DiagramConfig::from_value(&json!({ "width": -5 })).is_err());
}

#[test]
fn preserve_aspect_ratio_parses_svg_syntax() {
    let par: PreserveAspectRatio = "xMinYMax slice".parse().unwrap();
    assert_eq!(par.align_x, Align::Min);
    assert_eq!(par.align_y, Align::Max);
    assert_eq!(par.policy, AspectPolicy::Slice);
    assert_eq!(par.to_string(), "xMinYMax slice");

    let par: PreserveAspectRatio = "xMaxYMid".parse().unwrap();
    assert_eq!(par.policy, AspectPolicy::Meet);

    assert_eq!(
        "none".parse::<PreserveAspectRatio>().unwrap(),
        PreserveAspectRatio::none()
    );
    assert!("xLeftYTop".parse::<PreserveAspectRatio>().is_err());
    assert!("xMidYMid meet extra".parse::<PreserveAspectRatio>().is_err());
}

#[test]
fn canvas_fields_are_camel_case() {
    let cfg = DiagramConfig::from_value(&json!({
        "width": 200,
        "height": 100,
        "viewBox": { "minX": -10, "minY": 5, "width": 50 },
        "preserveAspectRatio": "none",
        "margin": { "top": 10, "right": 15, "bottom": 25, "left": 35 },
        "responsive": true,
        "svg": { "classes": "chart  dark" }
    }))
    .unwrap();
    assert_eq!(
        cfg.view_box,
        Some(ViewBoxSpec {
            min_x: -10.0,
            min_y: 5.0,
            width: Some(50.0),
            height: None,
        })
    );
    assert_eq!(cfg.preserve_aspect_ratio.policy, AspectPolicy::None);
    assert_eq!(cfg.margin, Margin::new(10.0, 15.0, 25.0, 35.0));
    assert!(cfg.responsive);
    assert_eq!(cfg.svg.classes, Classes::new(["chart", "dark"]));
}

#[test]
fn elements_keep_document_order() {
    let cfg = DiagramConfig::from_value(&json!({
        "elements": [
            { "nature": "rect", "width": 10, "height": 10 },
            { "nature": "circle", "radius": 4 },
            { "nature": "line", "x1": 0, "y1": 0, "x2": 5, "y2": 5 },
            { "nature": "axes" },
        ]
    }))
    .unwrap();
    let natures: Vec<_> = cfg.elements.iter().map(Element::nature).collect();
    assert_eq!(natures, ["rect", "circle", "line", "axes"]);
}

#[test]
fn unknown_nature_is_fatal() {
    let err = DiagramConfig::from_value(&json!({
        "elements": [
            { "nature": "rect" },
            { "nature": "hexagon" },
        ]
    }))
    .unwrap_err();
    match err {
        Error::UnknownElementKind { index, nature } => {
            assert_eq!(index, 1);
            assert_eq!(nature, "hexagon");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_nature_defaults_to_rect() {
    let cfg = DiagramConfig::from_value(&json!({
        "elements": [{ "width": 10, "height": 10 }, { "nature": null }]
    }))
    .unwrap();
    let natures: Vec<_> = cfg.elements.iter().map(Element::nature).collect();
    assert_eq!(natures, ["rect", "rect"]);
}

#[test]
fn non_string_nature_is_fatal() {
    let err = DiagramConfig::from_value(&json!({ "elements": [{ "nature": 3 }] })).unwrap_err();
    match err {
        Error::InvalidElement { index, message, .. } => {
            assert_eq!(index, 0);
            assert!(message.contains("nature"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_required_fields_are_fatal() {
    for element in [
        json!({ "nature": "circle" }),
        json!({ "nature": "line", "x1": 0, "y1": 0, "x2": 1 }),
        json!({ "nature": "function" }),
        json!({ "nature": "parametric_curve", "x": "cos(t)", "y": "sin(t)", "tMin": 0 }),
        json!({ "nature": "cartesian_dot", "x": 1 }),
        json!({ "nature": "probability_tree" }),
        json!({ "nature": "heatmap" }),
    ] {
        let err = DiagramConfig::from_value(&json!({ "elements": [element] })).unwrap_err();
        assert!(
            matches!(err, Error::InvalidElement { index: 0, .. }),
            "{element}: {err}"
        );
    }
}

#[test]
fn shared_fields_have_documented_defaults() {
    let cfg = DiagramConfig::from_value(&json!({
        "elements": [{ "nature": "rect" }]
    }))
    .unwrap();
    let common = &cfg.elements[0].common;
    assert!(common.classes.is_empty());
    assert_eq!(common.opacity, 100.0);
    assert_eq!(common.opacity_fraction(), 1.0);
    assert_eq!(common.width, None);
    assert_eq!(common.height, None);
    assert_eq!(common.label, None);
    assert_eq!(common.label_classes, Classes::new(["fill-base-content"]));
    assert_eq!(common.label_font_size, 12.0);
    assert_eq!(common.label_offset, 10.0);
    assert_eq!(common.label_position, LabelPosition::Middle);
    assert_eq!(common.label_anchor, TextAnchor::Middle);
}

#[test]
fn opacity_out_of_range_is_rejected() {
    let err = DiagramConfig::from_value(&json!({
        "elements": [{ "nature": "rect", "opacity": 150 }]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("opacity"), "{err}");
}

#[test]
fn classes_accept_strings_and_lists() {
    let cfg = DiagramConfig::from_value(&json!({
        "elements": [
            { "nature": "rect", "classes": "fill-primary stroke-none" },
            { "nature": "rect", "classes": ["a", "b c"] },
        ]
    }))
    .unwrap();
    assert_eq!(
        cfg.elements[0].common.classes,
        Classes::new(["fill-primary", "stroke-none"])
    );
    assert_eq!(cfg.elements[1].common.classes, Classes::new(["a", "b", "c"]));
}

#[test]
fn degenerate_math_bounds_are_rejected() {
    let err = DiagramConfig::from_value(&json!({
        "elements": [{ "nature": "axes", "xMin": 3, "xMax": 3 }]
    }))
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Degenerate x bounds"), "{msg}");
}

#[test]
fn function_defaults_follow_math_bounds() {
    let cfg = DiagramConfig::from_value(&json!({
        "elements": [{ "nature": "function", "f": "x^2", "xMin": -5, "xMax": 5, "tStep": 1 }]
    }))
    .unwrap();
    let ElementKind::Function(spec) = &cfg.elements[0].kind else {
        panic!("expected a function element");
    };
    assert_eq!(spec.t_range(), (-5.0, 5.0));
    assert_eq!(spec.x_step, 1.0);
    assert_eq!(spec.stroke_width, 2.0);
    assert_eq!(spec.fill, "none");
    assert_eq!(spec.f.eval(3.0), 9.0);
}

#[test]
fn invalid_sampling_is_rejected_at_parse_time() {
    for element in [
        json!({ "nature": "function", "f": "x", "xStep": 0 }),
        json!({ "nature": "function", "f": "x", "xStep": -0.5 }),
        json!({ "nature": "parametric_curve", "x": "t", "y": "t", "tMin": 2, "tMax": 1 }),
        json!({ "nature": "function", "f": "x", "xStep": 1e-9 }),
    ] {
        let err = DiagramConfig::from_value(&json!({ "elements": [element] })).unwrap_err();
        assert!(
            err.to_string().contains("Invalid curve sampling"),
            "{element}: {err}"
        );
    }
}

#[test]
fn sample_count_includes_both_ends() {
    assert_eq!(sample_count(0.0, 1.0, 0.1).unwrap(), 11);
    assert_eq!(sample_count(2.0, 2.0, 0.5).unwrap(), 1);
    let err = sample_count(-10.0, 10.0, 1e-9).unwrap_err();
    assert!(err.to_string().contains("exceed"), "{err}");
}

#[test]
fn bad_expression_names_the_element() {
    let err = DiagramConfig::from_value(&json!({
        "elements": [{ "nature": "function", "f": "foo(x)" }]
    }))
    .unwrap_err();
    match err {
        Error::InvalidElement { nature, message, .. } => {
            assert_eq!(nature, "function");
            assert!(message.contains("foo"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn tree_nodes_treat_null_children_as_leaves() {
    let cfg = DiagramConfig::from_value(&json!({
        "elements": [{
            "nature": "probability_tree",
            "data": {
                "label": "",
                "children": [
                    { "label": "A", "probability": 0.4, "children": null },
                    { "label": "B", "probability": null },
                ]
            }
        }]
    }))
    .unwrap();
    let ElementKind::ProbabilityTree(spec) = &cfg.elements[0].kind else {
        panic!("expected a probability tree");
    };
    assert_eq!(spec.direction, TreeDirection::Horizontal);
    assert_eq!(spec.node_spacing, 50.0);
    assert_eq!(spec.level_spacing, 100.0);
    assert_eq!(spec.leaf_spacing, 20.0);
    assert_eq!(spec.data.count(), 3);
    assert!(spec.data.children[0].is_leaf());
    assert_eq!(spec.data.children[0].probability, Some(0.4));
    assert_eq!(spec.data.children[1].probability, None);
}

#[test]
fn rich_content_defaults() {
    let cfg = DiagramConfig::from_value(&json!({
        "elements": [
            { "nature": "foreign_object", "html": "<b>hi</b>", "foWidth": 80, "foHeight": 20 },
            { "nature": "foreign_object", "centered": true, "foWidth": 80, "position": "canvas" },
        ]
    }))
    .unwrap();
    let ElementKind::RichContent(a) = &cfg.elements[0].kind else {
        panic!("expected rich content");
    };
    assert_eq!(a.region_size(), (80.0, 20.0));
    assert_eq!(a.position, RichContentPosition::Frame);
    let ElementKind::RichContent(b) = &cfg.elements[1].kind else {
        panic!("expected rich content");
    };
    assert_eq!(b.region_size(), (1.0, 1.0));
    assert_eq!(b.position, RichContentPosition::Canvas);
}

#[test]
fn calendar_heatmap_validates_month() {
    let err = DiagramConfig::from_value(&json!({
        "elements": [{ "nature": "calendar_heatmap", "year": 2024, "month": 13 }]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("calendar"), "{err}");
}

#[test]
fn yaml_and_json5_inputs_match_json() {
    let json = r#"{"width": 300, "margin": {"left": 20}, "elements": [{"nature": "circle", "radius": 3}]}"#;
    let yaml = "width: 300\nmargin:\n  left: 20\nelements:\n  - nature: circle\n    radius: 3\n";
    let json5 = "{ width: 300, margin: { left: 20 }, elements: [{ nature: 'circle', radius: 3, },], }";

    let a = DiagramConfig::from_json(json).unwrap();
    let b = DiagramConfig::from_yaml(yaml).unwrap();
    let c = DiagramConfig::from_json5(json5).unwrap();
    for cfg in [&b, &c] {
        assert_eq!(cfg.width, a.width);
        assert_eq!(cfg.margin, a.margin);
        assert_eq!(cfg.elements.len(), 1);
        assert_eq!(cfg.elements[0].nature(), "circle");
    }
}

#[test]
fn config_format_from_extension() {
    assert_eq!(ConfigFormat::from_extension("YML"), Some(ConfigFormat::Yaml));
    assert_eq!(ConfigFormat::from_extension("json5"), Some(ConfigFormat::Json5));
    assert_eq!(ConfigFormat::from_extension("toml"), None);
    assert!("xml".parse::<ConfigFormat>().is_err());
}
