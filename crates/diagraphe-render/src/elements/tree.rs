use super::apply_common;
use super::basic::line_label_position;
use crate::surface::{Baseline, DrawingSurface, TextStyle};
use crate::tree::{TreeLayout, TreeLayoutOptions, layout_tree};
use diagraphe_core::format::js_number;
use diagraphe_core::geom::point;
use diagraphe_core::{ElementCommon, LabelPosition, ProbabilityTreeSpec, TextAnchor, TreeDirection};

/// Distance between a leaf and its label along the depth axis.
const LEAF_LABEL_NUDGE: f64 = 5.0;

pub(super) fn render_tree<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    spec: &ProbabilityTreeSpec,
) -> S::Handle {
    let layout = layout_tree(&spec.data, &TreeLayoutOptions::from(spec));
    draw_tree(surface, common, spec, &layout)
}

fn draw_tree<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    spec: &ProbabilityTreeSpec,
    layout: &TreeLayout,
) -> S::Handle {
    let group = surface.group();
    apply_common(surface, &group, common);

    let font_size = common.label_font_size;
    for branch in &layout.branches {
        let (from, to) = (branch.start.to_point(), branch.end.to_point());
        let line = surface.line(from, to);
        surface.set_classes(&line, &spec.branch_classes);
        surface.set_stroke_width(&line, spec.stroke_width);

        let text = branch.probability.map(js_number).unwrap_or_default();
        let at = line_label_position(from, to, LabelPosition::Middle, common.label_offset);
        let label = surface.text(at, &text, &TextStyle::new(font_size, TextAnchor::Middle));
        surface.set_classes(&label, &common.label_classes);

        let wrapper = surface.group();
        surface.append_child(&wrapper, line);
        surface.append_child(&wrapper, label);
        surface.append_child(&group, wrapper);
    }

    for node in &layout.nodes {
        if node.depth == 0 && node.label.is_empty() {
            continue;
        }
        let (at, style) = if !node.is_leaf {
            (
                point(node.x, node.y),
                TextStyle::new(font_size, TextAnchor::Middle).with_baseline(Baseline::Middle),
            )
        } else {
            match spec.direction {
                TreeDirection::Horizontal => (
                    point(node.x + LEAF_LABEL_NUDGE, node.y),
                    TextStyle::new(font_size, TextAnchor::Start).with_baseline(Baseline::Middle),
                ),
                TreeDirection::Vertical => (
                    point(node.x, node.y + LEAF_LABEL_NUDGE),
                    TextStyle::new(font_size, TextAnchor::Middle).with_baseline(Baseline::Hanging),
                ),
            }
        };
        let label = surface.text(at, &node.label, &style);
        surface.set_classes(&label, &common.label_classes);
        surface.append_child(&group, label);
    }
    group
}
