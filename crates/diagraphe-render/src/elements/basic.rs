use super::{apply_common, with_label};
use crate::scene::ElementGeometry;
use crate::surface::{DrawingSurface, TextStyle};
use diagraphe_core::geom::{Point, point, rect};
use diagraphe_core::{CircleSpec, ElementCommon, LabelPosition, LineSpec, RectSpec};

pub(super) fn render_rect<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    geometry: ElementGeometry,
    spec: &RectSpec,
) -> S::Handle {
    let shape = surface.rect(rect(spec.x, spec.y, geometry.width, geometry.height), 0.0);
    apply_common(surface, &shape, common);
    with_label(surface, common, shape, point(spec.x, spec.y))
}

pub(super) fn render_circle<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    spec: &CircleSpec,
) -> S::Handle {
    let shape = surface.circle(point(spec.x, spec.y), spec.radius);
    apply_common(surface, &shape, common);
    with_label(surface, common, shape, point(spec.x, spec.y))
}

pub(super) fn render_line<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    spec: &LineSpec,
) -> S::Handle {
    let from = point(spec.x1, spec.y1);
    let to = point(spec.x2, spec.y2);
    let shape = surface.line(from, to);
    apply_common(surface, &shape, common);
    surface.set_stroke_width(&shape, spec.stroke_width);

    let group = surface.group();
    surface.append_child(&group, shape);
    if let Some(text) = common.label_text() {
        let at = line_label_position(from, to, common.label_position, common.label_offset);
        let style = TextStyle::new(common.label_font_size, common.label_anchor);
        let label = surface.text(at, text, &style);
        surface.set_classes(&label, &common.label_classes);
        surface.append_child(&group, label);
    }
    group
}

/// Anchor point of a line label: the chosen point along the segment pushed `offset` pixels along
/// the segment's left normal `(-dy, dx) / len`.
///
/// A zero-length segment has no normal; the label sits on the point itself.
pub(crate) fn line_label_position(
    from: Point,
    to: Point,
    position: LabelPosition,
    offset: f64,
) -> Point {
    let base = match position {
        LabelPosition::Start => from,
        LabelPosition::Middle => from.lerp(to, 0.5),
        LabelPosition::End => to,
    };
    let d = to - from;
    let len = d.length();
    if len == 0.0 || !len.is_finite() {
        return base;
    }
    point(
        base.x - d.y / len * offset,
        base.y + d.x / len * offset,
    )
}
