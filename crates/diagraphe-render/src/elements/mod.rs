//! Per-kind element renderers.
//!
//! Each renderer turns one validated element into a subtree on a [`DrawingSurface`] and returns
//! its top-level handle; the composer appends it to the content group in document order.

mod axes;
mod basic;
mod curve;
mod foreign;
mod heatmap;
mod tree;

pub use heatmap::{HeatmapGrid, heatmap_grid};

use crate::Result;
use crate::scene::{ElementGeometry, RenderContext};
use crate::surface::{Baseline, DrawingSurface, TextStyle};
use diagraphe_core::geom::Point;
use diagraphe_core::{Element, ElementCommon, ElementKind};

/// Dispatches on the element kind.
pub fn render_element<S: DrawingSurface>(
    surface: &mut S,
    ctx: &mut RenderContext<'_>,
    element: &Element,
    geometry: ElementGeometry,
) -> Result<S::Handle> {
    let common = &element.common;
    match &element.kind {
        ElementKind::Rect(spec) => Ok(basic::render_rect(surface, common, geometry, spec)),
        ElementKind::Circle(spec) => Ok(basic::render_circle(surface, common, spec)),
        ElementKind::Line(spec) => Ok(basic::render_line(surface, common, spec)),
        ElementKind::Axes(spec) => axes::render_axes(surface, ctx, common, geometry, spec),
        ElementKind::Function(spec) => curve::render_function(surface, common, geometry, spec),
        ElementKind::ParametricCurve(spec) => {
            curve::render_parametric(surface, common, geometry, spec)
        }
        ElementKind::CartesianDot(spec) => curve::render_dot(surface, common, geometry, spec),
        ElementKind::RichContent(spec) => {
            Ok(foreign::render_rich_content(surface, ctx, common, spec))
        }
        ElementKind::ProbabilityTree(spec) => Ok(tree::render_tree(surface, common, spec)),
        ElementKind::Heatmap(spec) => Ok(heatmap::render_heatmap(
            surface,
            common,
            geometry,
            &spec.data,
            &spec.style,
        )),
        ElementKind::CalendarHeatmap(spec) => {
            let data = spec.matrix()?;
            Ok(heatmap::render_heatmap(
                surface,
                common,
                geometry,
                &data,
                &spec.style,
            ))
        }
    }
}

/// The element's label text node at `at`, if it has a label.
fn element_label<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    at: Point,
) -> Option<S::Handle> {
    let text = common.label_text()?;
    let style =
        TextStyle::new(common.label_font_size, common.label_anchor).with_baseline(Baseline::Middle);
    let node = surface.text(at, text, &style);
    surface.set_classes(&node, &common.label_classes);
    Some(node)
}

/// Wraps `shape` in a group together with the element label (if any).
fn with_label<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    shape: S::Handle,
    label_at: Point,
) -> S::Handle {
    let group = surface.group();
    surface.append_child(&group, shape);
    if let Some(label) = element_label(surface, common, label_at) {
        surface.append_child(&group, label);
    }
    group
}

/// Applies the element's classes and opacity to `node`.
fn apply_common<S: DrawingSurface>(surface: &mut S, node: &S::Handle, common: &ElementCommon) {
    if !common.classes.is_empty() {
        surface.set_classes(node, &common.classes);
    }
    surface.set_opacity(node, common.opacity_fraction());
}

#[cfg(test)]
mod tests;
