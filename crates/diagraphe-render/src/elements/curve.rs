use super::{apply_common, with_label};
use crate::Result;
use crate::mapper::CoordinateMapper;
use crate::sample::{SampleRange, polyline_path, sample};
use crate::scene::ElementGeometry;
use crate::surface::DrawingSurface;
use diagraphe_core::geom::{Point, point};
use diagraphe_core::{CartesianDotSpec, ElementCommon, FunctionSpec, ParametricCurveSpec};

pub(super) fn render_function<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    geometry: ElementGeometry,
    spec: &FunctionSpec,
) -> Result<S::Handle> {
    let mapper = CoordinateMapper::new(spec.bounds, geometry.width, geometry.height)?;
    let (t_min, t_max) = spec.t_range();
    let range = SampleRange::new(t_min, t_max, spec.x_step);
    let points = sample(|t| t, |t| spec.f.eval(t), &range, &mapper)?;
    Ok(curve_path(
        surface,
        common,
        &points,
        spec.stroke_width,
        &spec.fill,
    ))
}

pub(super) fn render_parametric<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    geometry: ElementGeometry,
    spec: &ParametricCurveSpec,
) -> Result<S::Handle> {
    let mapper = CoordinateMapper::new(spec.bounds, geometry.width, geometry.height)?;
    let range = SampleRange::new(spec.t_min, spec.t_max, spec.t_step);
    let points = sample(|t| spec.x.eval(t), |t| spec.y.eval(t), &range, &mapper)?;
    Ok(curve_path(
        surface,
        common,
        &points,
        spec.stroke_width,
        &spec.fill,
    ))
}

/// A sampled curve as a path. Its label follows the curve's last point.
fn curve_path<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    points: &[Point],
    stroke_width: f64,
    fill: &str,
) -> S::Handle {
    let shape = surface.path(&polyline_path(points));
    apply_common(surface, &shape, common);
    surface.set_stroke_width(&shape, stroke_width);
    surface.set_fill(&shape, fill);

    let label_at = points.last().map_or(point(0.0, 0.0), |p| {
        point(p.x + common.label_offset, p.y - common.label_offset)
    });
    with_label(surface, common, shape, label_at)
}

pub(super) fn render_dot<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    geometry: ElementGeometry,
    spec: &CartesianDotSpec,
) -> Result<S::Handle> {
    let mapper = CoordinateMapper::new(spec.bounds, geometry.width, geometry.height)?;
    let center = mapper.to_device(point(spec.x, spec.y));
    let shape = surface.circle(center, spec.radius);
    apply_common(surface, &shape, common);

    let offset = common.label_offset;
    let label_at = point(
        center.x + spec.radius + offset,
        center.y + spec.radius - offset,
    );
    Ok(with_label(surface, common, shape, label_at))
}
