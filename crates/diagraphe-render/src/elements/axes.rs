use super::apply_common;
use crate::Result;
use crate::mapper::CoordinateMapper;
use crate::scene::{ElementGeometry, RenderContext};
use crate::surface::{DrawingSurface, MarkerDef, TextStyle};
use diagraphe_core::format::js_number;
use diagraphe_core::geom::{Point, point};
use diagraphe_core::{AxesSpec, ElementCommon, TextAnchor};

/// Grid lines drawn per axis at most; wider integer ranges skip the grid.
pub const MAX_GRID_LINES: usize = 10_000;

const AXIS_STROKE: &str = "black";

pub(super) fn render_axes<S: DrawingSurface>(
    surface: &mut S,
    ctx: &mut RenderContext<'_>,
    common: &ElementCommon,
    geometry: ElementGeometry,
    spec: &AxesSpec,
) -> Result<S::Handle> {
    let mapper = CoordinateMapper::new(spec.bounds, geometry.width, geometry.height)?;
    let (width, height) = (geometry.width, geometry.height);
    // Device x of the y axis, device y of the x axis.
    let axis_y = mapper.to_device_x(0.0);
    let axis_x = mapper.to_device_y(0.0);

    let group = surface.group();
    apply_common(surface, &group, common);

    if spec.grid {
        render_grid(surface, &group, &mapper, spec);
    }

    let marker_id = ctx.next_marker_id();
    let marker = surface.marker(&MarkerDef::arrow(marker_id.clone(), spec.arrow_size));
    surface.append_child(&group, marker);

    for (from, to) in [
        (point(0.0, axis_x), point(width, axis_x)),
        (point(axis_y, height), point(axis_y, 0.0)),
    ] {
        let line = surface.line(from, to);
        surface.set_stroke(&line, AXIS_STROKE);
        surface.set_stroke_width(&line, spec.stroke_width);
        surface.set_marker_end(&line, &marker_id);
        surface.append_child(&group, line);
    }

    let b = &spec.bounds;
    let half = spec.tick_size / 2.0;
    let offset = spec.tick_label_offset;
    if let Some(ticks) = &spec.x_ticks {
        for &v in ticks.iter().filter(|&&v| v >= b.x_min && v <= b.x_max) {
            let x = mapper.to_device_x(v);
            let tick = surface.line(point(x, axis_x - half), point(x, axis_x + half));
            surface.set_classes(&tick, &spec.tick_classes);
            surface.set_stroke_width(&tick, spec.stroke_width);
            surface.append_child(&group, tick);

            if spec.show_tick_labels {
                let y = axis_x + offset + spec.font_size;
                // Zero goes to the lower-left of the origin, shared by both axes.
                let (at, anchor) = if v == 0.0 {
                    (point(axis_y - offset, y), TextAnchor::End)
                } else {
                    (point(x, y), TextAnchor::Middle)
                };
                let label = surface.text(at, &js_number(v), &TextStyle::new(spec.font_size, anchor));
                surface.set_classes(&label, &spec.tick_label_classes);
                surface.append_child(&group, label);
            }
        }
    }
    if let Some(ticks) = &spec.y_ticks {
        for &v in ticks.iter().filter(|&&v| v >= b.y_min && v <= b.y_max) {
            let y = mapper.to_device_y(v);
            let tick = surface.line(point(axis_y - half, y), point(axis_y + half, y));
            surface.set_classes(&tick, &spec.tick_classes);
            surface.set_stroke_width(&tick, spec.stroke_width);
            surface.append_child(&group, tick);

            if spec.show_tick_labels && v != 0.0 {
                let at = point(axis_y - offset, y + spec.font_size / 3.0);
                let style = TextStyle::new(spec.font_size, TextAnchor::End);
                let label = surface.text(at, &js_number(v), &style);
                surface.set_classes(&label, &spec.tick_label_classes);
                surface.append_child(&group, label);
            }
        }
    }

    if spec.show_axis_labels {
        let size = spec.axis_label_font_size;
        let labels = [
            (
                point(width, axis_x + spec.axis_label_offset + size),
                spec.x_axis_label.as_str(),
                TextAnchor::End,
            ),
            (
                point(axis_y + spec.axis_label_offset, size),
                spec.y_axis_label.as_str(),
                TextAnchor::Start,
            ),
        ];
        for (at, text, anchor) in labels {
            let label = surface.text(at, text, &TextStyle::new(size, anchor));
            surface.set_classes(&label, &spec.axis_label_classes);
            surface.append_child(&group, label);
        }
    }

    Ok(group)
}

/// Integers in `[min, max]`, or `None` when there are more than [`MAX_GRID_LINES`].
fn integer_steps(min: f64, max: f64) -> Option<impl Iterator<Item = f64>> {
    let (lo, hi) = (min.ceil(), max.floor());
    let count = if hi < lo { 0.0 } else { hi - lo + 1.0 };
    if count > MAX_GRID_LINES as f64 {
        return None;
    }
    Some((0..count as usize).map(move |i| lo + i as f64))
}

fn render_grid<S: DrawingSurface>(
    surface: &mut S,
    group: &S::Handle,
    mapper: &CoordinateMapper,
    spec: &AxesSpec,
) {
    let b = &spec.bounds;
    let (width, height) = (mapper.width(), mapper.height());
    let draw = |surface: &mut S, from: Point, to: Point| {
        let line = surface.line(from, to);
        surface.set_classes(&line, &spec.grid_classes);
        surface.set_stroke_width(&line, spec.grid_stroke_width);
        surface.set_opacity(&line, spec.grid_opacity);
        surface.append_child(group, line);
    };

    match integer_steps(b.x_min, b.x_max) {
        Some(xs) => {
            for x in xs {
                let sx = mapper.to_device_x(x);
                draw(surface, point(sx, 0.0), point(sx, height));
            }
        }
        None => tracing::warn!(x_min = b.x_min, x_max = b.x_max, "x range too wide for a grid"),
    }
    match integer_steps(b.y_min, b.y_max) {
        Some(ys) => {
            for y in ys {
                let sy = mapper.to_device_y(y);
                draw(surface, point(0.0, sy), point(width, sy));
            }
        }
        None => tracing::warn!(y_min = b.y_min, y_max = b.y_max, "y range too wide for a grid"),
    }
}
