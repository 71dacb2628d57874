use super::apply_common;
use crate::scene::ElementGeometry;
use crate::surface::DrawingSurface;
use diagraphe_core::geom::{Transform, rect};
use diagraphe_core::{ElementCommon, HeatmapStyle};

/// Square-cell grid geometry fitted into a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapGrid {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f64,
    pub total_width: f64,
    pub total_height: f64,
    /// Translation that centres the grid in the box.
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Largest square cell such that `rows x cols` cells separated by `gap` fit in `width x height`.
pub fn heatmap_grid(rows: usize, cols: usize, gap: f64, width: f64, height: f64) -> HeatmapGrid {
    let (r, c) = (rows.max(1) as f64, cols.max(1) as f64);
    let cell_size = ((width - (c - 1.0) * gap) / c)
        .min((height - (r - 1.0) * gap) / r)
        .max(0.0);
    let total_width = c * cell_size + (c - 1.0) * gap;
    let total_height = r * cell_size + (r - 1.0) * gap;
    HeatmapGrid {
        rows,
        cols,
        cell_size,
        total_width,
        total_height,
        offset_x: (width - total_width) / 2.0,
        offset_y: (height - total_height) / 2.0,
    }
}

/// `(min, max)` over finite values, or `None` when there are none.
fn value_range(data: &[Vec<Option<f64>>]) -> Option<(f64, f64)> {
    data.iter()
        .flatten()
        .filter_map(|v| v.filter(|v| v.is_finite()))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

pub(super) fn render_heatmap<S: DrawingSurface>(
    surface: &mut S,
    common: &ElementCommon,
    geometry: ElementGeometry,
    data: &[Vec<Option<f64>>],
    style: &HeatmapStyle,
) -> S::Handle {
    let rows = data.len();
    let cols = data.first().map_or(0, Vec::len);
    let grid = heatmap_grid(rows, cols, style.offset, geometry.width, geometry.height);
    let range = value_range(data);
    tracing::debug!(rows, cols, cell_size = grid.cell_size, "heatmap grid");

    let group = surface.group();
    surface.set_transform(&group, &Transform::translation(grid.offset_x, grid.offset_y));
    apply_common(surface, &group, common);

    let pitch = grid.cell_size + style.offset;
    for (i, row) in data.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let cell = surface.rect(
                rect(j as f64 * pitch, i as f64 * pitch, grid.cell_size, grid.cell_size),
                style.radius,
            );
            match (value.filter(|v| v.is_finite()), range) {
                (Some(v), Some((lo, hi))) => {
                    let intensity = if hi > lo { (v - lo) / (hi - lo) } else { 1.0 };
                    if intensity == 0.0 {
                        surface.set_classes(&cell, &style.zero_classes);
                    } else {
                        surface.set_opacity(&cell, intensity);
                        surface.set_classes(&cell, &common.classes);
                    }
                }
                _ => surface.set_classes(&cell, &style.nan_classes),
            }
            surface.append_child(&group, cell);
        }
    }
    group
}
