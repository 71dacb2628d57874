//! Curve sampling: discretizes `t -> (x(t), y(t))` into a device-space polyline.

use crate::Result;
use crate::mapper::CoordinateMapper;
use crate::svg::fmt;
use diagraphe_core::geom::{Point, point};
use diagraphe_core::sample_count;
use std::fmt::Write as _;

pub use diagraphe_core::MAX_CURVE_SAMPLES;

/// Inclusive parameter range walked in fixed increments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub t_min: f64,
    pub t_max: f64,
    pub t_step: f64,
}

impl SampleRange {
    pub fn new(t_min: f64, t_max: f64, t_step: f64) -> Self {
        Self {
            t_min,
            t_max,
            t_step,
        }
    }

    /// Number of parameter values, `floor((tMax - tMin) / tStep) + 1`.
    pub fn steps(&self) -> Result<usize> {
        Ok(sample_count(self.t_min, self.t_max, self.t_step)?)
    }

    pub fn values(&self) -> Result<impl Iterator<Item = f64>> {
        let steps = self.steps()?;
        let Self { t_min, t_step, .. } = *self;
        Ok((0..steps).map(move |i| t_min + i as f64 * t_step))
    }
}

/// Evaluates `(x(t), y(t))` over `range` and maps the finite samples to device space.
///
/// A non-finite coordinate drops that sample only.
pub fn sample<X, Y>(
    x_fn: X,
    y_fn: Y,
    range: &SampleRange,
    mapper: &CoordinateMapper,
) -> Result<Vec<Point>>
where
    X: Fn(f64) -> f64,
    Y: Fn(f64) -> f64,
{
    let mut points = Vec::new();
    let mut discarded = 0usize;
    for t in range.values()? {
        let x = x_fn(t);
        let y = y_fn(t);
        if x.is_finite() && y.is_finite() {
            points.push(mapper.to_device(point(x, y)));
        } else {
            discarded += 1;
        }
    }

    tracing::trace!(retained = points.len(), discarded, "sampled curve");
    if discarded > points.len() {
        tracing::warn!(
            retained = points.len(),
            discarded,
            "most curve samples are undefined; check the function and its parameter range"
        );
    }
    Ok(points)
}

/// `M x y L x y ...` through `points`; empty when there are no points.
///
/// Gaps left by discarded samples are bridged by a straight segment: no sub-path break is
/// inserted, so discontinuous functions show a connecting line across the gap.
pub fn polyline_path(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(&mut out, "{cmd} {} {}", fmt(p.x), fmt(p.y));
    }
    out
}
