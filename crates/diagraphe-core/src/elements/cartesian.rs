use super::Classes;
use crate::expr::CurveFn;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

fn default_min() -> f64 {
    -10.0
}

fn default_max() -> f64 {
    10.0
}

/// A mathematical coordinate window, paired at render time with the element's pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathBounds {
    #[serde(default = "default_min")]
    pub x_min: f64,
    #[serde(default = "default_max")]
    pub x_max: f64,
    #[serde(default = "default_min")]
    pub y_min: f64,
    #[serde(default = "default_max")]
    pub y_max: f64,
}

impl Default for MathBounds {
    fn default() -> Self {
        Self {
            x_min: default_min(),
            x_max: default_max(),
            y_min: default_min(),
            y_max: default_max(),
        }
    }
}

impl MathBounds {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Rejects non-finite or empty windows.
    pub fn validate(&self) -> Result<()> {
        for (axis, min, max) in [("x", self.x_min, self.x_max), ("y", self.y_min, self.y_max)] {
            if !(min.is_finite() && max.is_finite()) || max <= min {
                return Err(Error::DegenerateBounds { axis, min, max });
            }
        }
        Ok(())
    }
}

fn default_axes_stroke_width() -> f64 {
    1.0
}

fn default_arrow_size() -> f64 {
    6.0
}

fn default_stroke_classes() -> Classes {
    Classes::new(["stroke-base-content"])
}

fn default_fill_classes() -> Classes {
    Classes::new(["fill-base-content"])
}

fn default_grid_opacity() -> f64 {
    0.2
}

fn default_grid_stroke_width() -> f64 {
    0.5
}

fn default_tick_size() -> f64 {
    5.0
}

fn default_tick_label_offset() -> f64 {
    10.0
}

fn default_font_size() -> f64 {
    12.0
}

fn default_x_axis_label() -> String {
    "x".to_string()
}

fn default_y_axis_label() -> String {
    "y".to_string()
}

fn default_axis_label_font_size() -> f64 {
    14.0
}

fn default_axis_label_offset() -> f64 {
    15.0
}

/// `nature: "axes"`: arrowed axes through the math origin, optional grid, ticks and labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxesSpec {
    #[serde(flatten)]
    pub bounds: MathBounds,
    #[serde(default = "default_axes_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_arrow_size")]
    pub arrow_size: f64,

    #[serde(default)]
    pub grid: bool,
    #[serde(default = "default_stroke_classes")]
    pub grid_classes: Classes,
    /// Fraction in 0..=1, unlike element opacity.
    #[serde(default = "default_grid_opacity")]
    pub grid_opacity: f64,
    #[serde(default = "default_grid_stroke_width")]
    pub grid_stroke_width: f64,

    #[serde(default)]
    pub x_ticks: Option<Vec<f64>>,
    #[serde(default)]
    pub y_ticks: Option<Vec<f64>>,
    #[serde(default = "default_tick_size")]
    pub tick_size: f64,
    #[serde(default = "default_stroke_classes")]
    pub tick_classes: Classes,

    #[serde(default)]
    pub show_tick_labels: bool,
    #[serde(default = "default_fill_classes")]
    pub tick_label_classes: Classes,
    #[serde(default = "default_tick_label_offset")]
    pub tick_label_offset: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    #[serde(default)]
    pub show_axis_labels: bool,
    #[serde(default = "default_x_axis_label")]
    pub x_axis_label: String,
    #[serde(default = "default_y_axis_label")]
    pub y_axis_label: String,
    #[serde(default = "default_fill_classes")]
    pub axis_label_classes: Classes,
    #[serde(default = "default_axis_label_font_size")]
    pub axis_label_font_size: f64,
    #[serde(default = "default_axis_label_offset")]
    pub axis_label_offset: f64,
}

impl Default for AxesSpec {
    fn default() -> Self {
        Self {
            bounds: MathBounds::default(),
            stroke_width: default_axes_stroke_width(),
            arrow_size: default_arrow_size(),
            grid: false,
            grid_classes: default_stroke_classes(),
            grid_opacity: default_grid_opacity(),
            grid_stroke_width: default_grid_stroke_width(),
            x_ticks: None,
            y_ticks: None,
            tick_size: default_tick_size(),
            tick_classes: default_stroke_classes(),
            show_tick_labels: false,
            tick_label_classes: default_fill_classes(),
            tick_label_offset: default_tick_label_offset(),
            font_size: default_font_size(),
            show_axis_labels: false,
            x_axis_label: default_x_axis_label(),
            y_axis_label: default_y_axis_label(),
            axis_label_classes: default_fill_classes(),
            axis_label_font_size: default_axis_label_font_size(),
            axis_label_offset: default_axis_label_offset(),
        }
    }
}

impl AxesSpec {
    pub(crate) fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        if !(0.0..=1.0).contains(&self.grid_opacity) {
            return Err(Error::invalid_config(format!(
                "gridOpacity must be within 0..=1, got {}",
                self.grid_opacity
            )));
        }
        Ok(())
    }
}

fn default_step() -> f64 {
    0.01
}

fn default_curve_stroke_width() -> f64 {
    2.0
}

fn default_fill() -> String {
    "none".to_string()
}

/// Upper bound on parameter steps for a single curve.
pub const MAX_CURVE_SAMPLES: usize = 1_000_000;

/// Number of parameter values walked from `t_min` to `t_max` by `step`,
/// `floor((tMax - tMin) / step) + 1`.
///
/// The quotient gets a small tolerance so that a step which divides the range exactly
/// still reaches `tMax` despite float rounding.
pub fn sample_count(t_min: f64, t_max: f64, step: f64) -> Result<usize> {
    if !step.is_finite() || step <= 0.0 {
        return Err(Error::invalid_sampling(format!(
            "step must be a positive finite number, got {step}"
        )));
    }
    if !(t_min.is_finite() && t_max.is_finite()) {
        return Err(Error::invalid_sampling(format!(
            "parameter range must be finite, got [{t_min}, {t_max}]"
        )));
    }
    if t_min > t_max {
        return Err(Error::invalid_sampling(format!(
            "tMin ({t_min}) is greater than tMax ({t_max})"
        )));
    }
    let n = ((t_max - t_min) / step + 1e-9).floor();
    if !n.is_finite() || n >= MAX_CURVE_SAMPLES as f64 {
        return Err(Error::invalid_sampling(format!(
            "{} samples exceed the limit of {MAX_CURVE_SAMPLES}",
            n + 1.0
        )));
    }
    Ok(n as usize + 1)
}

/// `nature: "function"`: the explicit curve `y = f(x)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSpec {
    #[serde(flatten)]
    pub bounds: MathBounds,
    pub f: CurveFn,
    #[serde(default = "default_step", alias = "tStep")]
    pub x_step: f64,
    /// Defaults to `xMin`.
    #[serde(default)]
    pub t_min: Option<f64>,
    /// Defaults to `xMax`.
    #[serde(default)]
    pub t_max: Option<f64>,
    #[serde(default = "default_curve_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_fill")]
    pub fill: String,
}

impl FunctionSpec {
    pub fn new(f: CurveFn) -> Self {
        Self {
            bounds: MathBounds::default(),
            f,
            x_step: default_step(),
            t_min: None,
            t_max: None,
            stroke_width: default_curve_stroke_width(),
            fill: default_fill(),
        }
    }

    pub fn t_range(&self) -> (f64, f64) {
        (
            self.t_min.unwrap_or(self.bounds.x_min),
            self.t_max.unwrap_or(self.bounds.x_max),
        )
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        let (t_min, t_max) = self.t_range();
        sample_count(t_min, t_max, self.x_step).map(|_| ())
    }
}

/// `nature: "parametric_curve"`: the curve `(x(t), y(t))` for `t` in `[tMin, tMax]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParametricCurveSpec {
    #[serde(flatten)]
    pub bounds: MathBounds,
    pub x: CurveFn,
    pub y: CurveFn,
    pub t_min: f64,
    pub t_max: f64,
    #[serde(default = "default_step")]
    pub t_step: f64,
    #[serde(default = "default_curve_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_fill")]
    pub fill: String,
}

impl ParametricCurveSpec {
    pub fn new(x: CurveFn, y: CurveFn, t_min: f64, t_max: f64) -> Self {
        Self {
            bounds: MathBounds::default(),
            x,
            y,
            t_min,
            t_max,
            t_step: default_step(),
            stroke_width: default_curve_stroke_width(),
            fill: default_fill(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        sample_count(self.t_min, self.t_max, self.t_step).map(|_| ())
    }
}

fn default_dot_radius() -> f64 {
    5.0
}

/// `nature: "cartesian_dot"`: a dot at a point given in math coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartesianDotSpec {
    #[serde(flatten)]
    pub bounds: MathBounds,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_dot_radius")]
    pub radius: f64,
}
