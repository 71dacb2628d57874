#![forbid(unsafe_code)]

//! Declarative scene configuration for diagraphe (headless).
//!
//! A configuration describes a canvas (display size, logical viewport, aspect-ratio policy,
//! margins) and an ordered list of typed elements. This crate parses and validates such
//! documents from JSON, YAML or JSON5; layout and rendering live in `diagraphe-render`.
//!
//! Everything is validated up front, so a [`DiagramConfig`] that parsed successfully never
//! contains an unknown element kind or a missing required field.

pub mod config;
pub mod elements;
pub mod error;
pub mod expr;
pub mod format;
pub mod geom;

pub use config::{
    Align, AspectPolicy, ConfigFormat, DEFAULT_DISPLAY_SIZE, DiagramConfig, DisplaySize, Margin,
    PreserveAspectRatio, SvgSpec, ViewBoxSpec,
};
pub use elements::{
    AxesSpec, CalendarHeatmapSpec, CartesianDotSpec, CircleSpec, Classes, Element, ElementCommon,
    ElementKind, FunctionSpec, HeatmapSpec, HeatmapStyle, LabelPosition, LineSpec,
    MAX_CURVE_SAMPLES, MathBounds, ParametricCurveSpec, ProbabilityTreeSpec, RectSpec,
    RichContentPosition, RichContentSpec, TextAnchor, TreeDirection, TreeNode, sample_count,
};
pub use error::{Error, Result};
pub use expr::{CurveFn, Expr};

#[cfg(test)]
mod tests;
