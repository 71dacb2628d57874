use serde::{Deserialize, Serialize};

/// `nature: "rect"`. Width and height come from the shared element fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectSpec {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// `nature: "circle"`; `(x, y)` is the centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleSpec {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub radius: f64,
}

fn default_line_stroke_width() -> f64 {
    1.0
}

/// `nature: "line"`, in frame-local pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSpec {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default = "default_line_stroke_width")]
    pub stroke_width: f64,
}
