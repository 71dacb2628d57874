//! Element descriptors.
//!
//! Every entry of a configuration's `elements` list is an object tagged by its `nature`. The tag
//! selects one closed [`ElementKind`] variant; the fields shared by every kind (classes, opacity,
//! label, optional width/height) live in [`ElementCommon`].

mod cartesian;
mod heatmap;
mod rich;
mod shapes;
mod tree;

pub use cartesian::{
    AxesSpec, CartesianDotSpec, FunctionSpec, MAX_CURVE_SAMPLES, MathBounds, ParametricCurveSpec,
    sample_count,
};
pub use heatmap::{CalendarHeatmapSpec, HeatmapSpec, HeatmapStyle, build_calendar_matrix};
pub use rich::{RichContentPosition, RichContentSpec};
pub use shapes::{CircleSpec, LineSpec, RectSpec};
pub use tree::{ProbabilityTreeSpec, TreeDirection, TreeNode};

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A list of CSS class names. Accepts either a list or a whitespace-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Classes(pub Vec<String>);

impl Classes {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(classes.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Classes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(s) => Classes(s.split_whitespace().map(str::to_string).collect()),
            Raw::Many(v) => Classes(
                v.iter()
                    .flat_map(|s| s.split_whitespace())
                    .map(str::to_string)
                    .collect(),
            ),
            Raw::Null(()) => Classes::default(),
        })
    }
}

/// SVG `text-anchor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Where a label sits along its shape (lines use start/middle/end points).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Start,
    #[default]
    Middle,
    End,
}

fn default_opacity() -> f64 {
    100.0
}

fn default_label_classes() -> Classes {
    Classes::new(["fill-base-content"])
}

fn default_label_font_size() -> f64 {
    12.0
}

fn default_label_offset() -> f64 {
    10.0
}

/// Fields shared by every element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCommon {
    #[serde(default)]
    pub classes: Classes,
    /// Opacity in percent (0-100).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Pixel width; defaults to the content frame width.
    #[serde(default)]
    pub width: Option<f64>,
    /// Pixel height; defaults to the content frame height.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_label_classes")]
    pub label_classes: Classes,
    #[serde(default = "default_label_font_size")]
    pub label_font_size: f64,
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
    #[serde(default)]
    pub label_position: LabelPosition,
    #[serde(default)]
    pub label_anchor: TextAnchor,
}

impl Default for ElementCommon {
    fn default() -> Self {
        Self {
            classes: Classes::default(),
            opacity: default_opacity(),
            width: None,
            height: None,
            label: None,
            label_classes: default_label_classes(),
            label_font_size: default_label_font_size(),
            label_offset: default_label_offset(),
            label_position: LabelPosition::default(),
            label_anchor: TextAnchor::default(),
        }
    }
}

impl ElementCommon {
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = Classes::new(classes);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label text, treating an empty string as "no label".
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref().filter(|s| !s.is_empty())
    }

    /// Opacity as a 0-1 fraction.
    pub fn opacity_fraction(&self) -> f64 {
        self.opacity / 100.0
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.opacity) {
            return Err(Error::invalid_config(format!(
                "opacity must be within 0..=100, got {}",
                self.opacity
            )));
        }
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = v {
                if !(v.is_finite() && v >= 0.0) {
                    return Err(Error::invalid_config(format!(
                        "{name} must be a non-negative number, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The closed set of element kinds.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Rect(RectSpec),
    Circle(CircleSpec),
    Line(LineSpec),
    Axes(AxesSpec),
    Function(FunctionSpec),
    ParametricCurve(ParametricCurveSpec),
    CartesianDot(CartesianDotSpec),
    RichContent(RichContentSpec),
    ProbabilityTree(ProbabilityTreeSpec),
    Heatmap(HeatmapSpec),
    CalendarHeatmap(CalendarHeatmapSpec),
}

impl ElementKind {
    /// The `nature` tag naming this kind in configurations.
    pub fn nature(&self) -> &'static str {
        match self {
            ElementKind::Rect(_) => "rect",
            ElementKind::Circle(_) => "circle",
            ElementKind::Line(_) => "line",
            ElementKind::Axes(_) => "axes",
            ElementKind::Function(_) => "function",
            ElementKind::ParametricCurve(_) => "parametric_curve",
            ElementKind::CartesianDot(_) => "cartesian_dot",
            ElementKind::RichContent(_) => "foreign_object",
            ElementKind::ProbabilityTree(_) => "probability_tree",
            ElementKind::Heatmap(_) => "heatmap",
            ElementKind::CalendarHeatmap(_) => "calendar_heatmap",
        }
    }

    fn from_nature(nature: &str, value: &Value) -> Result<Option<Self>> {
        let kind = match nature {
            "rect" => ElementKind::Rect(RectSpec::deserialize(value)?),
            "circle" => ElementKind::Circle(CircleSpec::deserialize(value)?),
            "line" => ElementKind::Line(LineSpec::deserialize(value)?),
            "axes" => ElementKind::Axes(AxesSpec::deserialize(value)?),
            "function" => ElementKind::Function(FunctionSpec::deserialize(value)?),
            "parametric_curve" => {
                ElementKind::ParametricCurve(ParametricCurveSpec::deserialize(value)?)
            }
            "cartesian_dot" => ElementKind::CartesianDot(CartesianDotSpec::deserialize(value)?),
            "foreign_object" => ElementKind::RichContent(RichContentSpec::deserialize(value)?),
            "probability_tree" => {
                ElementKind::ProbabilityTree(ProbabilityTreeSpec::deserialize(value)?)
            }
            "heatmap" => ElementKind::Heatmap(HeatmapSpec::deserialize(value)?),
            "calendar_heatmap" | "calendar-heatmap" => {
                ElementKind::CalendarHeatmap(CalendarHeatmapSpec::deserialize(value)?)
            }
            _ => return Ok(None),
        };
        kind.validate()?;
        Ok(Some(kind))
    }

    fn validate(&self) -> Result<()> {
        match self {
            ElementKind::Axes(s) => s.validate(),
            ElementKind::Function(s) => s.validate(),
            ElementKind::ParametricCurve(s) => s.validate(),
            ElementKind::CartesianDot(s) => s.bounds.validate(),
            ElementKind::Heatmap(s) => s.validate(),
            ElementKind::CalendarHeatmap(s) => s.validate(),
            ElementKind::Rect(_)
            | ElementKind::Circle(_)
            | ElementKind::Line(_)
            | ElementKind::RichContent(_)
            | ElementKind::ProbabilityTree(_) => Ok(()),
        }
    }
}

/// One declared element: shared fields plus its kind-specific record.
#[derive(Debug, Clone)]
pub struct Element {
    pub common: ElementCommon,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(common: ElementCommon, kind: ElementKind) -> Self {
        Self { common, kind }
    }

    pub fn nature(&self) -> &'static str {
        self.kind.nature()
    }

    /// Parses the element at position `index` of a configuration's element list.
    pub fn from_value(index: usize, value: &Value) -> Result<Self> {
        let Some(obj) = value.as_object() else {
            return Err(Error::InvalidElement {
                index,
                nature: String::new(),
                message: "element must be an object".to_string(),
            });
        };
        // An untagged element is a rectangle.
        let nature = match obj.get("nature") {
            None | Some(Value::Null) => "rect",
            Some(Value::String(s)) => s.as_str(),
            Some(_) => {
                return Err(Error::InvalidElement {
                    index,
                    nature: String::new(),
                    message: "`nature` must be a string".to_string(),
                });
            }
        };

        let kind = ElementKind::from_nature(nature, value)
            .map_err(|e| e.in_element(index, nature))?
            .ok_or_else(|| Error::UnknownElementKind {
                index,
                nature: nature.to_string(),
            })?;
        let common = ElementCommon::deserialize(value)
            .map_err(Error::from)
            .and_then(|c| c.validate().map(|()| c))
            .map_err(|e| e.in_element(index, nature))?;

        Ok(Self { common, kind })
    }
}
