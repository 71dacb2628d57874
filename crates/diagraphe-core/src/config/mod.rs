//! Canvas-level configuration: display size, logical viewport, aspect-ratio policy, margins and
//! the element list.

use crate::elements::{Classes, Element};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Display size used when neither the configuration nor the caller provide one.
pub const DEFAULT_DISPLAY_SIZE: f64 = 400.0;

/// Input syntax of a configuration document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    #[default]
    Json,
    Yaml,
    Json5,
}

impl ConfigFormat {
    /// Guesses the format from a file extension (`json`, `yaml`/`yml`, `json5`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "json5" => Some(Self::Json5),
            _ => None,
        }
    }

    pub fn parse_value(self, text: &str) -> Result<Value> {
        Ok(match self {
            ConfigFormat::Json => serde_json::from_str(text)?,
            ConfigFormat::Yaml => serde_yaml::from_str(text)?,
            ConfigFormat::Json5 => json5::from_str(text)?,
        })
    }
}

impl FromStr for ConfigFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
            .ok_or_else(|| Error::invalid_config(format!("unknown input format `{s}`")))
    }
}

/// A display dimension: a fixed pixel size, or "fill the parent container".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplaySize {
    Pixels(f64),
    Fill,
}

impl Default for DisplaySize {
    fn default() -> Self {
        Self::Pixels(DEFAULT_DISPLAY_SIZE)
    }
}

impl DisplaySize {
    /// Effective pixel size; fill-parent sizes resolve to `fallback`.
    pub fn resolve(self, fallback: f64) -> f64 {
        match self {
            DisplaySize::Pixels(px) => px,
            DisplaySize::Fill => fallback,
        }
    }
}

impl fmt::Display for DisplaySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplaySize::Pixels(px) => f.write_str(&crate::format::js_number(*px)),
            DisplaySize::Fill => f.write_str("100%"),
        }
    }
}

impl Serialize for DisplaySize {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DisplaySize::Pixels(px) => serializer.serialize_f64(*px),
            DisplaySize::Fill => serializer.serialize_str("100%"),
        }
    }
}

impl<'de> Deserialize<'de> for DisplaySize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(px) if px.is_finite() && px >= 0.0 => Ok(DisplaySize::Pixels(px)),
            Raw::Number(px) => Err(serde::de::Error::custom(format!(
                "display size must be a non-negative number, got {px}"
            ))),
            Raw::Text(s) => match s.trim() {
                "100%" | "fill" => Ok(DisplaySize::Fill),
                other => match other.strip_suffix("px").unwrap_or(other).parse::<f64>() {
                    Ok(px) if px.is_finite() && px >= 0.0 => Ok(DisplaySize::Pixels(px)),
                    _ => Err(serde::de::Error::custom(format!(
                        "unsupported display size `{other}` (expected a number, \"100%\" or \"fill\")"
                    ))),
                },
            },
        }
    }
}

/// Logical viewport (`viewBox`). Missing extents default to the display size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBoxSpec {
    #[serde(default)]
    pub min_x: f64,
    #[serde(default)]
    pub min_y: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// Margin insets around the content area (D3 margin convention).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    Min,
    #[default]
    Mid,
    Max,
}

impl Align {
    fn keyword(self) -> &'static str {
        match self {
            Align::Min => "Min",
            Align::Mid => "Mid",
            Align::Max => "Max",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Min" => Some(Align::Min),
            "Mid" => Some(Align::Mid),
            "Max" => Some(Align::Max),
            _ => None,
        }
    }

    /// Fraction of the free space placed before the content.
    pub fn fraction(self) -> f64 {
        match self {
            Align::Min => 0.0,
            Align::Mid => 0.5,
            Align::Max => 1.0,
        }
    }
}

/// How the logical viewport is fitted into the display box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AspectPolicy {
    /// Fit inside, letterboxing the remaining space.
    #[default]
    Meet,
    /// Fill the box, clipping overflow.
    Slice,
    /// Stretch each axis independently.
    None,
}

/// SVG `preserveAspectRatio` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreserveAspectRatio {
    pub align_x: Align,
    pub align_y: Align,
    pub policy: AspectPolicy,
}

impl PreserveAspectRatio {
    pub fn none() -> Self {
        Self {
            policy: AspectPolicy::None,
            ..Self::default()
        }
    }
}

impl fmt::Display for PreserveAspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = match self.policy {
            AspectPolicy::None => return f.write_str("none"),
            AspectPolicy::Meet => "meet",
            AspectPolicy::Slice => "slice",
        };
        write!(
            f,
            "x{}Y{} {}",
            self.align_x.keyword(),
            self.align_y.keyword(),
            policy
        )
    }
}

impl FromStr for PreserveAspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::invalid_config(format!("invalid preserveAspectRatio `{s}`"));
        let mut parts = s.split_whitespace();
        let align = parts.next().ok_or_else(bad)?;
        if align == "none" {
            return match parts.next() {
                None | Some("meet") | Some("slice") => Ok(Self::none()),
                Some(_) => Err(bad()),
            };
        }

        let rest = align.strip_prefix('x').ok_or_else(bad)?;
        let (x, y) = rest.split_once('Y').ok_or_else(bad)?;
        let align_x = Align::parse(x).ok_or_else(bad)?;
        let align_y = Align::parse(y).ok_or_else(bad)?;
        let policy = match parts.next() {
            None | Some("meet") => AspectPolicy::Meet,
            Some("slice") => AspectPolicy::Slice,
            Some(_) => return Err(bad()),
        };
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Self {
            align_x,
            align_y,
            policy,
        })
    }
}

impl Serialize for PreserveAspectRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PreserveAspectRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Root `<svg>` options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SvgSpec {
    #[serde(default)]
    pub classes: Classes,
}

/// A complete scene description.
#[derive(Debug, Clone, Default)]
pub struct DiagramConfig {
    pub width: DisplaySize,
    pub height: DisplaySize,
    pub view_box: Option<ViewBoxSpec>,
    pub preserve_aspect_ratio: PreserveAspectRatio,
    pub margin: Margin,
    pub responsive: bool,
    pub svg: SvgSpec,
    pub elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    width: DisplaySize,
    #[serde(default)]
    height: DisplaySize,
    #[serde(default)]
    view_box: Option<ViewBoxSpec>,
    #[serde(default)]
    preserve_aspect_ratio: PreserveAspectRatio,
    #[serde(default)]
    margin: Margin,
    #[serde(default)]
    responsive: bool,
    #[serde(default)]
    svg: SvgSpec,
    #[serde(default)]
    elements: Vec<Value>,
}

impl DiagramConfig {
    /// Parses a configuration document. The whole document is validated up front: an unknown
    /// element kind or a missing required field fails the call and nothing is rendered.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::invalid_config("configuration must be an object"));
        }
        let raw = RawConfig::deserialize(value)?;

        let mut elements = Vec::with_capacity(raw.elements.len());
        for (index, element) in raw.elements.iter().enumerate() {
            elements.push(Element::from_value(index, element)?);
        }
        tracing::debug!(elements = elements.len(), "parsed diagram configuration");

        Ok(Self {
            width: raw.width,
            height: raw.height,
            view_box: raw.view_box,
            preserve_aspect_ratio: raw.preserve_aspect_ratio,
            margin: raw.margin,
            responsive: raw.responsive,
            svg: raw.svg,
            elements,
        })
    }

    pub fn from_str_with_format(text: &str, format: ConfigFormat) -> Result<Self> {
        Self::from_value(&format.parse_value(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_str_with_format(text, ConfigFormat::Json)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Self::from_str_with_format(text, ConfigFormat::Yaml)
    }

    pub fn from_json5(text: &str) -> Result<Self> {
        Self::from_str_with_format(text, ConfigFormat::Json5)
    }
}
