use super::Classes;
use serde::{Deserialize, Serialize};

/// Coordinate space of a rich-content region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RichContentPosition {
    /// Relative to the content frame, like every other element.
    #[default]
    Frame,
    /// Relative to the canvas origin; the margin translation is cancelled out.
    Canvas,
}

fn one() -> f64 {
    1.0
}

/// `nature: "foreign_object"`: an embedded HTML fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichContentSpec {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "one")]
    pub fo_width: f64,
    #[serde(default = "one")]
    pub fo_height: f64,
    /// Centre the content on `(x, y)` using a 1x1 overflowing anchor.
    #[serde(default)]
    pub centered: bool,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub content_classes: Classes,
    #[serde(default)]
    pub position: RichContentPosition,
}

impl Default for RichContentSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            fo_width: 1.0,
            fo_height: 1.0,
            centered: false,
            html: String::new(),
            content_classes: Classes::default(),
            position: RichContentPosition::default(),
        }
    }
}

impl RichContentSpec {
    /// Region size; a centred region is a 1x1 anchor.
    pub fn region_size(&self) -> (f64, f64) {
        if self.centered {
            (1.0, 1.0)
        } else {
            (self.fo_width, self.fo_height)
        }
    }
}
