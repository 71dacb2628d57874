//! Layout frame: display size, logical viewport and the margin-inset content area.

use crate::Result;
use diagraphe_core::config::{AspectPolicy, DEFAULT_DISPLAY_SIZE};
use diagraphe_core::geom::{Point, Size, Transform, Vector, point, size, vector};
use diagraphe_core::{DiagramConfig, Error, Margin, PreserveAspectRatio};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOptions {
    /// Pixel size used for `"100%"` / `"fill"` display dimensions.
    pub fill_fallback: f64,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            fill_fallback: DEFAULT_DISPLAY_SIZE,
        }
    }
}

/// Resolved logical viewport (`viewBox`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// The drawing region left after margins are subtracted from the display area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFrame {
    pub display_width: f64,
    pub display_height: f64,
    pub view_box: ViewBox,
    pub preserve_aspect_ratio: PreserveAspectRatio,
    pub margin: Margin,
    pub content_width: f64,
    pub content_height: f64,
}

impl ContentFrame {
    pub fn resolve(config: &DiagramConfig, options: &FrameOptions) -> Result<Self> {
        let display_width = config.width.resolve(options.fill_fallback);
        let display_height = config.height.resolve(options.fill_fallback);

        let view_box = match config.view_box {
            Some(vb) => ViewBox {
                min_x: vb.min_x,
                min_y: vb.min_y,
                width: vb.width.unwrap_or(display_width),
                height: vb.height.unwrap_or(display_height),
            },
            None => ViewBox {
                min_x: 0.0,
                min_y: 0.0,
                width: display_width,
                height: display_height,
            },
        };
        let finite = [view_box.min_x, view_box.min_y, view_box.width, view_box.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || view_box.width < 0.0 || view_box.height < 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "viewBox must have finite, non-negative extents (got {} x {})",
                    view_box.width, view_box.height
                ),
            }
            .into());
        }

        let m = config.margin;
        let content_width = display_width - m.left - m.right;
        let content_height = display_height - m.top - m.bottom;
        if !(content_width >= 0.0 && content_height >= 0.0) {
            return Err(Error::NegativeContentArea {
                width: content_width,
                height: content_height,
            }
            .into());
        }

        tracing::debug!(
            display_width,
            display_height,
            content_width,
            content_height,
            "resolved content frame"
        );
        Ok(Self {
            display_width,
            display_height,
            view_box,
            preserve_aspect_ratio: config.preserve_aspect_ratio,
            margin: m,
            content_width,
            content_height,
        })
    }

    /// Offset of the content area's local origin, applied once by the composer.
    pub fn translation(&self) -> Vector {
        vector(self.margin.left, self.margin.top)
    }

    pub fn origin(&self) -> Point {
        point(self.margin.left, self.margin.top)
    }

    pub fn content_size(&self) -> Size {
        size(self.content_width, self.content_height)
    }

    /// Maps viewBox coordinates to display pixels according to `preserveAspectRatio`.
    ///
    /// A zero-sized viewBox axis maps with scale 1.
    pub fn viewport_transform(&self) -> Transform {
        let vb = &self.view_box;
        let ratio = |display: f64, logical: f64| {
            if logical > 0.0 {
                display / logical
            } else {
                1.0
            }
        };
        let sx = ratio(self.display_width, vb.width);
        let sy = ratio(self.display_height, vb.height);
        let par = self.preserve_aspect_ratio;

        let (sx, sy) = match par.policy {
            AspectPolicy::None => (sx, sy),
            AspectPolicy::Meet => (sx.min(sy), sx.min(sy)),
            AspectPolicy::Slice => (sx.max(sy), sx.max(sy)),
        };
        let mut tx = -vb.min_x * sx;
        let mut ty = -vb.min_y * sy;
        if par.policy != AspectPolicy::None {
            tx += (self.display_width - vb.width * sx) * par.align_x.fraction();
            ty += (self.display_height - vb.height * sy) * par.align_y.fraction();
        }
        Transform::scale(sx, sy).then_translate(vector(tx, ty))
    }
}
