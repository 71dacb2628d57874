use crate::Result;
use diagraphe_core::MathBounds;
use diagraphe_core::geom::{Point, point};

/// Linear map from a math coordinate window onto a `width x height` pixel box.
///
/// The y axis is flipped so that math "up" is device "up". Points outside the window map
/// linearly outside the box; nothing is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    bounds: MathBounds,
    width: f64,
    height: f64,
}

impl CoordinateMapper {
    pub fn new(bounds: MathBounds, width: f64, height: f64) -> Result<Self> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            width,
            height,
        })
    }

    pub fn bounds(&self) -> &MathBounds {
        &self.bounds
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn to_device_x(&self, x: f64) -> f64 {
        let b = &self.bounds;
        (x - b.x_min) / (b.x_max - b.x_min) * self.width
    }

    pub fn to_device_y(&self, y: f64) -> f64 {
        let b = &self.bounds;
        self.height - (y - b.y_min) / (b.y_max - b.y_min) * self.height
    }

    pub fn to_device(&self, p: Point) -> Point {
        point(self.to_device_x(p.x), self.to_device_y(p.y))
    }
}
