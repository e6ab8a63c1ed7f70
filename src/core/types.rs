use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::decimal_to_f64;
use crate::error::{DrawingError, DrawingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> DrawingResult<Self> {
        if !self.is_valid() {
            return Err(DrawingError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Point in chart data space: `x` is a (fractional) bar index, `y` a price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_decimal_price(bar_index: f64, price: Decimal) -> DrawingResult<Self> {
        Ok(Self {
            x: bar_index,
            y: decimal_to_f64(price, "price")?,
        })
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn translated(self, delta: DataDelta) -> Self {
        Self {
            x: self.x + delta.dx,
            y: self.y + delta.dy,
        }
    }

    /// Returns the data-space offset that moves `self` onto `target`.
    #[must_use]
    pub fn delta_to(self, target: DataPoint) -> DataDelta {
        DataDelta {
            dx: target.x - self.x,
            dy: target.y - self.y,
        }
    }
}

/// Additive offset in data space (bars, price units).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataDelta {
    pub dx: f64,
    pub dy: f64,
}

impl DataDelta {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Point in screen space, origin at the top-left of the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_to(self, other: PixelPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}
