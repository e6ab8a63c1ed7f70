use serde::{Deserialize, Serialize};

use crate::core::{DataDelta, DataPoint, PixelPoint, PriceScale, TimeScale, Viewport};
use crate::error::DrawingResult;

/// Pixel <-> data transform for one view window.
///
/// The mapper is a plain value: hosts rebuild it from the current pan/zoom
/// state before every interaction, and drag sessions freeze a copy at
/// drag start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    pub time_scale: TimeScale,
    pub price_scale: PriceScale,
    pub viewport: Viewport,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new(time_scale: TimeScale, price_scale: PriceScale, viewport: Viewport) -> Self {
        Self {
            time_scale,
            price_scale,
            viewport,
        }
    }

    pub fn to_pixel(&self, point: DataPoint) -> DrawingResult<PixelPoint> {
        Ok(PixelPoint::new(
            self.bar_to_x(point.x)?,
            self.price_to_y(point.y)?,
        ))
    }

    pub fn to_data(&self, pixel: PixelPoint) -> DrawingResult<DataPoint> {
        Ok(DataPoint::new(
            self.x_to_bar(pixel.x)?,
            self.y_to_price(pixel.y)?,
        ))
    }

    pub fn bar_to_x(&self, bar: f64) -> DrawingResult<f64> {
        let viewport = self.viewport.validate()?;
        self.time_scale.bar_to_pixel(bar, f64::from(viewport.width))
    }

    pub fn x_to_bar(&self, x: f64) -> DrawingResult<f64> {
        let viewport = self.viewport.validate()?;
        self.time_scale.pixel_to_bar(x, f64::from(viewport.width))
    }

    pub fn price_to_y(&self, price: f64) -> DrawingResult<f64> {
        self.price_scale.price_to_pixel(price, self.viewport)
    }

    pub fn y_to_price(&self, y: f64) -> DrawingResult<f64> {
        self.price_scale.pixel_to_price(y, self.viewport)
    }

    /// Like [`Self::price_to_y`], but a non-positive price under a log scale
    /// is clipped to the plot edge where prices approach zero.
    pub fn price_to_y_clipped(&self, price: f64) -> DrawingResult<f64> {
        match self.price_to_y(price) {
            Ok(y) => Ok(y),
            Err(_) if price.is_finite() && price <= 0.0 => {
                let (_, top, _, bottom) = self.plot_bounds();
                Ok(if self.price_scale.is_inverted() { top } else { bottom })
            }
            Err(err) => Err(err),
        }
    }

    /// Converts a pixel displacement starting at `origin` into a data delta.
    ///
    /// The result depends on `origin` only for non-linear price scales.
    pub fn pixel_delta_to_data(
        &self,
        origin: PixelPoint,
        dx_px: f64,
        dy_px: f64,
    ) -> DrawingResult<DataDelta> {
        let start = self.to_data(origin)?;
        let end = self.to_data(PixelPoint::new(origin.x + dx_px, origin.y + dy_px))?;
        Ok(start.delta_to(end))
    }

    /// Visible plot rectangle in pixel space as `(left, top, right, bottom)`.
    #[must_use]
    pub fn plot_bounds(&self) -> (f64, f64, f64, f64) {
        (
            0.0,
            0.0,
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        )
    }
}
