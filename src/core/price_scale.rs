use serde::{Deserialize, Serialize};

use crate::core::time_scale::normalize_range;
use crate::core::{LinearScale, OhlcBar, Viewport};
use crate::error::{DrawingError, DrawingResult};

/// Mapping mode used by the price scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PriceScaleMode {
    /// Uniform spacing in raw price units.
    #[default]
    Linear,
    /// Uniform spacing in natural-log price units (all prices must be > 0).
    Log,
}

/// Tuning controls for price-domain autoscaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScaleTuning {
    pub top_padding_ratio: f64,
    pub bottom_padding_ratio: f64,
    pub min_span_absolute: f64,
}

impl Default for PriceScaleTuning {
    fn default() -> Self {
        Self {
            top_padding_ratio: 0.10,
            bottom_padding_ratio: 0.10,
            min_span_absolute: 0.000_001,
        }
    }
}

impl PriceScaleTuning {
    fn validate(self) -> DrawingResult<Self> {
        if !self.top_padding_ratio.is_finite()
            || !self.bottom_padding_ratio.is_finite()
            || self.top_padding_ratio < 0.0
            || self.bottom_padding_ratio < 0.0
        {
            return Err(DrawingError::InvalidData(
                "price scale padding ratios must be finite and >= 0".to_owned(),
            ));
        }

        if !self.min_span_absolute.is_finite() || self.min_span_absolute <= 0.0 {
            return Err(DrawingError::InvalidData(
                "price scale min span must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Price axis model mapped to a Y pixel axis that grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScale {
    domain_start: f64,
    domain_end: f64,
    mode: PriceScaleMode,
    #[serde(default)]
    inverted: bool,
    #[serde(default)]
    top_margin_ratio: f64,
    #[serde(default)]
    bottom_margin_ratio: f64,
}

impl PriceScale {
    pub fn new(price_min: f64, price_max: f64) -> DrawingResult<Self> {
        Self::new_with_mode(price_min, price_max, PriceScaleMode::Linear)
    }

    pub fn new_with_mode(price_min: f64, price_max: f64, mode: PriceScaleMode) -> DrawingResult<Self> {
        let (domain_start, domain_end) = normalize_range(price_min, price_max, 1e-9)?;
        let scale = Self {
            domain_start,
            domain_end,
            mode,
            inverted: false,
            top_margin_ratio: 0.0,
            bottom_margin_ratio: 0.0,
        };
        scale.transformed_linear()?;
        Ok(scale)
    }

    /// Autoscales the domain to the low/high envelope of `bars`.
    pub fn from_ohlc_tuned(
        bars: &[OhlcBar],
        tuning: PriceScaleTuning,
        mode: PriceScaleMode,
    ) -> DrawingResult<Self> {
        let tuning = tuning.validate()?;
        if bars.is_empty() {
            return Err(DrawingError::InvalidData(
                "price scale cannot be built from empty data".to_owned(),
            ));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for bar in bars {
            min = min.min(bar.low);
            max = max.max(bar.high);
        }

        let (base_min, base_max) = normalize_range(min, max, tuning.min_span_absolute)?;
        let span = base_max - base_min;
        let padded_min = base_min - span * tuning.bottom_padding_ratio;
        let padded_max = base_max + span * tuning.top_padding_ratio;
        let padded_min = match mode {
            // Padding must not push a log domain through zero.
            PriceScaleMode::Log if padded_min <= 0.0 => base_min,
            _ => padded_min,
        };
        Self::new_with_mode(padded_min, padded_max, mode)
    }

    #[must_use]
    /// Returns the raw price domain kept by the scale.
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn mode(self) -> PriceScaleMode {
        self.mode
    }

    #[must_use]
    pub fn is_inverted(self) -> bool {
        self.inverted
    }

    #[must_use]
    /// Returns a copy with updated inverted-axis behavior.
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    #[must_use]
    pub fn margins(self) -> (f64, f64) {
        (self.top_margin_ratio, self.bottom_margin_ratio)
    }

    pub fn with_margins(
        mut self,
        top_margin_ratio: f64,
        bottom_margin_ratio: f64,
    ) -> DrawingResult<Self> {
        validate_scale_margins(top_margin_ratio, bottom_margin_ratio)?;
        self.top_margin_ratio = top_margin_ratio;
        self.bottom_margin_ratio = bottom_margin_ratio;
        Ok(self)
    }

    pub fn with_mode(self, mode: PriceScaleMode) -> DrawingResult<Self> {
        let mut rebuilt = Self::new_with_mode(self.domain_start, self.domain_end, mode)?;
        rebuilt.inverted = self.inverted;
        rebuilt.top_margin_ratio = self.top_margin_ratio;
        rebuilt.bottom_margin_ratio = self.bottom_margin_ratio;
        Ok(rebuilt)
    }

    /// Replaces the raw domain, keeping mode, orientation and margins.
    pub fn with_domain(self, price_min: f64, price_max: f64) -> DrawingResult<Self> {
        let mut rebuilt = Self::new_with_mode(price_min, price_max, self.mode)?;
        rebuilt.inverted = self.inverted;
        rebuilt.top_margin_ratio = self.top_margin_ratio;
        rebuilt.bottom_margin_ratio = self.bottom_margin_ratio;
        Ok(rebuilt)
    }

    /// Maps a raw price to pixel Y. Prices outside the domain extrapolate.
    pub fn price_to_pixel(self, price: f64, viewport: Viewport) -> DrawingResult<f64> {
        let viewport = viewport.validate()?;
        let (top_px, plot_height) = self.plot_band(viewport)?;
        let transformed = to_scale_domain(price, self.mode)?;
        let from_bottom = self
            .transformed_linear()?
            .domain_to_pixel(transformed, plot_height)?;
        if self.inverted {
            Ok(top_px + from_bottom)
        } else {
            Ok(top_px + plot_height - from_bottom)
        }
    }

    pub fn pixel_to_price(self, pixel: f64, viewport: Viewport) -> DrawingResult<f64> {
        let viewport = viewport.validate()?;
        let (top_px, plot_height) = self.plot_band(viewport)?;
        if !pixel.is_finite() {
            return Err(DrawingError::InvalidData("pixel must be finite".to_owned()));
        }
        let from_bottom = if self.inverted {
            pixel - top_px
        } else {
            top_px + plot_height - pixel
        };
        let transformed = self
            .transformed_linear()?
            .pixel_to_domain(from_bottom, plot_height)?;
        from_scale_domain(transformed, self.mode)
    }

    fn plot_band(self, viewport: Viewport) -> DrawingResult<(f64, f64)> {
        validate_scale_margins(self.top_margin_ratio, self.bottom_margin_ratio)?;
        let height = f64::from(viewport.height);
        let (top_ratio, bottom_ratio) = if self.inverted {
            (self.bottom_margin_ratio, self.top_margin_ratio)
        } else {
            (self.top_margin_ratio, self.bottom_margin_ratio)
        };
        let top_px = height * top_ratio;
        let plot_height = height - top_px - height * bottom_ratio;
        Ok((top_px, plot_height))
    }

    fn transformed_linear(self) -> DrawingResult<LinearScale> {
        LinearScale::new(
            to_scale_domain(self.domain_start, self.mode)?,
            to_scale_domain(self.domain_end, self.mode)?,
        )
    }
}

/// Maps raw price values into the internal scale domain selected by `mode`.
fn to_scale_domain(value: f64, mode: PriceScaleMode) -> DrawingResult<f64> {
    if !value.is_finite() {
        return Err(DrawingError::InvalidData("price must be finite".to_owned()));
    }

    match mode {
        PriceScaleMode::Linear => Ok(value),
        PriceScaleMode::Log => {
            if value <= 0.0 {
                return Err(DrawingError::InvalidData(
                    "log price scale requires values > 0".to_owned(),
                ));
            }
            Ok(value.ln())
        }
    }
}

fn from_scale_domain(value: f64, mode: PriceScaleMode) -> DrawingResult<f64> {
    let raw = match mode {
        PriceScaleMode::Linear => value,
        PriceScaleMode::Log => value.exp(),
    };
    if !raw.is_finite() {
        return Err(DrawingError::InvalidData(
            "price is out of representable range".to_owned(),
        ));
    }
    Ok(raw)
}

fn validate_scale_margins(top_margin_ratio: f64, bottom_margin_ratio: f64) -> DrawingResult<()> {
    if !top_margin_ratio.is_finite()
        || !bottom_margin_ratio.is_finite()
        || top_margin_ratio < 0.0
        || bottom_margin_ratio < 0.0
    {
        return Err(DrawingError::InvalidData(
            "price scale margins must be finite and >= 0".to_owned(),
        ));
    }
    if top_margin_ratio + bottom_margin_ratio >= 1.0 {
        return Err(DrawingError::InvalidData(
            "price scale margins must sum to < 1".to_owned(),
        ));
    }
    Ok(())
}
