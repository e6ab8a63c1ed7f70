use serde::{Deserialize, Serialize};

use crate::core::LinearScale;
use crate::error::{DrawingError, DrawingResult};

/// Tuning controls for fitting the bar axis to a loaded bar count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScaleTuning {
    pub left_padding_bars: f64,
    pub right_padding_bars: f64,
    pub min_span_bars: f64,
}

impl Default for TimeScaleTuning {
    fn default() -> Self {
        Self {
            left_padding_bars: 0.5,
            right_padding_bars: 5.0,
            min_span_bars: 1.0,
        }
    }
}

impl TimeScaleTuning {
    fn validate(self) -> DrawingResult<Self> {
        if !self.left_padding_bars.is_finite()
            || !self.right_padding_bars.is_finite()
            || self.left_padding_bars < 0.0
            || self.right_padding_bars < 0.0
        {
            return Err(DrawingError::InvalidData(
                "time scale padding must be finite and >= 0".to_owned(),
            ));
        }

        if !self.min_span_bars.is_finite() || self.min_span_bars <= 0.0 {
            return Err(DrawingError::InvalidData(
                "time scale min span must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Bar-index axis with separate full and visible ranges.
///
/// `full_*` tracks the loaded bar range.
/// `visible_*` is the current pan/zoom window and may extend past the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    full_start: f64,
    full_end: f64,
    visible_start: f64,
    visible_end: f64,
}

impl TimeScale {
    /// Creates a scale with matching full and visible ranges.
    pub fn new(bar_start: f64, bar_end: f64) -> DrawingResult<Self> {
        let normalized = normalize_range(bar_start, bar_end, 1.0)?;
        Ok(Self {
            full_start: normalized.0,
            full_end: normalized.1,
            visible_start: normalized.0,
            visible_end: normalized.1,
        })
    }

    /// Fits the axis to `bar_count` bars indexed `0..bar_count`.
    pub fn from_bar_count(bar_count: usize, tuning: TimeScaleTuning) -> DrawingResult<Self> {
        let tuning = tuning.validate()?;
        if bar_count == 0 {
            return Err(DrawingError::InvalidData(
                "time scale cannot be fitted to zero bars".to_owned(),
            ));
        }

        let last = (bar_count - 1) as f64;
        let (full_start, full_end) = normalize_range(0.0, last, tuning.min_span_bars)?;
        Ok(Self {
            full_start,
            full_end,
            visible_start: full_start - tuning.left_padding_bars,
            visible_end: full_end + tuning.right_padding_bars,
        })
    }

    #[must_use]
    pub fn full_range(self) -> (f64, f64) {
        (self.full_start, self.full_end)
    }

    #[must_use]
    pub fn visible_range(self) -> (f64, f64) {
        (self.visible_start, self.visible_end)
    }

    /// Overrides the visible range without modifying the full fitted range.
    pub fn set_visible_range(&mut self, start: f64, end: f64) -> DrawingResult<()> {
        let normalized = normalize_range(start, end, 1e-9)?;
        self.visible_start = normalized.0;
        self.visible_end = normalized.1;
        Ok(())
    }

    pub fn reset_visible_range_to_full(&mut self) {
        self.visible_start = self.full_start;
        self.visible_end = self.full_end;
    }

    /// Pans the visible range by an additive bar delta.
    pub fn pan_visible_by_delta(&mut self, delta_bars: f64) -> DrawingResult<()> {
        if !delta_bars.is_finite() {
            return Err(DrawingError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }

        self.visible_start += delta_bars;
        self.visible_end += delta_bars;
        Ok(())
    }

    /// Zooms the visible range around an anchor bar.
    ///
    /// `factor > 1.0` zooms in, `0.0 < factor < 1.0` zooms out.
    /// The resulting span is clamped by `min_span_bars`.
    pub fn zoom_visible_by_factor(
        &mut self,
        factor: f64,
        anchor_bar: f64,
        min_span_bars: f64,
    ) -> DrawingResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(DrawingError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        if !anchor_bar.is_finite() {
            return Err(DrawingError::InvalidData(
                "zoom anchor must be finite".to_owned(),
            ));
        }
        if !min_span_bars.is_finite() || min_span_bars <= 0.0 {
            return Err(DrawingError::InvalidData(
                "zoom min span must be finite and > 0".to_owned(),
            ));
        }

        let current_span = self.visible_end - self.visible_start;
        let target_span = (current_span / factor).max(min_span_bars);
        let left_ratio = (anchor_bar - self.visible_start) / current_span;

        let new_start = anchor_bar - left_ratio * target_span;
        let new_end = new_start + target_span;
        self.set_visible_range(new_start, new_end)
    }

    pub fn bar_to_pixel(self, bar: f64, width_px: f64) -> DrawingResult<f64> {
        self.visible_linear()?.domain_to_pixel(bar, width_px)
    }

    pub fn pixel_to_bar(self, pixel: f64, width_px: f64) -> DrawingResult<f64> {
        self.visible_linear()?.pixel_to_domain(pixel, width_px)
    }

    pub fn bars_per_pixel(self, width_px: f64) -> DrawingResult<f64> {
        self.visible_linear()?.units_per_pixel(width_px)
    }

    fn visible_linear(self) -> DrawingResult<LinearScale> {
        LinearScale::new(self.visible_start, self.visible_end)
    }
}

pub(crate) fn normalize_range(start: f64, end: f64, min_span: f64) -> DrawingResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(DrawingError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }

    if start == end {
        let half = min_span / 2.0;
        return Ok((start - half, end + half));
    }

    Ok((start.min(end), start.max(end)))
}
