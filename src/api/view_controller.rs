use tracing::debug;

use crate::core::{
    OhlcBar, PriceScale, PriceScaleMode, PriceScaleTuning, TimeScale, TimeScaleTuning, Viewport,
};
use crate::error::{DrawingError, DrawingResult};
use crate::render::Renderer;

use super::DrawingEngine;

/// Narrowest visible window reachable by zooming, in bars.
const MIN_VISIBLE_SPAN_BARS: f64 = 2.0;

/// View-window controls. None of these touch annotation geometry: shapes are
/// stored in data coordinates and simply re-project.
impl<R: Renderer> DrawingEngine<R> {
    #[must_use]
    pub fn bars(&self) -> &[OhlcBar] {
        &self.bars
    }

    /// Replaces the loaded bars. An active replay is clamped to the new length
    /// and exits when no bars remain.
    pub fn set_bars(&mut self, bars: Vec<OhlcBar>) {
        debug!(count = bars.len(), "bars replaced");
        self.bars = bars;
        if self.replay.is_some() {
            self.clamp_replay_to_bars();
        }
    }

    /// Fits both axes to the loaded bars.
    pub fn fit_to_bars(&mut self) -> DrawingResult<()> {
        let time_scale = TimeScale::from_bar_count(self.bars.len(), TimeScaleTuning::default())?;
        let (top, bottom) = self.price_scale.margins();
        let price_scale = PriceScale::from_ohlc_tuned(
            &self.bars,
            PriceScaleTuning::default(),
            self.price_scale.mode(),
        )?
        .with_inverted(self.price_scale.is_inverted())
        .with_margins(top, bottom)?;
        self.time_scale = time_scale;
        self.price_scale = price_scale;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> DrawingResult<()> {
        self.viewport = Viewport::new(width, height).validate()?;
        self.config.viewport = self.viewport;
        Ok(())
    }

    pub fn set_visible_bar_range(&mut self, start: f64, end: f64) -> DrawingResult<()> {
        self.time_scale.set_visible_range(start, end)
    }

    /// Pans by a pointer displacement; dragging right reveals earlier bars.
    pub fn pan_time_by_pixels(&mut self, delta_px: f64) -> DrawingResult<()> {
        if !delta_px.is_finite() {
            return Err(DrawingError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }
        let bars_per_pixel = self
            .time_scale
            .bars_per_pixel(f64::from(self.viewport.width))?;
        self.time_scale.pan_visible_by_delta(-delta_px * bars_per_pixel)
    }

    /// Zooms the bar axis keeping the bar under `anchor_x` fixed.
    pub fn zoom_time_around_pixel(&mut self, factor: f64, anchor_x: f64) -> DrawingResult<()> {
        let anchor_bar = self.mapper().x_to_bar(anchor_x)?;
        self.time_scale
            .zoom_visible_by_factor(factor, anchor_bar, MIN_VISIBLE_SPAN_BARS)
    }

    pub fn set_price_domain(&mut self, price_min: f64, price_max: f64) -> DrawingResult<()> {
        self.price_scale = self.price_scale.with_domain(price_min, price_max)?;
        Ok(())
    }

    pub fn set_price_scale_mode(&mut self, mode: PriceScaleMode) -> DrawingResult<()> {
        self.price_scale = self.price_scale.with_mode(mode)?;
        self.config.price_scale_mode = mode;
        Ok(())
    }
}
