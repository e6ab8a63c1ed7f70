use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationKind, Appearance, LabelMetrics, RetracementLevels};
use crate::core::{PriceScaleMode, Viewport};
use crate::error::{DrawingError, DrawingResult};
use crate::interaction::HitTestConfig;

/// Top/bottom price-scale margins as ratios of the viewport height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScaleMargins {
    pub top_margin_ratio: f64,
    pub bottom_margin_ratio: f64,
}

impl Default for PriceScaleMargins {
    fn default() -> Self {
        Self {
            top_margin_ratio: 0.0,
            bottom_margin_ratio: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default)]
    pub metrics: LabelMetrics,
    /// Text given to a label when it is first placed.
    #[serde(default = "default_label_text")]
    pub default_text: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            metrics: LabelMetrics::default(),
            default_text: default_label_text(),
        }
    }
}

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist the drawing setup next to their own
/// chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingEngineConfig {
    pub viewport: Viewport,
    pub bar_start: f64,
    pub bar_end: f64,
    pub price_min: f64,
    pub price_max: f64,
    #[serde(default)]
    pub price_scale_mode: PriceScaleMode,
    #[serde(default)]
    pub price_scale_margins: PriceScaleMargins,
    #[serde(default = "default_hit_tolerance_px")]
    pub hit_tolerance_px: f64,
    #[serde(default = "default_handle_radius_px")]
    pub handle_radius_px: f64,
    #[serde(default)]
    pub label: LabelConfig,
    #[serde(default)]
    pub retracement_levels: RetracementLevels,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Per-kind appearance overrides; kinds not listed use [`Appearance::default_for`].
    #[serde(default)]
    pub appearances: IndexMap<AnnotationKind, Appearance>,
    #[serde(default = "default_replay_bars_per_second")]
    pub replay_bars_per_second: f64,
}

impl DrawingEngineConfig {
    /// Creates a config for a visible bar range with a unit price domain.
    #[must_use]
    pub fn new(viewport: Viewport, bar_start: f64, bar_end: f64) -> Self {
        Self {
            viewport,
            bar_start,
            bar_end,
            price_min: 0.0,
            price_max: 1.0,
            price_scale_mode: PriceScaleMode::default(),
            price_scale_margins: PriceScaleMargins::default(),
            hit_tolerance_px: default_hit_tolerance_px(),
            handle_radius_px: default_handle_radius_px(),
            label: LabelConfig::default(),
            retracement_levels: RetracementLevels::default(),
            history_limit: default_history_limit(),
            appearances: IndexMap::new(),
            replay_bars_per_second: default_replay_bars_per_second(),
        }
    }

    #[must_use]
    pub fn with_price_domain(mut self, price_min: f64, price_max: f64) -> Self {
        self.price_min = price_min;
        self.price_max = price_max;
        self
    }

    #[must_use]
    pub fn with_price_scale_mode(mut self, mode: PriceScaleMode) -> Self {
        self.price_scale_mode = mode;
        self
    }

    #[must_use]
    pub fn with_price_scale_margins(
        mut self,
        top_margin_ratio: f64,
        bottom_margin_ratio: f64,
    ) -> Self {
        self.price_scale_margins = PriceScaleMargins {
            top_margin_ratio,
            bottom_margin_ratio,
        };
        self
    }

    #[must_use]
    pub fn with_hit_tolerance_px(mut self, tolerance_px: f64) -> Self {
        self.hit_tolerance_px = tolerance_px;
        self
    }

    #[must_use]
    pub fn with_handle_radius_px(mut self, radius_px: f64) -> Self {
        self.handle_radius_px = radius_px;
        self
    }

    #[must_use]
    pub fn with_label_config(mut self, label: LabelConfig) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub fn with_retracement_levels(mut self, levels: RetracementLevels) -> Self {
        self.retracement_levels = levels;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    #[must_use]
    pub fn with_appearance(mut self, kind: AnnotationKind, appearance: Appearance) -> Self {
        self.appearances.insert(kind, appearance);
        self
    }

    #[must_use]
    pub fn with_replay_bars_per_second(mut self, bars_per_second: f64) -> Self {
        self.replay_bars_per_second = bars_per_second;
        self
    }

    /// Appearance given to newly drawn shapes of `kind`.
    #[must_use]
    pub fn appearance_for(&self, kind: AnnotationKind) -> Appearance {
        self.appearances
            .get(&kind)
            .copied()
            .unwrap_or_else(|| Appearance::default_for(kind))
    }

    #[must_use]
    pub fn hit_test_config(&self) -> HitTestConfig {
        HitTestConfig {
            tolerance_px: self.hit_tolerance_px,
            handle_radius_px: self.handle_radius_px,
            label: self.label.metrics,
        }
    }

    pub fn validate(&self) -> DrawingResult<()> {
        if !self.viewport.is_valid() {
            return Err(DrawingError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for (value, name) in [
            (self.bar_start, "bar_start"),
            (self.bar_end, "bar_end"),
            (self.price_min, "price_min"),
            (self.price_max, "price_max"),
        ] {
            if !value.is_finite() {
                return Err(DrawingError::InvalidConfig(format!("`{name}` must be finite")));
            }
        }
        for (value, name) in [
            (self.hit_tolerance_px, "hit_tolerance_px"),
            (self.handle_radius_px, "handle_radius_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DrawingError::InvalidConfig(format!(
                    "`{name}` must be finite and >= 0"
                )));
            }
        }
        if self.history_limit == 0 {
            return Err(DrawingError::InvalidConfig(
                "`history_limit` must be > 0".to_owned(),
            ));
        }
        if !self.replay_bars_per_second.is_finite() || self.replay_bars_per_second <= 0.0 {
            return Err(DrawingError::InvalidConfig(
                "`replay_bars_per_second` must be finite and > 0".to_owned(),
            ));
        }
        self.label.metrics.validate()?;
        for appearance in self.appearances.values() {
            appearance
                .validate()
                .map_err(|err| DrawingError::InvalidConfig(format!("appearance: {err}")))?;
        }
        // Deserialized ratios bypass `RetracementLevels::new`.
        RetracementLevels::new(self.retracement_levels.ratios().to_vec())
            .map_err(|err| DrawingError::InvalidConfig(format!("retracement levels: {err}")))?;
        Ok(())
    }

    pub fn from_json_str(input: &str) -> DrawingResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            DrawingError::InvalidConfig(format!("failed to parse engine config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DrawingResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DrawingError::InvalidConfig(format!("failed to serialize engine config: {e}"))
        })
    }
}

fn default_label_text() -> String {
    "Text".to_owned()
}

fn default_hit_tolerance_px() -> f64 {
    6.0
}

fn default_handle_radius_px() -> f64 {
    6.0
}

fn default_history_limit() -> usize {
    100
}

fn default_replay_bars_per_second() -> f64 {
    4.0
}
