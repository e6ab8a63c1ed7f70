use serde::{Deserialize, Serialize};

use crate::core::DataPoint;
use crate::error::{DrawingError, DrawingResult};

/// Retracement ratios drawn by default, including the 127.2% and 161.8% extensions.
pub const DEFAULT_RETRACEMENT_RATIOS: [f64; 9] =
    [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0, 1.272, 1.618];

/// Ordered set of Fibonacci ratios; levels are always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetracementLevels {
    ratios: Vec<f64>,
}

impl Default for RetracementLevels {
    fn default() -> Self {
        Self {
            ratios: DEFAULT_RETRACEMENT_RATIOS.to_vec(),
        }
    }
}

impl RetracementLevels {
    pub fn new(mut ratios: Vec<f64>) -> DrawingResult<Self> {
        if ratios.is_empty() {
            return Err(DrawingError::InvalidConfig(
                "retracement levels must not be empty".to_owned(),
            ));
        }
        if ratios.iter().any(|ratio| !ratio.is_finite()) {
            return Err(DrawingError::InvalidConfig(
                "retracement ratios must be finite".to_owned(),
            ));
        }
        ratios.sort_by(f64::total_cmp);
        ratios.dedup();
        Ok(Self { ratios })
    }

    #[must_use]
    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// Resolves every ratio to a price: ratio `0` lands on `end`, ratio `1` on `start`.
    #[must_use]
    pub fn levels(&self, start: DataPoint, end: DataPoint) -> Vec<RetracementLevel> {
        let span = start.y - end.y;
        self.ratios
            .iter()
            .map(|&ratio| RetracementLevel {
                ratio,
                price: end.y + span * ratio,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetracementLevel {
    pub ratio: f64,
    pub price: f64,
}

impl RetracementLevel {
    /// Percentage caption such as `61.8%`.
    #[must_use]
    pub fn caption(self) -> String {
        let percent = self.ratio * 100.0;
        if (percent - percent.round()).abs() < 1e-9 {
            format!("{percent:.0}%")
        } else {
            let text = format!("{percent:.1}");
            format!("{}%", text.trim_end_matches('0').trim_end_matches('.'))
        }
    }
}
