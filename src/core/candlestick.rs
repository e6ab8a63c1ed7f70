use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::{DrawingError, DrawingResult};

/// Canonical OHLC candle stepped through by replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcBar {
    /// Builds a validated OHLC bar from raw floating values.
    ///
    /// Invariants:
    /// - all values are finite
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    pub fn new(time: f64, open: f64, high: f64, low: f64, close: f64) -> DrawingResult<Self> {
        if !time.is_finite()
            || !open.is_finite()
            || !high.is_finite()
            || !low.is_finite()
            || !close.is_finite()
        {
            return Err(DrawingError::InvalidData(
                "ohlc values must be finite".to_owned(),
            ));
        }

        if low > high {
            return Err(DrawingError::InvalidData(
                "ohlc low must be <= high".to_owned(),
            ));
        }

        if open < low || open > high || close < low || close > high {
            return Err(DrawingError::InvalidData(
                "ohlc open/close must be within low/high range".to_owned(),
            ));
        }

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
        })
    }

    /// Converts strongly-typed temporal/decimal input into a validated OHLC bar.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> DrawingResult<Self> {
        Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        )
    }
}
