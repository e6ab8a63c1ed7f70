pub mod candlestick;
pub mod geometry;
pub mod mapper;
pub mod price_scale;
pub mod primitives;
pub mod scale;
pub mod time_scale;
pub mod types;

pub use candlestick::OhlcBar;
pub use mapper::CoordinateMapper;
pub use price_scale::{PriceScale, PriceScaleMode, PriceScaleTuning};
pub use scale::LinearScale;
pub use time_scale::{TimeScale, TimeScaleTuning};
pub use types::{DataDelta, DataPoint, PixelPoint, Viewport};
