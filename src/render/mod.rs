mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, LineStrokeStyle, PolygonPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};

use crate::error::DrawingResult;

/// Contract implemented by any overlay rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from annotation and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> DrawingResult<()>;
}
