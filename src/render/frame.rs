use crate::core::Viewport;
use crate::error::{DrawingError, DrawingResult};
use crate::render::{LinePrimitive, PolygonPrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic overlay scene for one draw pass.
///
/// Primitives are listed back to front: fills first, then strokes, then
/// handles and labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub polygons: Vec<PolygonPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            polygons: Vec::new(),
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn validate(&self) -> DrawingResult<()> {
        if !self.viewport.is_valid() {
            return Err(DrawingError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for polygon in &self.polygons {
            polygon.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
            && self.lines.is_empty()
            && self.rects.is_empty()
            && self.texts.is_empty()
    }
}
