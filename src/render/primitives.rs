use serde::{Deserialize, Serialize};

use crate::core::PixelPoint;
use crate::error::{DrawingError, DrawingResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Returns the color with its alpha multiplied by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            alpha: (self.alpha * opacity).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn validate(self) -> DrawingResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DrawingError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub style: LineStrokeStyle,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub fn between(start: PixelPoint, end: PixelPoint, stroke_width: f64, color: Color) -> Self {
        Self::new(start.x, start.y, end.x, end.y, stroke_width, color)
    }

    #[must_use]
    pub const fn with_style(mut self, style: LineStrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(self) -> DrawingResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(DrawingError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(DrawingError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Filled closed shape in pixel space (channel body, triangle, retracement band).
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPrimitive {
    pub vertices: Vec<PixelPoint>,
    pub fill: Color,
}

impl PolygonPrimitive {
    #[must_use]
    pub fn new(vertices: Vec<PixelPoint>, fill: Color) -> Self {
        Self { vertices, fill }
    }

    pub fn validate(&self) -> DrawingResult<()> {
        if self.vertices.len() < 3 {
            return Err(DrawingError::InvalidData(
                "polygon primitive needs at least 3 vertices".to_owned(),
            ));
        }
        if self.vertices.iter().any(|vertex| !vertex.is_finite()) {
            return Err(DrawingError::InvalidData(
                "polygon coordinates must be finite".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Axis-aligned rectangle, used for control-point handles and label boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub border_width: f64,
    pub border_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            border_width: 0.0,
            border_color: fill,
        }
    }

    /// Square of side `2 * radius` centred on `center`.
    #[must_use]
    pub fn centered_square(center: PixelPoint, radius: f64, fill: Color) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0, fill)
    }

    #[must_use]
    pub const fn with_border(mut self, border_width: f64, border_color: Color) -> Self {
        self.border_width = border_width;
        self.border_color = border_color;
        self
    }

    pub fn validate(self) -> DrawingResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(DrawingError::InvalidData(
                "rect position must be finite".to_owned(),
            ));
        }
        if !self.width.is_finite() || !self.height.is_finite() || self.width < 0.0 || self.height < 0.0
        {
            return Err(DrawingError::InvalidData(
                "rect size must be finite and >= 0".to_owned(),
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(DrawingError::InvalidData(
                "rect border width must be finite and >= 0".to_owned(),
            ));
        }
        self.fill.validate()?;
        self.border_color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> DrawingResult<()> {
        if self.text.is_empty() {
            return Err(DrawingError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(DrawingError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(DrawingError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
