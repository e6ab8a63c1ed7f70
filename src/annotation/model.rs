use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::core::geometry::line_price_at;
use crate::core::{DataDelta, DataPoint, PixelPoint};
use crate::error::{DrawingError, DrawingResult};
use crate::render::{Color, LineStrokeStyle};

/// Stable identity of an annotation; allocation order is creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Line,
    Ray,
    ExtendedLine,
    TrendChannel,
    HorizontalLine,
    HorizontalRay,
    VerticalLine,
    Retracement,
    Polygon,
    Label,
}

impl AnnotationKind {
    pub const ALL: [Self; 10] = [
        Self::Line,
        Self::Ray,
        Self::ExtendedLine,
        Self::TrendChannel,
        Self::HorizontalLine,
        Self::HorizontalRay,
        Self::VerticalLine,
        Self::Retracement,
        Self::Polygon,
        Self::Label,
    ];

    /// Number of pointer-downs that complete a shape of this kind.
    #[must_use]
    pub const fn required_clicks(self) -> usize {
        match self {
            Self::HorizontalLine | Self::HorizontalRay | Self::VerticalLine | Self::Label => 1,
            Self::Line | Self::Ray | Self::ExtendedLine | Self::Retracement => 2,
            Self::TrendChannel | Self::Polygon => 3,
        }
    }

    /// Kinds whose enclosed region is hit-testable, not only the outline.
    #[must_use]
    pub const fn is_area(self) -> bool {
        matches!(self, Self::TrendChannel | Self::Polygon | Self::Retracement)
    }

    /// Kinds whose second anchor snaps to the first anchor's price with Shift held.
    #[must_use]
    pub const fn supports_shift_snap(self) -> bool {
        matches!(self, Self::Line | Self::Ray | Self::ExtendedLine)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Ray => "ray",
            Self::ExtendedLine => "extended_line",
            Self::TrendChannel => "trend_channel",
            Self::HorizontalLine => "horizontal_line",
            Self::HorizontalRay => "horizontal_ray",
            Self::VerticalLine => "vertical_line",
            Self::Retracement => "retracement",
            Self::Polygon => "polygon",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Visual configuration shared by every annotation kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub stroke: Color,
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: LineStrokeStyle,
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            stroke: Color::rgb(0.16, 0.38, 1.0),
            stroke_width: 2.0,
            stroke_style: LineStrokeStyle::Solid,
            fill: None,
            opacity: 1.0,
        }
    }
}

impl Appearance {
    /// Default look for a freshly drawn shape of `kind`.
    #[must_use]
    pub fn default_for(kind: AnnotationKind) -> Self {
        let base = Self::default();
        match kind {
            AnnotationKind::TrendChannel => Self {
                fill: Some(Color::rgba(0.16, 0.38, 1.0, 0.12)),
                ..base
            },
            AnnotationKind::Polygon => Self {
                stroke: Color::rgb(0.61, 0.15, 0.69),
                fill: Some(Color::rgba(0.61, 0.15, 0.69, 0.15)),
                ..base
            },
            AnnotationKind::Retracement => Self {
                stroke: Color::rgb(0.47, 0.53, 0.6),
                stroke_width: 1.0,
                fill: Some(Color::rgba(0.47, 0.53, 0.6, 0.08)),
                ..base
            },
            AnnotationKind::HorizontalLine
            | AnnotationKind::HorizontalRay
            | AnnotationKind::VerticalLine => Self {
                stroke_width: 1.0,
                stroke_style: LineStrokeStyle::Dashed,
                ..base
            },
            AnnotationKind::Label => Self {
                stroke: Color::rgb(0.13, 0.13, 0.13),
                stroke_width: 1.0,
                ..base
            },
            AnnotationKind::Line | AnnotationKind::Ray | AnnotationKind::ExtendedLine => base,
        }
    }

    pub fn validate(self) -> DrawingResult<Self> {
        self.stroke.validate()?;
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(DrawingError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(DrawingError::InvalidData(
                "opacity must be finite and in [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn effective_stroke(self) -> Color {
        self.stroke.with_opacity(self.opacity)
    }

    #[must_use]
    pub fn effective_fill(self) -> Option<Color> {
        self.fill.map(|fill| fill.with_opacity(self.opacity))
    }
}

/// Kind-specific geometry, always in data coordinates.
///
/// One variant per kind: a record can never carry the field layout of a
/// different kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Line {
        start: DataPoint,
        end: DataPoint,
    },
    Ray {
        start: DataPoint,
        end: DataPoint,
    },
    ExtendedLine {
        start: DataPoint,
        end: DataPoint,
    },
    /// Baseline `start..end` plus a parallel line shifted by `offset` price units.
    TrendChannel {
        start: DataPoint,
        end: DataPoint,
        offset: f64,
    },
    HorizontalLine {
        anchor: DataPoint,
    },
    HorizontalRay {
        anchor: DataPoint,
    },
    VerticalLine {
        anchor: DataPoint,
    },
    /// `end` sits at the 0% level and `start` at 100%.
    Retracement {
        start: DataPoint,
        end: DataPoint,
    },
    Polygon {
        vertices: SmallVec<[DataPoint; 3]>,
    },
    Label {
        anchor: DataPoint,
        text: String,
    },
}

impl Geometry {
    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Self::Line { .. } => AnnotationKind::Line,
            Self::Ray { .. } => AnnotationKind::Ray,
            Self::ExtendedLine { .. } => AnnotationKind::ExtendedLine,
            Self::TrendChannel { .. } => AnnotationKind::TrendChannel,
            Self::HorizontalLine { .. } => AnnotationKind::HorizontalLine,
            Self::HorizontalRay { .. } => AnnotationKind::HorizontalRay,
            Self::VerticalLine { .. } => AnnotationKind::VerticalLine,
            Self::Retracement { .. } => AnnotationKind::Retracement,
            Self::Polygon { .. } => AnnotationKind::Polygon,
            Self::Label { .. } => AnnotationKind::Label,
        }
    }

    pub fn validate(&self) -> DrawingResult<()> {
        let finite = match self {
            Self::TrendChannel { offset, .. } if !offset.is_finite() => false,
            Self::Polygon { vertices } if vertices.len() < 3 => {
                return Err(DrawingError::InvalidData(
                    "polygon needs at least 3 vertices".to_owned(),
                ));
            }
            _ => self.anchors().iter().all(|point| point.is_finite()),
        };
        if !finite {
            return Err(DrawingError::InvalidData(
                "annotation coordinates must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    /// User-placed anchor points in placement order.
    #[must_use]
    pub fn anchors(&self) -> SmallVec<[DataPoint; 4]> {
        match self {
            Self::Line { start, end }
            | Self::Ray { start, end }
            | Self::ExtendedLine { start, end }
            | Self::TrendChannel { start, end, .. }
            | Self::Retracement { start, end } => smallvec![*start, *end],
            Self::HorizontalLine { anchor }
            | Self::HorizontalRay { anchor }
            | Self::VerticalLine { anchor }
            | Self::Label { anchor, .. } => smallvec![*anchor],
            Self::Polygon { vertices } => vertices.iter().copied().collect(),
        }
    }

    /// Draggable handles. Index `2` of a channel is the parallel-line handle,
    /// placed at the parallel line's midpoint.
    #[must_use]
    pub fn control_points(&self) -> SmallVec<[DataPoint; 4]> {
        match self {
            Self::TrendChannel { start, end, offset } => {
                let mid = channel_base_midpoint(*start, *end);
                smallvec![*start, *end, DataPoint::new(mid.x, mid.y + offset)]
            }
            _ => self.anchors(),
        }
    }

    /// Shifts every anchor by `delta`; derived values (channel offset) are relative
    /// and stay unchanged.
    #[must_use]
    pub fn translated(&self, delta: DataDelta) -> Self {
        let mut out = self.clone();
        match &mut out {
            Self::Line { start, end }
            | Self::Ray { start, end }
            | Self::ExtendedLine { start, end }
            | Self::TrendChannel { start, end, .. }
            | Self::Retracement { start, end } => {
                *start = start.translated(delta);
                *end = end.translated(delta);
            }
            Self::HorizontalLine { anchor }
            | Self::HorizontalRay { anchor }
            | Self::VerticalLine { anchor }
            | Self::Label { anchor, .. } => *anchor = anchor.translated(delta),
            Self::Polygon { vertices } => {
                for vertex in vertices.iter_mut() {
                    *vertex = vertex.translated(delta);
                }
            }
        }
        out
    }

    /// Moves control point `index` to `target`, applying per-kind constraints:
    /// - horizontal lines only take the new price,
    /// - vertical lines only take the new bar,
    /// - the channel's parallel handle only changes `offset`.
    ///
    /// Returns `None` when `index` does not name a control point.
    #[must_use]
    pub fn with_control_point(&self, index: usize, target: DataPoint) -> Option<Self> {
        if index >= self.control_points().len() {
            return None;
        }

        let mut out = self.clone();
        match &mut out {
            Self::Line { start, end }
            | Self::Ray { start, end }
            | Self::ExtendedLine { start, end }
            | Self::Retracement { start, end } => {
                if index == 0 {
                    *start = target;
                } else {
                    *end = target;
                }
            }
            Self::TrendChannel { start, end, offset } => match index {
                0 => *start = target,
                1 => *end = target,
                _ => *offset = target.y - channel_base_midpoint(*start, *end).y,
            },
            Self::HorizontalLine { anchor } => anchor.y = target.y,
            Self::VerticalLine { anchor } => anchor.x = target.x,
            Self::HorizontalRay { anchor } | Self::Label { anchor, .. } => *anchor = target,
            Self::Polygon { vertices } => vertices[index] = target,
        }
        Some(out)
    }

}

fn channel_base_midpoint(start: DataPoint, end: DataPoint) -> DataPoint {
    let mid_x = (start.x + end.x) / 2.0;
    let mid_y = line_price_at(start, end, mid_x).unwrap_or((start.y + end.y) / 2.0);
    DataPoint::new(mid_x, mid_y)
}

/// Persisted annotation: common record composed with a kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub appearance: Appearance,
    #[serde(default)]
    pub selected: bool,
    pub geometry: Geometry,
}

impl Annotation {
    #[must_use]
    pub fn new(id: AnnotationId, geometry: Geometry, appearance: Appearance) -> Self {
        Self {
            id,
            appearance,
            selected: false,
            geometry,
        }
    }

    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        self.geometry.kind()
    }
}

/// Text box estimation for labels, shared by hit-testing and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub font_size_px: f64,
    pub char_width_px: f64,
    pub padding_px: f64,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            font_size_px: 13.0,
            char_width_px: 7.0,
            padding_px: 4.0,
        }
    }
}

impl LabelMetrics {
    pub fn validate(self) -> DrawingResult<Self> {
        for (value, name) in [
            (self.font_size_px, "font_size_px"),
            (self.char_width_px, "char_width_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DrawingError::InvalidConfig(format!(
                    "label `{name}` must be finite and > 0"
                )));
            }
        }
        if !self.padding_px.is_finite() || self.padding_px < 0.0 {
            return Err(DrawingError::InvalidConfig(
                "label `padding_px` must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Box `(left, top, right, bottom)` of `text` whose baseline-left corner
    /// sits at `anchor`.
    #[must_use]
    pub fn box_at(self, anchor: PixelPoint, text: &str) -> (f64, f64, f64, f64) {
        let chars = text.chars().count().max(1) as f64;
        let width = chars * self.char_width_px + self.padding_px * 2.0;
        let height = self.font_size_px + self.padding_px * 2.0;
        (anchor.x, anchor.y - height, anchor.x + width, anchor.y)
    }
}
