use smallvec::SmallVec;
use tracing::trace;

use crate::annotation::{AnnotationKind, Geometry};
use crate::core::DataPoint;
use crate::core::geometry::line_price_at;
use crate::error::{DrawingError, DrawingResult};

/// Outcome of one placement click.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingStep {
    /// More clicks are needed; `placed` anchors recorded so far.
    Pending { placed: usize },
    Completed(Geometry),
}

/// Click-sequence state for one shape being drawn.
///
/// Anchors are recorded in data coordinates. The last pointer position is
/// kept separately so the shape can be previewed before the next click.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSession {
    kind: AnnotationKind,
    anchors: SmallVec<[DataPoint; 3]>,
    cursor: Option<DataPoint>,
    label_text: String,
}

impl DrawingSession {
    #[must_use]
    pub fn new(kind: AnnotationKind, label_text: impl Into<String>) -> Self {
        Self {
            kind,
            anchors: SmallVec::new(),
            cursor: None,
            label_text: label_text.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    #[must_use]
    pub fn anchors(&self) -> &[DataPoint] {
        &self.anchors
    }

    #[must_use]
    pub fn placed(&self) -> usize {
        self.anchors.len()
    }

    /// Records the next anchor. `snap` applies the horizontal constraint
    /// for kinds that support it.
    pub fn pointer_down(&mut self, point: DataPoint, snap: bool) -> DrawingResult<DrawingStep> {
        if !point.is_finite() {
            return Err(DrawingError::InvalidData(
                "drawing anchor must be finite".to_owned(),
            ));
        }
        let point = self.constrained(point, snap);
        self.anchors.push(point);
        self.cursor = Some(point);
        trace!(kind = %self.kind, placed = self.anchors.len(), "drawing anchor placed");

        if self.anchors.len() < self.kind.required_clicks() {
            return Ok(DrawingStep::Pending {
                placed: self.anchors.len(),
            });
        }

        let geometry = build_geometry(self.kind, &self.anchors, &self.label_text).ok_or_else(
            || DrawingError::InvalidData(format!("cannot build {} from anchors", self.kind)),
        )?;
        geometry.validate()?;
        Ok(DrawingStep::Completed(geometry))
    }

    pub fn pointer_move(&mut self, point: DataPoint, snap: bool) {
        if point.is_finite() {
            self.cursor = Some(self.constrained(point, snap));
        }
    }

    /// Live geometry from placed anchors plus the pointer, not yet persisted.
    ///
    /// A polygon with fewer than three points previews as its open edge.
    #[must_use]
    pub fn preview(&self) -> Option<Geometry> {
        let mut points: SmallVec<[DataPoint; 3]> = self.anchors.clone();
        if points.is_empty() {
            return None;
        }
        if let Some(cursor) = self.cursor {
            if points.len() < self.kind.required_clicks() {
                points.push(cursor);
            }
        }

        match (self.kind, points.len()) {
            (AnnotationKind::Polygon, 2) => Some(Geometry::Line {
                start: points[0],
                end: points[1],
            }),
            (AnnotationKind::TrendChannel, 2) => Some(Geometry::TrendChannel {
                start: points[0],
                end: points[1],
                offset: 0.0,
            }),
            _ => build_geometry(self.kind, &points, &self.label_text),
        }
    }

    fn constrained(&self, point: DataPoint, snap: bool) -> DataPoint {
        match self.anchors.first() {
            Some(first) if snap && self.kind.supports_shift_snap() => {
                DataPoint::new(point.x, first.y)
            }
            _ => point,
        }
    }
}

fn build_geometry(kind: AnnotationKind, points: &[DataPoint], text: &str) -> Option<Geometry> {
    if points.len() < kind.required_clicks() {
        return None;
    }
    let geometry = match kind {
        AnnotationKind::Line => Geometry::Line {
            start: points[0],
            end: points[1],
        },
        AnnotationKind::Ray => Geometry::Ray {
            start: points[0],
            end: points[1],
        },
        AnnotationKind::ExtendedLine => Geometry::ExtendedLine {
            start: points[0],
            end: points[1],
        },
        AnnotationKind::Retracement => Geometry::Retracement {
            start: points[0],
            end: points[1],
        },
        AnnotationKind::TrendChannel => {
            let (start, end, width) = (points[0], points[1], points[2]);
            let base_price = line_price_at(start, end, width.x).unwrap_or(start.y);
            Geometry::TrendChannel {
                start,
                end,
                offset: width.y - base_price,
            }
        }
        AnnotationKind::HorizontalLine => Geometry::HorizontalLine { anchor: points[0] },
        AnnotationKind::HorizontalRay => Geometry::HorizontalRay { anchor: points[0] },
        AnnotationKind::VerticalLine => Geometry::VerticalLine { anchor: points[0] },
        AnnotationKind::Polygon => Geometry::Polygon {
            vertices: points.iter().copied().collect(),
        },
        AnnotationKind::Label => Geometry::Label {
            anchor: points[0],
            text: text.to_owned(),
        },
    };
    Some(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_offset_measured_from_base_at_third_click_bar() {
        let mut session = DrawingSession::new(AnnotationKind::TrendChannel, "");
        assert_eq!(
            session
                .pointer_down(DataPoint::new(10.0, 100.0), false)
                .expect("first"),
            DrawingStep::Pending { placed: 1 }
        );
        session
            .pointer_down(DataPoint::new(20.0, 120.0), false)
            .expect("second");
        let step = session
            .pointer_down(DataPoint::new(15.0, 120.0), false)
            .expect("third");
        let DrawingStep::Completed(Geometry::TrendChannel { offset, .. }) = step else {
            panic!("expected completed channel, got {step:?}");
        };
        assert!((offset - 10.0).abs() <= 1e-9);
    }

    #[test]
    fn shift_snap_keeps_first_price() {
        let mut session = DrawingSession::new(AnnotationKind::Ray, "");
        session
            .pointer_down(DataPoint::new(1.0, 50.0), true)
            .expect("first");
        session.pointer_move(DataPoint::new(4.0, 80.0), true);
        assert_eq!(
            session.preview(),
            Some(Geometry::Ray {
                start: DataPoint::new(1.0, 50.0),
                end: DataPoint::new(4.0, 50.0),
            })
        );
    }

    #[test]
    fn preview_needs_a_placed_anchor() {
        let mut session = DrawingSession::new(AnnotationKind::Polygon, "");
        session.pointer_move(DataPoint::new(1.0, 1.0), false);
        assert_eq!(session.preview(), None);
    }
}
