//! Pixel-space view of annotation geometry under one coordinate mapper.

use smallvec::SmallVec;

use crate::annotation::{Geometry, LabelMetrics, RetracementLevels};
use crate::core::geometry::{
    distance_to_line, distance_to_outline, distance_to_ray, distance_to_segment, point_in_polygon,
};
use crate::core::{CoordinateMapper, PixelPoint};
use crate::error::DrawingResult;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedLevel {
    pub ratio: f64,
    pub price: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedShape {
    Segment {
        start: PixelPoint,
        end: PixelPoint,
    },
    Ray {
        start: PixelPoint,
        through: PixelPoint,
    },
    ExtendedLine {
        a: PixelPoint,
        b: PixelPoint,
    },
    Channel {
        base: (PixelPoint, PixelPoint),
        parallel: (PixelPoint, PixelPoint),
    },
    /// `from_x` is `None` for a full-width line and the ray origin otherwise.
    Horizontal {
        y: f64,
        from_x: Option<f64>,
    },
    Vertical {
        x: f64,
    },
    Retracement {
        start: PixelPoint,
        end: PixelPoint,
        levels: Vec<ProjectedLevel>,
    },
    Polygon {
        vertices: SmallVec<[PixelPoint; 3]>,
    },
    Label {
        anchor: PixelPoint,
        bounds: (f64, f64, f64, f64),
    },
}

impl ProjectedShape {
    pub fn project(
        geometry: &Geometry,
        mapper: &CoordinateMapper,
        levels: &RetracementLevels,
        label: LabelMetrics,
    ) -> DrawingResult<Self> {
        let shape = match geometry {
            Geometry::Line { start, end } => Self::Segment {
                start: mapper.to_pixel(*start)?,
                end: mapper.to_pixel(*end)?,
            },
            Geometry::Ray { start, end } => Self::Ray {
                start: mapper.to_pixel(*start)?,
                through: mapper.to_pixel(*end)?,
            },
            Geometry::ExtendedLine { start, end } => Self::ExtendedLine {
                a: mapper.to_pixel(*start)?,
                b: mapper.to_pixel(*end)?,
            },
            Geometry::TrendChannel { start, end, offset } => {
                let base_start = mapper.to_pixel(*start)?;
                let base_end = mapper.to_pixel(*end)?;
                let parallel_start =
                    PixelPoint::new(base_start.x, mapper.price_to_y_clipped(start.y + offset)?);
                let parallel_end =
                    PixelPoint::new(base_end.x, mapper.price_to_y_clipped(end.y + offset)?);
                Self::Channel {
                    base: (base_start, base_end),
                    parallel: (parallel_start, parallel_end),
                }
            }
            Geometry::HorizontalLine { anchor } => Self::Horizontal {
                y: mapper.price_to_y(anchor.y)?,
                from_x: None,
            },
            Geometry::HorizontalRay { anchor } => {
                let origin = mapper.to_pixel(*anchor)?;
                Self::Horizontal {
                    y: origin.y,
                    from_x: Some(origin.x),
                }
            }
            Geometry::VerticalLine { anchor } => Self::Vertical {
                x: mapper.bar_to_x(anchor.x)?,
            },
            Geometry::Retracement { start, end } => {
                let start_px = mapper.to_pixel(*start)?;
                let end_px = mapper.to_pixel(*end)?;
                // Extension levels can fall outside a log scale's domain.
                let projected = levels
                    .levels(*start, *end)
                    .into_iter()
                    .filter_map(|level| {
                        let y = mapper.price_to_y(level.price).ok()?;
                        Some(ProjectedLevel {
                            ratio: level.ratio,
                            price: level.price,
                            y,
                        })
                    })
                    .collect();
                Self::Retracement {
                    start: start_px,
                    end: end_px,
                    levels: projected,
                }
            }
            Geometry::Polygon { vertices } => Self::Polygon {
                vertices: vertices
                    .iter()
                    .map(|vertex| mapper.to_pixel(*vertex))
                    .collect::<DrawingResult<_>>()?,
            },
            Geometry::Label { anchor, text } => {
                let anchor = mapper.to_pixel(*anchor)?;
                Self::Label {
                    anchor,
                    bounds: label.box_at(anchor, text),
                }
            }
        };
        Ok(shape)
    }

    /// Closed region covered by area shapes, clockwise or not.
    #[must_use]
    pub fn area_outline(&self) -> Option<SmallVec<[PixelPoint; 4]>> {
        match self {
            Self::Channel { base, parallel } => {
                Some(SmallVec::from_buf([base.0, base.1, parallel.1, parallel.0]))
            }
            Self::Polygon { vertices } if vertices.len() >= 3 => {
                Some(vertices.iter().copied().collect())
            }
            Self::Retracement { start, end, levels } => {
                let (top, bottom) = level_band(levels)?;
                let left = start.x.min(end.x);
                let right = start.x.max(end.x);
                Some(SmallVec::from_buf([
                    PixelPoint::new(left, top),
                    PixelPoint::new(right, top),
                    PixelPoint::new(right, bottom),
                    PixelPoint::new(left, bottom),
                ]))
            }
            Self::Label { bounds, .. } => {
                let (left, top, right, bottom) = *bounds;
                Some(SmallVec::from_buf([
                    PixelPoint::new(left, top),
                    PixelPoint::new(right, top),
                    PixelPoint::new(right, bottom),
                    PixelPoint::new(left, bottom),
                ]))
            }
            _ => None,
        }
    }

    /// Distance from `point` to the drawn strokes of the shape.
    #[must_use]
    pub fn stroke_distance(&self, point: PixelPoint) -> f64 {
        match self {
            Self::Segment { start, end } => distance_to_segment(point, *start, *end),
            Self::Ray { start, through } => distance_to_ray(point, *start, *through),
            Self::ExtendedLine { a, b } => distance_to_line(point, *a, *b),
            Self::Channel { base, parallel } => distance_to_segment(point, base.0, base.1)
                .min(distance_to_segment(point, parallel.0, parallel.1)),
            Self::Horizontal { y, from_x } => match from_x {
                Some(origin_x) if point.x < *origin_x => {
                    point.distance_to(PixelPoint::new(*origin_x, *y))
                }
                _ => (point.y - y).abs(),
            },
            Self::Vertical { x } => (point.x - x).abs(),
            Self::Retracement { start, end, levels } => {
                let left = start.x.min(end.x);
                let right = start.x.max(end.x);
                levels
                    .iter()
                    .map(|level| {
                        distance_to_segment(
                            point,
                            PixelPoint::new(left, level.y),
                            PixelPoint::new(right, level.y),
                        )
                    })
                    .fold(f64::INFINITY, f64::min)
            }
            Self::Polygon { vertices } => distance_to_outline(point, vertices),
            Self::Label { .. } => self
                .area_outline()
                .map_or(f64::INFINITY, |outline| distance_to_outline(point, &outline)),
        }
    }

    /// Body hit: inside an area shape, or within `tolerance_px` of a stroke.
    #[must_use]
    pub fn hits(&self, point: PixelPoint, tolerance_px: f64) -> bool {
        if self
            .area_outline()
            .is_some_and(|outline| point_in_polygon(point, &outline))
        {
            return true;
        }
        self.stroke_distance(point) <= tolerance_px
    }
}

fn level_band(levels: &[ProjectedLevel]) -> Option<(f64, f64)> {
    let top = levels.iter().map(|level| level.y).reduce(f64::min)?;
    let bottom = levels.iter().map(|level| level.y).reduce(f64::max)?;
    Some((top, bottom))
}
