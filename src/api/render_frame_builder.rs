use tracing::{trace, warn};

use crate::annotation::{Annotation, Appearance, Geometry, ProjectedShape, RetracementLevel};
use crate::core::PixelPoint;
use crate::core::geometry::clip_line;
use crate::error::DrawingResult;
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, PolygonPrimitive, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

use super::DrawingEngine;

const HANDLE_FILL: Color = Color::rgb(1.0, 1.0, 1.0);
const HANDLE_BORDER_WIDTH: f64 = 1.5;
const RETRACEMENT_CAPTION_OFFSET_PX: f64 = 3.0;

/// Per-shape render state derived from selection, hover and preview.
#[derive(Debug, Clone, Copy)]
struct ShapeDecoration {
    handles: bool,
    preview: bool,
}

impl<R: Renderer> DrawingEngine<R> {
    /// Projects annotations, the live drawing preview and selection handles
    /// into one overlay frame.
    ///
    /// A shape being dragged is drawn at its in-progress geometry. During
    /// replay the frame carries no annotations. Shapes the current view cannot
    /// project are left out of the frame.
    pub fn build_render_frame(&self) -> DrawingResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.viewport);
        if self.is_replay_active() {
            return Ok(frame);
        }

        let dragged = self
            .interaction
            .drag()
            .map(|drag| (drag.id(), drag.current().clone()));
        let hovered = self.interaction.hover().map(|hover| hover.id);

        let mut ordered: Vec<&Annotation> = self.store.iter().map(|(_, item)| item).collect();
        ordered.sort_by_key(|annotation| annotation.id);

        for annotation in ordered {
            let geometry = match &dragged {
                Some((id, geometry)) if *id == annotation.id => geometry,
                _ => &annotation.geometry,
            };
            let decoration = ShapeDecoration {
                handles: annotation.selected || hovered == Some(annotation.id),
                preview: false,
            };
            if let Err(err) = self.push_shape(&mut frame, geometry, annotation.appearance, decoration)
            {
                warn!(id = %annotation.id, error = %err, "skipping unmappable annotation");
            }
        }

        if let Some(preview) = self.interaction.drawing().and_then(|session| session.preview()) {
            let appearance = self.config.appearance_for(preview.kind());
            let decoration = ShapeDecoration {
                handles: true,
                preview: true,
            };
            if let Err(err) = self.push_shape(&mut frame, &preview, appearance, decoration) {
                warn!(error = %err, "skipping unmappable drawing preview");
            }
        }

        trace!(
            lines = frame.lines.len(),
            polygons = frame.polygons.len(),
            rects = frame.rects.len(),
            texts = frame.texts.len(),
            "overlay frame built"
        );
        frame.validate()?;
        Ok(frame)
    }

    fn push_shape(
        &self,
        frame: &mut RenderFrame,
        geometry: &Geometry,
        appearance: Appearance,
        decoration: ShapeDecoration,
    ) -> DrawingResult<()> {
        let mapper = self.mapper();
        let label = self.config.label.metrics;
        let shape = ProjectedShape::project(geometry, &mapper, &self.retracement_levels, label)?;
        let bounds = mapper.plot_bounds();
        let (left, top, right, bottom) = bounds;
        let stroke = appearance.effective_stroke();
        let style = if decoration.preview {
            LineStrokeStyle::Dashed
        } else {
            appearance.stroke_style
        };
        let width = appearance.stroke_width;
        let line = |a: PixelPoint, b: PixelPoint| {
            LinePrimitive::between(a, b, width, stroke).with_style(style)
        };

        if let (Some(fill), Some(outline)) = (appearance.effective_fill(), shape.area_outline()) {
            if !matches!(shape, ProjectedShape::Label { .. }) {
                frame.polygons.push(PolygonPrimitive::new(outline.to_vec(), fill));
            }
        }

        match &shape {
            ProjectedShape::Segment { start, end } => frame.lines.push(line(*start, *end)),
            ProjectedShape::Ray { start, through } => {
                if let Some((a, b)) = clip_line(*start, *through, bounds, false, true) {
                    frame.lines.push(line(a, b));
                }
            }
            ProjectedShape::ExtendedLine { a, b } => {
                if let Some((a, b)) = clip_line(*a, *b, bounds, true, true) {
                    frame.lines.push(line(a, b));
                }
            }
            ProjectedShape::Channel { base, parallel } => {
                frame.lines.push(line(base.0, base.1));
                frame.lines.push(line(parallel.0, parallel.1));
            }
            ProjectedShape::Horizontal { y, from_x } => {
                let start_x = from_x.unwrap_or(left).max(left);
                if start_x <= right {
                    frame
                        .lines
                        .push(line(PixelPoint::new(start_x, *y), PixelPoint::new(right, *y)));
                }
            }
            ProjectedShape::Vertical { x } => frame
                .lines
                .push(line(PixelPoint::new(*x, top), PixelPoint::new(*x, bottom))),
            ProjectedShape::Retracement { start, end, levels } => {
                let level_left = start.x.min(end.x);
                let level_right = start.x.max(end.x);
                frame.lines.push(
                    LinePrimitive::between(*start, *end, width, stroke)
                        .with_style(LineStrokeStyle::Dotted),
                );
                for level in levels {
                    frame.lines.push(line(
                        PixelPoint::new(level_left, level.y),
                        PixelPoint::new(level_right, level.y),
                    ));
                    let caption = format!(
                        "{} ({:.2})",
                        RetracementLevel {
                            ratio: level.ratio,
                            price: level.price,
                        }
                        .caption(),
                        level.price
                    );
                    frame.texts.push(TextPrimitive::new(
                        caption,
                        level_left + RETRACEMENT_CAPTION_OFFSET_PX,
                        level.y - RETRACEMENT_CAPTION_OFFSET_PX,
                        label.font_size_px,
                        stroke,
                        TextHAlign::Left,
                    ));
                }
            }
            ProjectedShape::Polygon { vertices } => {
                for (index, vertex) in vertices.iter().enumerate() {
                    let next = vertices[(index + 1) % vertices.len()];
                    frame.lines.push(line(*vertex, next));
                }
            }
            ProjectedShape::Label { anchor, bounds } => {
                if let Geometry::Label { text, .. } = geometry {
                    if !text.is_empty() {
                        frame.texts.push(TextPrimitive::new(
                            text.clone(),
                            anchor.x + label.padding_px,
                            anchor.y - label.padding_px,
                            label.font_size_px,
                            stroke,
                            TextHAlign::Left,
                        ));
                    }
                }
                if decoration.handles {
                    let (box_left, box_top, box_right, box_bottom) = *bounds;
                    let transparent = Color::rgba(0.0, 0.0, 0.0, 0.0);
                    frame.rects.push(
                        RectPrimitive::new(
                            box_left,
                            box_top,
                            box_right - box_left,
                            box_bottom - box_top,
                            appearance.effective_fill().unwrap_or(transparent),
                        )
                        .with_border(1.0, stroke),
                    );
                }
            }
        }

        if decoration.handles {
            let radius = self.config.handle_radius_px;
            for point in geometry.control_points() {
                let Ok(center) = mapper.to_pixel(point) else {
                    continue;
                };
                frame.rects.push(
                    RectPrimitive::centered_square(center, radius, HANDLE_FILL)
                        .with_border(HANDLE_BORDER_WIDTH, stroke),
                );
            }
        }
        Ok(())
    }
}
