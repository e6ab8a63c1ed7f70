use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::annotation::{
    AnnotationId, AnnotationRef, AnnotationStore, LabelMetrics, ProjectedShape, RetracementLevels,
};
use crate::core::{CoordinateMapper, PixelPoint};
use crate::error::DrawingResult;

/// Pixel-space hit radii; constant across zoom levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitTestConfig {
    pub tolerance_px: f64,
    pub handle_radius_px: f64,
    #[serde(default)]
    pub label: LabelMetrics,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            tolerance_px: 6.0,
            handle_radius_px: 6.0,
            label: LabelMetrics::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitPart {
    ControlPoint(usize),
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitTarget {
    pub reference: AnnotationRef,
    pub id: AnnotationId,
    pub part: HitPart,
}

/// Finds the annotation under `pointer`.
///
/// Control points of every shape win over bodies; among handles the nearest
/// one wins, then the newer shape. Among body hits the most recently created
/// shape wins. Shapes the current mapper cannot project are skipped.
pub fn hit_test(
    store: &AnnotationStore,
    mapper: &CoordinateMapper,
    pointer: PixelPoint,
    config: HitTestConfig,
    levels: &RetracementLevels,
) -> DrawingResult<Option<HitTarget>> {
    if !pointer.is_finite() {
        return Ok(None);
    }

    let mut handles: SmallVec<[(OrderedFloat<f64>, Reverse<AnnotationId>, HitTarget); 4]> =
        SmallVec::new();
    let mut body: Option<HitTarget> = None;

    for (reference, annotation) in store.iter() {
        for (index, point) in annotation.geometry.control_points().iter().enumerate() {
            let Ok(center) = mapper.to_pixel(*point) else {
                continue;
            };
            let distance = center.distance_to(pointer);
            if distance <= config.handle_radius_px {
                handles.push((
                    OrderedFloat(distance),
                    Reverse(annotation.id),
                    HitTarget {
                        reference,
                        id: annotation.id,
                        part: HitPart::ControlPoint(index),
                    },
                ));
            }
        }

        if body.is_some_and(|current| current.id > annotation.id) {
            continue;
        }
        let projected = ProjectedShape::project(&annotation.geometry, mapper, levels, config.label);
        let shape = match projected {
            Ok(shape) => shape,
            Err(err) => {
                warn!(id = %annotation.id, error = %err, "skipping unmappable annotation");
                continue;
            }
        };
        if shape.hits(pointer, config.tolerance_px) {
            body = Some(HitTarget {
                reference,
                id: annotation.id,
                part: HitPart::Body,
            });
        }
    }

    let handle = handles
        .into_iter()
        .min_by_key(|(distance, id, _)| (*distance, *id))
        .map(|(_, _, target)| target);
    Ok(handle.or(body))
}
