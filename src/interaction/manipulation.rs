use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::annotation::{AnnotationId, AnnotationKind, Geometry};
use crate::core::{CoordinateMapper, DataDelta, DataPoint, PixelPoint};
use crate::error::{DrawingError, DrawingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    Body,
    ControlPoint(usize),
}

/// Full result of one committed drag, handed unchanged to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragCommitResult {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    pub control_point: Option<usize>,
    pub geometry: Geometry,
}

/// One whole-shape or control-point drag.
///
/// The mapper is frozen at drag start and every update is applied to the
/// original geometry, so intermediate moves never accumulate rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    id: AnnotationId,
    target: DragTarget,
    mapper: CoordinateMapper,
    origin_px: PixelPoint,
    origin_data: DataPoint,
    original: Geometry,
    current: Geometry,
    travelled: bool,
    toggle_on_release: bool,
}

impl DragSession {
    pub fn begin(
        id: AnnotationId,
        target: DragTarget,
        original: Geometry,
        mapper: CoordinateMapper,
        origin_px: PixelPoint,
    ) -> DrawingResult<Self> {
        if let DragTarget::ControlPoint(index) = target {
            if index >= original.control_points().len() {
                return Err(DrawingError::InvalidData(format!(
                    "annotation {id} has no control point {index}"
                )));
            }
        }
        let origin_data = mapper.to_data(origin_px)?;
        Ok(Self {
            id,
            target,
            mapper,
            origin_px,
            origin_data,
            current: original.clone(),
            original,
            travelled: false,
            toggle_on_release: false,
        })
    }

    /// Press on an already selected shape: a release without movement deselects it.
    #[must_use]
    pub fn with_toggle_on_release(mut self, toggle: bool) -> Self {
        self.toggle_on_release = toggle;
        self
    }

    #[must_use]
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    #[must_use]
    pub fn target(&self) -> DragTarget {
        self.target
    }

    #[must_use]
    pub fn original(&self) -> &Geometry {
        &self.original
    }

    /// Geometry the shape would have if released now.
    #[must_use]
    pub fn current(&self) -> &Geometry {
        &self.current
    }

    /// `true` once the pointer has left the press position at least once.
    #[must_use]
    pub fn has_travelled(&self) -> bool {
        self.travelled
    }

    #[must_use]
    pub fn toggles_on_release(&self) -> bool {
        self.toggle_on_release && !self.travelled
    }

    pub fn update(&mut self, pointer: PixelPoint) -> DrawingResult<&Geometry> {
        if pointer != self.origin_px {
            self.travelled = true;
        }
        let delta = self.origin_data.delta_to(self.mapper.to_data(pointer)?);
        self.current = self.apply(delta)?;
        trace!(id = %self.id, dx = delta.dx, dy = delta.dy, "drag update");
        Ok(&self.current)
    }

    /// Ends the drag. `None` when the geometry is unchanged.
    #[must_use]
    pub fn finish(self) -> Option<DragCommitResult> {
        if self.current == self.original {
            return None;
        }
        Some(DragCommitResult {
            id: self.id,
            kind: self.original.kind(),
            control_point: match self.target {
                DragTarget::Body => None,
                DragTarget::ControlPoint(index) => Some(index),
            },
            geometry: self.current,
        })
    }

    fn apply(&self, delta: DataDelta) -> DrawingResult<Geometry> {
        if delta.is_zero() {
            return Ok(self.original.clone());
        }
        let moved = match self.target {
            DragTarget::Body => self.original.translated(delta),
            DragTarget::ControlPoint(index) => {
                let handle = self
                    .original
                    .control_points()
                    .get(index)
                    .copied()
                    .ok_or_else(|| {
                        DrawingError::InvalidData(format!("control point {index} vanished"))
                    })?;
                self.original
                    .with_control_point(index, handle.translated(delta))
                    .ok_or_else(|| {
                        DrawingError::InvalidData(format!("control point {index} vanished"))
                    })?
            }
        };
        moved.validate()?;
        Ok(moved)
    }
}
