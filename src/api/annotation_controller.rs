use indexmap::IndexSet;
use tracing::debug;

use crate::annotation::{
    Annotation, AnnotationId, AnnotationKind, AnnotationSnapshot, Appearance, Geometry,
};
use crate::error::{DrawingError, DrawingResult};
use crate::render::Renderer;

use super::{DrawingEngine, DrawingEvent};

impl<R: Renderer> DrawingEngine<R> {
    /// Collection of `kind` in z-order (last is on top).
    #[must_use]
    pub fn annotations(&self, kind: AnnotationKind) -> &[Annotation] {
        self.store.collection(kind)
    }

    #[must_use]
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.store.get_by_id(id)
    }

    #[must_use]
    pub fn annotation_count(&self) -> usize {
        self.store.len()
    }

    /// Copy of every collection, e.g. for host persistence.
    #[must_use]
    pub fn export_annotations(&self) -> AnnotationSnapshot {
        self.store.snapshot()
    }

    /// Replaces every collection with a host-provided set.
    ///
    /// Gestures are dropped and history is cleared: the loaded set is a new
    /// baseline, not an undoable edit. During replay the set is stashed and
    /// shown on exit.
    pub fn load_annotations(&mut self, snapshot: AnnotationSnapshot) -> DrawingResult<()> {
        validate_snapshot(&snapshot)?;
        self.interaction.reset_gestures();
        self.history.clear();
        self.pending_label_edit = None;
        debug!(count = snapshot.len(), "annotations loaded");
        match self.replay.as_mut() {
            Some(replay) => replay.stash(snapshot),
            None => self.store.restore(snapshot),
        }
        Ok(())
    }

    /// Replaces the text of label `id` as one undoable step.
    ///
    /// Unknown ids and replay return `Ok(false)`; a non-label id is an error.
    pub fn set_label_text(
        &mut self,
        id: AnnotationId,
        text: impl Into<String>,
    ) -> DrawingResult<bool> {
        if self.is_replay_active() {
            return Ok(false);
        }
        let text = text.into();
        let Some(annotation) = self.store.get_by_id(id) else {
            return Ok(false);
        };
        let Geometry::Label { anchor, text: current } = &annotation.geometry else {
            return Err(DrawingError::InvalidData(format!(
                "annotation {id} is a {} and has no text",
                annotation.kind()
            )));
        };
        if *current == text {
            return Ok(false);
        }

        let geometry = Geometry::Label {
            anchor: *anchor,
            text,
        };
        let before = self.store.snapshot();
        if !self.store.replace_geometry(id, geometry)? {
            return Ok(false);
        }
        self.history.record(before);
        if self.pending_label_edit == Some(id) {
            self.pending_label_edit = None;
        }
        debug!(%id, "label text updated");
        self.emit_event(DrawingEvent::AnnotationsUpdated { ids: vec![id] });
        Ok(true)
    }

    /// Label waiting for the host's inline editor, consumed once.
    pub fn take_pending_label_edit(&mut self) -> Option<AnnotationId> {
        self.pending_label_edit.take()
    }

    /// Applies `appearance` to every selected annotation as one undoable step.
    pub fn set_selected_appearance(&mut self, appearance: Appearance) -> DrawingResult<usize> {
        let appearance = appearance.validate()?;
        if self.is_replay_active() {
            return Ok(0);
        }
        let targets: Vec<AnnotationId> = self
            .store
            .iter()
            .filter(|(_, annotation)| annotation.selected && annotation.appearance != appearance)
            .map(|(_, annotation)| annotation.id)
            .collect();
        if targets.is_empty() {
            return Ok(0);
        }

        let before = self.store.snapshot();
        for id in &targets {
            self.store.replace_appearance(*id, appearance)?;
        }
        self.history.record(before);
        debug!(count = targets.len(), "appearance updated");
        let count = targets.len();
        self.emit_event(DrawingEvent::AnnotationsUpdated { ids: targets });
        Ok(count)
    }
}

fn validate_snapshot(snapshot: &AnnotationSnapshot) -> DrawingResult<()> {
    let mut ids = IndexSet::new();
    for (kind, items) in &snapshot.collections {
        for annotation in items {
            if annotation.kind() != *kind {
                return Err(DrawingError::InvalidData(format!(
                    "annotation {} with {} geometry stored in the {kind} collection",
                    annotation.id,
                    annotation.kind()
                )));
            }
            annotation.geometry.validate()?;
            annotation.appearance.validate()?;
            if annotation.id.0 == u64::MAX {
                return Err(DrawingError::InvalidData(format!(
                    "annotation id {} is out of range",
                    annotation.id
                )));
            }
            if !ids.insert(annotation.id) {
                return Err(DrawingError::InvalidData(format!(
                    "duplicate annotation id {}",
                    annotation.id
                )));
            }
        }
    }
    Ok(())
}
