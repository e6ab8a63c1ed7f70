use tracing::debug;

use crate::annotation::{AnnotationId, AnnotationRef};
use crate::render::Renderer;

use super::{DrawingEngine, DrawingEvent};

impl<R: Renderer> DrawingEngine<R> {
    #[must_use]
    pub fn selection(&self) -> Vec<AnnotationRef> {
        self.store.selection().into_iter().collect()
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<AnnotationId> {
        self.store.selected_ids()
    }

    /// Selects `id`; `additive` keeps the current selection.
    ///
    /// Unknown ids are ignored. Returns `true` when the selection changed.
    pub fn select(&mut self, id: AnnotationId, additive: bool) -> bool {
        if self.is_replay_active() {
            return false;
        }
        let changed = if additive {
            self.store.set_selected(id, true)
        } else {
            self.store.select_only(id)
        };
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    pub fn deselect(&mut self, id: AnnotationId) -> bool {
        if self.is_replay_active() {
            return false;
        }
        let changed = self.store.set_selected(id, false);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.is_replay_active() {
            return false;
        }
        let changed = self.store.clear_selection();
        if changed {
            debug!("selection cleared");
            self.emit_selection_changed();
        }
        changed
    }

    /// Removes every selected annotation as one undoable step.
    ///
    /// With nothing selected, during replay or mid-drag this is a no-op
    /// returning `0`; repeated calls are always safe.
    pub fn delete_selected(&mut self) -> usize {
        if self.is_replay_active() || self.interaction.drag().is_some() {
            return 0;
        }
        if self.store.selection().is_empty() {
            return 0;
        }

        let before = self.store.snapshot();
        let removed = self.store.remove_selected();
        self.history.record(before);
        self.interaction.set_hover(None);

        let ids: Vec<AnnotationId> = removed.iter().map(|annotation| annotation.id).collect();
        if self
            .pending_label_edit
            .is_some_and(|pending| ids.contains(&pending))
        {
            self.pending_label_edit = None;
        }
        debug!(count = ids.len(), "annotations deleted");
        let count = ids.len();
        self.emit_event(DrawingEvent::AnnotationsDeleted { ids });
        self.emit_selection_changed();
        count
    }
}
