use tracing::debug;

use crate::render::Renderer;

use super::{DrawingEngine, DrawingEvent, HistoryDirection};

impl<R: Renderer> DrawingEngine<R> {
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Restores the collections before the last committed step.
    ///
    /// Empty history, replay and an in-flight drag make this a no-op.
    pub fn undo(&mut self) -> bool {
        self.step_history(HistoryDirection::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.step_history(HistoryDirection::Redo)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn step_history(&mut self, direction: HistoryDirection) -> bool {
        if self.is_replay_active() || self.interaction.drag().is_some() {
            return false;
        }
        let current = self.store.snapshot();
        let restored = match direction {
            HistoryDirection::Undo => self.history.undo(current),
            HistoryDirection::Redo => self.history.redo(current),
        };
        let Some(snapshot) = restored else {
            return false;
        };

        self.store.restore(snapshot);
        self.interaction.set_hover(None);
        if self
            .pending_label_edit
            .is_some_and(|id| self.store.find(id).is_none())
        {
            self.pending_label_edit = None;
        }
        debug!(
            ?direction,
            undo_depth = self.history.undo_depth(),
            redo_depth = self.history.redo_depth(),
            "history restored"
        );
        self.emit_event(DrawingEvent::HistoryRestored { direction });
        true
    }
}
