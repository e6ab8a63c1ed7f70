use tracing::trace;

use crate::error::{DrawingError, DrawingResult};
use crate::render::Renderer;

use super::{AnnotationObserver, DrawingEngine, DrawingEvent};

impl<R: Renderer> DrawingEngine<R> {
    /// Registers an observer with unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn AnnotationObserver>) -> DrawingResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(DrawingError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(DrawingError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    pub(super) fn emit_event(&mut self, event: DrawingEvent) {
        trace!(?event, observers = self.observers.len(), "emit drawing event");
        for observer in &mut self.observers {
            observer.on_event(&event, &self.store);
        }
    }

    pub(super) fn emit_selection_changed(&mut self) {
        let selection = self.store.selection().into_iter().collect();
        self.emit_event(DrawingEvent::SelectionChanged { selection });
    }
}
