use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationId, AnnotationRef, AnnotationStore};
use crate::interaction::DragCommitResult;

use super::ToolMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

/// Event stream exposed to host observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawingEvent {
    ToolChanged {
        previous: ToolMode,
        current: ToolMode,
    },
    /// A drawing sequence completed; the new record is already in the store.
    AnnotationCreated {
        id: AnnotationId,
        reference: AnnotationRef,
    },
    SelectionChanged {
        selection: Vec<AnnotationRef>,
    },
    DragCommitted(DragCommitResult),
    AnnotationsDeleted {
        ids: Vec<AnnotationId>,
    },
    /// Label text or appearance edits.
    AnnotationsUpdated {
        ids: Vec<AnnotationId>,
    },
    HistoryRestored {
        direction: HistoryDirection,
    },
    /// Host should focus its inline text editor for this label on the next paint.
    LabelEditRequested {
        id: AnnotationId,
    },
    ReplayEntered {
        visible_bars: usize,
    },
    ReplayStepped {
        visible_bars: usize,
    },
    ReplayExited,
}

/// Host callback interface.
///
/// Observers read the store after each change but cannot mutate it; all
/// mutations go through the engine.
pub trait AnnotationObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &DrawingEvent, store: &AnnotationStore);
}
