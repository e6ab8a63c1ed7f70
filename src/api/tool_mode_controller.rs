use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::AnnotationKind;
use crate::render::Renderer;

use super::{DrawingEngine, DrawingEvent};

/// Globally active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Select, hover and drag existing annotations.
    #[default]
    Cursor,
    /// One-shot drawing of a single shape; reverts to `Cursor` on completion.
    Draw(AnnotationKind),
}

impl ToolMode {
    #[must_use]
    pub fn drawing_kind(self) -> Option<AnnotationKind> {
        match self {
            Self::Cursor => None,
            Self::Draw(kind) => Some(kind),
        }
    }
}

impl<R: Renderer> DrawingEngine<R> {
    #[must_use]
    pub fn tool_mode(&self) -> ToolMode {
        self.tool_mode
    }

    /// Activates `mode` from the palette.
    ///
    /// Any partial click sequence is discarded and an in-flight drag is
    /// abandoned without commit. Re-selecting the active tool restarts its
    /// sequence. Returns `true` when the active tool changed.
    pub fn set_tool_mode(&mut self, mode: ToolMode) -> bool {
        if self.interaction.cancel_drawing() {
            debug!(tool = ?self.tool_mode, "discarded partial drawing on tool switch");
        }
        if self.interaction.take_drag().is_some() {
            debug!("abandoned drag on tool switch");
        }
        self.interaction.set_hover(None);
        self.switch_tool(mode)
    }

    pub(super) fn switch_tool(&mut self, mode: ToolMode) -> bool {
        let previous = self.tool_mode;
        if previous == mode {
            return false;
        }
        self.tool_mode = mode;
        debug!(?previous, current = ?mode, "tool changed");
        self.emit_event(DrawingEvent::ToolChanged {
            previous,
            current: mode,
        });
        true
    }
}
