use crate::error::{DrawingError, DrawingResult};
use crate::render::Renderer;

use super::{DrawingEngine, EngineSnapshot};

impl<R: Renderer> DrawingEngine<R> {
    /// Builds a deterministic snapshot useful for regression tests.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            viewport: self.viewport,
            time_full_range: self.time_scale.full_range(),
            time_visible_range: self.time_scale.visible_range(),
            price_domain: self.price_scale.domain(),
            price_scale_mode: self.price_scale.mode(),
            tool_mode: self.tool_mode,
            interaction_mode: self.interaction.mode(),
            annotations: self.store.snapshot(),
            selection: self.selection(),
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
            bars_len: self.bars.len(),
            replay: self.replay_status(),
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> DrawingResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| DrawingError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
