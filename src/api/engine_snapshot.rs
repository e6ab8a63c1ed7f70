use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationRef, AnnotationSnapshot};
use crate::core::{PriceScaleMode, Viewport};
use crate::interaction::InteractionMode;

use super::{ReplayStatus, ToolMode};

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub viewport: Viewport,
    pub time_full_range: (f64, f64),
    pub time_visible_range: (f64, f64),
    pub price_domain: (f64, f64),
    pub price_scale_mode: PriceScaleMode,
    pub tool_mode: ToolMode,
    pub interaction_mode: InteractionMode,
    pub annotations: AnnotationSnapshot,
    pub selection: Vec<AnnotationRef>,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub bars_len: usize,
    #[serde(default)]
    pub replay: Option<ReplayStatus>,
}
