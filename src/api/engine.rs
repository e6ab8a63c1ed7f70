use crate::annotation::{
    AnnotationId, AnnotationSnapshot, AnnotationStore, HistoryManager, RetracementLevels,
};
use crate::core::{CoordinateMapper, OhlcBar, PriceScale, TimeScale, Viewport};
use crate::error::DrawingResult;
use crate::interaction::{InteractionMode, InteractionState};
use crate::render::Renderer;

use super::{AnnotationObserver, DrawingEngineConfig, ReplaySession, ToolMode};

/// Main orchestration facade consumed by host applications.
///
/// `DrawingEngine` owns the annotation collections, selection, undo history,
/// active tool and the single in-flight gesture. Every mutation goes through
/// its controller methods so history snapshots stay authoritative.
pub struct DrawingEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: DrawingEngineConfig,
    pub(super) viewport: Viewport,
    pub(super) time_scale: TimeScale,
    pub(super) price_scale: PriceScale,
    pub(super) retracement_levels: RetracementLevels,
    pub(super) bars: Vec<OhlcBar>,
    pub(super) store: AnnotationStore,
    pub(super) history: HistoryManager<AnnotationSnapshot>,
    pub(super) tool_mode: ToolMode,
    pub(super) interaction: InteractionState,
    pub(super) replay: Option<ReplaySession>,
    pub(super) pending_label_edit: Option<AnnotationId>,
    pub(super) observers: Vec<Box<dyn AnnotationObserver>>,
}

impl<R: Renderer> DrawingEngine<R> {
    #[must_use]
    pub fn config(&self) -> &DrawingEngineConfig {
        &self.config
    }

    /// Read-only view of every annotation collection and the selection flags.
    #[must_use]
    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    #[must_use]
    pub fn price_scale(&self) -> PriceScale {
        self.price_scale
    }

    #[must_use]
    pub fn retracement_levels(&self) -> &RetracementLevels {
        &self.retracement_levels
    }

    /// Coordinate mapper for the current view window.
    #[must_use]
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.time_scale, self.price_scale, self.viewport)
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn render(&mut self) -> DrawingResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
