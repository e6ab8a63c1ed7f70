use tracing::debug;

use crate::annotation::{AnnotationStore, HistoryManager, RetracementLevels};
use crate::core::{PriceScale, TimeScale};
use crate::error::DrawingResult;
use crate::interaction::InteractionState;
use crate::render::Renderer;

use super::{DrawingEngine, DrawingEngineConfig, ToolMode};

impl<R: Renderer> DrawingEngine<R> {
    /// Creates an engine with an empty annotation store and the cursor tool active.
    pub fn new(renderer: R, config: DrawingEngineConfig) -> DrawingResult<Self> {
        config.validate()?;

        let time_scale = TimeScale::new(config.bar_start, config.bar_end)?;
        let price_scale =
            PriceScale::new_with_mode(config.price_min, config.price_max, config.price_scale_mode)?
                .with_margins(
                    config.price_scale_margins.top_margin_ratio,
                    config.price_scale_margins.bottom_margin_ratio,
                )?;
        let retracement_levels =
            RetracementLevels::new(config.retracement_levels.ratios().to_vec())?;

        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            bar_start = config.bar_start,
            bar_end = config.bar_end,
            "drawing engine initialized"
        );

        Ok(Self {
            renderer,
            viewport: config.viewport,
            time_scale,
            price_scale,
            retracement_levels,
            bars: Vec::new(),
            store: AnnotationStore::new(),
            history: HistoryManager::with_limit(config.history_limit),
            tool_mode: ToolMode::Cursor,
            interaction: InteractionState::default(),
            replay: None,
            pending_label_edit: None,
            observers: Vec::new(),
            config,
        })
    }
}
