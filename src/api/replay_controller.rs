use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::annotation::AnnotationSnapshot;
use crate::core::OhlcBar;
use crate::error::{DrawingError, DrawingResult};
use crate::render::Renderer;

use super::{DrawingEngine, DrawingEvent};

/// Runtime state of an active replay.
///
/// Annotations are stashed on entry and brought back unchanged on exit;
/// replay never touches undo history.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySession {
    visible_bars: usize,
    playing: bool,
    bars_per_second: f64,
    carry_bars: f64,
    stashed: AnnotationSnapshot,
}

impl ReplaySession {
    pub(super) fn stash(&mut self, snapshot: AnnotationSnapshot) {
        self.stashed = snapshot;
    }
}

/// Host-facing replay progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayStatus {
    pub visible_bars: usize,
    pub total_bars: usize,
    pub playing: bool,
    pub bars_per_second: f64,
}

impl<R: Renderer> DrawingEngine<R> {
    #[must_use]
    pub fn is_replay_active(&self) -> bool {
        self.replay.is_some()
    }

    #[must_use]
    pub fn replay_status(&self) -> Option<ReplayStatus> {
        self.replay.as_ref().map(|replay| ReplayStatus {
            visible_bars: replay.visible_bars,
            total_bars: self.bars.len(),
            playing: replay.playing,
            bars_per_second: replay.bars_per_second,
        })
    }

    /// Bars shown to the host: the replay prefix while replaying, else all.
    #[must_use]
    pub fn visible_bars(&self) -> &[OhlcBar] {
        match &self.replay {
            Some(replay) => &self.bars[..replay.visible_bars.min(self.bars.len())],
            None => &self.bars,
        }
    }

    /// Enters replay showing the first `visible_bars` bars (clamped to the
    /// loaded range) and hides every annotation.
    ///
    /// Returns `Ok(false)` when replay is already active.
    pub fn enter_replay(&mut self, visible_bars: usize) -> DrawingResult<bool> {
        if self.replay.is_some() {
            return Ok(false);
        }
        if self.bars.is_empty() {
            return Err(DrawingError::InvalidData(
                "replay requires loaded bars".to_owned(),
            ));
        }

        self.interaction.reset_gestures();
        let visible_bars = visible_bars.clamp(1, self.bars.len());
        self.replay = Some(ReplaySession {
            visible_bars,
            playing: false,
            bars_per_second: self.config.replay_bars_per_second,
            carry_bars: 0.0,
            stashed: self.store.snapshot(),
        });
        debug!(visible_bars, total = self.bars.len(), "replay entered");
        self.emit_event(DrawingEvent::ReplayEntered { visible_bars });
        Ok(true)
    }

    /// Leaves replay and re-shows the stashed annotations.
    pub fn exit_replay(&mut self) -> bool {
        let Some(replay) = self.replay.take() else {
            return false;
        };
        self.store.restore(replay.stashed);
        debug!("replay exited");
        self.emit_event(DrawingEvent::ReplayExited);
        true
    }

    pub fn step_replay_forward(&mut self) -> bool {
        self.advance_replay(1) > 0
    }

    pub fn step_replay_back(&mut self) -> bool {
        let Some(replay) = self.replay.as_mut() else {
            return false;
        };
        if replay.visible_bars <= 1 {
            return false;
        }
        replay.visible_bars -= 1;
        replay.carry_bars = 0.0;
        let visible_bars = replay.visible_bars;
        self.emit_event(DrawingEvent::ReplayStepped { visible_bars });
        true
    }

    /// Jumps to `visible_bars`, clamped to the loaded range.
    pub fn seek_replay(&mut self, visible_bars: usize) -> bool {
        let total = self.bars.len();
        let Some(replay) = self.replay.as_mut() else {
            return false;
        };
        let target = visible_bars.clamp(1, total.max(1));
        if target == replay.visible_bars {
            return false;
        }
        replay.visible_bars = target;
        replay.carry_bars = 0.0;
        if target >= total {
            replay.playing = false;
        }
        self.emit_event(DrawingEvent::ReplayStepped {
            visible_bars: target,
        });
        true
    }

    /// Starts automatic stepping. No-op at the end of data.
    pub fn play_replay(&mut self) -> bool {
        let total = self.bars.len();
        match self.replay.as_mut() {
            Some(replay) if !replay.playing && replay.visible_bars < total => {
                replay.playing = true;
                replay.carry_bars = 0.0;
                true
            }
            _ => false,
        }
    }

    pub fn pause_replay(&mut self) -> bool {
        match self.replay.as_mut() {
            Some(replay) if replay.playing => {
                replay.playing = false;
                true
            }
            _ => false,
        }
    }

    pub fn set_replay_speed(&mut self, bars_per_second: f64) -> DrawingResult<()> {
        if !bars_per_second.is_finite() || bars_per_second <= 0.0 {
            return Err(DrawingError::InvalidData(
                "replay speed must be finite and > 0".to_owned(),
            ));
        }
        if let Some(replay) = self.replay.as_mut() {
            replay.bars_per_second = bars_per_second;
        }
        self.config.replay_bars_per_second = bars_per_second;
        Ok(())
    }

    /// Advances a playing replay by elapsed time; returns the bars revealed.
    ///
    /// Playback pauses itself once the last bar is shown.
    pub fn tick_replay(&mut self, delta_seconds: f64) -> DrawingResult<usize> {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            return Err(DrawingError::InvalidData(
                "replay tick delta must be finite and >= 0".to_owned(),
            ));
        }
        let Some(replay) = self.replay.as_mut() else {
            return Ok(0);
        };
        if !replay.playing {
            return Ok(0);
        }
        replay.carry_bars += delta_seconds * replay.bars_per_second;
        let whole = replay.carry_bars.floor();
        replay.carry_bars -= whole;
        // Float to usize saturates; `whole` is finite and non-negative.
        let steps = whole as usize;
        trace!(steps, "replay tick");
        Ok(self.advance_replay(steps))
    }

    pub(super) fn clamp_replay_to_bars(&mut self) {
        let total = self.bars.len();
        if total == 0 {
            self.exit_replay();
            return;
        }
        if let Some(replay) = self.replay.as_mut() {
            replay.visible_bars = replay.visible_bars.clamp(1, total);
            if replay.visible_bars >= total {
                replay.playing = false;
            }
        }
    }

    fn advance_replay(&mut self, steps: usize) -> usize {
        let total = self.bars.len();
        let Some(replay) = self.replay.as_mut() else {
            return 0;
        };
        let advanced = steps.min(total.saturating_sub(replay.visible_bars));
        replay.visible_bars += advanced;
        if replay.visible_bars >= total {
            replay.playing = false;
            replay.carry_bars = 0.0;
        }
        let visible_bars = replay.visible_bars;
        if advanced > 0 {
            self.emit_event(DrawingEvent::ReplayStepped { visible_bars });
        }
        advanced
    }
}
