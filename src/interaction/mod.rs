//! Pointer/keyboard input types and the per-gesture interaction state.

mod drawing;
mod hit_test;
mod keyboard;
mod manipulation;

use serde::{Deserialize, Serialize};

use crate::core::PixelPoint;

pub use drawing::{DrawingSession, DrawingStep};
pub use hit_test::{HitPart, HitTarget, HitTestConfig, hit_test};
pub use keyboard::{KeyCommand, resolve_key_command};
pub use manipulation::{DragCommitResult, DragSession, DragTarget};

/// Modifier keys held while an input event was produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    #[must_use]
    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub const fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Platform command modifier: Ctrl on Linux/Windows, Cmd on macOS.
    #[must_use]
    pub const fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event already translated into plot-area pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerInput {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn position(self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Enter,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Drawing,
    Hovering,
    DraggingShape,
    DraggingControlPoint,
}

/// State of the single gesture the engine may have in flight.
///
/// A drawing session and a drag never coexist: starting one always clears
/// the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    cursor: Option<PixelPoint>,
    hover: Option<HitTarget>,
    drawing: Option<DrawingSession>,
    drag: Option<DragSession>,
}

impl InteractionState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if let Some(drag) = &self.drag {
            return match drag.target() {
                DragTarget::Body => InteractionMode::DraggingShape,
                DragTarget::ControlPoint(_) => InteractionMode::DraggingControlPoint,
            };
        }
        if self.drawing.is_some() {
            return InteractionMode::Drawing;
        }
        if self.hover.is_some() {
            return InteractionMode::Hovering;
        }
        InteractionMode::Idle
    }

    #[must_use]
    pub fn cursor(&self) -> Option<PixelPoint> {
        self.cursor
    }

    #[must_use]
    pub fn hover(&self) -> Option<HitTarget> {
        self.hover
    }

    #[must_use]
    pub fn drawing(&self) -> Option<&DrawingSession> {
        self.drawing.as_ref()
    }

    #[must_use]
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn on_pointer_move(&mut self, position: PixelPoint) {
        self.cursor = Some(position);
    }

    pub fn on_pointer_leave(&mut self) {
        self.cursor = None;
        self.hover = None;
    }

    pub fn set_hover(&mut self, hover: Option<HitTarget>) {
        self.hover = hover;
    }

    pub fn drawing_mut(&mut self) -> Option<&mut DrawingSession> {
        self.drawing.as_mut()
    }

    pub fn begin_drawing(&mut self, session: DrawingSession) {
        self.drag = None;
        self.hover = None;
        self.drawing = Some(session);
    }

    /// Drops any in-progress drawing. Returns `true` when one existed.
    pub fn cancel_drawing(&mut self) -> bool {
        self.drawing.take().is_some()
    }

    pub fn drag_mut(&mut self) -> Option<&mut DragSession> {
        self.drag.as_mut()
    }

    pub fn begin_drag(&mut self, session: DragSession) {
        self.drawing = None;
        self.drag = Some(session);
    }

    pub fn take_drag(&mut self) -> Option<DragSession> {
        self.drag.take()
    }

    /// Drops every gesture and the hover target; the cursor position is kept.
    pub fn reset_gestures(&mut self) {
        self.hover = None;
        self.drawing = None;
        self.drag = None;
    }
}
