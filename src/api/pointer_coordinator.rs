use tracing::{debug, trace, warn};

use crate::annotation::{AnnotationKind, Geometry};
use crate::core::PixelPoint;
use crate::error::{DrawingError, DrawingResult};
use crate::interaction::{
    DragCommitResult, DragSession, DragTarget, DrawingSession, DrawingStep, HitPart, HitTarget,
    KeyCommand, KeyInput, PointerInput, hit_test, resolve_key_command,
};
use crate::render::Renderer;

use super::{DrawingEngine, DrawingEvent, ToolMode};

impl<R: Renderer> DrawingEngine<R> {
    /// Routes a pointer press to the active tool.
    ///
    /// In a drawing tool the press places the next anchor. In cursor mode it
    /// selects the shape under the pointer and starts a drag, or clears the
    /// selection when nothing is hit. Returns `true` when state changed.
    pub fn pointer_down(&mut self, input: PointerInput) -> DrawingResult<bool> {
        let position = validate_pointer(input)?;
        if self.is_replay_active() {
            trace!("pointer down ignored during replay");
            return Ok(false);
        }
        self.interaction.on_pointer_move(position);

        match self.tool_mode {
            ToolMode::Draw(kind) => self.place_anchor(kind, input),
            ToolMode::Cursor => self.press_in_cursor_mode(input),
        }
    }

    /// Updates preview, drag or hover state for the pointer position.
    pub fn pointer_move(&mut self, input: PointerInput) -> DrawingResult<bool> {
        let position = validate_pointer(input)?;
        if self.is_replay_active() {
            return Ok(false);
        }
        self.interaction.on_pointer_move(position);

        if let Some(drag) = self.interaction.drag_mut() {
            drag.update(position)?;
            return Ok(true);
        }

        if self.interaction.drawing().is_some() {
            let point = self.mapper().to_data(position)?;
            if let Some(session) = self.interaction.drawing_mut() {
                session.pointer_move(point, input.modifiers.shift);
            }
            return Ok(true);
        }

        if self.tool_mode != ToolMode::Cursor {
            return Ok(false);
        }
        let hover = match self.hit_test_at(position) {
            Ok(hover) => hover,
            Err(err) => {
                warn!(error = %err, "skipping hover hit-test for unmappable pointer");
                None
            }
        };
        if hover == self.interaction.hover() {
            return Ok(false);
        }
        self.interaction.set_hover(hover);
        Ok(true)
    }

    /// Completes the active drag, committing its full geometry as one
    /// history entry. A release without a gesture is a no-op.
    pub fn pointer_up(&mut self, input: PointerInput) -> DrawingResult<bool> {
        let position = validate_pointer(input)?;
        if self.is_replay_active() {
            return Ok(false);
        }
        self.interaction.on_pointer_move(position);

        let Some(mut drag) = self.interaction.take_drag() else {
            return Ok(false);
        };
        drag.update(position)?;

        if drag.toggles_on_release() {
            let id = drag.id();
            if self.store.set_selected(id, false) {
                debug!(%id, "deselected on click");
                self.emit_selection_changed();
                return Ok(true);
            }
            return Ok(false);
        }

        match drag.finish() {
            Some(result) => self.commit_drag(result),
            None => Ok(false),
        }
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.on_pointer_leave();
    }

    /// Applies a keyboard shortcut. Unbound keys and shortcuts with nothing
    /// to act on return `Ok(false)`.
    pub fn key_down(&mut self, input: KeyInput) -> DrawingResult<bool> {
        let Some(command) = resolve_key_command(input) else {
            return Ok(false);
        };
        trace!(?command, "key command");
        match command {
            KeyCommand::Cancel => Ok(self.cancel()),
            KeyCommand::DeleteSelection => Ok(self.delete_selected() > 0),
            KeyCommand::Undo => Ok(self.undo()),
            KeyCommand::Redo => Ok(self.redo()),
        }
    }

    /// Escape: drops a partial drawing, otherwise the selection. Does nothing
    /// while a drag is in flight.
    pub fn cancel(&mut self) -> bool {
        if self.interaction.drag().is_some() {
            return false;
        }
        if self.interaction.cancel_drawing() {
            debug!(tool = ?self.tool_mode, "drawing cancelled");
            return true;
        }
        self.clear_selection()
    }

    /// Hit-tests the live annotations at a pixel position.
    pub fn hit_test_at(&self, position: PixelPoint) -> DrawingResult<Option<HitTarget>> {
        if self.is_replay_active() {
            return Ok(None);
        }
        hit_test(
            &self.store,
            &self.mapper(),
            position,
            self.config.hit_test_config(),
            &self.retracement_levels,
        )
    }

    fn place_anchor(&mut self, kind: AnnotationKind, input: PointerInput) -> DrawingResult<bool> {
        let point = self.mapper().to_data(input.position())?;
        if self.interaction.drawing().is_none_or(|session| session.kind() != kind) {
            let session = DrawingSession::new(kind, self.config.label.default_text.clone());
            self.interaction.begin_drawing(session);
        }
        let Some(session) = self.interaction.drawing_mut() else {
            return Ok(false);
        };

        match session.pointer_down(point, input.modifiers.shift) {
            Ok(DrawingStep::Pending { placed }) => {
                trace!(%kind, placed, "anchor placed");
                Ok(true)
            }
            Ok(DrawingStep::Completed(geometry)) => {
                self.interaction.cancel_drawing();
                self.complete_drawing(geometry)?;
                Ok(true)
            }
            Err(err) => {
                self.interaction.cancel_drawing();
                Err(err)
            }
        }
    }

    fn complete_drawing(&mut self, geometry: Geometry) -> DrawingResult<()> {
        let kind = geometry.kind();
        let before = self.store.snapshot();
        let reference = self.store.insert(geometry, self.config.appearance_for(kind))?;
        self.history.record(before);

        let id = self
            .store
            .get(reference)
            .map(|annotation| annotation.id)
            .ok_or_else(|| DrawingError::InvalidData("inserted annotation vanished".to_owned()))?;
        debug!(%id, %kind, index = reference.index, "annotation created");
        self.emit_event(DrawingEvent::AnnotationCreated { id, reference });

        if kind == AnnotationKind::Label {
            self.pending_label_edit = Some(id);
            self.emit_event(DrawingEvent::LabelEditRequested { id });
        }
        self.switch_tool(ToolMode::Cursor);
        Ok(())
    }

    fn press_in_cursor_mode(&mut self, input: PointerInput) -> DrawingResult<bool> {
        let position = input.position();
        let Some(target) = self.hit_test_at(position)? else {
            self.interaction.set_hover(None);
            let cleared = self.clear_selection();
            return Ok(cleared);
        };
        self.interaction.set_hover(Some(target));

        let was_selected = self.store.is_selected(target.id);
        if !was_selected {
            if input.modifiers.shift {
                self.store.set_selected(target.id, true);
            } else {
                self.store.select_only(target.id);
            }
            self.emit_selection_changed();
        }

        let Some(annotation) = self.store.get(target.reference) else {
            return Ok(!was_selected);
        };
        let drag_target = match target.part {
            HitPart::Body => DragTarget::Body,
            HitPart::ControlPoint(index) => DragTarget::ControlPoint(index),
        };
        let session = DragSession::begin(
            target.id,
            drag_target,
            annotation.geometry.clone(),
            self.mapper(),
            position,
        )?
        .with_toggle_on_release(was_selected);
        trace!(id = %target.id, ?drag_target, "drag started");
        self.interaction.begin_drag(session);
        Ok(true)
    }

    fn commit_drag(&mut self, result: DragCommitResult) -> DrawingResult<bool> {
        let before = self.store.snapshot();
        if !self.store.replace_geometry(result.id, result.geometry.clone())? {
            warn!(id = %result.id, "drag target disappeared before commit");
            return Ok(false);
        }
        self.history.record(before);
        debug!(
            id = %result.id,
            kind = %result.kind,
            control_point = ?result.control_point,
            "drag committed"
        );
        self.emit_event(DrawingEvent::DragCommitted(result));
        Ok(true)
    }
}

fn validate_pointer(input: PointerInput) -> DrawingResult<PixelPoint> {
    let position = input.position();
    if !position.is_finite() {
        return Err(DrawingError::InvalidData(
            "pointer position must be finite".to_owned(),
        ));
    }
    Ok(position)
}
