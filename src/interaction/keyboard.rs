use serde::{Deserialize, Serialize};

use super::{Key, KeyInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCommand {
    /// Abort the drawing in progress, or drop the selection when idle.
    Cancel,
    DeleteSelection,
    Undo,
    Redo,
}

/// Maps a key press to an engine command. Unbound keys return `None`.
///
/// Bindings: Escape, Delete/Backspace, Ctrl/Cmd+Z, Ctrl/Cmd+Shift+Z and Ctrl+Y.
#[must_use]
pub fn resolve_key_command(input: KeyInput) -> Option<KeyCommand> {
    let modifiers = input.modifiers;
    match input.key {
        Key::Escape => Some(KeyCommand::Cancel),
        Key::Delete | Key::Backspace if !modifiers.command() => Some(KeyCommand::DeleteSelection),
        Key::Char(ch) if modifiers.command() => match ch.to_ascii_lowercase() {
            'z' if modifiers.shift => Some(KeyCommand::Redo),
            'z' => Some(KeyCommand::Undo),
            'y' if modifiers.ctrl && !modifiers.shift => Some(KeyCommand::Redo),
            _ => None,
        },
        _ => None,
    }
}
