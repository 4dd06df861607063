//! Keyboard shortcut resolution and documentation.

use crate::elements::ShapeKind;
use crate::input::KeyEvent;
use crate::tools::ToolKind;

/// Board command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Delete,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    SelectAll,
    Duplicate,
    /// Clear the selection and return to the select tool.
    Escape,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    FitToContent,
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
    ToggleLock,
    Tool(ToolKind),
    ShapeTool(ShapeKind),
}

/// Map a key press to its action. Releases and text-input keys map to nothing.
pub fn resolve(event: &KeyEvent) -> Option<ShortcutAction> {
    if !event.pressed || event.in_text_input {
        return None;
    }
    let m = event.modifiers;
    let key = event.key.to_ascii_lowercase();

    if m.command() {
        let action = match (key.as_str(), m.shift) {
            ("z", true) => ShortcutAction::Redo,
            ("z", false) => ShortcutAction::Undo,
            ("y", _) => ShortcutAction::Redo,
            ("c", false) => ShortcutAction::Copy,
            ("x", false) => ShortcutAction::Cut,
            ("v", false) => ShortcutAction::Paste,
            ("a", false) => ShortcutAction::SelectAll,
            ("d", false) => ShortcutAction::Duplicate,
            ("=" | "+", _) => ShortcutAction::ZoomIn,
            ("-", _) => ShortcutAction::ZoomOut,
            ("0", false) => ShortcutAction::ResetZoom,
            ("1", false) => ShortcutAction::FitToContent,
            ("]", false) => ShortcutAction::BringForward,
            ("[", false) => ShortcutAction::SendBackward,
            // Shift turns the bracket keys into braces on most layouts
            ("]" | "}", true) => ShortcutAction::BringToFront,
            ("[" | "{", true) => ShortcutAction::SendToBack,
            ("l", false) => ShortcutAction::ToggleLock,
            _ => return None,
        };
        return Some(action);
    }

    match key.as_str() {
        "delete" | "backspace" => Some(ShortcutAction::Delete),
        "escape" | "esc" => Some(ShortcutAction::Escape),
        _ if m.is_empty() => ToolKind::from_hotkey(&key).map(|(tool, shape)| match shape {
            Some(kind) => ShortcutAction::ShapeTool(kind),
            None => ShortcutAction::Tool(tool),
        }),
        _ => None,
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, false, "Delete selected elements"),
            Shortcut::new("Backspace", false, false, "Delete selected elements"),
            Shortcut::new("C", true, false, "Copy"),
            Shortcut::new("X", true, false, "Cut"),
            Shortcut::new("V", true, false, "Paste"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("A", true, false, "Select all"),
            Shortcut::new("D", true, false, "Duplicate selection"),
            Shortcut::new("Escape", false, false, "Clear selection and use the select tool"),
            Shortcut::new("=", true, false, "Zoom in"),
            Shortcut::new("-", true, false, "Zoom out"),
            Shortcut::new("0", true, false, "Reset zoom"),
            Shortcut::new("1", true, false, "Fit to content"),
            Shortcut::new("]", true, false, "Bring forward"),
            Shortcut::new("[", true, false, "Send backward"),
            Shortcut::new("]", true, true, "Bring to front"),
            Shortcut::new("[", true, true, "Send to back"),
            Shortcut::new("L", true, false, "Lock or unlock selection"),
            Shortcut::new("V", false, false, "Select tool"),
            Shortcut::new("H", false, false, "Pan tool"),
            Shortcut::new("N", false, false, "Sticky note tool"),
            Shortcut::new("S", false, false, "Sticky note tool"),
            Shortcut::new("T", false, false, "Text tool"),
            Shortcut::new("R", false, false, "Rectangle tool"),
            Shortcut::new("O", false, false, "Circle tool"),
            Shortcut::new("F", false, false, "Frame tool"),
            Shortcut::new("C", false, false, "Connector tool"),
            Shortcut::new("L", false, false, "Connector tool"),
            Shortcut::new("I", false, false, "Image tool"),
            Shortcut::new("Space+Drag", false, false, "Pan the canvas"),
            Shortcut::new("Shift+Drag", false, false, "Snap to grid, keep aspect ratio, or snap rotation"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn press(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        resolve(&KeyEvent::pressed(key, modifiers))
    }

    fn ctrl_shift() -> Modifiers {
        Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::NONE
        }
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(press("z", Modifiers::CTRL), Some(ShortcutAction::Undo));
        assert_eq!(press("Z", ctrl_shift()), Some(ShortcutAction::Redo));
        assert_eq!(press("y", Modifiers::CTRL), Some(ShortcutAction::Redo));
        assert_eq!(press("+", Modifiers::CTRL), Some(ShortcutAction::ZoomIn));
        assert_eq!(press("1", Modifiers::CTRL), Some(ShortcutAction::FitToContent));
        assert_eq!(press("}", ctrl_shift()), Some(ShortcutAction::BringToFront));
        assert_eq!(press("[", Modifiers::CTRL), Some(ShortcutAction::SendBackward));
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(press("c", meta), Some(ShortcutAction::Copy));
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(press("Backspace", Modifiers::NONE), Some(ShortcutAction::Delete));
        assert_eq!(press("Escape", Modifiers::NONE), Some(ShortcutAction::Escape));
        assert_eq!(press("h", Modifiers::NONE), Some(ShortcutAction::Tool(ToolKind::Pan)));
        assert_eq!(
            press("r", Modifiers::NONE),
            Some(ShortcutAction::ShapeTool(ShapeKind::Rectangle))
        );
        // Tool hotkeys need a bare key
        assert_eq!(press("r", Modifiers::SHIFT), None);
    }

    #[test]
    fn test_ignored_events() {
        assert_eq!(resolve(&KeyEvent::released("Delete")), None);
        let typing = KeyEvent::pressed("Backspace", Modifiers::NONE).in_text_input();
        assert_eq!(resolve(&typing), None);
    }

    #[test]
    fn test_registry_format() {
        let all = ShortcutRegistry::all();
        assert!(all.iter().any(|s| s.format() == "Ctrl+Shift+Z"));
        assert!(all.iter().any(|s| s.format() == "Escape"));
    }
}
