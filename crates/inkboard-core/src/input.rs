//! Pointer and keyboard input normalized for the board.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn is_empty(&self) -> bool {
        *self == Modifiers::NONE
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    Wheel { position: Point, delta: Vec2 },
    /// The host recognized a double click.
    DoubleClick { position: Point },
    /// The pointer left the canvas.
    Leave,
}

/// A key press or release.
///
/// `key` is the logical key name as the host reports it ("a", "Delete",
/// "Escape", " "). Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub pressed: bool,
    /// Set when focus is in a text field; the board ignores such events.
    pub in_text_input: bool,
}

impl KeyEvent {
    pub fn pressed(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            pressed: true,
            in_text_input: false,
        }
    }

    pub fn released(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
            pressed: false,
            in_text_input: false,
        }
    }

    pub fn in_text_input(mut self) -> Self {
        self.in_text_input = true;
        self
    }

    pub fn is_key(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }

    pub fn is_space(&self) -> bool {
        self.key == " " || self.is_key("Space") || self.is_key("Spacebar")
    }
}

/// Tracks pointer and modifier state between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Previous pointer position for delta calculations.
    pub previous_pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    space_held: bool,
    /// Screen position where the current press started.
    pub drag_start: Option<Point>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { position, button } => {
                self.move_to(position);
                self.pressed_buttons.insert(button);
                if self.drag_start.is_none() {
                    self.drag_start = Some(position);
                }
            }
            PointerEvent::Up { position, button } => {
                self.move_to(position);
                self.pressed_buttons.remove(&button);
                if self.pressed_buttons.is_empty() {
                    self.drag_start = None;
                }
            }
            PointerEvent::Move { position }
            | PointerEvent::Wheel { position, .. }
            | PointerEvent::DoubleClick { position } => {
                self.move_to(position);
            }
            PointerEvent::Leave => {
                self.pressed_buttons.clear();
                self.drag_start = None;
            }
        }
    }

    /// Process a key event. Only the space key and modifiers are tracked.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        if event.pressed {
            self.modifiers = event.modifiers;
        }
        if event.is_space() {
            self.space_held = event.pressed;
        }
    }

    fn move_to(&mut self, position: Point) {
        self.previous_pointer_position = self.pointer_position;
        self.pointer_position = position;
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Whether space is held, which turns a left drag into a pan.
    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    /// Forget held buttons and keys, e.g. after the window loses focus.
    pub fn release_all(&mut self) {
        self.pressed_buttons.clear();
        self.space_held = false;
        self.modifiers = Modifiers::NONE;
        self.drag_start = None;
    }

    /// Pointer movement since the previous pointer event.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }

    /// Movement since the press started, if a button is held.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.drag_start.map(|start| self.pointer_position - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_and_release() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert!(input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_button_pressed(MouseButton::Right));

        input.handle_pointer_event(&PointerEvent::Up {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert!(!input.is_button_pressed(MouseButton::Left));
        assert!(input.drag_start.is_none());
    }

    #[test]
    fn test_drag_tracking() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        input.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });

        let delta = input.drag_delta().unwrap();
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);
        assert!((input.pointer_delta().x - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_space_tracking() {
        let mut input = InputState::new();
        input.handle_key_event(&KeyEvent::pressed(" ", Modifiers::NONE));
        assert!(input.is_space_held());
        input.handle_key_event(&KeyEvent::released("Space"));
        assert!(!input.is_space_held());
    }

    #[test]
    fn test_leave_releases_buttons() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down {
            position: Point::ZERO,
            button: MouseButton::Middle,
        });
        input.handle_pointer_event(&PointerEvent::Leave);
        assert!(!input.is_button_pressed(MouseButton::Middle));
    }

    #[test]
    fn test_command_modifier() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.command());
        assert!(Modifiers::CTRL.command());
        assert!(!Modifiers::SHIFT.command());
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn test_key_matching() {
        let event = KeyEvent::pressed("Z", Modifiers::CTRL);
        assert!(event.is_key("z"));
        assert!(!event.in_text_input);
        assert!(event.in_text_input().in_text_input);
    }
}
