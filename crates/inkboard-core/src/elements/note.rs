//! Sticky note element.

use super::color::color_or_black;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// A named note color with its matching text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteColor {
    pub name: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

/// Palette offered for notes. The first entry is the default.
pub const NOTE_COLORS: [NoteColor; 9] = [
    NoteColor { name: "yellow", background: "#fef3c7", text: "#92400e" },
    NoteColor { name: "blue", background: "#dbeafe", text: "#1e40af" },
    NoteColor { name: "green", background: "#dcfce7", text: "#166534" },
    NoteColor { name: "pink", background: "#fce7f3", text: "#9d174d" },
    NoteColor { name: "purple", background: "#e9d5ff", text: "#6b21a8" },
    NoteColor { name: "orange", background: "#fed7aa", text: "#c2410c" },
    NoteColor { name: "red", background: "#fecaca", text: "#b91c1c" },
    NoteColor { name: "teal", background: "#ccfbf1", text: "#0f766e" },
    NoteColor { name: "gray", background: "#f1f5f9", text: "#475569" },
];

/// Note presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteStyle {
    pub background_color: String,
    pub text_color: String,
    pub font_size: f64,
}

impl Default for NoteStyle {
    fn default() -> Self {
        Self {
            background_color: NOTE_COLORS[0].background.to_string(),
            text_color: NOTE_COLORS[0].text.to_string(),
            font_size: 14.0,
        }
    }
}

impl NoteStyle {
    pub fn background(&self) -> Color {
        color_or_black(&self.background_color)
    }

    pub fn text(&self) -> Color {
        color_or_black(&self.text_color)
    }
}

/// A sticky note: colored card with free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub content: String,
    pub style: NoteStyle,
}

impl Note {
    /// Apply a palette color by name. Returns false for unknown names.
    pub fn set_color(&mut self, name: &str) -> bool {
        match NOTE_COLORS.iter().find(|c| c.name == name) {
            Some(color) => {
                self.style.background_color = color.background.to_string();
                self.style.text_color = color.text.to_string();
                true
            }
            None => false,
        }
    }

    /// Palette name of the current background, if it is a palette color.
    pub fn color_name(&self) -> Option<&'static str> {
        NOTE_COLORS
            .iter()
            .find(|c| c.background.eq_ignore_ascii_case(&self.style.background_color))
            .map(|c| c.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_note_is_yellow() {
        let note = Note::default();
        assert_eq!(note.color_name(), Some("yellow"));
        assert!((note.style.font_size - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_color() {
        let mut note = Note::default();
        assert!(note.set_color("teal"));
        assert_eq!(note.style.background_color, "#ccfbf1");
        assert_eq!(note.style.text_color, "#0f766e");
        assert!(!note.set_color("chartreuse"));
        assert_eq!(note.color_name(), Some("teal"));
    }
}
