//! Free-standing text element.

use super::color::color_or_black;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub font_weight: FontWeight,
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_family: "Inter, sans-serif".to_string(),
            color: "#1e293b".to_string(),
            font_weight: FontWeight::default(),
            text_align: TextAlign::default(),
        }
    }
}

impl TextStyle {
    pub fn text_color(&self) -> Color {
        color_or_black(&self.color)
    }
}

/// A text box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBox {
    pub content: String,
    pub style: TextStyle,
}

impl TextBox {
    pub fn toggle_bold(&mut self) {
        self.style.font_weight = match self.style.font_weight {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        };
    }
}
