//! Tool selection for the board.

use crate::elements::{ElementType, ShapeKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Note,
    Text,
    Shape,
    Frame,
    Connector,
    Image,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Select,
        ToolKind::Pan,
        ToolKind::Note,
        ToolKind::Text,
        ToolKind::Shape,
        ToolKind::Frame,
        ToolKind::Connector,
        ToolKind::Image,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pan => "pan",
            ToolKind::Note => "note",
            ToolKind::Text => "text",
            ToolKind::Shape => "shape",
            ToolKind::Frame => "frame",
            ToolKind::Connector => "connector",
            ToolKind::Image => "image",
        }
    }

    /// Element type placed with a single click, for the creation tools.
    pub fn creates(self) -> Option<ElementType> {
        match self {
            ToolKind::Note => Some(ElementType::Note),
            ToolKind::Text => Some(ElementType::Text),
            ToolKind::Shape => Some(ElementType::Shape),
            ToolKind::Frame => Some(ElementType::Frame),
            _ => None,
        }
    }

    /// Tool for an unmodified hotkey. Shape hotkeys also pick the outline.
    pub fn from_hotkey(key: &str) -> Option<(ToolKind, Option<ShapeKind>)> {
        let tool = match key.to_ascii_lowercase().as_str() {
            "v" => ToolKind::Select,
            "h" => ToolKind::Pan,
            "n" | "s" => ToolKind::Note,
            "t" => ToolKind::Text,
            "r" => return Some((ToolKind::Shape, Some(ShapeKind::Rectangle))),
            "o" => return Some((ToolKind::Shape, Some(ShapeKind::Circle))),
            "f" => ToolKind::Frame,
            "c" | "l" => ToolKind::Connector,
            "i" => ToolKind::Image,
            _ => return None,
        };
        Some((tool, None))
    }
}

/// Current tool plus the outline the shape tool draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Outline for new shapes.
    pub shape_kind: ShapeKind,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != tool {
            log::debug!("Tool: {} -> {}", self.current_tool.name(), tool.name());
            self.current_tool = tool;
        }
    }

    /// Select the shape tool with a specific outline.
    pub fn set_shape_tool(&mut self, kind: ShapeKind) {
        self.shape_kind = kind;
        self.set_tool(ToolKind::Shape);
    }

    /// Creation tools are one-shot and hand back to select.
    pub fn revert_to_select(&mut self) {
        self.set_tool(ToolKind::Select);
    }

    /// Registry data for the element the current tool creates.
    pub fn creation_data(&self) -> Value {
        match self.current_tool {
            ToolKind::Shape => json!({ "properties": { "shapeType": self.shape_kind } }),
            _ => json!({}),
        }
    }
}
