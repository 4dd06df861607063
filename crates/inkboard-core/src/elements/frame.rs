//! Frame element: a titled region that groups elements by containment.

use super::ElementId;
use serde::{Deserialize, Serialize};

/// Border line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    #[default]
    Dashed,
    Dotted,
}

/// Frame presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameStyle {
    pub background_color: String,
    pub border_color: String,
    pub border_style: BorderStyle,
    pub border_radius: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            background_color: "transparent".to_string(),
            border_color: "#e2e8f0".to_string(),
            border_style: BorderStyle::default(),
            border_radius: 12.0,
        }
    }
}

/// Structured frame fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameProperties {
    pub title: String,
    pub show_title: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_number: Option<u32>,
    pub collapsed: bool,
    /// Non-frame elements fully inside this frame as of the last recompute.
    pub contained_element_ids: Vec<ElementId>,
}

impl Default for FrameProperties {
    fn default() -> Self {
        Self {
            title: "Frame".to_string(),
            show_title: true,
            frame_number: None,
            collapsed: false,
            contained_element_ids: Vec::new(),
        }
    }
}

/// A frame. Its member list is only as fresh as the last
/// `Board::update_frame_contents` call; moving elements does not update it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    pub style: FrameStyle,
    pub properties: FrameProperties,
}

impl Frame {
    pub fn contained(&self) -> &[ElementId] {
        &self.properties.contained_element_ids
    }

    pub fn contains_element(&self, id: &str) -> bool {
        self.properties.contained_element_ids.iter().any(|c| c == id)
    }

    /// Add a member. Returns false if it was already present.
    pub fn add_element(&mut self, id: &str) -> bool {
        if self.contains_element(id) {
            return false;
        }
        self.properties.contained_element_ids.push(id.to_string());
        true
    }

    /// Remove a member. Returns false if it was not present.
    pub fn remove_element(&mut self, id: &str) -> bool {
        let before = self.properties.contained_element_ids.len();
        self.properties.contained_element_ids.retain(|c| c != id);
        before != self.properties.contained_element_ids.len()
    }

    pub(crate) fn set_contained(&mut self, ids: Vec<ElementId>) {
        self.properties.contained_element_ids = ids;
    }

    pub fn toggle_collapsed(&mut self) {
        self.properties.collapsed = !self.properties.collapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let mut frame = Frame::default();
        assert!(frame.add_element("a"));
        assert!(!frame.add_element("a"));
        assert!(frame.contains_element("a"));
        assert!(frame.remove_element("a"));
        assert!(!frame.remove_element("a"));
        assert!(frame.contained().is_empty());
    }

    #[test]
    fn test_defaults() {
        let frame = Frame::default();
        assert_eq!(frame.properties.title, "Frame");
        assert_eq!(frame.style.border_style, BorderStyle::Dashed);
        assert!((frame.style.border_radius - 12.0).abs() < f64::EPSILON);
    }
}
