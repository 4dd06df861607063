//! Board export and import.

use super::{Board, BoardEvent, actions};
use crate::camera::Transform;
use crate::elements::ElementId;
use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Format version written by `export_data`.
pub const BOARD_FORMAT_VERSION: &str = "2.0";

/// Serialized board.
///
/// Elements stay as raw JSON so that import can drop entries it does not
/// understand instead of rejecting the whole board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    #[serde(default)]
    pub elements: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_order: Option<Vec<ElementId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    BOARD_FORMAT_VERSION.to_string()
}

impl Board {
    /// Owned snapshot of the board for persistence.
    pub fn export_data(&self) -> BoardData {
        let elements = self
            .elements()
            .filter_map(|e| match serde_json::to_value(e) {
                Ok(value) => Some(value),
                Err(err) => {
                    log::warn!("Failed to serialize element {}: {}", e.id(), err);
                    None
                }
            })
            .collect();
        BoardData {
            elements,
            element_order: Some(self.element_order.clone()),
            transform: Some(self.camera.to_transform()),
            version: BOARD_FORMAT_VERSION.to_string(),
        }
    }

    /// Replace the board contents with `data`.
    ///
    /// Invalid or unknown entries are dropped with a warning. Order entries
    /// for missing ids are dropped and elements missing from the order are
    /// appended. History is reset to a single "Import" entry. Returns the
    /// number of elements loaded.
    pub fn import_data(&mut self, data: BoardData) -> usize {
        self.selected_ids.clear();
        self.hovered_id = None;
        self.elements.clear();
        self.element_order.clear();

        let mut listed = Vec::with_capacity(data.elements.len());
        for value in &data.elements {
            match self.registry.from_value(value) {
                Ok(element) => {
                    if self.elements.contains_key(element.id()) {
                        BoardError::InvalidImport(format!("duplicate id {}", element.id())).log();
                        continue;
                    }
                    listed.push(element.id.clone());
                    self.elements.insert(element.id.clone(), element);
                }
                Err(e) => e.log(),
            }
        }

        let mut order = Vec::with_capacity(listed.len());
        let mut seen = HashSet::new();
        if let Some(element_order) = data.element_order {
            for id in element_order {
                if self.elements.contains_key(&id) && seen.insert(id.clone()) {
                    order.push(id);
                } else {
                    BoardError::MissingReference(id).log();
                }
            }
        }
        for id in listed {
            if seen.insert(id.clone()) {
                order.push(id);
            }
        }
        self.element_order = order;
        self.reassign_z_indices();

        if let Some(transform) = data.transform {
            self.camera.apply_transform(transform);
        }
        self.update_connections();

        self.history.clear();
        self.record_history(actions::IMPORT);
        self.elements_changed();
        self.emit(BoardEvent::SelectionChanged);
        self.emit(BoardEvent::TransformChanged);
        log::info!("Imported {} elements", self.elements.len());
        self.elements.len()
    }

    /// Import from a JSON value. A value that is not a board is rejected
    /// and leaves the board untouched.
    pub fn import_value(&mut self, value: Value) -> Option<usize> {
        match serde_json::from_value::<BoardData>(value) {
            Ok(data) => Some(self.import_data(data)),
            Err(e) => {
                BoardError::InvalidImport(e.to_string()).log();
                None
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export_data())
    }

    pub fn from_json(&mut self, json: &str) -> Option<usize> {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => self.import_value(value),
            Err(e) => {
                BoardError::InvalidImport(e.to_string()).log();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board_with_notes;
    use crate::elements::ElementType;
    use kurbo::{Point, Vec2};
    use serde_json::json;

    #[test]
    fn test_export_shape() {
        let (mut board, ids) = board_with_notes(2);
        board.pan_by(Vec2::new(10.0, 20.0));
        let value = serde_json::to_value(board.export_data()).unwrap();
        assert_eq!(value["version"], "2.0");
        assert_eq!(value["elementOrder"], json!(ids));
        assert_eq!(value["transform"]["panX"], 10.0);
        assert_eq!(value["elements"][0]["type"], "note");
        assert_eq!(value["elements"][0]["id"], ids[0].as_str());
    }

    #[test]
    fn test_export_import_keeps_elements() {
        let (mut board, ids) = board_with_notes(3);
        board.with_element_mut(&ids[1], |e| e.set_content("middle"));
        board.send_to_back(&ids[2]);
        let json = board.to_json().unwrap();

        let mut restored = Board::default();
        assert_eq!(restored.from_json(&json), Some(3));
        assert_eq!(restored.element_order(), board.element_order());
        for id in &ids {
            assert_eq!(restored.get_element(id), board.get_element(id));
        }
        assert_eq!(restored.history_info().len, 1);
        assert_eq!(restored.history_info().last_action.as_deref(), Some("Import"));
        assert!(!restored.can_undo());
    }

    #[test]
    fn test_import_drops_bad_entries() {
        let mut board = Board::default();
        let count = board.import_value(json!({
            "elements": [
                {"id": "a", "type": "note", "x": 1, "y": 2},
                {"id": "b", "type": "hologram"},
                {"id": "c"},
                {"id": "d", "type": "sticky", "content": "legacy"},
                {"id": "a", "type": "text"}
            ],
            "elementOrder": ["d", "ghost", "a"],
            "transform": {"zoom": 2, "panX": 5, "panY": 6}
        }));
        assert_eq!(count, Some(2));
        assert_eq!(board.element_order(), &["d".to_string(), "a".to_string()]);
        assert_eq!(board.get_element("d").unwrap().element_type(), ElementType::Note);
        assert!((board.zoom() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_import_without_order_uses_list_order() {
        let mut board = Board::default();
        board.import_value(json!({
            "elements": [
                {"id": "x", "type": "text"},
                {"id": "y", "type": "shape"}
            ]
        }));
        assert_eq!(board.element_order(), &["x".to_string(), "y".to_string()]);
        assert_eq!(board.get_element("y").unwrap().z_index(), 1);
    }

    #[test]
    fn test_import_appends_unordered_elements() {
        let mut board = Board::default();
        board.import_value(json!({
            "elements": [
                {"id": "x", "type": "text"},
                {"id": "y", "type": "shape"}
            ],
            "elementOrder": ["y"]
        }));
        assert_eq!(board.element_order(), &["y".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_import_rederives_bound_connectors() {
        let mut board = Board::default();
        board.import_value(json!({
            "elements": [
                {"id": "n", "type": "note", "x": 0, "y": 0, "width": 200, "height": 160},
                {"id": "c", "type": "connector", "properties": {
                    "startPoint": {"x": 0, "y": 0},
                    "endPoint": {"x": 500, "y": 500},
                    "startElementId": "n",
                    "startAnchor": "bottom"
                }}
            ]
        }));
        let c = board.get_element("c").unwrap().as_connector().unwrap();
        assert_eq!(c.start_point(), Point::new(100.0, 160.0));
        assert_eq!(c.end_point(), Point::new(500.0, 500.0));
    }

    #[test]
    fn test_invalid_json_leaves_board() {
        let (mut board, _) = board_with_notes(2);
        assert_eq!(board.from_json("not json"), None);
        assert_eq!(board.import_value(json!([1, 2, 3])), None);
        assert_eq!(board.len(), 2);
    }
}
