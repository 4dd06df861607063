//! Partial element updates.

use super::{Board, actions};
use crate::elements::{Element, merge};
use crate::error::BoardError;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A patch for one element. `None` fields are left alone.
///
/// `style` and `properties` are partial JSON objects merged field by field
/// into the element's serialized style and properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub content: Option<String>,
    pub style: Option<Value>,
    pub properties: Option<Value>,
}

impl ElementUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Merge style/properties patches into an element through its serialized form.
fn merge_payload(element: &Element, style: Option<&Value>, properties: Option<&Value>) -> Result<Element, BoardError> {
    let mut value = serde_json::to_value(element)
        .map_err(|e| BoardError::InvalidImport(e.to_string()))?;
    let mut patch = Map::new();
    if let Some(style) = style {
        patch.insert("style".to_string(), style.clone());
    }
    if let Some(properties) = properties {
        patch.insert("properties".to_string(), properties.clone());
    }
    merge(&mut value, &Value::Object(patch));
    let mut merged: Element = serde_json::from_value(value)
        .map_err(|e| BoardError::InvalidImport(format!("{}: {}", element.id(), e)))?;
    merged.enforce_constraints();
    merged.mark_dirty();
    Ok(merged)
}

impl Board {
    /// Apply `update` to one element and commit one "Change style" entry.
    ///
    /// A locked element only accepts being unlocked; locking is applied
    /// after the other fields. Unknown ids, and updates that leave the
    /// element as it was, record nothing and return `false`.
    pub fn update_element(&mut self, id: &str, update: ElementUpdate) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        let before = element.clone();

        if update.locked == Some(false) {
            element.set_locked(false);
        }

        if !element.is_locked() {
            if update.style.is_some() || update.properties.is_some() {
                match merge_payload(element, update.style.as_ref(), update.properties.as_ref()) {
                    Ok(merged) => *element = merged,
                    Err(e) => e.log(),
                }
            }
            if update.x.is_some() || update.y.is_some() {
                let position = Point::new(update.x.unwrap_or(element.x), update.y.unwrap_or(element.y));
                element.set_position(position);
            }
            if update.width.is_some() || update.height.is_some() {
                let width = update.width.unwrap_or(element.width);
                let height = update.height.unwrap_or(element.height);
                element.resize(width, height);
            }
            if let Some(rotation) = update.rotation {
                element.set_rotation(rotation);
            }
            if let Some(opacity) = update.opacity {
                element.set_opacity(opacity);
            }
            if let Some(visible) = update.visible {
                element.set_visible(visible);
            }
            if let Some(content) = update.content {
                element.set_content(content);
            }
        }

        if update.locked == Some(true) {
            element.set_locked(true);
        }
        if *element == before {
            return false;
        }
        element.mark_dirty();

        self.update_connections();
        self.record_history(actions::CHANGE_STYLE);
        self.elements_changed();
        true
    }
}
