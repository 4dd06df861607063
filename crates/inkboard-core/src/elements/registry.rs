//! Type-tag to constructor mapping used when creating or importing elements.

use super::{Element, ElementKind, ElementType};
use crate::error::BoardError;
use kurbo::Point;
use serde_json::Value;
use std::collections::HashMap;

/// Builds a default element of one type at the origin.
pub type ElementConstructor = fn() -> Element;

/// Registry of known element types.
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    constructors: HashMap<String, ElementConstructor>,
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_of(element_type: ElementType) -> Element {
    Element::new(ElementKind::default_for(element_type), Point::ZERO)
}

impl ElementRegistry {
    /// Registry with no types.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registry with the six built-in types and the legacy `sticky` alias.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("note", || default_of(ElementType::Note));
        registry.register("sticky", || default_of(ElementType::Note));
        registry.register("text", || default_of(ElementType::Text));
        registry.register("shape", || default_of(ElementType::Shape));
        registry.register("frame", || default_of(ElementType::Frame));
        registry.register("connector", || default_of(ElementType::Connector));
        registry.register("image", || default_of(ElementType::Image));
        registry
    }

    /// Register or replace the constructor for `tag`.
    pub fn register(&mut self, tag: &str, constructor: ElementConstructor) {
        self.constructors.insert(tag.to_string(), constructor);
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Create an element of type `tag`, merging `data` over its defaults.
    ///
    /// `data` is a partial element in serialized form. Nested `style` and
    /// `properties` objects merge field by field. A fresh id is kept unless
    /// `data` supplies one. Sizes below the type minimum are clamped.
    pub fn create(&self, tag: &str, data: &Value) -> Result<Element, BoardError> {
        let constructor = self
            .constructors
            .get(tag)
            .ok_or_else(|| BoardError::UnknownType(tag.to_string()))?;
        let base = constructor();
        let type_tag = base.element_type().as_str();

        let mut value = serde_json::to_value(&base)
            .map_err(|e| BoardError::InvalidImport(e.to_string()))?;
        if !data.is_null() {
            if !data.is_object() {
                return Err(BoardError::InvalidImport(format!(
                    "element data for '{}' is not an object",
                    tag
                )));
            }
            merge(&mut value, data);
        }
        // The registered tag decides the variant, not the payload
        value["type"] = Value::String(type_tag.to_string());

        let mut element: Element = serde_json::from_value(value)
            .map_err(|e| BoardError::InvalidImport(format!("{}: {}", tag, e)))?;
        element.enforce_constraints();
        element.mark_dirty();
        Ok(element)
    }

    /// Create an element from a full serialized value, dispatching on its
    /// `type` field.
    pub fn from_value(&self, value: &Value) -> Result<Element, BoardError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| BoardError::InvalidImport("element without a type".to_string()))?;
        self.create(tag, value)
    }
}

/// Deep-merge `patch` into `target`. Objects merge recursively, anything
/// else replaces.
pub(crate) fn merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_registered() {
        let registry = ElementRegistry::with_defaults();
        for t in ElementType::ALL {
            assert!(registry.is_registered(t.as_str()));
        }
        assert!(registry.is_registered("sticky"));
        assert!(!registry.is_registered("freehand"));
    }

    #[test]
    fn test_create_merges_overrides() {
        let registry = ElementRegistry::default();
        let el = registry
            .create(
                "note",
                &json!({"x": 40, "y": 50, "content": "hi", "style": {"fontSize": 20}}),
            )
            .unwrap();
        assert!((el.x() - 40.0).abs() < f64::EPSILON);
        assert_eq!(el.content(), Some("hi"));
        let note = el.as_note().unwrap();
        assert!((note.style.font_size - 20.0).abs() < f64::EPSILON);
        // Untouched style fields keep their defaults
        assert_eq!(note.style.background_color, "#fef3c7");
        assert!((el.width() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_create_assigns_or_keeps_id() {
        let registry = ElementRegistry::default();
        let a = registry.create("text", &Value::Null).unwrap();
        let b = registry.create("text", &Value::Null).unwrap();
        assert_ne!(a.id(), b.id());
        let c = registry.create("text", &json!({"id": "custom"})).unwrap();
        assert_eq!(c.id(), "custom");
    }

    #[test]
    fn test_create_clamps_min_size() {
        let registry = ElementRegistry::default();
        let el = registry
            .create("frame", &json!({"width": 10, "height": 10}))
            .unwrap();
        assert!((el.width() - 200.0).abs() < f64::EPSILON);
        assert!((el.height() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_type() {
        let registry = ElementRegistry::default();
        let err = registry.create("widget", &Value::Null).unwrap_err();
        assert_eq!(err, BoardError::UnknownType("widget".to_string()));
    }

    #[test]
    fn test_sticky_alias_creates_note() {
        let registry = ElementRegistry::default();
        let el = registry
            .from_value(&json!({"type": "sticky", "content": "old"}))
            .unwrap();
        assert_eq!(el.element_type(), ElementType::Note);
    }

    #[test]
    fn test_shape_properties_override() {
        let registry = ElementRegistry::default();
        let el = registry
            .create("shape", &json!({"properties": {"shapeType": "diamond"}}))
            .unwrap();
        assert_eq!(el.as_shape().unwrap().kind(), super::super::ShapeKind::Diamond);
    }

    #[test]
    fn test_merge_nested() {
        let mut target = json!({"a": {"b": 1, "c": 2}, "d": 3});
        merge(&mut target, &json!({"a": {"c": 5}, "e": 6}));
        assert_eq!(target, json!({"a": {"b": 1, "c": 5}, "d": 3, "e": 6}));
    }
}
