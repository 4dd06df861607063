//! In-process copy, cut, paste, and duplicate.
//!
//! The clipboard holds detached serialized elements, so it survives the
//! deletion of the originals.

use super::{Board, actions};
use crate::elements::{Element, ElementId};
use kurbo::Vec2;

impl Board {
    /// Copy the selection in paint order.
    pub fn copy(&mut self) -> usize {
        let copied: Vec<serde_json::Value> = self
            .selected_elements()
            .into_iter()
            .filter_map(|e| match serde_json::to_value(e) {
                Ok(value) => Some(value),
                Err(err) => {
                    log::warn!("Failed to copy element {}: {}", e.id(), err);
                    None
                }
            })
            .collect();
        self.clipboard = copied;
        log::debug!("Copied {} elements", self.clipboard.len());
        self.clipboard.len()
    }

    /// Copy, then delete the selection.
    pub fn cut(&mut self) -> usize {
        let count = self.copy();
        self.delete_selected();
        count
    }

    /// Paste the clipboard offset by the configured paste offset.
    ///
    /// Pasted elements get fresh ids, lose connector bindings and frame
    /// membership, and become the selection. Returns their ids.
    pub fn paste(&mut self) -> Vec<ElementId> {
        let offset = self.config.paste_offset;
        self.paste_with_offset(offset)
    }

    pub fn paste_with_offset(&mut self, offset: Vec2) -> Vec<ElementId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let elements: Vec<Element> = self
            .clipboard
            .iter()
            .filter_map(|value| match self.registry.from_value(value) {
                Ok(element) => Some(element.clone_with_offset(offset)),
                Err(e) => {
                    e.log();
                    None
                }
            })
            .collect();
        self.insert_copies(elements, actions::PASTE_ELEMENTS)
    }

    /// Clone the selection with the paste offset and select the clones.
    pub fn duplicate(&mut self) -> Vec<ElementId> {
        let offset = self.config.paste_offset;
        let clones: Vec<Element> = self
            .selected_elements()
            .into_iter()
            .map(|e| e.clone_with_offset(offset))
            .collect();
        if clones.is_empty() {
            return Vec::new();
        }
        self.insert_copies(clones, actions::DUPLICATE_ELEMENTS)
    }

    fn insert_copies(&mut self, elements: Vec<Element>, label: &str) -> Vec<ElementId> {
        self.clear_selection();
        self.start_batch();
        let ids: Vec<ElementId> = elements
            .into_iter()
            .map(|element| self.add_element(element, false))
            .collect();
        for id in &ids {
            self.select_element(id, true);
        }
        self.end_batch(label);
        ids
    }

    pub fn clipboard_len(&self) -> usize {
        self.clipboard.len()
    }
}
