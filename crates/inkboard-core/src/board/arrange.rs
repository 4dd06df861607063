//! Z-order, alignment, distribution, and locking.

use super::{Board, actions};
use crate::elements::{Element, ElementId};
use crate::geometry::{rect_from_xywh, union_bounds};
use kurbo::{Point, Rect};

/// Edge or center line to align a selection to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Axis for distributing a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// The element's own box, without connector padding.
fn box_of(element: &Element) -> Rect {
    rect_from_xywh(element.x, element.y, element.width, element.height)
}

/// Start coordinate and extent of an element along `direction`.
fn span_of(element: &Element, direction: Direction) -> (f64, f64) {
    match direction {
        Direction::Horizontal => (element.x, element.width),
        Direction::Vertical => (element.y, element.height),
    }
}

impl Board {
    fn reorder(&mut self, id: &str, target: impl FnOnce(usize, usize) -> Option<usize>, label: &str) -> bool {
        let Some(index) = self.element_order.iter().position(|e| e == id) else {
            return false;
        };
        let Some(new_index) = target(index, self.element_order.len()) else {
            return false;
        };
        let moved = self.element_order.remove(index);
        self.element_order.insert(new_index, moved);
        self.reassign_z_indices();
        self.record_history(label);
        self.elements_changed();
        true
    }

    pub(super) fn reassign_z_indices(&mut self) {
        for (index, id) in self.element_order.iter().enumerate() {
            if let Some(element) = self.elements.get_mut(id) {
                element.set_z_index(index as i64);
            }
        }
    }

    /// Swap one step toward the front.
    pub fn bring_forward(&mut self, id: &str) -> bool {
        self.reorder(id, |i, len| (i + 1 < len).then_some(i + 1), actions::BRING_FORWARD)
    }

    /// Swap one step toward the back.
    pub fn send_backward(&mut self, id: &str) -> bool {
        self.reorder(id, |i, _| i.checked_sub(1), actions::SEND_BACKWARD)
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.reorder(id, |i, len| (i + 1 < len).then_some(len - 1), actions::BRING_TO_FRONT)
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.reorder(id, |i, _| (i > 0).then_some(0), actions::SEND_TO_BACK)
    }

    /// Align the selection to its union box. Locked elements stay put.
    ///
    /// Needs at least two selected elements. Returns whether anything moved;
    /// history is only recorded when it did.
    pub fn align_elements(&mut self, alignment: Alignment) -> bool {
        let selected = self.selected_elements();
        if selected.len() < 2 {
            return false;
        }
        let Some(bounds) = union_bounds(selected.iter().map(|e| box_of(e))) else {
            return false;
        };
        let positions: Vec<(ElementId, Point)> = selected
            .iter()
            .filter(|e| !e.is_locked())
            .map(|e| {
                let (mut x, mut y) = (e.x, e.y);
                match alignment {
                    Alignment::Left => x = bounds.x0,
                    Alignment::Center => x = bounds.x0 + (bounds.width() - e.width) / 2.0,
                    Alignment::Right => x = bounds.x1 - e.width,
                    Alignment::Top => y = bounds.y0,
                    Alignment::Middle => y = bounds.y0 + (bounds.height() - e.height) / 2.0,
                    Alignment::Bottom => y = bounds.y1 - e.height,
                }
                (e.id.clone(), Point::new(x, y))
            })
            .collect();

        let moved = self.set_positions(&positions);
        if moved {
            self.record_history(actions::ALIGN_ELEMENTS);
        }
        moved
    }

    /// Space the selection evenly between its outermost elements.
    ///
    /// Needs at least three selected elements. Locked elements stay put but
    /// still take up their slot.
    pub fn distribute_elements(&mut self, direction: Direction) -> bool {
        let mut selected = self.selected_elements();
        if selected.len() < 3 {
            return false;
        }
        selected.sort_by(|a, b| span_of(a, direction).0.total_cmp(&span_of(b, direction).0));

        let (first_start, first_extent) = span_of(selected[0], direction);
        let (last_start, last_extent) = span_of(selected[selected.len() - 1], direction);
        let total: f64 = selected.iter().map(|e| span_of(e, direction).1).sum();
        let span = last_start + last_extent - first_start;
        let gap = (span - total) / (selected.len() - 1) as f64;

        let mut cursor = first_start + first_extent + gap;
        let mut positions = Vec::new();
        for element in &selected[1..selected.len() - 1] {
            if !element.is_locked() {
                let position = match direction {
                    Direction::Horizontal => Point::new(cursor, element.y),
                    Direction::Vertical => Point::new(element.x, cursor),
                };
                positions.push((element.id.clone(), position));
            }
            cursor += span_of(element, direction).1 + gap;
        }

        let moved = self.set_positions(&positions);
        if moved {
            self.record_history(actions::DISTRIBUTE_ELEMENTS);
        }
        moved
    }

    /// Lock or unlock elements as one history entry.
    pub fn set_locked(&mut self, ids: &[ElementId], locked: bool) -> bool {
        let mut changed = false;
        for id in ids {
            if let Some(element) = self.elements.get_mut(id) {
                if element.is_locked() != locked {
                    element.set_locked(locked);
                    changed = true;
                }
            }
        }
        if changed {
            let label = if locked {
                actions::LOCK_ELEMENT
            } else {
                actions::UNLOCK_ELEMENT
            };
            self.record_history(label);
            self.elements_changed();
        }
        changed
    }

    /// Lock the selection, or unlock it if everything is already locked.
    pub fn toggle_lock_selected(&mut self) -> bool {
        let selected = self.selected_elements();
        if selected.is_empty() {
            return false;
        }
        let all_locked = selected.iter().all(|e| e.is_locked());
        let ids = self.selected_ids.clone();
        self.set_locked(&ids, !all_locked)
    }
}
