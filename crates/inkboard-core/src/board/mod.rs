//! The board: elements, z-order, selection, transform, and history.
//!
//! Every mutation goes through `Board`. Document mutations set the render
//! flag and queue a `BoardEvent`; committed actions record a history
//! snapshot. Operations on ids that do not exist are silent no-ops.

mod arrange;
mod clipboard;
mod serialize;
mod update;

pub use arrange::{Alignment, Direction};
pub use serialize::{BOARD_FORMAT_VERSION, BoardData};
pub use update::ElementUpdate;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::elements::{Element, ElementId, ElementRegistry, generate_id};
use crate::error::BoardError;
use crate::geometry::{ResizeHandle, rect_contains_rect, union_bounds};
use crate::history::{HistoryInfo, HistoryManager, Snapshot};
use kurbo::{Point, Rect, Size, Vec2};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

/// Notifications for the host, drained with `Board::drain_events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    ElementsChanged,
    SelectionChanged,
    TransformChanged,
    HistoryChanged,
}

/// History labels.
pub mod actions {
    pub const INITIAL: &str = "Initial state";
    pub const CREATE_ELEMENT: &str = "Create element";
    pub const DELETE_ELEMENT: &str = "Delete element";
    pub const DELETE_ELEMENTS: &str = "Delete elements";
    pub const MOVE_ELEMENTS: &str = "Move elements";
    pub const RESIZE_ELEMENT: &str = "Resize element";
    pub const ROTATE_ELEMENT: &str = "Rotate element";
    pub const CHANGE_STYLE: &str = "Change style";
    pub const PASTE_ELEMENTS: &str = "Paste elements";
    pub const DUPLICATE_ELEMENTS: &str = "Duplicate elements";
    pub const BRING_FORWARD: &str = "Bring forward";
    pub const SEND_BACKWARD: &str = "Send backward";
    pub const BRING_TO_FRONT: &str = "Bring to front";
    pub const SEND_TO_BACK: &str = "Send to back";
    pub const LOCK_ELEMENT: &str = "Lock element";
    pub const UNLOCK_ELEMENT: &str = "Unlock element";
    pub const ALIGN_ELEMENTS: &str = "Align elements";
    pub const DISTRIBUTE_ELEMENTS: &str = "Distribute elements";
    pub const CLEAR_BOARD: &str = "Clear board";
    pub const IMPORT: &str = "Import";
}

/// The aggregate root of the editing engine.
#[derive(Debug, Clone)]
pub struct Board {
    config: EngineConfig,
    registry: ElementRegistry,
    elements: HashMap<ElementId, Element>,
    /// Paint order, back to front. Always a permutation of `elements` keys.
    element_order: Vec<ElementId>,
    /// Selected ids in selection order.
    selected_ids: Vec<ElementId>,
    hovered_id: Option<ElementId>,
    clipboard: Vec<Value>,
    camera: Camera,
    viewport: Size,
    history: HistoryManager,
    events: VecDeque<BoardEvent>,
    needs_render: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(EngineConfig::default(), ElementRegistry::with_defaults())
    }
}

impl Board {
    pub fn new(config: EngineConfig, registry: ElementRegistry) -> Self {
        let mut board = Self {
            camera: Camera::from_config(&config),
            viewport: config.viewport,
            history: HistoryManager::new(config.history_capacity),
            config,
            registry,
            elements: HashMap::new(),
            element_order: Vec::new(),
            selected_ids: Vec::new(),
            hovered_id: None,
            clipboard: Vec::new(),
            events: VecDeque::new(),
            needs_render: true,
        };
        // Seed the log so the first action can be undone
        board.record_history(actions::INITIAL);
        board.events.clear();
        board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    // ---- Element lifecycle ----

    /// Build an element of type `tag` with `data` merged over its defaults.
    ///
    /// The element is not added. Unknown types log a warning and return `None`.
    pub fn create_element(&self, tag: &str, data: &Value) -> Option<Element> {
        match self.registry.create(tag, data) {
            Ok(element) => Some(element),
            Err(e) => {
                e.log();
                None
            }
        }
    }

    /// Add an element on top of the paint order. Returns its id.
    pub fn add_element(&mut self, mut element: Element, record_history: bool) -> ElementId {
        if self.elements.contains_key(element.id()) {
            BoardError::ConstraintViolation(format!("duplicate id {}, reassigning", element.id()))
                .log();
            element.id = generate_id();
        }
        let id = element.id.clone();
        self.element_order.push(id.clone());
        element.set_z_index(self.element_order.len() as i64);
        element.mark_dirty();
        self.elements.insert(id.clone(), element);
        self.update_connections();

        if record_history {
            self.record_history(actions::CREATE_ELEMENT);
        }
        self.elements_changed();
        id
    }

    /// Remove an element and every reference the board holds to it.
    pub fn remove_element(&mut self, id: &str, record_history: bool) -> Option<Element> {
        let element = self.elements.remove(id)?;
        self.element_order.retain(|e| e != id);
        let was_selected = self.selected_ids.len();
        self.selected_ids.retain(|e| e != id);
        if self.hovered_id.as_deref() == Some(id) {
            self.hovered_id = None;
        }
        for other in self.elements.values_mut() {
            other.forget_frame_member(id);
        }

        if record_history {
            self.record_history(actions::DELETE_ELEMENT);
        }
        self.elements_changed();
        if was_selected != self.selected_ids.len() {
            self.emit(BoardEvent::SelectionChanged);
        }
        Some(element)
    }

    /// Remove several elements as one history entry.
    pub fn remove_elements(&mut self, ids: &[ElementId]) {
        let present: Vec<&ElementId> = ids.iter().filter(|id| self.elements.contains_key(*id)).collect();
        if present.is_empty() {
            return;
        }
        self.start_batch();
        for id in present {
            self.remove_element(id, false);
        }
        self.end_batch(actions::DELETE_ELEMENTS);
    }

    pub fn delete_selected(&mut self) {
        let ids = self.selected_ids.clone();
        self.remove_elements(&ids);
    }

    /// Remove everything.
    pub fn clear_board(&mut self) {
        self.clear_selection();
        self.elements.clear();
        self.element_order.clear();
        self.hovered_id = None;
        self.record_history(actions::CLEAR_BOARD);
        self.elements_changed();
        log::info!("Board cleared");
    }

    pub fn get_element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Elements in paint order, back to front.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.element_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Elements sorted by z-index. Ties keep paint order.
    pub fn elements_sorted(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements().collect();
        sorted.sort_by_key(|e| e.z_index());
        sorted
    }

    pub fn element_order(&self) -> &[ElementId] {
        &self.element_order
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Union of all element bounds.
    pub fn content_bounds(&self) -> Option<Rect> {
        union_bounds(self.elements().map(Element::bounds))
    }

    /// Mutate one element in place, then refresh dependent connectors.
    ///
    /// No history is recorded. Returns `None` if the id is unknown.
    pub fn with_element_mut<R>(&mut self, id: &str, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        let element = self.elements.get_mut(id)?;
        let result = f(element);
        self.update_connections();
        self.elements_changed();
        Some(result)
    }

    /// Move elements to new top-left positions without recording history.
    ///
    /// Locked elements stay put. Returns true if anything moved.
    pub fn set_positions(&mut self, positions: &[(ElementId, Point)]) -> bool {
        let mut moved = false;
        for (id, position) in positions {
            if let Some(element) = self.elements.get_mut(id) {
                if element.position() != *position {
                    moved |= element.set_position(*position);
                }
            }
        }
        if moved {
            self.update_connections();
            self.elements_changed();
        }
        moved
    }

    /// Move and resize one element without recording history.
    pub fn set_element_bounds(&mut self, id: &str, rect: Rect, handle: ResizeHandle) -> bool {
        let changed = self
            .elements
            .get_mut(id)
            .is_some_and(|e| e.set_bounds(rect, handle));
        if changed {
            self.update_connections();
            self.elements_changed();
        }
        changed
    }

    /// Rotate one element without recording history.
    pub fn set_element_rotation(&mut self, id: &str, degrees: f64) -> bool {
        let changed = self
            .elements
            .get_mut(id)
            .is_some_and(|e| e.set_rotation(degrees));
        if changed {
            self.elements_changed();
        }
        changed
    }

    // ---- Selection ----

    /// Select `id`, replacing the selection unless `add` is set.
    pub fn select_element(&mut self, id: &str, add: bool) {
        if !add {
            self.selected_ids.clear();
        }
        if self.elements.contains_key(id) && !self.is_selected(id) {
            self.selected_ids.push(id.to_string());
        }
        self.selection_changed();
    }

    /// Flip membership of `id` in the selection.
    pub fn toggle_selection(&mut self, id: &str) {
        if self.is_selected(id) {
            self.deselect(id);
        } else {
            self.select_element(id, true);
        }
    }

    pub fn deselect(&mut self, id: &str) {
        let before = self.selected_ids.len();
        self.selected_ids.retain(|e| e != id);
        if before != self.selected_ids.len() {
            self.selection_changed();
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.selected_ids.is_empty() {
            self.selected_ids.clear();
            self.selection_changed();
        }
    }

    pub fn select_all(&mut self) {
        self.selected_ids = self.element_order.clone();
        self.selection_changed();
    }

    /// Replace the selection with every element whose bounds touch `rect`.
    pub fn select_in_rect(&mut self, rect: Rect) {
        self.selected_ids = self
            .elements()
            .filter(|e| e.intersects(rect))
            .map(|e| e.id.clone())
            .collect();
        self.selection_changed();
    }

    pub fn selected_ids(&self) -> &[ElementId] {
        &self.selected_ids
    }

    /// Selected elements in paint order.
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.elements().filter(|e| self.is_selected(e.id())).collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    pub fn selection_count(&self) -> usize {
        self.selected_ids.len()
    }

    pub fn hovered_id(&self) -> Option<&str> {
        self.hovered_id.as_deref()
    }

    pub fn set_hovered(&mut self, id: Option<&str>) {
        let id = id.filter(|id| self.elements.contains_key(*id));
        if self.hovered_id.as_deref() != id {
            self.hovered_id = id.map(str::to_string);
            self.needs_render = true;
        }
    }

    // ---- Transform ----

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.needs_render = true;
        }
    }

    /// Set the zoom, keeping the canvas point under `center` fixed if given.
    pub fn set_zoom(&mut self, zoom: f64, center: Option<Point>) {
        if self.camera.set_zoom(zoom, center) {
            self.transform_changed();
        }
    }

    pub fn zoom_in(&mut self) {
        let center = self.viewport_center();
        self.set_zoom(self.camera.zoom + self.config.zoom_step, Some(center));
    }

    pub fn zoom_out(&mut self) {
        let center = self.viewport_center();
        self.set_zoom(self.camera.zoom - self.config.zoom_step, Some(center));
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0, None);
    }

    /// Multiply the zoom around a screen point, as a scroll wheel does.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if self.camera.zoom_at(screen_point, factor) {
            self.transform_changed();
        }
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta != Vec2::ZERO {
            self.camera.pan_by(delta);
            self.transform_changed();
        }
    }

    /// Fit all content into the viewport, or reset when empty.
    pub fn fit_to_content(&mut self) {
        let bounds = self.content_bounds();
        self.camera
            .fit_to_bounds(bounds, self.viewport, self.config.fit_padding);
        self.transform_changed();
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        self.camera.screen_to_canvas(screen)
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        self.camera.canvas_to_screen(canvas)
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    // ---- History ----

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.elements.clone(),
            element_order: self.element_order.clone(),
            selected_ids: self.selected_ids.clone(),
        }
    }

    /// Commit the current state as one history entry.
    pub fn record_history(&mut self, label: &str) {
        let snapshot = self.snapshot();
        self.history.push(snapshot, label);
        self.emit(BoardEvent::HistoryChanged);
    }

    pub fn start_batch(&mut self) {
        self.history.start_batch();
    }

    /// Close a batch, recording the current state as one entry.
    pub fn end_batch(&mut self, label: &str) {
        let snapshot = self.snapshot();
        self.history.end_batch(snapshot, label);
        self.emit(BoardEvent::HistoryChanged);
    }

    pub fn cancel_batch(&mut self) {
        self.history.cancel_batch();
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo().cloned() {
            Some(snapshot) => {
                self.restore(snapshot);
                self.emit(BoardEvent::HistoryChanged);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(snapshot) => {
                self.restore(snapshot);
                self.emit(BoardEvent::HistoryChanged);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_info(&self) -> HistoryInfo {
        self.history.info()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Replace document state wholesale from a snapshot.
    fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot {
            elements,
            element_order,
            selected_ids,
        } = snapshot;

        self.elements = elements
            .into_iter()
            .filter(|(_, e)| {
                let known = self.registry.is_registered(e.element_type().as_str());
                if !known {
                    BoardError::UnknownType(e.element_type().as_str().to_string()).log();
                }
                known
            })
            .map(|(id, mut e)| {
                e.mark_dirty();
                (id, e)
            })
            .collect();
        self.element_order = element_order
            .into_iter()
            .filter(|id| self.elements.contains_key(id))
            .collect();
        self.selected_ids = selected_ids
            .into_iter()
            .filter(|id| self.elements.contains_key(id))
            .collect();
        if self
            .hovered_id
            .as_ref()
            .is_some_and(|id| !self.elements.contains_key(id))
        {
            self.hovered_id = None;
        }
        self.elements_changed();
        self.emit(BoardEvent::SelectionChanged);
    }

    // ---- Derived data ----

    /// Re-derive every bound connector endpoint from its element's bounds.
    ///
    /// Bindings to missing elements keep their last point. Returns true if
    /// any endpoint moved.
    pub fn update_connections(&mut self) -> bool {
        let bounds: HashMap<ElementId, Rect> = self
            .elements
            .values()
            .filter(|e| !e.is_connector())
            .map(|e| (e.id.clone(), e.bounds()))
            .collect();
        let mut changed = false;
        for element in self.elements.values_mut() {
            if element.is_connector() {
                changed |= element.refresh_connector(|id| bounds.get(id).copied());
            }
        }
        if changed {
            self.needs_render = true;
        }
        changed
    }

    /// Recompute which elements lie fully inside `frame_id`.
    ///
    /// Frame membership is only refreshed by this call and
    /// `update_all_frames`; moving elements leaves it stale.
    pub fn update_frame_contents(&mut self, frame_id: &str) -> bool {
        let Some(frame_bounds) = self
            .elements
            .get(frame_id)
            .filter(|e| e.is_frame())
            .map(Element::bounds)
        else {
            return false;
        };
        let contained: Vec<ElementId> = self
            .elements()
            .filter(|e| e.id() != frame_id && !e.is_frame())
            .filter(|e| rect_contains_rect(frame_bounds, e.bounds()))
            .map(|e| e.id.clone())
            .collect();
        let changed = self
            .elements
            .get_mut(frame_id)
            .is_some_and(|f| f.set_frame_contents(contained));
        if changed {
            self.elements_changed();
        }
        changed
    }

    pub fn update_all_frames(&mut self) {
        let frames: Vec<ElementId> = self
            .elements()
            .filter(|e| e.is_frame())
            .map(|e| e.id.clone())
            .collect();
        for id in frames {
            self.update_frame_contents(&id);
        }
    }

    /// Move a frame and its unlocked members by `delta`.
    ///
    /// Uses the member list from the last recompute. A locked frame does
    /// not move.
    pub fn move_frame_with_contents(&mut self, frame_id: &str, delta: Vec2) -> bool {
        let Some(members) = self
            .elements
            .get(frame_id)
            .filter(|e| !e.is_locked())
            .and_then(Element::as_frame)
            .map(|f| f.contained().to_vec())
        else {
            return false;
        };
        if let Some(frame) = self.elements.get_mut(frame_id) {
            frame.move_by(delta);
        }
        for id in &members {
            if let Some(member) = self.elements.get_mut(id) {
                member.move_by(delta);
            }
        }
        self.update_connections();
        self.record_history(actions::MOVE_ELEMENTS);
        self.elements_changed();
        true
    }

    // ---- Events and rendering ----

    fn emit(&mut self, event: BoardEvent) {
        if self.events.back() != Some(&event) {
            self.events.push_back(event);
        }
    }

    fn elements_changed(&mut self) {
        self.needs_render = true;
        self.emit(BoardEvent::ElementsChanged);
    }

    fn selection_changed(&mut self) {
        self.needs_render = true;
        self.emit(BoardEvent::SelectionChanged);
    }

    fn transform_changed(&mut self) {
        self.needs_render = true;
        self.emit(BoardEvent::TransformChanged);
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.events.drain(..).collect()
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Force a render on the next frame.
    pub fn request_render(&mut self) {
        self.needs_render = true;
    }

    pub(crate) fn clear_render_flag(&mut self) {
        self.needs_render = false;
    }

    pub(crate) fn clear_dirty_flags(&mut self) {
        for element in self.elements.values_mut() {
            element.clear_dirty();
        }
    }
}
