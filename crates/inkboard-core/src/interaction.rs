//! Pointer and keyboard interaction state machine.
//!
//! One gesture runs at a time. A gesture starts on pointer-down, mutates the
//! board live without history while the pointer moves, and commits exactly
//! one history entry when it ends.

use crate::board::{Board, actions};
use crate::elements::{ElementId, ElementKind};
use crate::error::ImageResult;
use crate::geometry::{ResizeHandle, calculate_resize, normalize_rect};
use crate::image_source::AcquiredImage;
use crate::input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::{HandleKind, HandleMetrics, hit_test_handles};
use crate::shortcuts::{self, ShortcutAction};
use crate::snap::{snap_angle, snap_to_grid};
use crate::tools::{ToolKind, ToolManager};
use crate::view::PreviewTransform;
use kurbo::{Point, Rect, Vec2};
use serde_json::json;

/// Current gesture. Positions named `start`/`last` are in screen space,
/// everything else in canvas space.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    Dragging {
        start: Point,
        /// Unlocked selected elements and their positions at press time.
        origins: Vec<(ElementId, Point)>,
    },
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start: Point,
        original: Rect,
    },
    Rotating {
        id: ElementId,
        original: f64,
    },
    MarqueeSelecting {
        origin: Point,
        current: Point,
    },
    DrawingConnector {
        from: Point,
        source: Option<ElementId>,
        to: Point,
    },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Panning { .. } => "panning",
            InteractionState::Dragging { .. } => "dragging",
            InteractionState::Resizing { .. } => "resizing",
            InteractionState::Rotating { .. } => "rotating",
            InteractionState::MarqueeSelecting { .. } => "marquee",
            InteractionState::DrawingConnector { .. } => "connector",
        }
    }
}

/// Ask the host to acquire an image for placement at `position` (canvas).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRequest {
    pub position: Point,
}

/// Ask the host to open its editor on element `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    pub id: ElementId,
    /// Canvas point that was double-clicked.
    pub position: Point,
}

/// Work the engine hands back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionRequest {
    Image(ImageRequest),
    Edit(EditRequest),
}

/// Topmost visible element under a canvas point.
fn element_at(board: &Board, point: Point, skip_connectors: bool) -> Option<ElementId> {
    let threshold = board.config().connector_hit_threshold / board.zoom();
    board
        .elements()
        .rev()
        .filter(|e| e.is_visible() && !(skip_connectors && e.is_connector()))
        .find(|e| e.contains_point(point, threshold))
        .map(|e| e.id().to_string())
}

fn handle_metrics(board: &Board) -> HandleMetrics {
    let config = board.config();
    HandleMetrics {
        size: config.handle_size,
        rotate_offset: config.rotate_handle_offset,
    }
    .at_zoom(board.zoom())
}

/// Handle of a selected element under a canvas point, topmost first.
fn handle_at(board: &Board, point: Point) -> Option<(ElementId, HandleKind)> {
    let metrics = handle_metrics(board);
    board
        .selected_elements()
        .into_iter()
        .rev()
        .filter(|e| e.is_visible())
        .find_map(|e| hit_test_handles(e, point, metrics).map(|h| (e.id().to_string(), h)))
}

/// Translates input events into board operations.
#[derive(Debug, Default)]
pub struct Interaction {
    state: InteractionState,
    input: InputState,
    tools: ToolManager,
    hover_handle: Option<HandleKind>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    pub fn set_shape_tool(&mut self, kind: crate::elements::ShapeKind) {
        self.tools.set_shape_tool(kind);
    }

    /// Update modifier state, e.g. when shift is pressed mid-drag.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
    }

    fn enter(&mut self, state: InteractionState) {
        log::debug!("Interaction: {} -> {}", self.state.name(), state.name());
        self.state = state;
    }

    /// Dispatch a pointer event. A press with the image tool yields an image
    /// request; a double click on an element yields an edit request.
    pub fn handle_pointer_event(&mut self, board: &mut Board, event: PointerEvent) -> Option<InteractionRequest> {
        match event {
            PointerEvent::Down { position, button } => {
                return self
                    .pointer_down(board, position, button)
                    .map(InteractionRequest::Image);
            }
            PointerEvent::DoubleClick { position } => {
                return self.double_click(board, position).map(InteractionRequest::Edit);
            }
            PointerEvent::Up { position, button } => self.pointer_up(board, position, button),
            PointerEvent::Move { position } => self.pointer_move(board, position),
            PointerEvent::Wheel { position, delta } => self.wheel(board, position, delta),
            PointerEvent::Leave => self.pointer_leave(board),
        }
        None
    }

    /// Select the element under a double click and ask to edit it.
    ///
    /// Empty canvas and locked elements yield nothing.
    pub fn double_click(&mut self, board: &mut Board, position: Point) -> Option<EditRequest> {
        if !self.is_idle() {
            self.finish(board, true);
        }
        self.input
            .handle_pointer_event(&PointerEvent::DoubleClick { position });
        let canvas = board.screen_to_canvas(position);
        let id = element_at(board, canvas, false)?;
        if board.get_element(&id).is_none_or(|e| e.is_locked()) {
            return None;
        }
        board.select_element(&id, false);
        log::debug!("Edit requested for {}", id);
        Some(EditRequest { id, position: canvas })
    }

    pub fn pointer_down(&mut self, board: &mut Board, position: Point, button: MouseButton) -> Option<ImageRequest> {
        if !self.is_idle() {
            log::debug!("Pointer down while {}, ending it", self.state.name());
            self.finish(board, true);
        }
        self.input
            .handle_pointer_event(&PointerEvent::Down { position, button });
        let canvas = board.screen_to_canvas(position);
        let tool = self.tools.current_tool;

        let pans = button == MouseButton::Middle
            || (button == MouseButton::Left && (tool == ToolKind::Pan || self.input.is_space_held()));
        if pans {
            self.enter(InteractionState::Panning { last: position });
            return None;
        }
        if button != MouseButton::Left {
            return None;
        }

        match tool {
            ToolKind::Select => self.begin_select(board, position, canvas),
            ToolKind::Connector => {
                let source = element_at(board, canvas, true);
                self.enter(InteractionState::DrawingConnector {
                    from: canvas,
                    source,
                    to: canvas,
                });
            }
            ToolKind::Image => return Some(ImageRequest { position: canvas }),
            ToolKind::Note | ToolKind::Text | ToolKind::Shape | ToolKind::Frame => {
                self.create_at(board, canvas)
            }
            ToolKind::Pan => {}
        }
        None
    }

    fn begin_select(&mut self, board: &mut Board, screen: Point, canvas: Point) {
        if let Some((id, handle)) = handle_at(board, canvas) {
            let Some(element) = board.get_element(&id) else {
                return;
            };
            let state = match handle {
                HandleKind::Resize(handle) => InteractionState::Resizing {
                    original: element.bounds(),
                    id,
                    handle,
                    start: screen,
                },
                HandleKind::Rotate => InteractionState::Rotating {
                    original: element.rotation(),
                    id,
                },
            };
            self.enter(state);
            return;
        }

        let shift = self.input.modifiers.shift;
        match element_at(board, canvas, false) {
            Some(id) => {
                if shift {
                    board.toggle_selection(&id);
                } else if !board.is_selected(&id) {
                    board.select_element(&id, false);
                }
                let origins = board
                    .selected_elements()
                    .into_iter()
                    .filter(|e| !e.is_locked())
                    .map(|e| (e.id().to_string(), e.position()))
                    .collect();
                self.enter(InteractionState::Dragging { start: screen, origins });
            }
            None => {
                if !shift {
                    board.clear_selection();
                }
                self.enter(InteractionState::MarqueeSelecting {
                    origin: canvas,
                    current: canvas,
                });
            }
        }
    }

    /// Place the current tool's element centered on `canvas`.
    fn create_at(&mut self, board: &mut Board, canvas: Point) {
        let Some(element_type) = self.tools.current_tool.creates() else {
            return;
        };
        let data = self.tools.creation_data();
        if let Some(mut element) = board.create_element(element_type.as_str(), &data) {
            let half = Vec2::new(element.width() / 2.0, element.height() / 2.0);
            element.set_position(canvas - half);
            let id = board.add_element(element, true);
            board.select_element(&id, false);
        }
        self.tools.revert_to_select();
    }

    pub fn pointer_move(&mut self, board: &mut Board, position: Point) {
        self.input.handle_pointer_event(&PointerEvent::Move { position });
        let canvas = board.screen_to_canvas(position);
        if self.is_idle() {
            self.update_hover(board, canvas);
            return;
        }

        let shift = self.input.modifiers.shift;
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Panning { last } => {
                let delta = position - *last;
                *last = position;
                board.pan_by(delta);
            }
            InteractionState::Dragging { start, origins } => {
                let delta = (position - *start) / board.zoom();
                let grid = board.config().grid_size;
                let positions: Vec<(ElementId, Point)> = origins
                    .iter()
                    .map(|(id, origin)| {
                        let target = *origin + delta;
                        let target = if shift { snap_to_grid(target, grid) } else { target };
                        (id.clone(), target)
                    })
                    .collect();
                board.set_positions(&positions);
            }
            InteractionState::Resizing {
                id,
                handle,
                start,
                original,
            } => {
                let delta = (position - *start) / board.zoom();
                let rect = match board.get_element(id) {
                    Some(element) => {
                        let lock = shift || element.as_image().is_some_and(|i| i.is_aspect_locked());
                        calculate_resize(*original, delta, *handle, lock, element.min_size())
                    }
                    None => return,
                };
                board.set_element_bounds(id, rect, *handle);
            }
            InteractionState::Rotating { id, .. } => {
                let Some(center) = board.get_element(id).map(|e| e.center()) else {
                    return;
                };
                let center = board.canvas_to_screen(center);
                // Zero degrees points up
                let mut angle = (position.y - center.y).atan2(position.x - center.x).to_degrees() + 90.0;
                if shift {
                    angle = snap_angle(angle, board.config().angle_snap_degrees);
                }
                board.set_element_rotation(id, angle);
            }
            InteractionState::MarqueeSelecting { current, .. } => {
                *current = canvas;
                board.request_render();
            }
            InteractionState::DrawingConnector { to, .. } => {
                *to = canvas;
                board.request_render();
            }
        }
    }

    fn update_hover(&mut self, board: &mut Board, canvas: Point) {
        let hovered = element_at(board, canvas, false);
        board.set_hovered(hovered.as_deref());
        self.hover_handle = if self.tools.current_tool == ToolKind::Select {
            handle_at(board, canvas).map(|(_, handle)| handle)
        } else {
            None
        };
    }

    pub fn pointer_up(&mut self, board: &mut Board, position: Point, button: MouseButton) {
        if !self.is_idle() && self.input.pointer_position != position {
            self.pointer_move(board, position);
        }
        self.input
            .handle_pointer_event(&PointerEvent::Up { position, button });
        self.finish(board, true);
    }

    /// The pointer left the canvas: end the gesture where it last was.
    pub fn pointer_leave(&mut self, board: &mut Board) {
        self.input.handle_pointer_event(&PointerEvent::Leave);
        self.finish(board, true);
        board.set_hovered(None);
        self.hover_handle = None;
    }

    /// Zoom by `zoom · (1 - delta.y · sensitivity)` around the pointer.
    pub fn wheel(&mut self, board: &mut Board, position: Point, delta: Vec2) {
        self.input
            .handle_pointer_event(&PointerEvent::Wheel { position, delta });
        let factor = 1.0 - delta.y * board.config().scroll_zoom_sensitivity;
        if factor > 0.0 {
            board.zoom_at(position, factor);
        }
    }

    /// Return to idle after focus loss. Moves, resizes and rotations in
    /// progress are committed; marquees and connector drafts are dropped.
    pub fn reset(&mut self, board: &mut Board) {
        self.finish(board, false);
        self.input.release_all();
        self.hover_handle = None;
        board.set_hovered(None);
    }

    /// End the current gesture. `complete` is false when the gesture was
    /// interrupted rather than released.
    fn finish(&mut self, board: &mut Board, complete: bool) {
        let state = std::mem::take(&mut self.state);
        if state != InteractionState::Idle {
            log::debug!("Interaction: {} -> idle", state.name());
        }
        match state {
            InteractionState::Idle | InteractionState::Panning { .. } => {}
            InteractionState::Dragging { origins, .. } => {
                let moved = origins
                    .iter()
                    .any(|(id, origin)| board.get_element(id).is_some_and(|e| e.position() != *origin));
                if moved {
                    board.record_history(actions::MOVE_ELEMENTS);
                }
            }
            InteractionState::Resizing { id, original, .. } => {
                if board.get_element(&id).is_some_and(|e| e.bounds() != original) {
                    board.record_history(actions::RESIZE_ELEMENT);
                }
            }
            InteractionState::Rotating { id, original } => {
                if board
                    .get_element(&id)
                    .is_some_and(|e| (e.rotation() - original).abs() > f64::EPSILON)
                {
                    board.record_history(actions::ROTATE_ELEMENT);
                }
            }
            InteractionState::MarqueeSelecting { origin, current } => {
                let rect = normalize_rect(origin, current - origin);
                let min = board.config().marquee_min_size;
                if complete && rect.width() > min && rect.height() > min {
                    board.select_in_rect(rect);
                }
                board.request_render();
            }
            InteractionState::DrawingConnector { from, source, to } => {
                if complete {
                    self.finish_connector(board, from, source, to);
                }
                board.request_render();
            }
        }
    }

    fn finish_connector(&mut self, board: &mut Board, from: Point, source: Option<ElementId>, to: Point) {
        let target = element_at(board, to, true).filter(|t| source.as_ref() != Some(t));
        if source.is_none() && target.is_none() && from.distance(to) <= board.config().marquee_min_size {
            log::debug!("Connector too short, discarded");
            return;
        }
        let Some(mut element) = board.create_element("connector", &json!({})) else {
            return;
        };
        let bounds_of = |id: &Option<ElementId>| {
            id.as_deref()
                .and_then(|id| board.get_element(id))
                .map(|e| (e.id().to_string(), e.bounds()))
        };
        let start = bounds_of(&source);
        let end = bounds_of(&target);

        if let Some(ElementKind::Connector(connector)) = element.kind_mut() {
            connector.set_start_point(from);
            connector.set_end_point(to);
            if let Some((id, bounds)) = &start {
                connector.connect_start(id, *bounds, None);
            }
            if let Some((id, bounds)) = &end {
                connector.connect_end(id, *bounds, None);
            }
        }
        element.enforce_constraints();

        let id = board.add_element(element, true);
        board.select_element(&id, false);
        self.tools.revert_to_select();
    }

    /// Place an acquired image at the request point.
    ///
    /// On success the image is fitted, added and selected, and the tool
    /// returns to select. Failures are logged and handed back.
    pub fn complete_image(
        &mut self,
        board: &mut Board,
        request: ImageRequest,
        result: ImageResult<AcquiredImage>,
    ) -> ImageResult<ElementId> {
        match result {
            Ok(image) => {
                let element = image.to_element(request.position, board.config().max_image_side);
                let id = board.add_element(element, true);
                board.select_element(&id, false);
                self.tools.revert_to_select();
                log::debug!("Inserted {}x{} image {}", image.width, image.height, id);
                Ok(id)
            }
            Err(e) => {
                log::warn!("Image insert failed: {}", e);
                Err(e)
            }
        }
    }

    /// Apply a key event. Returns true if it was consumed.
    pub fn handle_key(&mut self, board: &mut Board, event: &KeyEvent) -> bool {
        if event.in_text_input {
            return false;
        }
        self.input.handle_key_event(event);
        if event.is_space() {
            return true;
        }
        let Some(action) = shortcuts::resolve(event) else {
            return false;
        };
        if !self.is_idle() {
            self.finish(board, false);
        }
        self.apply(board, action);
        true
    }

    /// Run a shortcut action against the board.
    pub fn apply(&mut self, board: &mut Board, action: ShortcutAction) {
        log::debug!("Shortcut: {:?}", action);
        match action {
            ShortcutAction::Delete => board.delete_selected(),
            ShortcutAction::Copy => {
                board.copy();
            }
            ShortcutAction::Cut => {
                board.cut();
            }
            ShortcutAction::Paste => {
                board.paste();
            }
            ShortcutAction::Undo => {
                board.undo();
            }
            ShortcutAction::Redo => {
                board.redo();
            }
            ShortcutAction::SelectAll => board.select_all(),
            ShortcutAction::Duplicate => {
                board.duplicate();
            }
            ShortcutAction::Escape => {
                board.clear_selection();
                self.tools.set_tool(ToolKind::Select);
            }
            ShortcutAction::ZoomIn => board.zoom_in(),
            ShortcutAction::ZoomOut => board.zoom_out(),
            ShortcutAction::ResetZoom => board.reset_zoom(),
            ShortcutAction::FitToContent => board.fit_to_content(),
            ShortcutAction::BringForward => reorder_selection(board, true, Board::bring_forward, actions::BRING_FORWARD),
            ShortcutAction::SendBackward => reorder_selection(board, false, Board::send_backward, actions::SEND_BACKWARD),
            ShortcutAction::BringToFront => reorder_selection(board, false, Board::bring_to_front, actions::BRING_TO_FRONT),
            ShortcutAction::SendToBack => reorder_selection(board, true, Board::send_to_back, actions::SEND_TO_BACK),
            ShortcutAction::ToggleLock => {
                board.toggle_lock_selected();
            }
            ShortcutAction::Tool(tool) => self.tools.set_tool(tool),
            ShortcutAction::ShapeTool(kind) => self.tools.set_shape_tool(kind),
        }
    }

    /// Marquee rectangle in canvas space, for drawing.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.state {
            InteractionState::MarqueeSelecting { origin, current } => Some(normalize_rect(origin, current - origin)),
            _ => None,
        }
    }

    /// Endpoints of the connector being drawn, in canvas space.
    pub fn connector_preview(&self) -> Option<(Point, Point)> {
        match self.state {
            InteractionState::DrawingConnector { from, to, .. } => Some((from, to)),
            _ => None,
        }
    }

    /// Per-element offsets of the running gesture against its start.
    pub fn preview(&self, board: &Board) -> Vec<(ElementId, PreviewTransform)> {
        match &self.state {
            InteractionState::Dragging { origins, .. } => origins
                .iter()
                .filter_map(|(id, origin)| {
                    let element = board.get_element(id)?;
                    let offset = element.position() - *origin;
                    (offset != Vec2::ZERO).then(|| (id.clone(), PreviewTransform::translation(offset)))
                })
                .collect(),
            InteractionState::Resizing { id, original, .. } => {
                let Some(bounds) = board.get_element(id).map(|e| e.bounds()) else {
                    return Vec::new();
                };
                let scale = |now: f64, was: f64| if was > 0.0 { now / was } else { 1.0 };
                let transform = PreviewTransform {
                    translate: bounds.origin() - original.origin(),
                    scale: Vec2::new(
                        scale(bounds.width(), original.width()),
                        scale(bounds.height(), original.height()),
                    ),
                };
                vec![(id.clone(), transform)]
            }
            _ => Vec::new(),
        }
    }

    /// CSS cursor name for the current state and hover target.
    pub fn cursor(&self, board: &Board) -> &'static str {
        match &self.state {
            InteractionState::Panning { .. } => "grabbing",
            InteractionState::Dragging { .. } => "move",
            InteractionState::Resizing { handle, .. } => HandleKind::Resize(*handle).cursor(),
            InteractionState::Rotating { .. } => HandleKind::Rotate.cursor(),
            InteractionState::MarqueeSelecting { .. } | InteractionState::DrawingConnector { .. } => "crosshair",
            InteractionState::Idle => {
                let tool = self.tools.current_tool;
                if tool == ToolKind::Pan || self.input.is_space_held() {
                    "grab"
                } else if tool != ToolKind::Select {
                    "crosshair"
                } else if let Some(handle) = self.hover_handle {
                    handle.cursor()
                } else if board
                    .hovered_id()
                    .and_then(|id| board.get_element(id))
                    .is_some_and(|e| !e.is_locked())
                {
                    "move"
                } else {
                    "default"
                }
            }
        }
    }
}

/// Apply a per-element z-order move to the whole selection as one entry.
///
/// `topmost_first` picks the visiting order so selected elements keep
/// their relative stacking.
fn reorder_selection(board: &mut Board, topmost_first: bool, op: fn(&mut Board, &str) -> bool, label: &str) {
    let mut ids: Vec<ElementId> = board
        .selected_elements()
        .into_iter()
        .map(|e| e.id().to_string())
        .collect();
    if ids.is_empty() {
        return;
    }
    if topmost_first {
        ids.reverse();
    }
    board.start_batch();
    let mut changed = false;
    for id in &ids {
        changed |= op(board, id);
    }
    if changed {
        board.end_batch(label);
    } else {
        board.cancel_batch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board_with_notes;
    use crate::error::ImageError;
    use crate::image_source::ImageFormat;

    fn drag(interaction: &mut Interaction, board: &mut Board, from: Point, to: Point) {
        interaction.pointer_down(board, from, MouseButton::Left);
        interaction.pointer_move(board, to);
        interaction.pointer_up(board, to, MouseButton::Left);
    }

    #[test]
    fn test_create_tool_places_centered() {
        let mut board = Board::default();
        let mut interaction = Interaction::new();
        interaction.set_tool(ToolKind::Note);
        interaction.pointer_down(&mut board, Point::new(300.0, 300.0), MouseButton::Left);
        interaction.pointer_up(&mut board, Point::new(300.0, 300.0), MouseButton::Left);

        assert_eq!(board.len(), 1);
        let note = board.elements().next().unwrap();
        assert_eq!(note.position(), Point::new(200.0, 220.0));
        assert!(board.is_selected(note.id()));
        assert_eq!(interaction.current_tool(), ToolKind::Select);
    }

    #[test]
    fn test_shape_tool_uses_outline() {
        let mut board = Board::default();
        let mut interaction = Interaction::new();
        interaction.set_shape_tool(crate::elements::ShapeKind::Circle);
        interaction.pointer_down(&mut board, Point::new(100.0, 100.0), MouseButton::Left);
        let shape = board.elements().next().unwrap().as_shape().unwrap();
        assert_eq!(shape.kind(), crate::elements::ShapeKind::Circle);
    }

    #[test]
    fn test_drag_commits_once() {
        let (mut board, ids) = board_with_notes(1);
        let before = board.history_info().len;
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::new(50.0, 50.0), MouseButton::Left);
        assert_eq!(interaction.state().name(), "dragging");
        interaction.pointer_move(&mut board, Point::new(80.0, 90.0));
        interaction.pointer_move(&mut board, Point::new(100.0, 100.0));
        interaction.pointer_up(&mut board, Point::new(100.0, 100.0), MouseButton::Left);

        assert!(interaction.is_idle());
        assert_eq!(board.get_element(&ids[0]).unwrap().position(), Point::new(50.0, 50.0));
        assert_eq!(board.history_info().len, before + 1);
        assert_eq!(board.history_info().last_action.as_deref(), Some(actions::MOVE_ELEMENTS));

        board.undo();
        assert_eq!(board.get_element(&ids[0]).unwrap().position(), Point::ZERO);
    }

    #[test]
    fn test_click_selects_without_history() {
        let (mut board, ids) = board_with_notes(1);
        let before = board.history_info().len;
        let mut interaction = Interaction::new();
        let at = Point::new(50.0, 50.0);
        drag(&mut interaction, &mut board, at, at);
        assert_eq!(board.selected_ids(), ids.as_slice());
        assert_eq!(board.history_info().len, before);
    }

    #[test]
    fn test_shift_drag_snaps_to_grid() {
        let (mut board, ids) = board_with_notes(1);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::new(50.0, 50.0), MouseButton::Left);
        interaction.set_modifiers(Modifiers::SHIFT);
        interaction.pointer_move(&mut board, Point::new(63.0, 77.0));
        assert_eq!(board.get_element(&ids[0]).unwrap().position(), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_drag_respects_zoom() {
        let (mut board, ids) = board_with_notes(1);
        board.set_zoom(2.0, None);
        let mut interaction = Interaction::new();
        drag(&mut interaction, &mut board, Point::new(20.0, 20.0), Point::new(60.0, 20.0));
        assert_eq!(board.get_element(&ids[0]).unwrap().position(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_locked_element_stays() {
        let (mut board, ids) = board_with_notes(1);
        board.set_locked(&ids, true);
        let before = board.history_info().len;
        let mut interaction = Interaction::new();
        drag(&mut interaction, &mut board, Point::new(50.0, 50.0), Point::new(150.0, 50.0));
        assert_eq!(board.get_element(&ids[0]).unwrap().position(), Point::ZERO);
        assert_eq!(board.history_info().len, before);
    }

    #[test]
    fn test_marquee_selects_touching() {
        let (mut board, ids) = board_with_notes(3);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::new(-50.0, -50.0), MouseButton::Left);
        interaction.pointer_move(&mut board, Point::new(450.0, 200.0));
        let rect = interaction.marquee_rect().unwrap();
        assert!((rect.width() - 500.0).abs() < f64::EPSILON);
        interaction.pointer_up(&mut board, Point::new(450.0, 200.0), MouseButton::Left);
        assert_eq!(board.selected_ids(), &ids[..2]);
        assert!(interaction.marquee_rect().is_none());
    }

    #[test]
    fn test_click_on_empty_canvas_clears() {
        let (mut board, ids) = board_with_notes(1);
        board.select_element(&ids[0], false);
        let mut interaction = Interaction::new();
        drag(&mut interaction, &mut board, Point::new(1000.0, 1000.0), Point::new(1002.0, 1002.0));
        assert!(board.selected_ids().is_empty());
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut board, ids) = board_with_notes(2);
        board.select_element(&ids[0], false);
        let mut interaction = Interaction::new();
        interaction.set_modifiers(Modifiers::SHIFT);
        let at = Point::new(350.0, 50.0);
        drag(&mut interaction, &mut board, at, at);
        assert_eq!(board.selection_count(), 2);
        drag(&mut interaction, &mut board, at, at);
        assert_eq!(board.selected_ids(), &ids[..1]);
    }

    #[test]
    fn test_resize_from_corner() {
        let (mut board, ids) = board_with_notes(1);
        board.select_element(&ids[0], false);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::new(200.0, 160.0), MouseButton::Left);
        assert_eq!(interaction.state().name(), "resizing");
        interaction.pointer_move(&mut board, Point::new(300.0, 200.0));

        let preview = interaction.preview(&board);
        assert!((preview[0].1.scale.x - 1.5).abs() < 1e-9);

        interaction.pointer_move(&mut board, Point::new(-500.0, -500.0));
        let el = board.get_element(&ids[0]).unwrap();
        assert!((el.width() - 120.0).abs() < f64::EPSILON);
        assert!((el.height() - 80.0).abs() < f64::EPSILON);

        interaction.pointer_up(&mut board, Point::new(300.0, 200.0), MouseButton::Left);
        let el = board.get_element(&ids[0]).unwrap();
        assert!((el.width() - 300.0).abs() < f64::EPSILON);
        assert!((el.height() - 200.0).abs() < f64::EPSILON);
        assert_eq!(board.history_info().last_action.as_deref(), Some(actions::RESIZE_ELEMENT));
    }

    #[test]
    fn test_rotate_handle() {
        let (mut board, ids) = board_with_notes(1);
        board.select_element(&ids[0], false);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::new(100.0, -25.0), MouseButton::Left);
        assert_eq!(interaction.state().name(), "rotating");
        assert_eq!(interaction.cursor(&board), "rotate");
        interaction.pointer_move(&mut board, Point::new(300.0, 80.0));
        interaction.pointer_up(&mut board, Point::new(300.0, 80.0), MouseButton::Left);
        assert!((board.get_element(&ids[0]).unwrap().rotation() - 90.0).abs() < 1e-9);
        assert_eq!(board.history_info().last_action.as_deref(), Some(actions::ROTATE_ELEMENT));
    }

    #[test]
    fn test_shift_rotation_snaps() {
        let (mut board, ids) = board_with_notes(1);
        board.select_element(&ids[0], false);
        let mut interaction = Interaction::new();
        interaction.set_modifiers(Modifiers::SHIFT);
        interaction.pointer_down(&mut board, Point::new(100.0, -25.0), MouseButton::Left);
        // Just past 90 degrees
        interaction.pointer_move(&mut board, Point::new(300.0, 95.0));
        assert!((board.get_element(&ids[0]).unwrap().rotation() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_connector_binds_both_ends() {
        let (mut board, ids) = board_with_notes(2);
        let mut interaction = Interaction::new();
        interaction.set_tool(ToolKind::Connector);
        drag(&mut interaction, &mut board, Point::new(100.0, 80.0), Point::new(400.0, 80.0));

        assert_eq!(board.len(), 3);
        let id = board.selected_ids()[0].clone();
        let connector = board.get_element(&id).unwrap().as_connector().unwrap();
        assert_eq!(connector.start_element(), Some(ids[0].as_str()));
        assert_eq!(connector.end_element(), Some(ids[1].as_str()));
        assert_eq!(interaction.current_tool(), ToolKind::Select);
    }

    #[test]
    fn test_connector_not_bound_twice_to_one_element() {
        let (mut board, ids) = board_with_notes(1);
        let mut interaction = Interaction::new();
        interaction.set_tool(ToolKind::Connector);
        drag(&mut interaction, &mut board, Point::new(20.0, 20.0), Point::new(150.0, 120.0));
        let id = board.selected_ids()[0].clone();
        let connector = board.get_element(&id).unwrap().as_connector().unwrap();
        assert_eq!(connector.start_element(), Some(ids[0].as_str()));
        assert_eq!(connector.end_element(), None);
    }

    #[test]
    fn test_free_connector_box_matches_points() {
        let mut board = Board::default();
        let mut interaction = Interaction::new();
        interaction.set_tool(ToolKind::Connector);
        drag(&mut interaction, &mut board, Point::new(10.0, 20.0), Point::new(110.0, 70.0));
        let connector = board.elements().next().unwrap();
        assert_eq!(connector.position(), Point::new(10.0, 20.0));
        assert!((connector.width() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_space_drag_pans() {
        let mut board = Board::default();
        let mut interaction = Interaction::new();
        interaction.handle_key(&mut board, &KeyEvent::pressed(" ", Modifiers::NONE));
        assert_eq!(interaction.cursor(&board), "grab");
        interaction.pointer_down(&mut board, Point::new(100.0, 100.0), MouseButton::Left);
        interaction.pointer_move(&mut board, Point::new(150.0, 120.0));
        assert_eq!(interaction.cursor(&board), "grabbing");
        interaction.pointer_up(&mut board, Point::new(150.0, 120.0), MouseButton::Left);
        assert_eq!(board.camera().pan, Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_middle_button_pans() {
        let mut board = Board::default();
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::ZERO, MouseButton::Middle);
        interaction.pointer_move(&mut board, Point::new(-30.0, 0.0));
        interaction.pointer_leave(&mut board);
        assert!(interaction.is_idle());
        assert_eq!(board.camera().pan, Vec2::new(-30.0, 0.0));
    }

    #[test]
    fn test_wheel_zoom_keeps_point() {
        let mut board = Board::default();
        let mut interaction = Interaction::new();
        let anchor = Point::new(400.0, 300.0);
        let before = board.screen_to_canvas(anchor);
        interaction.wheel(&mut board, anchor, Vec2::new(0.0, -100.0));
        assert!((board.zoom() - 1.1).abs() < 1e-9);
        let after = board.screen_to_canvas(anchor);
        assert!((after.x - before.x).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let (mut board, ids) = board_with_notes(1);
        let mut interaction = Interaction::new();
        board.select_element(&ids[0], false);

        assert!(interaction.handle_key(&mut board, &KeyEvent::pressed("d", Modifiers::CTRL)));
        assert_eq!(board.len(), 2);
        assert!(interaction.handle_key(&mut board, &KeyEvent::pressed("Delete", Modifiers::NONE)));
        assert_eq!(board.len(), 1);
        interaction.handle_key(&mut board, &KeyEvent::pressed("z", Modifiers::CTRL));
        assert_eq!(board.len(), 2);

        let typing = KeyEvent::pressed("Delete", Modifiers::NONE).in_text_input();
        assert!(!interaction.handle_key(&mut board, &typing));
        assert_eq!(board.len(), 2);
        assert!(!interaction.handle_key(&mut board, &KeyEvent::pressed("q", Modifiers::NONE)));
    }

    #[test]
    fn test_escape_resets_tool_and_selection() {
        let (mut board, ids) = board_with_notes(1);
        let mut interaction = Interaction::new();
        board.select_element(&ids[0], false);
        interaction.handle_key(&mut board, &KeyEvent::pressed("f", Modifiers::NONE));
        assert_eq!(interaction.current_tool(), ToolKind::Frame);
        interaction.handle_key(&mut board, &KeyEvent::pressed("Escape", Modifiers::NONE));
        assert_eq!(interaction.current_tool(), ToolKind::Select);
        assert!(board.selected_ids().is_empty());
    }

    #[test]
    fn test_bring_selection_to_front_keeps_relative_order() {
        let (mut board, ids) = board_with_notes(3);
        board.select_element(&ids[0], false);
        board.select_element(&ids[1], true);
        let mut interaction = Interaction::new();
        interaction.apply(&mut board, ShortcutAction::BringToFront);
        assert_eq!(board.element_order(), &[ids[2].clone(), ids[0].clone(), ids[1].clone()]);
        assert_eq!(board.history_info().last_action.as_deref(), Some(actions::BRING_TO_FRONT));
        board.undo();
        assert_eq!(board.element_order(), ids.as_slice());
    }

    #[test]
    fn test_image_request_and_completion() {
        let mut board = Board::default();
        let mut interaction = Interaction::new();
        interaction.set_tool(ToolKind::Image);
        let request = interaction
            .pointer_down(&mut board, Point::new(500.0, 400.0), MouseButton::Left)
            .unwrap();
        interaction.pointer_up(&mut board, Point::new(500.0, 400.0), MouseButton::Left);
        assert_eq!(request.position, Point::new(500.0, 400.0));

        let failed = interaction.complete_image(&mut board, request, Err(ImageError::NotAnImage));
        assert_eq!(failed, Err(ImageError::NotAnImage));
        assert!(board.is_empty());

        let image = AcquiredImage {
            source: "photo.png".to_string(),
            width: 1200,
            height: 600,
            format: ImageFormat::Png,
        };
        let id = interaction.complete_image(&mut board, request, Ok(image)).unwrap();
        let element = board.get_element(&id).unwrap();
        assert!((element.width() - 600.0).abs() < f64::EPSILON);
        assert_eq!(element.center(), Point::new(500.0, 400.0));
        assert!(board.is_selected(&id));
        assert_eq!(interaction.current_tool(), ToolKind::Select);
    }

    #[test]
    fn test_reset_commits_drag() {
        let (mut board, ids) = board_with_notes(1);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::new(10.0, 10.0), MouseButton::Left);
        interaction.pointer_move(&mut board, Point::new(40.0, 10.0));
        interaction.reset(&mut board);
        assert!(interaction.is_idle());
        assert_eq!(board.get_element(&ids[0]).unwrap().position(), Point::new(30.0, 0.0));
        assert_eq!(board.history_info().last_action.as_deref(), Some(actions::MOVE_ELEMENTS));
    }

    #[test]
    fn test_down_while_busy_ends_stale_gesture() {
        let (mut board, _) = board_with_notes(1);
        let before = board.history_info().len;
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::new(10.0, 10.0), MouseButton::Left);
        interaction.pointer_move(&mut board, Point::new(40.0, 10.0));
        interaction.pointer_down(&mut board, Point::new(40.0, 10.0), MouseButton::Left);
        assert_eq!(board.history_info().len, before + 1);
        assert_eq!(interaction.state().name(), "dragging");
    }

    #[test]
    fn test_drag_preview() {
        let (mut board, ids) = board_with_notes(1);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut board, Point::new(10.0, 10.0), MouseButton::Left);
        assert!(interaction.preview(&board).is_empty());
        interaction.pointer_move(&mut board, Point::new(40.0, 50.0));
        let preview = interaction.preview(&board);
        assert_eq!(preview, vec![(ids[0].clone(), PreviewTransform::translation(Vec2::new(30.0, 40.0)))]);
    }

    #[test]
    fn test_hover_cursor() {
        let (mut board, ids) = board_with_notes(1);
        let mut interaction = Interaction::new();
        interaction.pointer_move(&mut board, Point::new(50.0, 50.0));
        assert_eq!(board.hovered_id(), Some(ids[0].as_str()));
        assert_eq!(interaction.cursor(&board), "move");
        interaction.pointer_move(&mut board, Point::new(900.0, 50.0));
        assert_eq!(interaction.cursor(&board), "default");
        interaction.set_tool(ToolKind::Note);
        assert_eq!(interaction.cursor(&board), "crosshair");
    }

    #[test]
    fn test_double_click_requests_edit() {
        let (mut board, ids) = board_with_notes(2);
        let mut interaction = Interaction::new();
        let event = PointerEvent::DoubleClick {
            position: Point::new(350.0, 50.0),
        };
        let request = interaction.handle_pointer_event(&mut board, event);
        assert_eq!(
            request,
            Some(InteractionRequest::Edit(EditRequest {
                id: ids[1].clone(),
                position: Point::new(350.0, 50.0),
            }))
        );
        assert_eq!(board.selected_ids(), &[ids[1].clone()]);
        assert!(interaction.is_idle());
    }

    #[test]
    fn test_double_click_on_empty_or_locked() {
        let (mut board, ids) = board_with_notes(1);
        let mut interaction = Interaction::new();
        let before = board.history_info();
        assert!(interaction.double_click(&mut board, Point::new(900.0, 50.0)).is_none());

        board.set_locked(&ids, true);
        assert!(interaction.double_click(&mut board, Point::new(50.0, 50.0)).is_none());
        assert!(board.selected_ids().is_empty());
        assert_eq!(board.history_info().len, before.len + 1);
    }

    #[test]
    fn test_image_tool_press_is_image_request() {
        let mut board = Board::default();
        let mut interaction = Interaction::new();
        interaction.set_tool(ToolKind::Image);
        let event = PointerEvent::Down {
            position: Point::new(120.0, 80.0),
            button: MouseButton::Left,
        };
        assert!(matches!(
            interaction.handle_pointer_event(&mut board, event),
            Some(InteractionRequest::Image(_))
        ));
    }
}
