//! Reconciliation between the board and a retained view layer.
//!
//! The board never draws. A host implements [`ViewSink`] over whatever
//! retained nodes it renders with, and [`RenderScheduler::tick`] pushes at
//! most one round of changes into it per frame.

use crate::board::Board;
use crate::camera::{Camera, Transform};
use crate::elements::{Element, ElementId};
use kurbo::{Affine, Vec2};
use std::collections::{HashMap, HashSet};

/// Temporary transform applied to an element's view node during a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    /// Canvas-space offset from the gesture's starting position.
    pub translate: Vec2,
    /// Size ratio against the gesture's starting size.
    pub scale: Vec2,
}

impl Default for PreviewTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl PreviewTransform {
    pub fn translation(translate: Vec2) -> Self {
        Self {
            translate,
            ..Self::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

/// Receiver of view updates.
pub trait ViewSink {
    /// A new element appeared.
    fn create(&mut self, id: &str, element: &Element);

    /// An element changed or its selection state flipped.
    fn update(&mut self, id: &str, element: &Element, selected: bool);

    /// An element is gone.
    fn remove(&mut self, id: &str);

    /// The pan/zoom transform changed.
    fn apply_transform(&mut self, camera: &Camera);

    fn preview(&mut self, _id: &str, _transform: PreviewTransform) {}

    fn clear_preview(&mut self, _id: &str) {}
}

/// Tracks what a sink has been told so each sync only sends differences.
#[derive(Debug, Default)]
pub struct ViewSynchronizer {
    /// Known ids and the selection state last sent for each.
    known: HashMap<ElementId, bool>,
    previewing: HashSet<ElementId>,
    last_transform: Option<Transform>,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the sink up to date with the board, then clear dirty flags.
    ///
    /// Elements are visited in paint order so a sink that appends nodes
    /// builds them in stacking order.
    pub fn sync(&mut self, board: &mut Board, sink: &mut dyn ViewSink) {
        let mut present = HashSet::with_capacity(board.len());
        for element in board.elements_sorted() {
            let id = element.id();
            let selected = board.is_selected(id);
            present.insert(id.to_string());
            match self.known.get(id).copied() {
                None => {
                    sink.create(id, element);
                    if selected {
                        sink.update(id, element, true);
                    }
                }
                Some(was_selected) => {
                    if element.is_dirty() || was_selected != selected {
                        sink.update(id, element, selected);
                    }
                }
            }
            self.known.insert(id.to_string(), selected);
        }

        let vanished: Vec<ElementId> = self
            .known
            .keys()
            .filter(|id| !present.contains(*id))
            .cloned()
            .collect();
        for id in vanished {
            sink.remove(&id);
            self.known.remove(&id);
            self.previewing.remove(&id);
        }

        let transform = board.camera().to_transform();
        if self.last_transform != Some(transform) {
            sink.apply_transform(board.camera());
            self.last_transform = Some(transform);
        }

        board.clear_dirty_flags();
        board.clear_render_flag();
    }

    /// Show gesture previews and clear the ones that ended.
    pub fn sync_previews(&mut self, previews: &[(ElementId, PreviewTransform)], sink: &mut dyn ViewSink) {
        let current: HashSet<&ElementId> = previews.iter().map(|(id, _)| id).collect();
        let ended: Vec<ElementId> = self
            .previewing
            .iter()
            .filter(|id| !current.contains(id))
            .cloned()
            .collect();
        for id in ended {
            sink.clear_preview(&id);
            self.previewing.remove(&id);
        }
        for (id, transform) in previews {
            sink.preview(id, *transform);
            self.previewing.insert(id.clone());
        }
    }

    /// Forget everything sent so far; the next sync recreates all nodes.
    pub fn invalidate(&mut self) {
        self.known.clear();
        self.previewing.clear();
        self.last_transform = None;
    }

    pub fn known_count(&self) -> usize {
        self.known.len()
    }
}

/// Coalesces board changes into at most one sync per frame.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    synchronizer: ViewSynchronizer,
    frames_rendered: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once per animation frame. Returns true if anything was synced.
    pub fn tick(&mut self, board: &mut Board, sink: &mut dyn ViewSink) -> bool {
        if !board.needs_render() {
            return false;
        }
        self.synchronizer.sync(board, sink);
        self.frames_rendered += 1;
        true
    }

    /// Force a sync on the next tick.
    pub fn request_render(&mut self, board: &mut Board) {
        board.request_render();
    }

    pub fn show_previews(&mut self, previews: &[(ElementId, PreviewTransform)], sink: &mut dyn ViewSink) {
        self.synchronizer.sync_previews(previews, sink);
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn synchronizer_mut(&mut self) -> &mut ViewSynchronizer {
        &mut self.synchronizer
    }
}

/// Rendered grid for the current camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    /// Line spacing in screen pixels.
    pub spacing: f64,
    /// Screen offset of the first line on each axis.
    pub offset: Vec2,
    pub opacity: f64,
}

impl GridParams {
    pub fn for_camera(camera: &Camera, grid_size: f64) -> Self {
        let spacing = grid_size * camera.zoom;
        let offset = if spacing > 0.0 {
            Vec2::new(camera.pan.x.rem_euclid(spacing), camera.pan.y.rem_euclid(spacing))
        } else {
            Vec2::ZERO
        };
        // Fade the grid out when zoomed far out
        let opacity = if camera.zoom > 0.3 { 0.8 } else { 0.3 };
        Self {
            spacing,
            offset,
            opacity,
        }
    }
}
