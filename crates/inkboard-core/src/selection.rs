//! Resize and rotate handles around selected elements.

use crate::elements::Element;
use crate::geometry::{ResizeHandle, rotate_point};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// One of the eight box handles.
    Resize(ResizeHandle),
    /// Rotation handle above the top edge.
    Rotate,
}

impl HandleKind {
    /// CSS cursor name shown while hovering or dragging this handle.
    pub fn cursor(self) -> &'static str {
        match self {
            HandleKind::Resize(ResizeHandle::N | ResizeHandle::S) => "ns-resize",
            HandleKind::Resize(ResizeHandle::E | ResizeHandle::W) => "ew-resize",
            HandleKind::Resize(ResizeHandle::Ne | ResizeHandle::Sw) => "nesw-resize",
            HandleKind::Resize(ResizeHandle::Nw | ResizeHandle::Se) => "nwse-resize",
            HandleKind::Rotate => "rotate",
        }
    }
}

/// Sizes of the handles in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    /// Side of a handle's square hit region.
    pub size: f64,
    /// Distance of the rotate handle above the top edge.
    pub rotate_offset: f64,
}

impl HandleMetrics {
    /// Canvas-space metrics at `zoom`, so handles keep their screen size.
    pub fn at_zoom(self, zoom: f64) -> HandleMetrics {
        HandleMetrics {
            size: self.size / zoom,
            rotate_offset: self.rotate_offset / zoom,
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in canvas coordinates, with the element's rotation applied.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Square hit region of side `size` centered on the handle.
    pub fn hit_rect(&self, size: f64) -> Rect {
        Rect::from_center_size(self.position, (size, size))
    }
}

/// Unrotated handle positions for an element.
fn local_handles(element: &Element, rotate_offset: f64) -> Vec<Handle> {
    let mut handles: Vec<Handle> = element
        .resize_handles()
        .into_iter()
        .map(|(handle, position)| Handle::new(position, HandleKind::Resize(handle)))
        .collect();
    if !handles.is_empty() {
        let bounds = element.bounds();
        let top_center = Point::new(bounds.center().x, bounds.y0 - rotate_offset);
        handles.push(Handle::new(top_center, HandleKind::Rotate));
    }
    handles
}

/// Handles for an element in canvas space. Locked elements and connectors
/// have none.
pub fn get_handles(element: &Element, metrics: HandleMetrics) -> Vec<Handle> {
    if element.is_locked() {
        return Vec::new();
    }
    let center = element.center();
    let rotation = element.rotation();
    local_handles(element, metrics.rotate_offset)
        .into_iter()
        .map(|h| Handle::new(rotate_point(h.position, center, rotation), h.kind))
        .collect()
}

/// Find which handle, if any, is under `point` (canvas coordinates).
///
/// The test runs in the element's unrotated frame so the hit squares turn
/// with the element.
pub fn hit_test_handles(element: &Element, point: Point, metrics: HandleMetrics) -> Option<HandleKind> {
    if element.is_locked() {
        return None;
    }
    let local = rotate_point(point, element.center(), -element.rotation());
    local_handles(element, metrics.rotate_offset)
        .into_iter()
        .find(|h| {
            let r = h.hit_rect(metrics.size);
            local.x >= r.x0 && local.x <= r.x1 && local.y >= r.y0 && local.y <= r.y1
        })
        .map(|h| h.kind)
}
