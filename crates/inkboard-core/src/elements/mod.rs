//! Element definitions for the board.

mod color;
mod connector;
mod frame;
mod image;
mod note;
mod registry;
mod shape;
mod text;

pub use color::{color_or_black, parse_color};
pub use connector::{
    CONNECTOR_BOUNDS_PADDING, Connector, ConnectorProperties, ConnectorStyle, DEFAULT_END_ANCHOR,
    DEFAULT_START_ANCHOR, EndCap, LineStyle,
};
pub use frame::{BorderStyle, Frame, FrameProperties, FrameStyle};
pub use image::{ImageElement, ImageProperties, ImageStyle, MIN_IMAGE_SIDE, ObjectFit};
pub use note::{NOTE_COLORS, Note, NoteColor, NoteStyle};
pub use registry::{ElementConstructor, ElementRegistry};
pub(crate) use registry::merge;
pub use shape::{MIN_CIRCLE_SIDE, ShapeElement, ShapeKind, ShapeProperties, ShapeStyle, outline_path};
pub use text::{FontWeight, TextAlign, TextBox, TextStyle};

use crate::geometry::{
    Anchor, ResizeHandle, anchor_point, rect_contains_point, rect_from_xywh, rects_intersect,
    rotate_point, normalize_degrees,
};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = String;

/// Generate a fresh element id.
pub fn generate_id() -> ElementId {
    format!("el_{}", Uuid::new_v4().simple())
}

/// Element type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Note,
    Text,
    Shape,
    Frame,
    Connector,
    Image,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Note,
        ElementType::Text,
        ElementType::Shape,
        ElementType::Frame,
        ElementType::Connector,
        ElementType::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Note => "note",
            ElementType::Text => "text",
            ElementType::Shape => "shape",
            ElementType::Frame => "frame",
            ElementType::Connector => "connector",
            ElementType::Image => "image",
        }
    }

    /// Parse a type tag. `sticky` is accepted as a legacy name for notes.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "note" | "sticky" => Some(ElementType::Note),
            "text" => Some(ElementType::Text),
            "shape" => Some(ElementType::Shape),
            "frame" => Some(ElementType::Frame),
            "connector" => Some(ElementType::Connector),
            "image" => Some(ElementType::Image),
            _ => None,
        }
    }

    /// Size of a freshly created element.
    pub fn default_size(self) -> Size {
        match self {
            ElementType::Note => Size::new(200.0, 160.0),
            ElementType::Text => Size::new(200.0, 40.0),
            ElementType::Shape => Size::new(150.0, 100.0),
            ElementType::Frame => Size::new(400.0, 300.0),
            ElementType::Connector => Size::ZERO,
            ElementType::Image => Size::new(300.0, 200.0),
        }
    }

    /// Smallest allowed size. Connectors have no intrinsic size.
    pub fn min_size(self) -> Size {
        match self {
            ElementType::Note => Size::new(120.0, 80.0),
            ElementType::Text => Size::new(50.0, 30.0),
            ElementType::Shape => Size::new(40.0, 40.0),
            ElementType::Frame => Size::new(200.0, 150.0),
            ElementType::Connector => Size::ZERO,
            ElementType::Image => Size::new(MIN_IMAGE_SIDE, MIN_IMAGE_SIDE),
        }
    }
}

/// Type-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    #[serde(alias = "sticky")]
    Note(Note),
    Text(TextBox),
    Shape(ShapeElement),
    Frame(Frame),
    Connector(Connector),
    Image(ImageElement),
}

impl ElementKind {
    /// Default payload for a type.
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Note => ElementKind::Note(Note::default()),
            ElementType::Text => ElementKind::Text(TextBox::default()),
            ElementType::Shape => ElementKind::Shape(ShapeElement::default()),
            ElementType::Frame => ElementKind::Frame(Frame::default()),
            ElementType::Connector => ElementKind::Connector(Connector::default()),
            ElementType::Image => ElementKind::Image(ImageElement::default()),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Note(_) => ElementType::Note,
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Shape(_) => ElementType::Shape,
            ElementKind::Frame(_) => ElementType::Frame,
            ElementKind::Connector(_) => ElementType::Connector,
            ElementKind::Image(_) => ElementType::Image,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

/// One visual entity on the board.
///
/// Geometry is in canvas units. Mutators return `false` and change nothing
/// when the element is locked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(default = "generate_id")]
    pub(crate) id: ElementId,
    #[serde(default)]
    pub(crate) x: f64,
    #[serde(default)]
    pub(crate) y: f64,
    #[serde(default)]
    pub(crate) width: f64,
    #[serde(default)]
    pub(crate) height: f64,
    #[serde(default)]
    pub(crate) rotation: f64,
    #[serde(default)]
    pub(crate) z_index: i64,
    #[serde(default)]
    pub(crate) locked: bool,
    #[serde(default = "default_true")]
    pub(crate) visible: bool,
    #[serde(default = "default_opacity")]
    pub(crate) opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent_id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) group_id: Option<ElementId>,
    #[serde(flatten)]
    pub(crate) kind: ElementKind,
    #[serde(skip)]
    dirty: bool,
}

impl PartialEq for Element {
    // The render-dirty flag is view bookkeeping, not element state.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
            && self.rotation == other.rotation
            && self.z_index == other.z_index
            && self.locked == other.locked
            && self.visible == other.visible
            && self.opacity == other.opacity
            && self.parent_id == other.parent_id
            && self.group_id == other.group_id
            && self.kind == other.kind
    }
}

impl Element {
    /// Create an element at `position` with its type's default size.
    pub fn new(kind: ElementKind, position: Point) -> Self {
        let size = kind.element_type().default_size();
        let mut element = Self {
            id: generate_id(),
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
            rotation: 0.0,
            z_index: 0,
            locked: false,
            visible: true,
            opacity: 1.0,
            parent_id: None,
            group_id: None,
            kind,
            dirty: true,
        };
        element.enforce_constraints();
        element
    }

    /// Set the size, respecting the type minimum.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self.enforce_constraints();
        self
    }

    /// Replace the id. Used when the caller supplies one.
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Mutable payload access. `None` while locked.
    pub fn kind_mut(&mut self) -> Option<&mut ElementKind> {
        if self.locked {
            return None;
        }
        self.dirty = true;
        Some(&mut self.kind)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Rotation in degrees, in [0, 360).
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    /// Minimum size for this element's type.
    pub fn min_size(&self) -> Size {
        self.element_type().min_size()
    }

    /// Axis-aligned bounds in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ElementKind::Connector(c) => c.bounds(),
            _ => rect_from_xywh(self.x, self.y, self.width, self.height),
        }
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Whether `point` hits the element body.
    ///
    /// Connectors hit within `connector_threshold` of their line; other
    /// elements use an inclusive test against their (rotated) box.
    pub fn contains_point(&self, point: Point, connector_threshold: f64) -> bool {
        match &self.kind {
            ElementKind::Connector(c) => c.hit_test(point, connector_threshold),
            _ => {
                let bounds = self.bounds();
                let local = if self.rotation != 0.0 {
                    rotate_point(point, bounds.center(), -self.rotation)
                } else {
                    point
                };
                rect_contains_point(bounds, local)
            }
        }
    }

    /// Whether the element's bounds touch `rect`.
    pub fn intersects(&self, rect: Rect) -> bool {
        rects_intersect(self.bounds(), rect)
    }

    pub fn anchor_point(&self, anchor: Anchor) -> Point {
        anchor_point(self.bounds(), anchor)
    }

    /// Resize handle positions. Connectors have none.
    pub fn resize_handles(&self) -> Vec<(ResizeHandle, Point)> {
        if matches!(self.kind, ElementKind::Connector(_)) {
            return Vec::new();
        }
        let bounds = self.bounds();
        ResizeHandle::ALL
            .iter()
            .map(|&handle| (handle, handle.position(bounds)))
            .collect()
    }

    /// Translate by `delta`.
    pub fn move_by(&mut self, delta: Vec2) -> bool {
        if self.locked {
            return false;
        }
        if let ElementKind::Connector(c) = &mut self.kind {
            c.translate(delta);
        }
        self.x += delta.x;
        self.y += delta.y;
        self.sync_connector_box();
        self.dirty = true;
        true
    }

    /// Move the top-left corner to `position`.
    pub fn set_position(&mut self, position: Point) -> bool {
        if self.locked {
            return false;
        }
        let delta = position - self.position();
        self.move_by(delta)
    }

    /// Resize, applying type rules and the minimum size.
    ///
    /// Circles stay square using the larger side; aspect-locked images are
    /// reprojected onto their ratio. Connectors ignore resizing.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        if self.locked {
            return false;
        }
        let requested = Size::new(width, height);
        let size = match &self.kind {
            ElementKind::Connector(_) => return false,
            ElementKind::Shape(s) if s.kind().is_square() => {
                let side = width.max(height).max(MIN_CIRCLE_SIDE);
                Size::new(side, side)
            }
            ElementKind::Image(img) => img.constrain_size(requested),
            _ => requested,
        };
        let min = self.min_size();
        self.width = size.width.max(min.width);
        self.height = size.height.max(min.height);
        self.dirty = true;
        true
    }

    /// Move and resize to `rect`, as dragged by `handle`.
    ///
    /// When type rules change the requested size, the edges opposite the
    /// handle stay where `rect` put them.
    pub fn set_bounds(&mut self, rect: Rect, handle: ResizeHandle) -> bool {
        if self.locked || matches!(self.kind, ElementKind::Connector(_)) {
            return false;
        }
        self.resize(rect.width(), rect.height());
        self.x = if handle.west() && self.width != rect.width() {
            rect.x1 - self.width
        } else {
            rect.x0
        };
        self.y = if handle.north() && self.height != rect.height() {
            rect.y1 - self.height
        } else {
            rect.y0
        };
        true
    }

    /// Set rotation in degrees; the value is reduced to [0, 360).
    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        if self.locked {
            return false;
        }
        self.rotation = normalize_degrees(degrees);
        self.dirty = true;
        true
    }

    /// Restore an image to its intrinsic pixel size.
    pub fn reset_to_original_size(&mut self) -> bool {
        let original = match &self.kind {
            ElementKind::Image(img) => img.original_size(),
            _ => None,
        };
        match original {
            Some(size) if !self.locked => {
                let min = self.min_size();
                self.width = size.width.max(min.width);
                self.height = size.height.max(min.height);
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Scale an image down to fit within `max_width` x `max_height`,
    /// keeping its aspect ratio.
    pub fn fit_to_size(&mut self, max_width: f64, max_height: f64) -> bool {
        let size = match &self.kind {
            ElementKind::Image(img) => img.fit_within(Size::new(max_width, max_height)),
            _ => return false,
        };
        if self.locked {
            return false;
        }
        let min = self.min_size();
        self.width = size.width.max(min.width);
        self.height = size.height.max(min.height);
        self.dirty = true;
        true
    }

    /// Lock or unlock. Always allowed.
    pub fn set_locked(&mut self, locked: bool) {
        if self.locked != locked {
            self.locked = locked;
            self.dirty = true;
        }
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.locked {
            return false;
        }
        self.visible = visible;
        self.dirty = true;
        true
    }

    pub fn set_opacity(&mut self, opacity: f64) -> bool {
        if self.locked {
            return false;
        }
        self.opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 1.0 };
        self.dirty = true;
        true
    }

    /// User text, for types that carry it.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Note(n) => Some(&n.content),
            ElementKind::Text(t) => Some(&t.content),
            ElementKind::Shape(s) => Some(&s.content),
            ElementKind::Connector(c) => c.properties.label.as_deref(),
            ElementKind::Frame(f) => Some(&f.properties.title),
            ElementKind::Image(i) => Some(&i.properties.alt),
        }
    }

    /// Replace the user text (label for connectors, title for frames, alt text for images).
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        if self.locked {
            return false;
        }
        let content = content.into();
        match &mut self.kind {
            ElementKind::Note(n) => n.content = content,
            ElementKind::Text(t) => t.content = content,
            ElementKind::Shape(s) => s.content = content,
            ElementKind::Connector(c) => c.properties.label = Some(content),
            ElementKind::Frame(f) => f.properties.title = content,
            ElementKind::Image(i) => i.properties.alt = content,
        }
        self.dirty = true;
        true
    }

    pub fn as_note(&self) -> Option<&Note> {
        match &self.kind {
            ElementKind::Note(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeElement> {
        match &self.kind {
            ElementKind::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match &self.kind {
            ElementKind::Frame(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_connector(&self) -> Option<&Connector> {
        match &self.kind {
            ElementKind::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match &self.kind {
            ElementKind::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, ElementKind::Frame(_))
    }

    pub fn is_connector(&self) -> bool {
        matches!(self.kind, ElementKind::Connector(_))
    }

    /// Re-derive bound connector endpoints. Bound endpoints are derived data
    /// and follow their elements even on locked connectors.
    pub(crate) fn refresh_connector<F>(&mut self, bounds_of: F) -> bool
    where
        F: Fn(&str) -> Option<Rect>,
    {
        let changed = match &mut self.kind {
            ElementKind::Connector(c) => c.update_connections(bounds_of),
            _ => false,
        };
        if changed {
            self.sync_connector_box();
            self.dirty = true;
        }
        changed
    }

    /// Replace a frame's member list. Containment is derived data, so this
    /// ignores the lock.
    pub(crate) fn set_frame_contents(&mut self, ids: Vec<ElementId>) -> bool {
        match &mut self.kind {
            ElementKind::Frame(f) if f.contained() != ids.as_slice() => {
                f.set_contained(ids);
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Drop `id` from a frame's member list.
    pub(crate) fn forget_frame_member(&mut self, id: &str) -> bool {
        let removed = match &mut self.kind {
            ElementKind::Frame(f) => f.remove_element(id),
            _ => false,
        };
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Copy with a fresh id, shifted by `offset`, unlocked. Connector
    /// bindings and frame membership are not carried over.
    pub fn clone_with_offset(&self, offset: Vec2) -> Element {
        let mut clone = self.clone();
        clone.id = generate_id();
        clone.locked = false;
        clone.x += offset.x;
        clone.y += offset.y;
        match &mut clone.kind {
            ElementKind::Connector(c) => {
                c.translate(offset);
                c.clear_bindings();
            }
            ElementKind::Frame(f) => f.set_contained(Vec::new()),
            _ => {}
        }
        clone.dirty = true;
        clone
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn set_z_index(&mut self, z_index: i64) {
        if self.z_index != z_index {
            self.z_index = z_index;
            self.dirty = true;
        }
    }

    /// Restore invariants after construction or deserialization: rotation
    /// in range, opacity clamped, size at least the type minimum, and
    /// connector boxes matching their points.
    pub(crate) fn enforce_constraints(&mut self) {
        self.rotation = normalize_degrees(self.rotation);
        self.opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        if let ElementKind::Connector(c) = &self.kind {
            let rect = c.point_bounds();
            self.x = rect.x0;
            self.y = rect.y0;
            self.width = rect.width();
            self.height = rect.height();
            return;
        }
        let min = self.min_size();
        if !self.width.is_finite() || self.width < min.width {
            self.width = min.width;
        }
        if !self.height.is_finite() || self.height < min.height {
            self.height = min.height;
        }
        if !self.x.is_finite() {
            self.x = 0.0;
        }
        if !self.y.is_finite() {
            self.y = 0.0;
        }
    }

    /// Keep a connector's box in sync with its points.
    fn sync_connector_box(&mut self) {
        if let ElementKind::Connector(c) = &self.kind {
            let rect = c.point_bounds();
            self.x = rect.x0;
            self.y = rect.y0;
            self.width = rect.width();
            self.height = rect.height();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_at(x: f64, y: f64) -> Element {
        Element::new(ElementKind::Note(Note::default()), Point::new(x, y))
    }

    #[test]
    fn test_new_uses_default_size() {
        let el = note_at(10.0, 20.0);
        assert!(el.id().starts_with("el_"));
        assert!((el.width() - 200.0).abs() < f64::EPSILON);
        assert!((el.height() - 160.0).abs() < f64::EPSILON);
        assert!(el.is_dirty());
    }

    #[test]
    fn test_min_size_holds() {
        let mut el = note_at(0.0, 0.0);
        el.resize(10.0, 10.0);
        assert!((el.width() - 120.0).abs() < f64::EPSILON);
        assert!((el.height() - 80.0).abs() < f64::EPSILON);

        let mut frame = Element::new(ElementKind::Frame(Frame::default()), Point::ZERO);
        frame.resize(-50.0, 1.0);
        assert_eq!(frame.size(), Size::new(200.0, 150.0));
    }

    #[test]
    fn test_circle_stays_square() {
        let mut el = Element::new(ElementKind::Shape(ShapeElement::new(ShapeKind::Circle)), Point::ZERO);
        el.resize(120.0, 60.0);
        assert_eq!(el.size(), Size::new(120.0, 120.0));
        el.resize(10.0, 5.0);
        assert_eq!(el.size(), Size::new(40.0, 40.0));
    }

    #[test]
    fn test_set_bounds_keeps_opposite_edge() {
        let circle = ElementKind::Shape(ShapeElement::new(ShapeKind::Circle));
        let mut el = Element::new(circle, Point::new(100.0, 100.0)).with_size(100.0, 100.0);
        // West handle dragged 30 to the right: the right edge stays at 200
        el.set_bounds(Rect::new(130.0, 100.0, 200.0, 200.0), ResizeHandle::W);
        assert_eq!(el.size(), Size::new(100.0, 100.0));
        assert!((el.bounds().x1 - 200.0).abs() < f64::EPSILON);

        el.set_bounds(Rect::new(100.0, 150.0, 200.0, 200.0), ResizeHandle::Nw);
        assert!((el.bounds().x1 - 200.0).abs() < f64::EPSILON);
        assert!((el.bounds().y1 - 200.0).abs() < f64::EPSILON);

        el.set_bounds(Rect::new(100.0, 100.0, 150.0, 200.0), ResizeHandle::Se);
        assert_eq!(el.bounds().origin(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_image_aspect_lock() {
        let image = ImageElement::from_source("x.png", 400, 200);
        let mut el = Element::new(ElementKind::Image(image), Point::ZERO).with_size(400.0, 200.0);
        el.resize(300.0, 300.0);
        assert!((el.width() / el.height() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_image_reset_and_fit() {
        let image = ImageElement::from_source("x.png", 1000, 500);
        let mut el = Element::new(ElementKind::Image(image), Point::ZERO);
        assert!(el.fit_to_size(600.0, 600.0));
        assert_eq!(el.size(), Size::new(600.0, 300.0));
        assert!(el.reset_to_original_size());
        assert_eq!(el.size(), Size::new(1000.0, 500.0));
        assert!(!note_at(0.0, 0.0).reset_to_original_size());
    }

    #[test]
    fn test_rotation_normalized() {
        let mut el = note_at(0.0, 0.0);
        el.set_rotation(-30.0);
        assert!((el.rotation() - 330.0).abs() < 1e-9);
        el.set_rotation(725.0);
        assert!((el.rotation() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_locked_rejects_mutation() {
        let mut el = note_at(0.0, 0.0);
        el.set_locked(true);
        assert!(!el.move_by(Vec2::new(10.0, 10.0)));
        assert!(!el.resize(500.0, 500.0));
        assert!(!el.set_rotation(45.0));
        assert!(!el.set_content("nope"));
        assert!(el.kind_mut().is_none());
        assert_eq!(el.position(), Point::ZERO);
        assert_eq!(el.content(), Some(""));

        el.set_locked(false);
        assert!(el.move_by(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let el = note_at(0.0, 0.0);
        assert!(el.contains_point(Point::new(200.0, 160.0), 10.0));
        assert!(!el.contains_point(Point::new(200.1, 160.0), 10.0));
    }

    #[test]
    fn test_contains_point_rotated() {
        let mut el = Element::new(ElementKind::Shape(ShapeElement::default()), Point::ZERO)
            .with_size(200.0, 40.0);
        // Far end of the long axis is outside once rotated a quarter turn
        assert!(el.contains_point(Point::new(195.0, 20.0), 10.0));
        el.set_rotation(90.0);
        assert!(!el.contains_point(Point::new(195.0, 20.0), 10.0));
        assert!(el.contains_point(Point::new(100.0, 110.0), 10.0));
    }

    #[test]
    fn test_connector_has_no_handles_and_follows_points() {
        let connector = Connector::new(Point::new(10.0, 10.0), Point::new(50.0, 80.0));
        let mut el = Element::new(ElementKind::Connector(connector), Point::ZERO);
        assert!(el.resize_handles().is_empty());
        assert!((el.x() - 10.0).abs() < f64::EPSILON);
        assert!((el.height() - 70.0).abs() < f64::EPSILON);

        el.move_by(Vec2::new(5.0, 5.0));
        let c = el.as_connector().unwrap();
        assert_eq!(c.start_point(), Point::new(15.0, 15.0));
        assert_eq!(c.end_point(), Point::new(55.0, 85.0));
    }

    #[test]
    fn test_clone_with_offset() {
        let mut connector = Connector::new(Point::ZERO, Point::new(100.0, 0.0));
        connector.connect_start("a", rect_from_xywh(-50.0, -10.0, 50.0, 20.0), None);
        let el = Element::new(ElementKind::Connector(connector), Point::ZERO);
        let clone = el.clone_with_offset(Vec2::new(20.0, 20.0));
        assert_ne!(clone.id(), el.id());
        let c = clone.as_connector().unwrap();
        assert!(c.start_element().is_none());
        assert_eq!(c.end_point(), Point::new(120.0, 20.0));
    }

    #[test]
    fn test_serialization_shape() {
        let mut el = note_at(1.0, 2.0);
        el.set_content("hello");
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "note");
        assert_eq!(value["content"], "hello");
        assert_eq!(value["style"]["backgroundColor"], "#fef3c7");
        assert_eq!(value["zIndex"], 0);

        let back: Element = serde_json::from_value(value).unwrap();
        assert_eq!(back, el);
        assert!(!back.is_dirty());
    }

    #[test]
    fn test_legacy_sticky_tag() {
        let json = r#"{"id":"s1","type":"sticky","x":5,"y":6,"width":220,"height":170,"content":"hi"}"#;
        let el: Element = serde_json::from_str(json).unwrap();
        assert_eq!(el.element_type(), ElementType::Note);
        assert_eq!(el.content(), Some("hi"));
    }
}
