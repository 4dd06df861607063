//! Geometry helpers: rect math, anchors, resize rules, and connector paths.
//!
//! Everything here is a pure function over `kurbo` types.

use kurbo::{BezPath, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Named attachment point on an element's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
    Center,
}

impl Anchor {
    /// Anchors a connector may bind to.
    pub const EDGES: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];

    /// Outward direction of this anchor (zero for center).
    pub fn direction(self) -> Vec2 {
        match self {
            Anchor::Top => Vec2::new(0.0, -1.0),
            Anchor::Right => Vec2::new(1.0, 0.0),
            Anchor::Bottom => Vec2::new(0.0, 1.0),
            Anchor::Left => Vec2::new(-1.0, 0.0),
            Anchor::Center => Vec2::ZERO,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Right => "right",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Center => "center",
        }
    }
}

/// Position of an anchor on a rectangle.
pub fn anchor_point(rect: Rect, anchor: Anchor) -> Point {
    let center = rect.center();
    match anchor {
        Anchor::Top => Point::new(center.x, rect.y0),
        Anchor::Right => Point::new(rect.x1, center.y),
        Anchor::Bottom => Point::new(center.x, rect.y1),
        Anchor::Left => Point::new(rect.x0, center.y),
        Anchor::Center => center,
    }
}

/// Edge anchor of `rect` nearest to `target`. Ties resolve in top, right, bottom, left order.
pub fn closest_anchor(rect: Rect, target: Point) -> Anchor {
    let mut best = Anchor::Top;
    let mut best_dist = f64::INFINITY;
    for anchor in Anchor::EDGES {
        let dist = anchor_point(rect, anchor).distance(target);
        if dist < best_dist {
            best_dist = dist;
            best = anchor;
        }
    }
    best
}

/// Build a rect from a position and size.
pub fn rect_from_xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height)
}

/// Inclusive point-in-rect test.
pub fn rect_contains_point(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Non-strict overlap test: touching edges count as intersecting.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// Whether `outer` fully contains `inner` (edges may coincide).
pub fn rect_contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Union of a set of rects, or `None` if empty.
pub fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects
        .into_iter()
        .fold(None, |acc: Option<Rect>, r| Some(acc.map_or(r, |a| a.union(r))))
}

/// Fold a drag rectangle with possibly negative extent into a positive one.
pub fn normalize_rect(origin: Point, extent: Vec2) -> Rect {
    let (x, width) = if extent.x < 0.0 {
        (origin.x + extent.x, -extent.x)
    } else {
        (origin.x, extent.x)
    };
    let (y, height) = if extent.y < 0.0 {
        (origin.y + extent.y, -extent.y)
    } else {
        (origin.y, extent.y)
    };
    rect_from_xywh(x, y, width, height)
}

/// Rotate `point` around `center` by `degrees`.
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - center;
    Point::new(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}

/// Reduce an angle in degrees to [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// One of the eight resize handles around an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::Ne => "ne",
            ResizeHandle::E => "e",
            ResizeHandle::Se => "se",
            ResizeHandle::S => "s",
            ResizeHandle::Sw => "sw",
            ResizeHandle::W => "w",
            ResizeHandle::Nw => "nw",
        }
    }

    pub(crate) fn north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::Ne | ResizeHandle::Nw)
    }

    pub(crate) fn south(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Se | ResizeHandle::Sw)
    }

    pub(crate) fn east(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::Ne | ResizeHandle::Se)
    }

    pub(crate) fn west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw)
    }

    /// Whether this handle moves both axes.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::Ne | ResizeHandle::Se | ResizeHandle::Sw | ResizeHandle::Nw
        )
    }

    /// Handle position on a rectangle.
    pub fn position(self, rect: Rect) -> Point {
        let c = rect.center();
        let x = if self.west() {
            rect.x0
        } else if self.east() {
            rect.x1
        } else {
            c.x
        };
        let y = if self.north() {
            rect.y0
        } else if self.south() {
            rect.y1
        } else {
            c.y
        };
        Point::new(x, y)
    }
}

/// Compute new bounds for dragging `handle` by `delta` from `original`.
///
/// Edge handles only affect their own axis; corner handles affect both.
/// With `lock_aspect`, the non-driving axis follows the original ratio.
/// `min` is applied last, and the edges opposite the handle stay fixed.
pub fn calculate_resize(
    original: Rect,
    delta: Vec2,
    handle: ResizeHandle,
    lock_aspect: bool,
    min: Size,
) -> Rect {
    let mut width = original.width();
    let mut height = original.height();

    if handle.east() {
        width += delta.x;
    }
    if handle.west() {
        width -= delta.x;
    }
    if handle.south() {
        height += delta.y;
    }
    if handle.north() {
        height -= delta.y;
    }

    if lock_aspect && original.height() > 0.0 {
        let ratio = original.width() / original.height();
        match handle {
            ResizeHandle::N | ResizeHandle::S => width = height * ratio,
            ResizeHandle::E | ResizeHandle::W => height = width / ratio,
            _ => {
                if height > 0.0 && width / height > ratio {
                    width = height * ratio;
                } else {
                    height = width / ratio;
                }
            }
        }
    }

    if lock_aspect && original.height() > 0.0 {
        let ratio = original.width() / original.height();
        // Grow both axes together so the floor doesn't break the ratio
        if width < min.width || height < min.height {
            width = width.max(min.width).max(min.height * ratio);
            height = width / ratio;
        }
    }
    width = width.max(min.width);
    height = height.max(min.height);

    let x = if handle.west() {
        original.x1 - width
    } else {
        original.x0
    };
    let y = if handle.north() {
        original.y1 - height
    } else {
        original.y0
    };
    rect_from_xywh(x, y, width, height)
}

/// Connector routing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorRouting {
    Straight,
    #[default]
    Curved,
    Elbow,
}

/// Bezier control points for a curved connector leaving `start` towards
/// `start_dir` and arriving at `end` from `end_dir`.
pub fn connector_control_points(
    start: Point,
    end: Point,
    start_dir: Anchor,
    end_dir: Anchor,
) -> (Point, Point) {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    let offset = (dx.min(dy) * 0.5).max(50.0);
    let start_vec = match start_dir {
        Anchor::Center => Anchor::Right.direction(),
        dir => dir.direction(),
    };
    let end_vec = match end_dir {
        Anchor::Center => Anchor::Left.direction(),
        dir => dir.direction(),
    };
    (start + start_vec * offset, end + end_vec * offset)
}

/// Path for a connector between two points.
pub fn connector_path(
    start: Point,
    end: Point,
    routing: ConnectorRouting,
    start_dir: Anchor,
    end_dir: Anchor,
) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(start);
    match routing {
        ConnectorRouting::Straight => path.line_to(end),
        ConnectorRouting::Elbow => {
            let mid_x = (start.x + end.x) / 2.0;
            path.line_to(Point::new(mid_x, start.y));
            path.line_to(Point::new(mid_x, end.y));
            path.line_to(end);
        }
        ConnectorRouting::Curved => {
            let (cp1, cp2) = connector_control_points(start, end, start_dir, end_dir);
            path.curve_to(cp1, cp2, end);
        }
    }
    path
}
