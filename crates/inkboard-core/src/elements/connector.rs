//! Connector element: a line between two points or two elements.
//!
//! Each endpoint is either free (the stored point is authoritative) or bound
//! to an element anchor (the stored point is derived from the element's
//! bounds and refreshed by `update_connections`).

use super::ElementId;
use super::color::color_or_black;
use crate::geometry::{
    Anchor, ConnectorRouting, anchor_point, closest_anchor, connector_path, point_to_segment_dist,
};
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Padding added around the endpoints for the connector's bounds.
pub const CONNECTOR_BOUNDS_PADDING: f64 = 10.0;

/// Default anchor for a bound start point without an explicit anchor.
pub const DEFAULT_START_ANCHOR: Anchor = Anchor::Right;
/// Default anchor for a bound end point without an explicit anchor.
pub const DEFAULT_END_ANCHOR: Anchor = Anchor::Left;

/// Line dash style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Dash pattern (dash, gap) for renderers, `None` for solid lines.
    pub fn dash_pattern(self) -> Option<[f64; 2]> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some([8.0, 4.0]),
            LineStyle::Dotted => Some([2.0, 4.0]),
        }
    }
}

/// Decoration drawn at a connector end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndCap {
    #[default]
    None,
    Arrow,
    Dot,
    Diamond,
}

/// Connector presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorStyle {
    pub color: String,
    pub stroke_width: f64,
    pub stroke_style: LineStyle,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            color: "#1e293b".to_string(),
            stroke_width: 2.0,
            stroke_style: LineStyle::default(),
        }
    }
}

impl ConnectorStyle {
    pub fn stroke(&self) -> Color {
        color_or_black(&self.color)
    }
}

/// Structured connector fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorProperties {
    pub connector_type: ConnectorRouting,
    pub start_end: EndCap,
    pub end_end: EndCap,
    pub start_point: Point,
    pub end_point: Point,
    pub start_element_id: Option<ElementId>,
    pub end_element_id: Option<ElementId>,
    pub start_anchor: Option<Anchor>,
    pub end_anchor: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for ConnectorProperties {
    fn default() -> Self {
        Self {
            connector_type: ConnectorRouting::default(),
            start_end: EndCap::None,
            end_end: EndCap::Arrow,
            start_point: Point::ZERO,
            end_point: Point::new(100.0, 100.0),
            start_element_id: None,
            end_element_id: None,
            start_anchor: None,
            end_anchor: None,
            label: None,
        }
    }
}

/// A connector between two points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connector {
    pub style: ConnectorStyle,
    pub properties: ConnectorProperties,
}

impl Connector {
    pub fn new(start: Point, end: Point) -> Self {
        let mut connector = Self::default();
        connector.properties.start_point = start;
        connector.properties.end_point = end;
        connector
    }

    pub fn start_point(&self) -> Point {
        self.properties.start_point
    }

    pub fn end_point(&self) -> Point {
        self.properties.end_point
    }

    pub fn routing(&self) -> ConnectorRouting {
        self.properties.connector_type
    }

    pub fn start_element(&self) -> Option<&str> {
        self.properties.start_element_id.as_deref()
    }

    pub fn end_element(&self) -> Option<&str> {
        self.properties.end_element_id.as_deref()
    }

    /// Whether either endpoint is bound to `id`.
    pub fn is_bound_to(&self, id: &str) -> bool {
        self.start_element() == Some(id) || self.end_element() == Some(id)
    }

    pub fn set_start_point(&mut self, point: Point) {
        self.properties.start_point = point;
    }

    pub fn set_end_point(&mut self, point: Point) {
        self.properties.end_point = point;
    }

    /// Bind the start to an element. Without an explicit anchor, the edge
    /// anchor closest to the current end point is used.
    pub fn connect_start(&mut self, id: &str, bounds: Rect, anchor: Option<Anchor>) -> Anchor {
        let anchor = anchor.unwrap_or_else(|| closest_anchor(bounds, self.properties.end_point));
        self.properties.start_element_id = Some(id.to_string());
        self.properties.start_anchor = Some(anchor);
        self.properties.start_point = anchor_point(bounds, anchor);
        anchor
    }

    /// Bind the end to an element. Without an explicit anchor, the edge
    /// anchor closest to the current start point is used.
    pub fn connect_end(&mut self, id: &str, bounds: Rect, anchor: Option<Anchor>) -> Anchor {
        let anchor = anchor.unwrap_or_else(|| closest_anchor(bounds, self.properties.start_point));
        self.properties.end_element_id = Some(id.to_string());
        self.properties.end_anchor = Some(anchor);
        self.properties.end_point = anchor_point(bounds, anchor);
        anchor
    }

    pub fn disconnect_start(&mut self) {
        self.properties.start_element_id = None;
        self.properties.start_anchor = None;
    }

    pub fn disconnect_end(&mut self) {
        self.properties.end_element_id = None;
        self.properties.end_anchor = None;
    }

    /// Drop both bindings, keeping the last resolved points.
    pub fn clear_bindings(&mut self) {
        self.disconnect_start();
        self.disconnect_end();
    }

    /// Recompute bound endpoints from the current bounds of their elements.
    ///
    /// `bounds_of` resolves an element id to its bounds; endpoints bound to
    /// ids it cannot resolve keep their last point. Returns true if a point
    /// changed.
    pub fn update_connections<F>(&mut self, bounds_of: F) -> bool
    where
        F: Fn(&str) -> Option<Rect>,
    {
        let mut changed = false;
        if let Some(bounds) = self.start_element().and_then(&bounds_of) {
            let anchor = self.properties.start_anchor.unwrap_or(DEFAULT_START_ANCHOR);
            let point = anchor_point(bounds, anchor);
            if point != self.properties.start_point {
                self.properties.start_point = point;
                changed = true;
            }
        }
        if let Some(bounds) = self.end_element().and_then(&bounds_of) {
            let anchor = self.properties.end_anchor.unwrap_or(DEFAULT_END_ANCHOR);
            let point = anchor_point(bounds, anchor);
            if point != self.properties.end_point {
                self.properties.end_point = point;
                changed = true;
            }
        }
        changed
    }

    /// Move both stored points. Bound ends snap back on the next
    /// `update_connections`.
    pub fn translate(&mut self, delta: Vec2) {
        self.properties.start_point += delta;
        self.properties.end_point += delta;
    }

    /// Tight rect around the two endpoints.
    pub fn point_bounds(&self) -> Rect {
        Rect::from_points(self.properties.start_point, self.properties.end_point)
    }

    /// Bounds used for selection and hit-testing.
    pub fn bounds(&self) -> Rect {
        self.point_bounds()
            .inflate(CONNECTOR_BOUNDS_PADDING, CONNECTOR_BOUNDS_PADDING)
    }

    /// Whether `point` is within `threshold` of the connector line.
    pub fn hit_test(&self, point: Point, threshold: f64) -> bool {
        let start = self.properties.start_point;
        let end = self.properties.end_point;
        let dist = match self.routing() {
            ConnectorRouting::Elbow => {
                let mid_x = (start.x + end.x) / 2.0;
                let corners = [
                    start,
                    Point::new(mid_x, start.y),
                    Point::new(mid_x, end.y),
                    end,
                ];
                corners
                    .windows(2)
                    .map(|w| point_to_segment_dist(point, w[0], w[1]))
                    .fold(f64::INFINITY, f64::min)
            }
            _ => point_to_segment_dist(point, start, end),
        };
        dist <= threshold
    }

    /// Render path for the current routing.
    pub fn path(&self) -> BezPath {
        connector_path(
            self.properties.start_point,
            self.properties.end_point,
            self.routing(),
            self.properties.start_anchor.unwrap_or(DEFAULT_START_ANCHOR),
            self.properties.end_anchor.unwrap_or(DEFAULT_END_ANCHOR),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect_from_xywh;

    #[test]
    fn test_defaults() {
        let c = Connector::default();
        assert_eq!(c.start_point(), Point::ZERO);
        assert_eq!(c.end_point(), Point::new(100.0, 100.0));
        assert_eq!(c.routing(), ConnectorRouting::Curved);
        assert_eq!(c.properties.end_end, EndCap::Arrow);
    }

    #[test]
    fn test_connect_picks_closest_anchor() {
        let mut c = Connector::new(Point::ZERO, Point::new(500.0, 50.0));
        let anchor = c.connect_start("a", rect_from_xywh(0.0, 0.0, 100.0, 100.0), None);
        assert_eq!(anchor, Anchor::Right);
        assert_eq!(c.start_point(), Point::new(100.0, 50.0));

        let anchor = c.connect_end("b", rect_from_xywh(400.0, 0.0, 100.0, 100.0), None);
        assert_eq!(anchor, Anchor::Left);
        assert_eq!(c.end_point(), Point::new(400.0, 50.0));
    }

    #[test]
    fn test_update_connections_follows_bounds() {
        let mut c = Connector::new(Point::ZERO, Point::new(300.0, 0.0));
        c.connect_start("a", rect_from_xywh(0.0, 0.0, 100.0, 100.0), Some(Anchor::Bottom));

        let moved = rect_from_xywh(50.0, 50.0, 100.0, 100.0);
        let changed = c.update_connections(|id| (id == "a").then_some(moved));
        assert!(changed);
        assert_eq!(c.start_point(), Point::new(100.0, 150.0));
        // Unbound end stays put
        assert_eq!(c.end_point(), Point::new(300.0, 0.0));
    }

    #[test]
    fn test_missing_binding_keeps_point() {
        let mut c = Connector::new(Point::ZERO, Point::new(300.0, 0.0));
        c.connect_end("gone", rect_from_xywh(300.0, 0.0, 50.0, 50.0), Some(Anchor::Top));
        let before = c.end_point();
        assert!(!c.update_connections(|_| None));
        assert_eq!(c.end_point(), before);
    }

    #[test]
    fn test_hit_test() {
        let c = Connector::new(Point::ZERO, Point::new(100.0, 0.0));
        assert!(c.hit_test(Point::new(50.0, 9.0), 10.0));
        assert!(!c.hit_test(Point::new(50.0, 11.0), 10.0));
    }

    #[test]
    fn test_bounds_padding() {
        let c = Connector::new(Point::new(10.0, 20.0), Point::new(110.0, 60.0));
        assert_eq!(c.bounds(), Rect::new(0.0, 10.0, 120.0, 70.0));
    }
}
