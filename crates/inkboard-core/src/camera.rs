//! Pan/zoom transform between screen and canvas space.
//!
//! `screen = canvas * zoom + pan`.

use crate::config::EngineConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Serialized form of the view transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// The board's view transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Translation in screen pixels.
    pub pan: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.1, 5.0)
    }
}

impl Camera {
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom,
            max_zoom,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.min_zoom, config.max_zoom)
    }

    /// Canvas to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Screen to canvas.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        self.inverse_transform() * screen
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        self.transform() * canvas
    }

    /// Pan by a delta in screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the zoom, clamped to the allowed range.
    ///
    /// With a `center`, the canvas point under that screen point stays put.
    /// Returns true if the zoom changed.
    pub fn set_zoom(&mut self, zoom: f64, center: Option<Point>) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        if let Some(c) = center {
            let c = c.to_vec2();
            self.pan = c - (c - self.pan) * (new_zoom / self.zoom);
        }
        self.zoom = new_zoom;
        true
    }

    /// Multiply the zoom by `factor` around `screen_point`.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        self.set_zoom(self.zoom * factor, Some(screen_point))
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit `bounds` into `viewport` inside a `padding` margin, never zooming
    /// in past 1. `None` resets the camera.
    pub fn fit_to_bounds(&mut self, bounds: Option<Rect>, viewport: Size, padding: f64) {
        let Some(bounds) = bounds else {
            self.reset();
            return;
        };

        let available_w = (viewport.width - padding * 2.0).max(1.0);
        let available_h = (viewport.height - padding * 2.0).max(1.0);
        let scale_x = available_w / bounds.width().max(1.0);
        let scale_y = available_h / bounds.height().max(1.0);
        self.zoom = scale_x
            .min(scale_y)
            .min(1.0)
            .clamp(self.min_zoom, self.max_zoom);

        let center = bounds.center();
        self.pan = Vec2::new(
            viewport.width / 2.0 - center.x * self.zoom,
            viewport.height / 2.0 - center.y * self.zoom,
        );
    }

    /// Canvas-space rect currently visible in `viewport`.
    pub fn visible_rect(&self, viewport: Size) -> Rect {
        let p0 = self.screen_to_canvas(Point::ZERO);
        let p1 = self.screen_to_canvas(Point::new(viewport.width, viewport.height));
        Rect::from_points(p0, p1)
    }

    pub fn to_transform(&self) -> Transform {
        Transform {
            zoom: self.zoom,
            pan_x: self.pan.x,
            pan_y: self.pan.y,
        }
    }

    /// Apply a serialized transform. The zoom is clamped.
    pub fn apply_transform(&mut self, transform: Transform) {
        let zoom = if transform.zoom.is_finite() { transform.zoom } else { 1.0 };
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.pan = Vec2::new(
            if transform.pan_x.is_finite() { transform.pan_x } else { 0.0 },
            if transform.pan_y.is_finite() { transform.pan_y } else { 0.0 },
        );
    }
}
