//! Geometric shape element.

use super::color::{color_or_black, parse_color};
use kurbo::{Affine, BezPath, Ellipse, Point, Rect, Shape as KurboShape};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Minimum side of a circle after resizing.
pub const MIN_CIRCLE_SIDE: f64 = 40.0;

/// Corner radius used by `RoundedRectangle`.
const ROUNDED_RADIUS: f64 = 12.0;

/// Outline kind of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundedRectangle,
    Circle,
    Ellipse,
    Triangle,
    Diamond,
    Hexagon,
    Star,
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 12] = [
        ShapeKind::Rectangle,
        ShapeKind::RoundedRectangle,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Triangle,
        ShapeKind::Diamond,
        ShapeKind::Hexagon,
        ShapeKind::Star,
        ShapeKind::ArrowRight,
        ShapeKind::ArrowLeft,
        ShapeKind::ArrowUp,
        ShapeKind::ArrowDown,
    ];

    /// Whether resizing keeps width and height equal.
    pub fn is_square(self) -> bool {
        self == ShapeKind::Circle
    }
}

/// Shape presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeStyle {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub text_color: String,
    pub font_size: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: "#ffffff".to_string(),
            stroke_color: "#1e293b".to_string(),
            stroke_width: 2.0,
            text_color: "#1e293b".to_string(),
            font_size: 14.0,
        }
    }
}

impl ShapeStyle {
    /// Fill color, or `None` when transparent or unparseable.
    pub fn fill(&self) -> Option<Color> {
        parse_color(&self.fill_color).filter(|c| c.to_rgba8().a > 0)
    }

    pub fn stroke(&self) -> Color {
        color_or_black(&self.stroke_color)
    }
}

/// Structured shape fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeProperties {
    pub shape_type: ShapeKind,
}

/// A filled outline with an optional label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeElement {
    pub content: String,
    pub style: ShapeStyle,
    pub properties: ShapeProperties,
}

impl ShapeElement {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            properties: ShapeProperties { shape_type: kind },
            ..Default::default()
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.properties.shape_type
    }

    /// Outline of this shape fitted to `rect`.
    pub fn outline_path(&self, rect: Rect) -> BezPath {
        outline_path(self.kind(), rect)
    }
}

/// Outline of a shape kind fitted to `rect`, in canvas coordinates.
pub fn outline_path(kind: ShapeKind, rect: Rect) -> BezPath {
    let w = rect.width();
    let h = rect.height();
    let cx = w / 2.0;
    let cy = h / 2.0;

    let local = match kind {
        ShapeKind::Rectangle => Rect::new(0.0, 0.0, w, h).to_path(0.1),
        ShapeKind::RoundedRectangle => {
            let radius = ROUNDED_RADIUS.min(w / 2.0).min(h / 2.0);
            Rect::new(0.0, 0.0, w, h).to_rounded_rect(radius).to_path(0.1)
        }
        ShapeKind::Circle | ShapeKind::Ellipse => {
            Ellipse::from_rect(Rect::new(0.0, 0.0, w, h)).to_path(0.1)
        }
        ShapeKind::Triangle => polygon(&[(cx, 0.0), (w, h), (0.0, h)]),
        ShapeKind::Diamond => polygon(&[(cx, 0.0), (w, cy), (cx, h), (0.0, cy)]),
        ShapeKind::Hexagon => {
            let hx = w / 4.0;
            polygon(&[
                (hx, 0.0),
                (w - hx, 0.0),
                (w, cy),
                (w - hx, h),
                (hx, h),
                (0.0, cy),
            ])
        }
        ShapeKind::Star => {
            let outer = w.min(h) / 2.0;
            let inner = outer * 0.4;
            let points: Vec<(f64, f64)> = (0..10)
                .map(|i| {
                    let radius = if i % 2 == 0 { outer } else { inner };
                    let angle = (i as f64) * std::f64::consts::PI / 5.0 - std::f64::consts::FRAC_PI_2;
                    (cx + radius * angle.cos(), cy + radius * angle.sin())
                })
                .collect();
            polygon(&points)
        }
        ShapeKind::ArrowRight => arrow_right(w, h),
        ShapeKind::ArrowLeft => {
            // Mirror horizontally within the box
            let mut path = arrow_right(w, h);
            path.apply_affine(Affine::new([-1.0, 0.0, 0.0, 1.0, w, 0.0]));
            path
        }
        ShapeKind::ArrowDown => {
            // Build a right arrow in a transposed box, then swap axes
            let mut path = arrow_right(h, w);
            path.apply_affine(Affine::new([0.0, 1.0, 1.0, 0.0, 0.0, 0.0]));
            path
        }
        ShapeKind::ArrowUp => {
            let mut path = arrow_right(h, w);
            path.apply_affine(Affine::new([0.0, -1.0, 1.0, 0.0, 0.0, h]));
            path
        }
    };

    let mut path = local;
    path.apply_affine(Affine::translate((rect.x0, rect.y0)));
    path
}

fn arrow_right(w: f64, h: f64) -> BezPath {
    let aw = w * 0.6;
    let ah = h * 0.3;
    polygon(&[
        (0.0, ah),
        (aw, ah),
        (aw, 0.0),
        (w, h / 2.0),
        (aw, h),
        (aw, h - ah),
        (0.0, h - ah),
    ])
}

fn polygon(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(Point::new(x, y));
        } else {
            path.line_to(Point::new(x, y));
        }
    }
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_paths_fit_bounds() {
        let rect = Rect::new(10.0, 20.0, 160.0, 120.0);
        for kind in ShapeKind::ALL {
            // Curve flattening may overshoot by up to the path tolerance
            let bbox = outline_path(kind, rect).bounding_box();
            assert!(bbox.x0 >= rect.x0 - 0.5, "{:?} exceeds left", kind);
            assert!(bbox.y0 >= rect.y0 - 0.5, "{:?} exceeds top", kind);
            assert!(bbox.x1 <= rect.x1 + 0.5, "{:?} exceeds right", kind);
            assert!(bbox.y1 <= rect.y1 + 0.5, "{:?} exceeds bottom", kind);
        }
    }

    #[test]
    fn test_arrow_up_points_up() {
        let rect = Rect::new(0.0, 0.0, 100.0, 200.0);
        let path = outline_path(ShapeKind::ArrowUp, rect);
        // The tip is the only vertex on the top edge
        let tips: Vec<_> = path
            .elements()
            .iter()
            .filter_map(|el| match el {
                kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .filter(|p| p.y.abs() < 1e-9)
            .collect();
        assert_eq!(tips.len(), 1);
        assert!((tips[0].x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ShapeKind::RoundedRectangle).unwrap();
        assert_eq!(json, "\"rounded-rectangle\"");
        let kind: ShapeKind = serde_json::from_str("\"arrow-down\"").unwrap();
        assert_eq!(kind, ShapeKind::ArrowDown);
    }

    #[test]
    fn test_transparent_fill() {
        let mut style = ShapeStyle::default();
        assert!(style.fill().is_some());
        style.fill_color = "transparent".to_string();
        assert!(style.fill().is_none());
    }
}
