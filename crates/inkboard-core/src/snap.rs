//! Grid and angle snapping.

use kurbo::Point;

/// Grid size for snapping (matches the rendered grid).
pub const GRID_SIZE: f64 = 20.0;

/// Angle snap increment in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Round a single coordinate to the grid.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = if increment > 0.0 {
        (angle_degrees / increment).round() * increment
    } else {
        angle_degrees
    };
    crate::geometry::normalize_degrees(snapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let p = snap_to_grid(Point::new(29.0, 31.0), GRID_SIZE);
        assert!((p.x - 20.0).abs() < f64::EPSILON);
        assert!((p.y - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_negative() {
        let p = snap_to_grid(Point::new(-29.0, -11.0), GRID_SIZE);
        assert!((p.x + 20.0).abs() < f64::EPSILON);
        assert!((p.y + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_angle() {
        assert!((snap_angle(22.0, ANGLE_SNAP_INCREMENT) - 15.0).abs() < f64::EPSILON);
        assert!((snap_angle(23.0, ANGLE_SNAP_INCREMENT) - 30.0).abs() < f64::EPSILON);
        assert!((snap_angle(-8.0, ANGLE_SNAP_INCREMENT) - 345.0).abs() < f64::EPSILON);
        assert!(snap_angle(359.0, ANGLE_SNAP_INCREMENT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_grid_is_noop() {
        assert!((snap_value(13.0, 0.0) - 13.0).abs() < f64::EPSILON);
    }
}
