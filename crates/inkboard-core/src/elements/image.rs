//! Raster image element.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Smallest side an aspect-locked image may be resized to.
pub const MIN_IMAGE_SIDE: f64 = 50.0;

/// How the image is fitted into its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

/// Image presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageStyle {
    pub object_fit: ObjectFit,
    pub border_radius: f64,
}

/// Structured image fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProperties {
    /// Source reference (URL, data URL, or file path).
    pub src: String,
    pub alt: String,
    pub original_width: f64,
    pub original_height: f64,
    /// Width divided by height of the source image.
    pub aspect_ratio: f64,
    pub lock_aspect_ratio: bool,
}

impl Default for ImageProperties {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: String::new(),
            original_width: 0.0,
            original_height: 0.0,
            aspect_ratio: 1.5,
            lock_aspect_ratio: true,
        }
    }
}

/// An image placed on the board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageElement {
    pub style: ImageStyle,
    pub properties: ImageProperties,
}

impl ImageElement {
    /// Image for a decoded source of the given pixel size.
    pub fn from_source(src: impl Into<String>, width: u32, height: u32) -> Self {
        let mut image = Self::default();
        image.properties.src = src.into();
        image.set_original_size(width as f64, height as f64);
        image
    }

    pub fn src(&self) -> &str {
        &self.properties.src
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.properties.aspect_ratio
    }

    pub fn is_aspect_locked(&self) -> bool {
        self.properties.lock_aspect_ratio
    }

    /// Record the intrinsic size and derive the aspect ratio from it.
    pub fn set_original_size(&mut self, width: f64, height: f64) {
        self.properties.original_width = width;
        self.properties.original_height = height;
        if width > 0.0 && height > 0.0 {
            self.properties.aspect_ratio = width / height;
        }
    }

    pub fn original_size(&self) -> Option<Size> {
        let p = &self.properties;
        (p.original_width > 0.0 && p.original_height > 0.0)
            .then(|| Size::new(p.original_width, p.original_height))
    }

    /// Project a requested size onto the locked aspect ratio.
    ///
    /// The axis that is proportionally larger drives the other one, and the
    /// driving axis is floored at `MIN_IMAGE_SIDE`.
    pub fn constrain_size(&self, requested: Size) -> Size {
        let ratio = self.properties.aspect_ratio;
        if !self.properties.lock_aspect_ratio || ratio <= 0.0 || !ratio.is_finite() {
            return requested;
        }
        let requested_ratio = if requested.height > 0.0 {
            requested.width / requested.height
        } else {
            f64::INFINITY
        };
        if requested_ratio > ratio {
            let width = requested.width.max(MIN_IMAGE_SIDE);
            Size::new(width, width / ratio)
        } else {
            let height = requested.height.max(MIN_IMAGE_SIDE);
            Size::new(height * ratio, height)
        }
    }

    /// Largest size with the image's aspect ratio that fits in `max`.
    pub fn fit_within(&self, max: Size) -> Size {
        let Some(original) = self.original_size() else {
            return max;
        };
        let scale = (max.width / original.width)
            .min(max.height / original.height)
            .min(1.0);
        Size::new(original.width * scale, original.height * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source() {
        let image = ImageElement::from_source("a.png", 800, 400);
        assert!((image.aspect_ratio() - 2.0).abs() < f64::EPSILON);
        assert!(image.is_aspect_locked());
    }

    #[test]
    fn test_constrain_wide_request() {
        let image = ImageElement::from_source("a.png", 200, 100);
        let size = image.constrain_size(Size::new(300.0, 100.0));
        assert!((size.width - 300.0).abs() < f64::EPSILON);
        assert!((size.height - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_constrain_tall_request_floors_height() {
        let image = ImageElement::from_source("a.png", 200, 100);
        let size = image.constrain_size(Size::new(10.0, 10.0));
        assert!((size.height - 50.0).abs() < f64::EPSILON);
        assert!((size.width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unlocked_passes_through() {
        let mut image = ImageElement::from_source("a.png", 200, 100);
        image.properties.lock_aspect_ratio = false;
        let size = image.constrain_size(Size::new(123.0, 456.0));
        assert_eq!(size, Size::new(123.0, 456.0));
    }

    #[test]
    fn test_fit_within() {
        let image = ImageElement::from_source("a.png", 1200, 600);
        let size = image.fit_within(Size::new(600.0, 600.0));
        assert!((size.width - 600.0).abs() < f64::EPSILON);
        assert!((size.height - 300.0).abs() < f64::EPSILON);

        let small = ImageElement::from_source("b.png", 100, 50);
        assert_eq!(small.fit_within(Size::new(600.0, 600.0)), Size::new(100.0, 50.0));
    }
}
