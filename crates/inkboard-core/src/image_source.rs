//! Asynchronous image acquisition for the image tool.
//!
//! A source resolves a reference (a key, a `data:` URL, a path) to encoded
//! bytes, and the bytes are sniffed and measured before an element is made.

use crate::elements::{Element, ElementKind, ImageElement};
use crate::error::{ImageError, ImageResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::io::Cursor;
use std::pin::Pin;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Accepted image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A decoded-enough image: where it came from and how big it is.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredImage {
    /// Reference stored as the element's `src`.
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl AcquiredImage {
    /// Image element centered on `center`, scaled down to fit `max_side`.
    pub fn to_element(&self, center: Point, max_side: f64) -> Element {
        let kind = ElementKind::Image(ImageElement::from_source(&self.source, self.width, self.height));
        let mut element = Element::new(kind, center);
        element.fit_to_size(max_side, max_side);
        let half = Vec2::new(element.width() / 2.0, element.height() / 2.0);
        element.set_position(center - half);
        element
    }
}

/// Sniff and measure encoded image bytes.
pub fn probe_image(source: impl Into<String>, bytes: &[u8]) -> ImageResult<AcquiredImage> {
    let format = ImageFormat::from_magic_bytes(bytes).ok_or(ImageError::NotAnImage)?;
    let (width, height) = ::image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::Io(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ImageError::LoadFailed(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(ImageError::LoadFailed("empty image".to_string()));
    }
    Ok(AcquiredImage {
        source: source.into(),
        width,
        height,
        format,
    })
}

/// Resolves image references to measured images.
///
/// Single-threaded by contract, so futures need not be `Send`.
pub trait ImageSource {
    fn acquire<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, ImageResult<AcquiredImage>>;
}

/// Images held in memory under caller-chosen keys.
#[derive(Debug, Default, Clone)]
pub struct MemoryImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(reference.into(), bytes);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSource for MemoryImageSource {
    fn acquire<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, ImageResult<AcquiredImage>> {
        Box::pin(async move {
            let bytes = self
                .images
                .get(reference)
                .ok_or_else(|| ImageError::LoadFailed(format!("no image named {}", reference)))?;
            probe_image(reference, bytes)
        })
    }
}

/// Base64 `data:` URLs, as produced by a browser file reader or paste.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUrlImageSource;

impl DataUrlImageSource {
    /// Split a `data:image/...;base64,` URL into its MIME type and bytes.
    pub fn decode(url: &str) -> ImageResult<(String, Vec<u8>)> {
        let rest = url.strip_prefix("data:").ok_or(ImageError::NotAnImage)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::LoadFailed("malformed data URL".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| ImageError::LoadFailed("data URL is not base64".to_string()))?;
        if !mime.starts_with("image/") {
            return Err(ImageError::NotAnImage);
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::LoadFailed(e.to_string()))?;
        Ok((mime.to_string(), bytes))
    }

    pub fn encode(format: ImageFormat, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
    }
}

impl ImageSource for DataUrlImageSource {
    fn acquire<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, ImageResult<AcquiredImage>> {
        Box::pin(async move {
            let (_, bytes) = Self::decode(reference)?;
            probe_image(reference, &bytes)
        })
    }
}

/// Images read from disk, relative to an optional base directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone)]
pub struct FileImageSource {
    base_path: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_path(base_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }

    fn resolve(&self, reference: &str) -> std::path::PathBuf {
        match &self.base_path {
            Some(base) => base.join(reference),
            None => std::path::PathBuf::from(reference),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ImageSource for FileImageSource {
    fn acquire<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, ImageResult<AcquiredImage>> {
        Box::pin(async move {
            let path = self.resolve(reference);
            let bytes = std::fs::read(&path)
                .map_err(|e| ImageError::Io(format!("{}: {}", path.display(), e)))?;
            probe_image(path.to_string_lossy(), &bytes)
        })
    }
}
