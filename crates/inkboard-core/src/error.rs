//! Error types for the board engine.
//!
//! Board operations never surface these to callers: they log the error and
//! degrade (skip, clamp, or no-op). Only image acquisition and configuration
//! loading return them.

use thiserror::Error;

/// Inconsistencies the board degrades around instead of failing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("Unknown element type: {0}")]
    UnknownType(String),
    #[error("Element not found: {0}")]
    MissingReference(String),
    #[error("Invalid import data: {0}")]
    InvalidImport(String),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl BoardError {
    /// Log this error at the level matching its severity.
    pub fn log(&self) {
        match self {
            BoardError::UnknownType(_) | BoardError::InvalidImport(_) => log::warn!("{}", self),
            BoardError::MissingReference(_) | BoardError::ConstraintViolation(_) => {
                log::debug!("{}", self)
            }
        }
    }
}

/// Image acquisition errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    #[error("File is not an image")]
    NotAnImage,
    #[error("Failed to load image: {0}")]
    LoadFailed(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for image acquisition.
pub type ImageResult<T> = Result<T, ImageError>;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
