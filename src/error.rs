//! Error types for the profilecrop library.
//!
//! Only validation and persistence failures are meant to reach the user.
//! Geometry never produces errors: bounds are enforced by clamping and
//! malformed crop metadata degrades to a cover-fit render.

use thiserror::Error;

/// Why an uploaded file was refused by an editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{name} is not a supported image")]
    NotAnImage { name: String },

    #[error("{name} is {size} bytes, the limit is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("{name} is empty")]
    Empty { name: String },
}

#[derive(Error, Debug)]
pub enum CropError {
    #[error("Invalid image: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unable to store profile images: {0}")]
    Gateway(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Resize failed: {0}")]
    Resize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CropError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn resize(msg: impl std::fmt::Display) -> Self {
        Self::Resize(msg.to_string())
    }

    /// Whether the error should be shown to the person editing.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Gateway(_) | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, CropError>;
