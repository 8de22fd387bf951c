//! Error types for platform setup and settings parsing

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    /// A required DOM element is missing or has the wrong type
    #[error("element #{0} not found or not a canvas")]
    MissingElement(String),

    /// The canvas refused to hand out a 2D context
    #[error("2D context unavailable on #{0}")]
    ContextUnavailable(String),

    /// Pixel data could not be uploaded to the drawing surface
    #[error("image upload failed: {0}")]
    ImageUpload(String),

    /// A settings field held a value no style accepts
    #[error("invalid value {value:?} for {field}")]
    InvalidOption { field: &'static str, value: String },

    /// Settings payload was not valid JSON
    #[error("settings payload: {0}")]
    Json(#[from] serde_json::Error),
}
