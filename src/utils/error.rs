//! Error types for the finalization pipeline.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.
//! [`CameraError`] is the hard tier that reaches the caller; [`EmbedError`] is the
//! soft tier that the pipeline swallows when metadata re-embedding fails.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

/// Validation errors for caller-supplied settings and paths.
#[derive(Error, Debug, Serialize)]
pub enum ValidationError {
    /// Path-related validation error
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

/// File path errors.
#[derive(Error, Debug, Serialize)]
pub enum PathError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotDirectory(PathBuf),
}

/// Main error type for the camera pipeline.
///
/// All errors are converted to this type before being handed to the plugin
/// shell, which forwards the `Display` text as the call's rejection message.
#[derive(Error, Debug, Serialize)]
pub enum CameraError {
    /// Settings or path validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Compressing the pixel buffer failed; no result can be produced
    #[error("Unable to encode image: {0}")]
    Encode(String),

    /// The picked bytes could not be decoded into pixels
    #[error("Error loading image: {0}")]
    Decode(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// A batch task panicked or was aborted
    #[error("Task error: {0}")]
    Task(String),
}

/// Convenience result type for pipeline operations.
pub type CameraResult<T> = Result<T, CameraError>;

impl CameraError {
    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn task<T: Into<String>>(msg: T) -> Self {
        Self::Task(msg.into())
    }

    /// True for the "cannot produce image" failure.
    pub fn is_encode(&self) -> bool {
        matches!(self, Self::Encode(_))
    }
}

impl ValidationError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFound(path.into()))
    }

    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotDirectory(path.into()))
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

/// Reasons the metadata overlay could not be stamped onto compressed bytes.
///
/// Never returned to callers: the pipeline logs it and keeps the plain bytes.
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Compressed bytes are not a JPEG container we can rewrite
    #[error("invalid image source: {0}")]
    Source(String),

    /// Nothing in the metadata tree maps to an EXIF tag
    #[error("no EXIF fields to embed")]
    Empty,

    /// The TIFF block writer rejected the fields
    #[error("EXIF writer failed: {0}")]
    Writer(String),
}

impl From<io::Error> for CameraError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<PathError> for CameraError {
    fn from(err: PathError) -> Self {
        Self::Validation(ValidationError::Path(err))
    }
}

impl From<image::ImageError> for CameraError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<exif::Error> for EmbedError {
    fn from(err: exif::Error) -> Self {
        Self::Writer(err.to_string())
    }
}

impl From<img_parts::Error> for EmbedError {
    fn from(err: img_parts::Error) -> Self {
        Self::Source(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_error_message_names_the_failure() {
        let err = CameraError::encode("jpeg encoder rejected buffer");
        assert!(err.is_encode());
        assert_eq!(err.to_string(), "Unable to encode image: jpeg encoder rejected buffer");
    }

    #[test]
    fn path_errors_lift_into_validation() {
        let err: CameraError = PathError::NotFound(PathBuf::from("/nope")).into();
        assert!(matches!(err, CameraError::Validation(ValidationError::Path(_))));
        assert!(!err.is_encode());
    }

    #[test]
    fn errors_serialize_for_the_bridge() {
        let err = CameraError::Validation(ValidationError::settings("quality out of range"));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["Validation"]["Settings"], "quality out of range");
    }
}
