//! Core capture types and settings.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`RawCapture`]: an image plus platform metadata, as a picker delivers it
//! - [`ProcessedImage`]: a capture after orientation/resize normalization
//! - [`ProcessingSettings`]: configuration for finalizing a capture
//! - [`FinalizedPhoto`]: encoded bytes plus the EXIF projection

mod capture;
mod types;

pub use capture::{ProcessedImage, RawCapture};
pub use types::{FinalizedPhoto, PhotoFlags, PhotoOptions, ProcessingSettings, DEFAULT_QUALITY_PERCENT};
