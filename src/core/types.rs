//! Core types for capture processing settings and results.

use serde::{Deserialize, Serialize};
use crate::metadata::Metadata;
use crate::utils::ResultType;

/// Quality used when the caller does not pass one, in percent.
pub const DEFAULT_QUALITY_PERCENT: f32 = 100.0;

/// Configuration for finalizing one capture.
///
/// Deserializes from the camelCase JSON a plugin shell receives, with every
/// field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingSettings {
    /// How the encoded bytes are framed for the caller
    pub result_type: ResultType,
    /// JPEG compression quality, 0.0–1.0
    pub quality: f32,
    /// Target width in pixels, 0 means unconstrained
    pub width: u32,
    /// Target height in pixels, 0 means unconstrained
    pub height: u32,
    /// Whether to resize at all
    pub should_resize: bool,
    /// Whether to bake the orientation tag into the pixels
    pub should_correct_orientation: bool,
    /// Whether a new (or edited) photo is copied to the system gallery
    pub save_to_gallery: bool,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            result_type: ResultType::Base64,
            quality: 1.0,
            width: 0,
            height: 0,
            should_resize: false,
            should_correct_orientation: true,
            save_to_gallery: false,
        }
    }
}

impl ProcessingSettings {
    /// Box to fit the image into, when a resize applies.
    ///
    /// A resize only makes sense with at least one positive dimension.
    pub fn resize_target(&self) -> Option<(u32, u32)> {
        (self.should_resize && (self.width > 0 || self.height > 0)).then_some((self.width, self.height))
    }

    /// True when a photo with `flags` should be written to the gallery.
    ///
    /// Photos picked from the gallery are only saved back if they were edited.
    pub fn should_save_to_gallery(&self, flags: PhotoFlags) -> bool {
        self.save_to_gallery && (flags.edited || !flags.from_gallery)
    }
}

/// Options as passed by web code to `getPhoto` / `pickImages`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoOptions {
    /// Quality in percent, 0–100
    pub quality: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub correct_orientation: Option<bool>,
    pub result_type: Option<ResultType>,
    pub save_to_gallery: Option<bool>,
}

impl From<PhotoOptions> for ProcessingSettings {
    fn from(options: PhotoOptions) -> Self {
        let percent = options.quality.unwrap_or(DEFAULT_QUALITY_PERCENT);
        let width = options.width.unwrap_or(0);
        let height = options.height.unwrap_or(0);
        Self {
            result_type: options.result_type.unwrap_or_default(),
            quality: (percent.abs() / 100.0).min(1.0),
            width,
            height,
            should_resize: width > 0 || height > 0,
            should_correct_orientation: options.correct_orientation.unwrap_or(true),
            save_to_gallery: options.save_to_gallery.unwrap_or(false),
        }
    }
}

/// Provenance of a capture, used to decide on saving back to the gallery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoFlags {
    /// The user edited the image in the picker
    pub edited: bool,
    /// The image came from the photo library rather than the camera
    pub from_gallery: bool,
}

impl PhotoFlags {
    pub const CAMERA: Self = Self { edited: false, from_gallery: false };
    pub const GALLERY: Self = Self { edited: false, from_gallery: true };
}

/// Output of the pipeline for one capture.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedPhoto {
    /// JPEG bytes, with the metadata embedded when that succeeded
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Projection of the final metadata returned to callers
    pub exif: Metadata,
    pub flags: PhotoFlags,
    pub width: u32,
    pub height: u32,
    /// Whether the metadata overlay made it into `bytes`
    pub metadata_embedded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_correct_orientation_without_resizing() {
        let settings = ProcessingSettings::default();
        assert!(settings.should_correct_orientation);
        assert_eq!(settings.resize_target(), None);
    }

    #[test]
    fn resize_needs_a_positive_dimension() {
        let settings = ProcessingSettings { should_resize: true, ..Default::default() };
        assert_eq!(settings.resize_target(), None);

        let settings = ProcessingSettings { should_resize: true, height: 50, ..Default::default() };
        assert_eq!(settings.resize_target(), Some((0, 50)));
    }

    #[test]
    fn options_apply_platform_defaults() {
        let options: PhotoOptions = serde_json::from_str(r#"{"quality": 90, "width": 640}"#).unwrap();
        let settings = ProcessingSettings::from(options);
        assert!((settings.quality - 0.9).abs() < f32::EPSILON);
        assert!(settings.should_resize);
        assert_eq!(settings.resize_target(), Some((640, 0)));
        assert!(settings.should_correct_orientation);
        assert_eq!(settings.result_type, ResultType::Base64);
    }

    #[test]
    fn options_clamp_quality() {
        let options: PhotoOptions =
            serde_json::from_str(r#"{"quality": -250, "resultType": "dataUrl", "correctOrientation": false}"#).unwrap();
        let settings = ProcessingSettings::from(options);
        assert_eq!(settings.quality, 1.0);
        assert_eq!(settings.result_type, ResultType::DataUrl);
        assert!(!settings.should_correct_orientation);
        assert!(!settings.should_resize);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: ProcessingSettings = serde_json::from_str(r#"{"shouldResize": true, "width": 50}"#).unwrap();
        assert_eq!(settings.resize_target(), Some((50, 0)));
        assert!(settings.should_correct_orientation);
    }

    #[test]
    fn gallery_copies_only_new_or_edited_photos() {
        let settings = ProcessingSettings { save_to_gallery: true, ..Default::default() };
        assert!(settings.should_save_to_gallery(PhotoFlags::CAMERA));
        assert!(!settings.should_save_to_gallery(PhotoFlags::GALLERY));
        assert!(settings.should_save_to_gallery(PhotoFlags { edited: true, from_gallery: true }));

        let off = ProcessingSettings::default();
        assert!(!off.should_save_to_gallery(PhotoFlags::CAMERA));
    }
}
