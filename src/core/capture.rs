//! Captures as handed over by a picker, and the normalized form the
//! pipeline passes on to encoding.

use std::path::Path;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::core::PhotoFlags;
use crate::metadata::{read_metadata, Metadata};
use crate::processing::Orientation;
use crate::utils::{CameraError, CameraResult};

/// A decoded image plus the metadata the platform delivered with it.
#[derive(Debug, Clone)]
pub struct RawCapture {
    /// Pixels as stored, not yet rotated for display
    pub image: DynamicImage,
    /// Orientation the pixels must be displayed with
    pub orientation: Orientation,
    pub metadata: Metadata,
    pub flags: PhotoFlags,
}

impl RawCapture {
    /// Builds a capture whose pixel orientation is read from `metadata`.
    pub fn new(image: DynamicImage, metadata: Metadata, flags: PhotoFlags) -> Self {
        let orientation = metadata.orientation().map(Orientation::from_exif).unwrap_or_default();
        Self { image, orientation, metadata, flags }
    }

    /// Decodes an encoded JPEG or PNG and reads its EXIF block.
    pub fn from_bytes(encoded: &[u8], flags: PhotoFlags) -> CameraResult<Self> {
        let image = image::load_from_memory(encoded)
            .map_err(|e| CameraError::decode(format!("Failed to decode picked image: {e}")))?;
        let metadata = read_metadata(encoded);
        let capture = Self::new(image, metadata, flags);
        let (width, height) = capture.display_dimensions();
        debug!(
            "Decoded capture {}×{} as displayed ({:?}, {} metadata keys)",
            width,
            height,
            capture.orientation,
            capture.metadata.len()
        );
        Ok(capture)
    }

    /// Reads and decodes an image file, e.g. the camera's temporary output.
    pub fn open(path: impl AsRef<Path>, flags: PhotoFlags) -> CameraResult<Self> {
        let path = path.as_ref();
        let encoded = std::fs::read(path)
            .map_err(|e| CameraError::io(format!("Cannot read '{}': {e}", path.display())))?;
        Self::from_bytes(&encoded, flags)
    }

    /// Dimensions as displayed, orientation applied.
    pub fn display_dimensions(&self) -> (u32, u32) {
        let (w, h) = self.image.dimensions();
        self.orientation.display_dimensions(w, h)
    }
}

/// A capture after orientation/resize normalization.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub image: DynamicImage,
    /// Orientation still pending on the pixels; `Up` after any redraw
    pub orientation: Orientation,
    /// Metadata consistent with `image`
    pub metadata: Metadata,
    pub flags: PhotoFlags,
    /// Whether the pixel buffer was redrawn
    pub redrawn: bool,
}

impl ProcessedImage {
    /// The flattened EXIF view callers receive.
    pub fn exif(&self) -> Metadata {
        self.metadata.exif_projection()
    }
}

impl From<ProcessedImage> for RawCapture {
    fn from(processed: ProcessedImage) -> Self {
        Self {
            image: processed.image,
            orientation: processed.orientation,
            metadata: processed.metadata,
            flags: processed.flags,
        }
    }
}
