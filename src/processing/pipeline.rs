//! The finalization pipeline for a single capture.
//!
//! Normalize (orient and/or resize), encode in two stages, project the EXIF
//! subset. Synchronous and side-effect free; batch selections fan out over it
//! in [`super::batch`].

use image::GenericImageView;
use tracing::debug;

use crate::core::{FinalizedPhoto, ProcessedImage, ProcessingSettings, RawCapture};
use crate::utils::{validate_settings, CameraResult};

use super::encode::{compress, reembed_metadata, Compressor, ExifEmbedder, JpegCompressor, MetadataEmbedder};
use super::orientation::Orientation;
use super::resize::redraw;

/// Step 1: bake orientation into the pixels, resizing when asked.
///
/// Resizing redraws the buffer anyway, so it always bakes orientation in too;
/// the correction-only redraw is skipped in that case. Any redraw rewrites
/// every `Orientation` in the metadata to the upright sentinel.
pub fn normalize(capture: RawCapture, settings: &ProcessingSettings) -> ProcessedImage {
    let RawCapture { image, orientation, mut metadata, flags } = capture;

    let target = settings.resize_target();
    if target.is_none() && !settings.should_correct_orientation {
        return ProcessedImage { image, orientation, metadata, flags, redrawn: false };
    }

    let image = redraw(image, orientation, target);
    metadata.rewrite_orientation(Orientation::UPRIGHT);
    ProcessedImage { image, orientation: Orientation::Up, metadata, flags, redrawn: true }
}

/// Pipeline with pluggable codecs.
///
/// [`Pipeline::default`] encodes baseline JPEG and embeds metadata as EXIF.
#[derive(Debug, Clone, Default)]
pub struct Pipeline<C = JpegCompressor, E = ExifEmbedder> {
    compressor: C,
    embedder: E,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Compressor, E: MetadataEmbedder> Pipeline<C, E> {
    pub fn with_codecs(compressor: C, embedder: E) -> Self {
        Self { compressor, embedder }
    }

    /// Step 2: compress, then stamp the current metadata onto the bytes.
    ///
    /// Only compression can fail; the overlay falls back to the plain bytes.
    pub fn encode(&self, processed: &ProcessedImage, quality: f32) -> CameraResult<(Vec<u8>, bool)> {
        let compressed = compress(&self.compressor, &processed.image, quality)?;
        Ok(reembed_metadata(&self.embedder, compressed, &processed.metadata))
    }

    /// Runs the whole pipeline on one capture.
    pub fn finalize(&self, capture: RawCapture, settings: &ProcessingSettings) -> CameraResult<FinalizedPhoto> {
        validate_settings(settings)?;
        let processed = normalize(capture, settings);
        let (bytes, metadata_embedded) = self.encode(&processed, settings.quality)?;
        let (width, height) = processed.image.dimensions();

        debug!(
            "Finalized {}×{} photo: {} bytes (redrawn: {}, metadata embedded: {})",
            width,
            height,
            bytes.len(),
            processed.redrawn,
            metadata_embedded
        );

        Ok(FinalizedPhoto {
            bytes,
            exif: processed.exif(),
            flags: processed.flags,
            width,
            height,
            metadata_embedded,
        })
    }
}
