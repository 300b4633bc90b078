//! Two-stage encode: compress the pixels, then stamp metadata onto the
//! compressed bytes.
//!
//! JPEG encoders take no metadata override, so the second stage reopens the
//! fresh bytes as a container and replaces its EXIF segment.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};
use tracing::{debug, warn};

use crate::metadata::{write_exif_block, Metadata};
use crate::utils::{jpeg_quality, CameraError, CameraResult, EmbedError};

/// Turns a pixel buffer into compressed bytes.
pub trait Compressor: Send + Sync {
    fn compress(&self, image: &DynamicImage, quality: f32) -> CameraResult<Vec<u8>>;
}

/// Rewrites compressed bytes so they carry `metadata`.
pub trait MetadataEmbedder: Send + Sync {
    fn embed(&self, compressed: &[u8], metadata: &Metadata) -> Result<Vec<u8>, EmbedError>;
}

/// Baseline JPEG at the requested quality. Alpha is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCompressor;

impl Compressor for JpegCompressor {
    fn compress(&self, image: &DynamicImage, quality: f32) -> CameraResult<Vec<u8>> {
        let rgb = image.to_rgb8();
        let mut out = Vec::with_capacity(rgb.as_raw().len() / 8);
        JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality))
            .encode_image(&rgb)
            .map_err(|e| CameraError::encode(format!("JPEG encoding failed: {e}")))?;
        Ok(out)
    }
}

/// `Exif\0\0` identifier written ahead of the TIFF block.
const EXIF_PREFIX_LEN: usize = 6;
/// The segment length field counts itself.
const SEGMENT_LENGTH_LEN: usize = 2;

/// Writes the metadata tree as the JPEG's APP1 EXIF segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifEmbedder;

impl MetadataEmbedder for ExifEmbedder {
    fn embed(&self, compressed: &[u8], metadata: &Metadata) -> Result<Vec<u8>, EmbedError> {
        let mut jpeg = Jpeg::from_bytes(Bytes::copy_from_slice(compressed))?;
        let block = write_exif_block(metadata)?;
        if block.len() + EXIF_PREFIX_LEN + SEGMENT_LENGTH_LEN > u16::MAX as usize {
            return Err(EmbedError::Writer(format!(
                "EXIF block exceeds APP1 segment size ({} bytes)",
                block.len()
            )));
        }
        jpeg.set_exif(Some(Bytes::from(block)));
        Ok(jpeg.encoder().bytes().to_vec())
    }
}

/// First stage. Failure here means no image can be produced.
pub fn compress<C: Compressor + ?Sized>(compressor: &C, image: &DynamicImage, quality: f32) -> CameraResult<Vec<u8>> {
    compressor.compress(image, quality)
}

/// Second stage. Returns `compressed` untouched if the overlay fails.
///
/// The flag reports whether the metadata made it into the returned bytes.
pub fn reembed_metadata<E: MetadataEmbedder + ?Sized>(
    embedder: &E,
    compressed: Vec<u8>,
    metadata: &Metadata,
) -> (Vec<u8>, bool) {
    match embedder.embed(&compressed, metadata) {
        Ok(stamped) => (stamped, true),
        Err(EmbedError::Empty) => {
            debug!("No metadata to embed, keeping plain JPEG");
            (compressed, false)
        }
        Err(e) => {
            warn!("Metadata re-embedding failed, keeping plain JPEG: {e}");
            (compressed, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{read_metadata, MetaValue, ORIENTATION_KEY};
    use image::{Rgba, RgbaImage};

    struct RejectingEmbedder;

    impl MetadataEmbedder for RejectingEmbedder {
        fn embed(&self, _: &[u8], _: &Metadata) -> Result<Vec<u8>, EmbedError> {
            Err(EmbedError::Source("unsupported destination".into()))
        }
    }

    fn rgba(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([10, 200, 30, 128])))
    }

    #[test]
    fn compresses_alpha_images_to_jpeg() {
        let bytes = compress(&JpegCompressor, &rgba(16, 8), 0.8).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn embeds_orientation_into_the_jpeg() {
        let plain = compress(&JpegCompressor, &rgba(4, 4), 1.0).unwrap();
        let meta = Metadata::from_iter([(ORIENTATION_KEY, MetaValue::Int(1))]);
        let (stamped, embedded) = reembed_metadata(&ExifEmbedder, plain.clone(), &meta);

        assert!(embedded);
        assert_ne!(stamped, plain);
        assert_eq!(read_metadata(&stamped).get_int(ORIENTATION_KEY), Some(1));
    }

    #[test]
    fn falls_back_when_embedding_fails() {
        let plain = compress(&JpegCompressor, &rgba(4, 4), 1.0).unwrap();
        let meta = Metadata::from_iter([(ORIENTATION_KEY, MetaValue::Int(1))]);
        let (bytes, embedded) = reembed_metadata(&RejectingEmbedder, plain.clone(), &meta);
        assert!(!embedded);
        assert_eq!(bytes, plain);
    }

    #[test]
    fn oversized_exif_block_keeps_plain_jpeg() {
        let plain = compress(&JpegCompressor, &rgba(16, 16), 1.0).unwrap();
        let meta = Metadata::from_iter([(
            crate::metadata::TIFF_KEY,
            Metadata::from_iter([("Make", MetaValue::from("A".repeat(70_000)))]).into(),
        )]);

        assert!(matches!(ExifEmbedder.embed(&plain, &meta), Err(EmbedError::Writer(_))));
        let (bytes, embedded) = reembed_metadata(&ExifEmbedder, plain.clone(), &meta);
        assert!(!embedded);
        assert_eq!(bytes, plain);
    }

    #[test]
    fn non_jpeg_source_is_rejected_softly() {
        let meta = Metadata::from_iter([(ORIENTATION_KEY, MetaValue::Int(1))]);
        let (bytes, embedded) = reembed_metadata(&ExifEmbedder, b"not a jpeg".to_vec(), &meta);
        assert!(!embedded);
        assert_eq!(bytes, b"not a jpeg");
    }
}
