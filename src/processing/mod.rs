//! Image finalization.
//!
//! # Architecture
//!
//! - [`normalize`]: orientation baking and aspect-fit resizing (step 1)
//! - [`Pipeline`]: two-stage encode and EXIF projection on top of `normalize`
//! - [`process_batch`]: fan-out of a multi-selection over the blocking pool
//! - [`Compressor`] / [`MetadataEmbedder`]: the codec seams, JPEG + EXIF by default

mod batch;
mod encode;
mod orientation;
mod pipeline;
mod resize;

pub use batch::{process_batch, BatchItem, BatchProgress};
pub use encode::{compress, reembed_metadata, Compressor, ExifEmbedder, JpegCompressor, MetadataEmbedder};
pub use orientation::Orientation;
pub use pipeline::{normalize, Pipeline};
pub use resize::fit_within;
