//! Image metadata: the nested property tree and its EXIF encoding.
//!
//! - [`Metadata`] / [`MetaValue`]: the tagged recursive tree the pipeline edits
//! - [`read_metadata`]: tree from an encoded image's EXIF block
//! - [`write_exif_block`]: tree to a TIFF block for re-embedding

mod codec;
mod tags;
mod value;

pub use codec::{read_metadata, write_exif_block};
pub use value::{
    MetaValue, Metadata, EXIF_KEY, GPS_KEY, ORIENTATION_KEY, PROJECTED_GPS_KEY, TIFF_KEY,
};
