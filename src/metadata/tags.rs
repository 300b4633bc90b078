//! The EXIF tags carried between the metadata tree and the embedded TIFF block.
//!
//! Keys follow the platform property dictionary names, grouped by the
//! sub-mapping they live in.

use std::collections::HashMap;
use exif::Tag;
use lazy_static::lazy_static;

use super::value::{EXIF_KEY, GPS_KEY, TIFF_KEY};

/// Sub-mapping of the metadata tree a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Tiff,
    Exif,
    Gps,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Tiff, Group::Exif, Group::Gps];

    /// Key of the sub-mapping in the metadata tree.
    pub fn key(self) -> &'static str {
        match self {
            Self::Tiff => TIFF_KEY,
            Self::Exif => EXIF_KEY,
            Self::Gps => GPS_KEY,
        }
    }
}

/// How a tree value is encoded in the EXIF field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Ascii,
    Byte,
    Short,
    /// Counted SHORT, kept as a list in the tree (ISO ratings).
    Shorts,
    Long,
    Rational,
    SRational,
    /// Decimal degrees in the tree, degrees/minutes/seconds in EXIF.
    Coordinate,
    /// `HH:MM:SS.ss` text in the tree, three rationals in EXIF.
    Clock,
}

#[derive(Debug, Clone, Copy)]
pub struct TagSpec {
    pub key: &'static str,
    pub group: Group,
    pub tag: Tag,
    pub kind: Kind,
}

const fn spec(key: &'static str, group: Group, tag: Tag, kind: Kind) -> TagSpec {
    TagSpec { key, group, tag, kind }
}

pub static TAGS: &[TagSpec] = &[
    spec("Make", Group::Tiff, Tag::Make, Kind::Ascii),
    spec("Model", Group::Tiff, Tag::Model, Kind::Ascii),
    spec("Software", Group::Tiff, Tag::Software, Kind::Ascii),
    spec("DateTime", Group::Tiff, Tag::DateTime, Kind::Ascii),
    spec("Orientation", Group::Tiff, Tag::Orientation, Kind::Short),
    spec("XResolution", Group::Tiff, Tag::XResolution, Kind::Rational),
    spec("YResolution", Group::Tiff, Tag::YResolution, Kind::Rational),
    spec("ResolutionUnit", Group::Tiff, Tag::ResolutionUnit, Kind::Short),
    spec("ExposureTime", Group::Exif, Tag::ExposureTime, Kind::Rational),
    spec("FNumber", Group::Exif, Tag::FNumber, Kind::Rational),
    spec("ExposureProgram", Group::Exif, Tag::ExposureProgram, Kind::Short),
    spec("ISOSpeedRatings", Group::Exif, Tag::PhotographicSensitivity, Kind::Shorts),
    spec("DateTimeOriginal", Group::Exif, Tag::DateTimeOriginal, Kind::Ascii),
    spec("DateTimeDigitized", Group::Exif, Tag::DateTimeDigitized, Kind::Ascii),
    spec("ExposureBiasValue", Group::Exif, Tag::ExposureBiasValue, Kind::SRational),
    spec("MeteringMode", Group::Exif, Tag::MeteringMode, Kind::Short),
    spec("Flash", Group::Exif, Tag::Flash, Kind::Short),
    spec("FocalLength", Group::Exif, Tag::FocalLength, Kind::Rational),
    spec("ColorSpace", Group::Exif, Tag::ColorSpace, Kind::Short),
    spec("PixelXDimension", Group::Exif, Tag::PixelXDimension, Kind::Long),
    spec("PixelYDimension", Group::Exif, Tag::PixelYDimension, Kind::Long),
    spec("WhiteBalance", Group::Exif, Tag::WhiteBalance, Kind::Short),
    spec("FocalLenIn35mmFilm", Group::Exif, Tag::FocalLengthIn35mmFilm, Kind::Short),
    spec("LensMake", Group::Exif, Tag::LensMake, Kind::Ascii),
    spec("LensModel", Group::Exif, Tag::LensModel, Kind::Ascii),
    spec("LatitudeRef", Group::Gps, Tag::GPSLatitudeRef, Kind::Ascii),
    spec("Latitude", Group::Gps, Tag::GPSLatitude, Kind::Coordinate),
    spec("LongitudeRef", Group::Gps, Tag::GPSLongitudeRef, Kind::Ascii),
    spec("Longitude", Group::Gps, Tag::GPSLongitude, Kind::Coordinate),
    spec("AltitudeRef", Group::Gps, Tag::GPSAltitudeRef, Kind::Byte),
    spec("Altitude", Group::Gps, Tag::GPSAltitude, Kind::Rational),
    spec("TimeStamp", Group::Gps, Tag::GPSTimeStamp, Kind::Clock),
    spec("Speed", Group::Gps, Tag::GPSSpeed, Kind::Rational),
    spec("SpeedRef", Group::Gps, Tag::GPSSpeedRef, Kind::Ascii),
    spec("ImgDirection", Group::Gps, Tag::GPSImgDirection, Kind::Rational),
    spec("ImgDirectionRef", Group::Gps, Tag::GPSImgDirectionRef, Kind::Ascii),
    spec("DateStamp", Group::Gps, Tag::GPSDateStamp, Kind::Ascii),
];

lazy_static! {
    static ref BY_KEY: HashMap<Group, HashMap<&'static str, &'static TagSpec>> = {
        let mut groups: HashMap<Group, HashMap<&'static str, &'static TagSpec>> = HashMap::new();
        for spec in TAGS {
            groups.entry(spec.group).or_default().insert(spec.key, spec);
        }
        groups
    };
}

/// Looks up the tag stored under `key` in `group`'s sub-mapping.
pub fn by_key(group: Group, key: &str) -> Option<&'static TagSpec> {
    BY_KEY.get(&group).and_then(|keys| keys.get(key)).copied()
}

/// Looks up the table entry for an EXIF tag.
pub fn by_tag(tag: Tag) -> Option<&'static TagSpec> {
    TAGS.iter().find(|s| s.tag == tag)
}
