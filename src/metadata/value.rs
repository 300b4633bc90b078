//! Nested metadata tree shaped like the platform image property dictionary.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Top-level and `{TIFF}` key carrying the EXIF orientation.
pub const ORIENTATION_KEY: &str = "Orientation";
/// Sub-mapping holding the EXIF IFD.
pub const EXIF_KEY: &str = "{Exif}";
/// Sub-mapping holding the GPS IFD.
pub const GPS_KEY: &str = "{GPS}";
/// Sub-mapping holding the primary (TIFF) IFD.
pub const TIFF_KEY: &str = "{TIFF}";
/// Key under which the GPS block appears in the EXIF projection.
pub const PROJECTED_GPS_KEY: &str = "GPS";

/// A single metadata value.
///
/// Serialized untagged, so a tree round-trips through plain JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<MetaValue>),
    Map(Metadata),
}

impl MetaValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Metadata> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for MetaValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u32> for MetaValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Metadata> for MetaValue {
    fn from(v: Metadata) -> Self {
        Self::Map(v)
    }
}

impl From<Vec<MetaValue>> for MetaValue {
    fn from(v: Vec<MetaValue>) -> Self {
        Self::List(v)
    }
}

/// String-keyed metadata mapping. Values may nest further mappings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn get_map(&self, key: &str) -> Option<&Metadata> {
        self.get(key).and_then(MetaValue::as_map)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(MetaValue::as_int)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Orientation as tagged on the image: top level first, then `{TIFF}`.
    pub fn orientation(&self) -> Option<i64> {
        self.get_int(ORIENTATION_KEY)
            .or_else(|| self.get_map(TIFF_KEY).and_then(|t| t.get_int(ORIENTATION_KEY)))
    }

    /// Sets every integer `Orientation` field, at any depth, to `orientation`.
    ///
    /// Nested blocks such as `{TIFF}` carry their own copy of the tag, so the
    /// walk descends into every sub-mapping. Non-integer `Orientation` values
    /// are left alone.
    pub fn rewrite_orientation(&mut self, orientation: i64) {
        for (key, value) in self.0.iter_mut() {
            match value {
                MetaValue::Int(v) if key == ORIENTATION_KEY => *v = orientation,
                MetaValue::Map(child) => child.rewrite_orientation(orientation),
                _ => {}
            }
        }
    }

    /// Flattened view returned to callers.
    ///
    /// Starts from a copy of `{Exif}` and overlays the top-level `Orientation`
    /// and `{GPS}` (as `GPS`). A key absent at the top level is absent from the
    /// projection too. Without an `{Exif}` block the projection is empty.
    pub fn exif_projection(&self) -> Metadata {
        let Some(exif) = self.get_map(EXIF_KEY) else {
            return Metadata::new();
        };
        let mut projected = exif.clone();
        match self.get(ORIENTATION_KEY) {
            Some(v) => {
                projected.insert(ORIENTATION_KEY, v.clone());
            }
            None => {
                projected.remove(ORIENTATION_KEY);
            }
        }
        match self.get(GPS_KEY) {
            Some(v) => {
                projected.insert(PROJECTED_GPS_KEY, v.clone());
            }
            None => {
                projected.remove(PROJECTED_GPS_KEY);
            }
        }
        projected
    }
}

impl<K: Into<String>> FromIterator<(K, MetaValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, MetaValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
