use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::utils::{CameraError, ValidationError};

/// MIME type of every finalized photo.
pub const JPEG_MIME: &str = "image/jpeg";
/// `format` value reported alongside every delivered photo.
pub const JPEG_FORMAT: &str = "jpeg";

/// How the caller wants the encoded bytes handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    /// Raw base64 string
    #[default]
    #[serde(rename = "base64")]
    Base64,
    /// Path to a temporary file holding the JPEG
    #[serde(rename = "uri")]
    Uri,
    /// Inline `data:` URI
    #[serde(rename = "dataUrl")]
    DataUrl,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Uri => "uri",
            Self::DataUrl => "dataUrl",
        }
    }

    /// Batch selections are always written to disk, whatever was requested.
    pub fn for_batch(self) -> Self {
        Self::Uri
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base64" => Ok(Self::Base64),
            "uri" => Ok(Self::Uri),
            "dataUrl" => Ok(Self::DataUrl),
            other => Err(ValidationError::settings(format!("Unsupported result type: {other}")).into()),
        }
    }
}

/// Maps a 0.0–1.0 compression quality onto the encoder's 1–100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 100;
    }
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}
