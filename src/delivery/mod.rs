//! Framing finalized photos for the caller.
//!
//! A [`FinalizedPhoto`] carries raw JPEG bytes. Callers ask for them as a
//! base64 string, an inline data URL, or a path to a file on disk; batch
//! selections always get files.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::debug;

use crate::core::{FinalizedPhoto, ProcessingSettings};
use crate::metadata::Metadata;
use crate::processing::{BatchItem, BatchProgress};
use crate::utils::{validate_output_dir, CameraResult, ResultType, TempImageWriter, JPEG_FORMAT, JPEG_MIME};

/// Encoded bytes in the shape the caller requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum PhotoData {
    Base64 { base64_string: String },
    DataUrl { data_url: String },
    File { path: String },
}

/// One photo as handed back to web code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredPhoto {
    #[serde(flatten)]
    pub data: PhotoData,
    pub exif: Metadata,
    pub format: &'static str,
    /// Whether the photo qualifies for a copy into the system gallery
    pub saved: bool,
    pub width: u32,
    pub height: u32,
}

impl DeliveredPhoto {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Frames `photo` as `result_type`, writing a file through `writer` for `uri`.
pub async fn deliver(
    photo: FinalizedPhoto,
    settings: &ProcessingSettings,
    result_type: ResultType,
    writer: &TempImageWriter,
) -> CameraResult<DeliveredPhoto> {
    let data = match result_type {
        ResultType::Base64 => PhotoData::Base64 { base64_string: STANDARD.encode(&photo.bytes) },
        ResultType::DataUrl => PhotoData::DataUrl {
            data_url: format!("data:{};base64,{}", JPEG_MIME, STANDARD.encode(&photo.bytes)),
        },
        ResultType::Uri => {
            validate_output_dir(writer.dir())?;
            let path = writer.save(&photo.bytes).await?;
            PhotoData::File { path: path.to_string_lossy().into_owned() }
        }
    };

    debug!("Delivered {}x{} photo as {}", photo.width, photo.height, result_type);

    Ok(DeliveredPhoto {
        data,
        saved: settings.should_save_to_gallery(photo.flags),
        exif: photo.exif,
        format: JPEG_FORMAT,
        width: photo.width,
        height: photo.height,
    })
}

/// Delivers every item of a batch as a file, keeping failures in place.
pub async fn deliver_batch(
    items: Vec<BatchItem>,
    settings: &ProcessingSettings,
    writer: &TempImageWriter,
) -> Vec<CameraResult<DeliveredPhoto>> {
    let result_type = settings.result_type.for_batch();
    let mut delivered = Vec::with_capacity(items.len());
    for item in items {
        let outcome = match item.outcome {
            Ok(photo) => deliver(photo, settings, result_type, writer).await,
            Err(e) => Err(e),
        };
        delivered.push(outcome);
    }
    delivered
}

/// Event payload for batch progress listeners.
pub fn progress_payload(progress: BatchProgress) -> serde_json::Value {
    let percentage = if progress.total == 0 { 100 } else { progress.completed * 100 / progress.total };
    serde_json::json!({
        "completedTasks": progress.completed,
        "failedTasks": progress.failed,
        "totalTasks": progress.total,
        "progressPercentage": percentage,
        "status": if progress.completed == progress.total { "complete" } else { "processing" },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PhotoFlags;
    use crate::metadata::MetaValue;
    use crate::utils::CameraError;

    fn photo(flags: PhotoFlags) -> FinalizedPhoto {
        let exif: Metadata = [("Orientation", MetaValue::Int(1))].into_iter().collect();
        FinalizedPhoto {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
            exif,
            flags,
            width: 2,
            height: 1,
            metadata_embedded: false,
        }
    }

    #[tokio::test]
    async fn base64_and_data_url_share_the_encoding() {
        let writer = TempImageWriter::in_temp_dir();
        let settings = ProcessingSettings::default();

        let b64 = deliver(photo(PhotoFlags::CAMERA), &settings, ResultType::Base64, &writer).await.unwrap();
        let url = deliver(photo(PhotoFlags::CAMERA), &settings, ResultType::DataUrl, &writer).await.unwrap();

        assert_eq!(b64.data, PhotoData::Base64 { base64_string: "/9j/2Q==".into() });
        assert_eq!(url.data, PhotoData::DataUrl { data_url: "data:image/jpeg;base64,/9j/2Q==".into() });
        assert_eq!(b64.format, "jpeg");
    }

    #[tokio::test]
    async fn uri_writes_the_bytes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TempImageWriter::new(dir.path());

        let delivered = deliver(photo(PhotoFlags::CAMERA), &ProcessingSettings::default(), ResultType::Uri, &writer)
            .await
            .unwrap();

        let PhotoData::File { path } = &delivered.data else { panic!("expected a file result") };
        assert_eq!(std::fs::read(path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[tokio::test]
    async fn uri_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TempImageWriter::new(dir.path().join("gone"));

        let err = deliver(photo(PhotoFlags::CAMERA), &ProcessingSettings::default(), ResultType::Uri, &writer)
            .await
            .unwrap_err();
        assert!(matches!(err, CameraError::Validation(_)));
    }

    #[tokio::test]
    async fn json_uses_caller_field_names() {
        let settings = ProcessingSettings { save_to_gallery: true, ..Default::default() };
        let delivered =
            deliver(photo(PhotoFlags::CAMERA), &settings, ResultType::Base64, &TempImageWriter::in_temp_dir())
                .await
                .unwrap();

        let json = delivered.to_json();
        assert_eq!(json["base64String"], "/9j/2Q==");
        assert_eq!(json["exif"]["Orientation"], 1);
        assert_eq!(json["saved"], true);
    }

    #[tokio::test]
    async fn batch_always_uses_files_and_keeps_failures() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TempImageWriter::new(dir.path());
        let settings = ProcessingSettings { result_type: ResultType::DataUrl, ..Default::default() };
        let items = vec![
            BatchItem { index: 0, outcome: Ok(photo(PhotoFlags::GALLERY)) },
            BatchItem { index: 1, outcome: Err(CameraError::encode("boom")) },
        ];

        let delivered = deliver_batch(items, &settings, &writer).await;

        assert_eq!(delivered.len(), 2);
        let first = delivered[0].as_ref().unwrap();
        assert!(matches!(first.data, PhotoData::File { .. }));
        assert!(!first.saved);
        assert!(delivered[1].as_ref().unwrap_err().is_encode());
    }

    #[test]
    fn progress_payload_reports_completion() {
        let payload = progress_payload(BatchProgress { total: 4, completed: 2, failed: 1 });
        assert_eq!(payload["progressPercentage"], 50);
        assert_eq!(payload["status"], "processing");

        let done = progress_payload(BatchProgress { total: 4, completed: 4, failed: 1 });
        assert_eq!(done["status"], "complete");
    }
}
