use std::path::Path;
use crate::core::ProcessingSettings;
use crate::utils::{CameraResult, ValidationError};

/// Validates caller-supplied processing settings
pub fn validate_settings(settings: &ProcessingSettings) -> CameraResult<()> {
    if !settings.quality.is_finite() || !(0.0..=1.0).contains(&settings.quality) {
        return Err(ValidationError::settings(format!(
            "Invalid quality value: {}. Must be between 0.0 and 1.0",
            settings.quality
        ))
        .into());
    }

    if settings.should_resize && settings.width == 0 && settings.height == 0 {
        tracing::debug!("Resize requested without target dimensions, only correcting orientation");
    }

    Ok(())
}

/// Validates the directory `uri` results are written to
pub fn validate_output_dir(path: &Path) -> CameraResult<()> {
    if !path.exists() {
        return Err(ValidationError::path_not_found(path).into());
    }

    if !path.is_dir() {
        return Err(ValidationError::not_a_directory(path).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{CameraError, PathError};

    #[test]
    fn accepts_defaults() {
        assert!(validate_settings(&ProcessingSettings::default()).is_ok());
    }

    #[test]
    fn rejects_out_of_range_quality() {
        for quality in [1.5, -0.1, f32::NAN] {
            let settings = ProcessingSettings { quality, ..Default::default() };
            let err = validate_settings(&settings).unwrap_err();
            assert!(matches!(err, CameraError::Validation(ValidationError::Settings(_))));
        }
    }

    #[test]
    fn output_dir_must_exist_and_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_dir(dir.path()).is_ok());

        let missing = dir.path().join("missing");
        assert!(matches!(
            validate_output_dir(&missing).unwrap_err(),
            CameraError::Validation(ValidationError::Path(PathError::NotFound(_)))
        ));

        let file = dir.path().join("file.jpg");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            validate_output_dir(&file).unwrap_err(),
            CameraError::Validation(ValidationError::Path(PathError::NotDirectory(_)))
        ));
    }
}
