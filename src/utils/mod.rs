pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{CameraError, CameraResult, EmbedError, PathError, ValidationError};
pub use validation::{validate_output_dir, validate_settings};
pub use formats::{jpeg_quality, ResultType, JPEG_FORMAT, JPEG_MIME};
pub use fs::TempImageWriter;
