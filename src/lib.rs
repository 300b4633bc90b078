// Module declarations in dependency order
pub mod utils;
pub mod metadata;
pub mod core;
pub mod processing;
pub mod delivery;
pub mod logging;

// Public exports for plugin shells and hosts
pub use core::{FinalizedPhoto, PhotoFlags, PhotoOptions, ProcessedImage, ProcessingSettings, RawCapture};
pub use delivery::{deliver, deliver_batch, DeliveredPhoto, PhotoData};
pub use metadata::{MetaValue, Metadata};
pub use processing::{normalize, process_batch, BatchItem, BatchProgress, Orientation, Pipeline};
pub use utils::{CameraError, CameraResult, ResultType};
