use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::core::{FinalizedPhoto, ProcessingSettings, RawCapture};
use crate::utils::{CameraError, CameraResult};

use super::encode::{Compressor, MetadataEmbedder};
use super::pipeline::Pipeline;

/// Progress of a multi-selection, reported after each item completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Outcome for one selected item, at its position in the selection.
#[derive(Debug)]
pub struct BatchItem {
    pub index: usize,
    pub outcome: CameraResult<FinalizedPhoto>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Finalizes every capture of a multi-selection.
///
/// Each capture runs on the blocking pool; the returned vector holds exactly
/// one item per capture, in selection order, once all of them have reported.
/// A failed item is reported in place rather than dropped.
pub async fn process_batch<C, E, P>(
    pipeline: Arc<Pipeline<C, E>>,
    captures: Vec<RawCapture>,
    settings: ProcessingSettings,
    mut progress: P,
) -> Vec<BatchItem>
where
    C: Compressor + 'static,
    E: MetadataEmbedder + 'static,
    P: FnMut(BatchProgress) + Send,
{
    let total = captures.len();
    if total == 0 {
        return Vec::new();
    }
    info!("Processing batch of {} captures", total);

    let settings = Arc::new(settings);
    let mut tasks = JoinSet::new();
    for (index, capture) in captures.into_iter().enumerate() {
        let pipeline = Arc::clone(&pipeline);
        let settings = Arc::clone(&settings);
        tasks.spawn_blocking(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| pipeline.finalize(capture, &settings)))
                .unwrap_or_else(|_| Err(CameraError::task(format!("Processing capture {index} panicked"))));
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<CameraResult<FinalizedPhoto>>> = (0..total).map(|_| None).collect();
    let mut completed = 0;
    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        completed += 1;
        match joined {
            Ok((index, outcome)) => {
                if let Err(e) = &outcome {
                    warn!("Capture {} failed: {}", index, e);
                    failed += 1;
                }
                slots[index] = Some(outcome);
            }
            Err(e) => {
                warn!("Batch task did not complete: {}", e);
                failed += 1;
            }
        }
        progress(BatchProgress { total, completed, failed });
    }

    if failed > 0 {
        warn!("Batch completed with {} failed captures out of {}", failed, total);
    } else {
        debug!("Batch completed: {} captures finalized", total);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| BatchItem {
            index,
            outcome: slot.unwrap_or_else(|| Err(CameraError::task(format!("Capture {index} did not report")))),
        })
        .collect()
}
