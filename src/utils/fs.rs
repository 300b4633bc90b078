use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::fs;
use tracing::debug;
use crate::utils::{CameraError, CameraResult};

/// Writes finalized JPEGs as `photo-<n>.jpg` into a directory.
///
/// The counter only grows; names already on disk are skipped, so a new writer
/// over an old directory never overwrites earlier photos.
#[derive(Debug)]
pub struct TempImageWriter {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl TempImageWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), counter: AtomicUsize::new(0) }
    }

    /// Writer over the system temporary directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` to the next free name and returns its path.
    ///
    /// The data lands in a sibling `.part` file first and is renamed into
    /// place, so readers never see a half-written photo.
    pub async fn save(&self, bytes: &[u8]) -> CameraResult<PathBuf> {
        let path = loop {
            let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
            let candidate = self.dir.join(format!("photo-{n}.jpg"));
            if !fs::try_exists(&candidate).await? {
                break candidate;
            }
        };

        let partial = path.with_extension("jpg.part");
        fs::write(&partial, bytes)
            .await
            .map_err(|e| CameraError::io(format!("Failed to write '{}': {e}", partial.display())))?;
        fs::rename(&partial, &path)
            .await
            .map_err(|e| CameraError::io(format!("Failed to move photo into place: {e}")))?;

        debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successive_saves_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TempImageWriter::new(dir.path());

        let first = writer.save(b"one").await.unwrap();
        let second = writer.save(b"two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.file_name().unwrap(), "photo-1.jpg");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }

    #[tokio::test]
    async fn skips_names_already_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo-1.jpg"), b"old").unwrap();

        let path = TempImageWriter::new(dir.path()).save(b"new").await.unwrap();

        assert_eq!(path.file_name().unwrap(), "photo-2.jpg");
        assert_eq!(std::fs::read(dir.path().join("photo-1.jpg")).unwrap(), b"old");
        assert!(!dir.path().join("photo-2.jpg.part").exists());
    }
}
