use crate::{error::Result, models::SourceImage};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

const ARTIFACT_PREFIX: &str = "medscan-";

/// A byte-for-byte copy of a source image on disk, alive for one analysis.
///
/// The file is removed by [`TempArtifact::release`] or, if that never
/// happens, when the handle is dropped.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    guard: Option<TempPath>,
}

impl TempArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.guard.is_none()
    }

    /// Deletes the file. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(guard) = self.guard.take() {
            match guard.close() {
                Ok(()) => log::debug!("Released temp artifact {}", self.path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("Temp artifact {} already gone", self.path.display())
                }
                Err(e) => log::warn!(
                    "Failed to delete temp artifact {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Debug, Clone)]
pub struct TempArtifactStore {
    dir: PathBuf,
}

impl Default for TempArtifactStore {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl TempArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn materialize(&self, image: &SourceImage) -> Result<TempArtifact> {
        let suffix = format!(".{}", image.format.extension());
        let mut file = tempfile::Builder::new()
            .prefix(ARTIFACT_PREFIX)
            .suffix(&suffix)
            .tempfile_in(&self.dir)?;

        file.write_all(&image.bytes)?;
        file.as_file().sync_all()?;

        let guard = file.into_temp_path();
        let path = guard.to_path_buf();
        log::debug!(
            "Materialized {} byte {} image at {}",
            image.len(),
            image.origin.as_str(),
            path.display()
        );

        Ok(TempArtifact {
            path,
            guard: Some(guard),
        })
    }

    pub fn release(&self, mut artifact: TempArtifact) {
        artifact.release();
    }
}

/// Deletes a file by path; a missing file is not an error.
pub fn release_path(path: impl AsRef<Path>) {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Released {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to delete {}: {}", path.display(), e),
    }
}
