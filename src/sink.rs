//! Destinations for finished documents.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::info;
use tempfile::NamedTempFile;

/// Receives a finished artifact and stores it under `filename`.
pub trait ArtifactSink: Send + Sync {
    /// Stores `bytes` and returns the location they were written to.
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes artifacts into a directory.
///
/// The bytes go to a temporary file in the same directory that is renamed into place once fully
/// written, so an interrupted save never leaves a truncated PDF behind.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the target directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.directory)?;
        let target = self.directory.join(filename);

        let mut file = NamedTempFile::new_in(&self.directory)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;
        file.persist(&target).map_err(|err| err.error)?;

        info!("Saved {} ({} bytes)", target.display(), bytes.len());
        Ok(target)
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the saved artifacts in save order.
    pub fn artifacts(&self) -> Vec<(String, Vec<u8>)> {
        self.saved
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ArtifactSink for MemorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.saved
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((filename.to_owned(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}
