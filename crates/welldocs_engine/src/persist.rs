use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let mut partial = PartialFile::create(&self.dir)?;
        partial.write_chunk(content.as_bytes())?;
        let target = self.dir.join(filename);
        partial.commit(&target)?;
        Ok(target)
    }
}

/// A file being streamed into place.
///
/// Bytes go to a temp file next to the target; nothing appears at the target
/// path until [`PartialFile::commit`]. Dropping an uncommitted file removes it.
pub struct PartialFile {
    tmp: NamedTempFile,
    written: u64,
}

impl PartialFile {
    pub fn create(dir: &Path) -> Result<Self, PersistError> {
        ensure_output_dir(dir)?;
        let tmp = NamedTempFile::new_in(dir)?;
        Ok(Self { tmp, written: 0 })
    }

    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.tmp.write_all(chunk)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Moves the finished file onto `target`, replacing any existing file.
    pub fn commit(mut self, target: &Path) -> Result<u64, PersistError> {
        self.tmp.flush()?;
        self.tmp.as_file_mut().sync_all()?;
        self.tmp
            .persist(target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(self.written)
    }
}
