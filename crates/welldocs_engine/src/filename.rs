use std::path::{Path, PathBuf};

use welldocs_core::{DocumentBucket, DownloadTask};

use crate::persist::{ensure_output_dir, PersistError};

const WELL_LOGS_DIR: &str = "well_logs";
const WELL_FILE_HISTORIC_DIR: &str = "well_file_historic";
const OTHER_FILES_DIR: &str = "other_files";

/// Restricts a document type to `[A-Za-z0-9_-]`, replacing anything else with `_`.
pub fn sanitize_document_type(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Name used while downloading: `{external_id}_{document_type}_{content_id}.pdf`.
pub fn pending_filename(external_id: &str, document_type: &str, content_id: &str) -> String {
    format!(
        "{}_{}_{}.pdf",
        path_safe(external_id),
        path_safe(document_type),
        path_safe(content_id)
    )
}

/// Final name after renumbering: `{external_id}_{document_type}_{sequence}.pdf`.
pub fn sequenced_filename(external_id: &str, document_type: &str, sequence: u32) -> String {
    format!(
        "{}_{}_{sequence}.pdf",
        path_safe(external_id),
        path_safe(document_type)
    )
}

fn path_safe(input: &str) -> String {
    input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

/// Folder tree under the download root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLayout {
    root: PathBuf,
}

impl DownloadLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the three top-level buckets.
    pub fn bootstrap(&self) -> Result<(), PersistError> {
        for dir in [WELL_LOGS_DIR, WELL_FILE_HISTORIC_DIR, OTHER_FILES_DIR] {
            ensure_output_dir(&self.root.join(dir))?;
        }
        Ok(())
    }

    pub fn folder(&self, bucket: &DocumentBucket) -> PathBuf {
        match bucket {
            DocumentBucket::WellLog => self.root.join(WELL_LOGS_DIR),
            DocumentBucket::WellFileHistoric => self.root.join(WELL_FILE_HISTORIC_DIR),
            DocumentBucket::Other { external_id } => {
                self.root.join(OTHER_FILES_DIR).join(path_safe(external_id))
            }
        }
    }

    pub fn pending_path(&self, task: &DownloadTask) -> PathBuf {
        self.folder(&task.bucket()).join(pending_filename(
            &task.external_id,
            &task.document_type,
            &task.content_id,
        ))
    }

    pub fn sequenced_path(&self, task: &DownloadTask, sequence: u32) -> PathBuf {
        self.folder(&task.bucket()).join(sequenced_filename(
            &task.external_id,
            &task.document_type,
            sequence,
        ))
    }
}
