use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scrape_logging::{scrape_error, scrape_info, scrape_warn};
use welldocs_core::{DownloadTask, RenameSequencer};

use crate::DownloadLayout;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    pub renamed: Vec<(PathBuf, PathBuf)>,
    pub missing: usize,
    pub failed: usize,
}

/// A pending download moved aside under a temporary name.
struct Staged<'a> {
    task: &'a DownloadTask,
    pending: PathBuf,
    staged: PathBuf,
}

/// Renumbers one well's completed downloads per document type, in the order given.
///
/// Every file is first moved to a unique temporary name in its folder, so a
/// sequenced name can never replace a download that is still waiting to be
/// renamed. Files that are not on disk are skipped without using up a number;
/// a failed rename is logged and leaves the content-id name in place.
pub fn rename_downloads(layout: &DownloadLayout, completed: &[DownloadTask]) -> RenameReport {
    let mut report = RenameReport::default();

    let mut staged = Vec::with_capacity(completed.len());
    for task in completed {
        let pending = layout.pending_path(task);
        if !pending.exists() {
            report.missing += 1;
            continue;
        }
        match stage(&pending) {
            Ok(path) => staged.push(Staged {
                task,
                pending,
                staged: path,
            }),
            Err(err) => {
                scrape_error!("Error preparing {} for renaming: {}", pending.display(), err);
                report.failed += 1;
            }
        }
    }

    let mut sequencer = RenameSequencer::new();
    for entry in staged {
        let target = layout.sequenced_path(entry.task, sequencer.peek(&entry.task.document_type));
        match fs::rename(&entry.staged, &target) {
            Ok(()) => {
                sequencer.commit(&entry.task.document_type);
                scrape_info!("Renamed {} to {}", entry.pending.display(), target.display());
                report.renamed.push((entry.pending, target));
            }
            Err(err) => {
                scrape_error!(
                    "Error renaming {} to {}: {}",
                    entry.pending.display(),
                    target.display(),
                    err
                );
                restore(&entry.staged, &entry.pending);
                report.failed += 1;
            }
        }
    }

    report
}

/// Moves `pending` onto a fresh temporary file next to it and returns that path.
fn stage(pending: &Path) -> io::Result<PathBuf> {
    let dir = pending.parent().unwrap_or_else(|| Path::new("."));
    let placeholder = tempfile::Builder::new()
        .prefix(".rename-")
        .suffix(".pdf")
        .tempfile_in(dir)?
        .into_temp_path()
        .keep()
        .map_err(|err| err.error)?;
    if let Err(err) = fs::rename(pending, &placeholder) {
        let _ = fs::remove_file(&placeholder);
        return Err(err);
    }
    Ok(placeholder)
}

fn restore(staged: &Path, pending: &Path) {
    if let Err(err) = fs::rename(staged, pending) {
        scrape_warn!(
            "Could not restore {} from {}: {}",
            pending.display(),
            staged.display(),
            err
        );
    }
}
