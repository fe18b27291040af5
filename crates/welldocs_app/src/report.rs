use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use scrape_logging::{scrape_info, scrape_warn};
use serde::Serialize;
use welldocs_core::RunSummary;
use welldocs_engine::{AtomicFileWriter, PersistError};

#[derive(Debug, Serialize)]
struct FailureEntry<'a> {
    external_id: &'a str,
    source_url: &'a str,
    reason: String,
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    generated_at: String,
    total_records: usize,
    completed: usize,
    downloads_succeeded: usize,
    failures: Vec<FailureEntry<'a>>,
}

impl<'a> RunReport<'a> {
    fn new(summary: &'a RunSummary) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            total_records: summary.total_records,
            completed: summary.completed,
            downloads_succeeded: summary.downloads_succeeded,
            failures: summary
                .failures
                .iter()
                .map(|failure| FailureEntry {
                    external_id: &failure.external_id,
                    source_url: &failure.source_url,
                    reason: failure.reason.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report path {0:?} has no file name")]
    NoFileName(PathBuf),
    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub fn log_summary(summary: &RunSummary) {
    scrape_info!(
        "Processed {}/{} records, {} documents downloaded",
        summary.completed,
        summary.total_records,
        summary.downloads_succeeded
    );
    if !summary.has_failures() {
        scrape_info!("No URLs failed or had no files.");
        return;
    }
    scrape_warn!("URLs that failed or had no files:");
    for failure in &summary.failures {
        scrape_warn!(
            "Well API: {}, URL: {}, Reason: {}",
            failure.external_id,
            failure.source_url,
            failure.reason
        );
    }
}

pub fn write_report(summary: &RunSummary, path: &Path) -> Result<PathBuf, ReportError> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ReportError::NoFileName(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let content = serde_json::to_string_pretty(&RunReport::new(summary))?;
    Ok(AtomicFileWriter::new(dir).write(filename, &content)?)
}
