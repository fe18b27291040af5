use std::fmt;

use crate::InputRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No results table rendered on the given page.
    NoTable { page: usize },
    /// Navigation or extraction failed outright.
    Navigation(String),
    /// Every download attempted for the well failed.
    NoDownloads { attempted: usize },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoTable { page } => write!(f, "No table found on page {page}"),
            FailureReason::Navigation(message) => {
                write!(f, "Error during processing: {message}")
            }
            FailureReason::NoDownloads { attempted } => {
                write!(f, "None of {attempted} documents could be downloaded")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRecord {
    pub external_id: String,
    pub source_url: String,
    pub reason: FailureReason,
}

impl FailedRecord {
    pub fn new(record: &InputRecord, reason: FailureReason) -> Self {
        Self {
            external_id: record.external_id.clone(),
            source_url: record.source_url.clone(),
            reason,
        }
    }
}

/// End-of-run tally across all input records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total_records: usize,
    pub completed: usize,
    pub downloads_succeeded: usize,
    pub failures: Vec<FailedRecord>,
}

impl RunSummary {
    pub fn new(total_records: usize) -> Self {
        Self {
            total_records,
            ..Self::default()
        }
    }

    pub fn record_failure(&mut self, failure: FailedRecord) {
        self.failures.push(failure);
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
