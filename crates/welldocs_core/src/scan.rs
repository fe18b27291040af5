use std::collections::HashSet;

use crate::{DownloadTask, PageSnapshot, RowRecord};

/// Rows accumulated while paging through one well's listing.
///
/// Keeps the first occurrence of every content id; later pages that repeat
/// an id contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    seen: HashSet<String>,
    tasks: Vec<DownloadTask>,
    rows_seen: usize,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs one page of rows and returns that page's snapshot.
    pub fn absorb_page(&mut self, rows: &[RowRecord]) -> PageSnapshot {
        self.rows_seen += rows.len();
        let mut snapshot = PageSnapshot::new();
        for row in rows {
            if !row.has_known_content_id() {
                continue;
            }
            snapshot.insert(row.content_id.clone());
            let Some(task) = DownloadTask::from_row(row) else {
                continue;
            };
            if self.seen.insert(task.content_id.clone()) {
                self.tasks.push(task);
            }
        }
        snapshot
    }

    /// Number of table rows seen, including rows without links and duplicates.
    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    pub fn tasks(&self) -> &[DownloadTask] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<DownloadTask> {
        self.tasks
    }
}
