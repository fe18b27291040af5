use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::join_all;
use scrape_logging::{progress_tag, scrape_debug, scrape_error, scrape_info};
use tokio::sync::Semaphore;
use url::Url;
use welldocs_core::DownloadTask;

use crate::links::resolve_link;
use crate::{DownloadLayout, DownloadOutcome, FailureKind, FetchError, Fetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub task: DownloadTask,
    pub path: PathBuf,
    pub result: Result<DownloadOutcome, FetchError>,
}

impl TaskReport {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-task results in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub reports: Vec<TaskReport>,
    pub succeeded: usize,
    pub failures: Vec<(String, FetchError)>,
}

impl DispatchReport {
    /// Tasks whose file is on disk, in encounter order.
    pub fn completed(&self) -> Vec<DownloadTask> {
        self.reports
            .iter()
            .filter(|report| report.succeeded())
            .map(|report| report.task.clone())
            .collect()
    }
}

/// Counters shared by the workers of one dispatch.
#[derive(Debug, Default)]
struct Tally {
    succeeded: usize,
    failures: Vec<(String, FetchError)>,
}

/// Downloads a well's documents with at most `concurrency` transfers in flight.
#[derive(Clone)]
pub struct Dispatcher {
    fetcher: Arc<dyn Fetcher>,
    layout: DownloadLayout,
    base_origin: Url,
    concurrency: usize,
}

impl Dispatcher {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        layout: DownloadLayout,
        base_origin: Url,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            layout,
            base_origin,
            concurrency: concurrency.max(1),
        }
    }

    pub fn layout(&self) -> &DownloadLayout {
        &self.layout
    }

    /// Runs every task and waits for all of them. A failed task never
    /// affects its siblings.
    ///
    /// Only the content-id name counts as already downloaded. Once a previous
    /// run has renumbered its files, a re-run fetches every document again.
    pub async fn run(&self, tasks: &[DownloadTask]) -> DispatchReport {
        let total = tasks.len();
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let tally = Arc::new(Mutex::new(Tally::default()));

        let handles = tasks.iter().cloned().enumerate().map(|(index, task)| {
            let permits = permits.clone();
            let tally = tally.clone();
            let fetcher = self.fetcher.clone();
            let base_origin = self.base_origin.clone();
            let path = self.layout.pending_path(&task);
            tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let tag = progress_tag(index + 1, total);
                let result = download_one(fetcher.as_ref(), &base_origin, &task, &path, &tag).await;

                let mut guard = tally.lock().unwrap_or_else(PoisonError::into_inner);
                match &result {
                    Ok(_) => guard.succeeded += 1,
                    Err(err) => {
                        scrape_error!("{} Error downloading {}: {}", tag, task.link, err);
                        guard.failures.push((task.content_id.clone(), err.clone()));
                    }
                }
                drop(guard);

                TaskReport { task, path, result }
            })
        });
        let joined = join_all(handles.collect::<Vec<_>>()).await;

        let mut reports = Vec::with_capacity(total);
        let mut aborted = Vec::new();
        for (task, outcome) in tasks.iter().zip(joined) {
            match outcome {
                Ok(report) => reports.push(report),
                Err(join_err) => {
                    let err = FetchError::new(FailureKind::TaskAborted, join_err.to_string());
                    scrape_error!("Download of {} aborted: {}", task.content_id, join_err);
                    aborted.push((task.content_id.clone(), err.clone()));
                    reports.push(TaskReport {
                        task: task.clone(),
                        path: self.layout.pending_path(task),
                        result: Err(err),
                    });
                }
            }
        }

        let tally = std::mem::take(&mut *tally.lock().unwrap_or_else(PoisonError::into_inner));
        let mut failures = tally.failures;
        failures.extend(aborted);
        DispatchReport {
            reports,
            succeeded: tally.succeeded,
            failures,
        }
    }
}

async fn download_one(
    fetcher: &dyn Fetcher,
    base_origin: &Url,
    task: &DownloadTask,
    path: &Path,
    tag: &str,
) -> Result<DownloadOutcome, FetchError> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folder = path.parent().unwrap_or_else(|| Path::new("."));

    if path.exists() {
        scrape_info!("{} File {} already exists, skipping...", tag, filename);
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    let url = resolve_link(base_origin, &task.link)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if url.as_str() != task.link {
        scrape_debug!("{} Resolved relative URL to: {}", tag, url);
    }

    let bytes = fetcher.download(url.as_str(), path).await?;
    scrape_info!("{} Downloaded {} to {}", tag, filename, folder.display());
    Ok(DownloadOutcome::Downloaded { bytes })
}
