use std::path::PathBuf;
use std::sync::Arc;

use scrape_logging::{scrape_error, scrape_info, scrape_warn};
use thiserror::Error;
use url::Url;
use welldocs_core::{FailedRecord, FailureReason, InputRecord, RunSummary, StopReason};

use crate::{
    rename_downloads, scan_listing, ApexTableExtractor, BrowserError, BrowserSession,
    DispatchReport, Dispatcher, DownloadLayout, ExtractError, FetchError, FetchSettings, Fetcher,
    PersistError, RenameReport, ReqwestFetcher, ScanOutcome, ScanSettings, TableExtractor,
    TableLayout,
};

pub const DEFAULT_BASE_ORIGIN: &str = "https://sonlite.dnr.state.la.us";

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub scan: ScanSettings,
    pub fetch: FetchSettings,
    pub table: TableLayout,
    pub download_root: PathBuf,
    /// Origin that relative document links are joined onto.
    pub base_origin: String,
    pub concurrency: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            scan: ScanSettings::default(),
            fetch: FetchSettings::default(),
            table: TableLayout::default(),
            download_root: PathBuf::from("downloaded_pdfs"),
            base_origin: DEFAULT_BASE_ORIGIN.to_string(),
            concurrency: 5,
        }
    }
}

/// Failures that end the whole run rather than a single record.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid base origin {origin:?}: {source}")]
    BaseOrigin {
        origin: String,
        #[source]
        source: url::ParseError,
    },
    #[error("http client: {0}")]
    Fetch(#[from] FetchError),
    #[error("download folders: {0}")]
    Persist(#[from] PersistError),
    #[error("table layout: {0}")]
    Extract(#[from] ExtractError),
    #[error("browser: {0}")]
    Browser(#[from] BrowserError),
}

/// What happened to one input record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordReport {
    pub scan: Option<ScanOutcome>,
    pub dispatch: Option<DispatchReport>,
    pub rename: Option<RenameReport>,
    pub failure: Option<FailureReason>,
}

impl RecordReport {
    pub fn downloads_succeeded(&self) -> usize {
        self.dispatch.as_ref().map_or(0, |report| report.succeeded)
    }
}

/// Run context: one browser session, one HTTP client and the download tree,
/// reused for every input record in turn.
pub struct Pipeline<B: BrowserSession> {
    browser: B,
    extractor: Box<dyn TableExtractor>,
    dispatcher: Dispatcher,
    settings: PipelineSettings,
}

impl<B: BrowserSession> Pipeline<B> {
    pub fn new(browser: B, settings: PipelineSettings) -> Result<Self, PipelineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch.clone())?);
        Self::with_fetcher(browser, fetcher, settings)
    }

    pub fn with_fetcher(
        browser: B,
        fetcher: Arc<dyn Fetcher>,
        settings: PipelineSettings,
    ) -> Result<Self, PipelineError> {
        let base_origin =
            Url::parse(&settings.base_origin).map_err(|source| PipelineError::BaseOrigin {
                origin: settings.base_origin.clone(),
                source,
            })?;
        let extractor = Box::new(ApexTableExtractor::new(settings.table.clone())?);
        let dispatcher = Dispatcher::new(
            fetcher,
            DownloadLayout::new(settings.download_root.clone()),
            base_origin,
            settings.concurrency,
        );
        Ok(Self {
            browser,
            extractor,
            dispatcher,
            settings,
        })
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn layout(&self) -> &DownloadLayout {
        self.dispatcher.layout()
    }

    /// Processes every record in order. Per-record problems land in the
    /// summary; only a broken download root aborts the run.
    pub async fn run(&mut self, records: &[InputRecord]) -> Result<RunSummary, PipelineError> {
        self.layout().bootstrap()?;

        let total = records.len();
        let mut summary = RunSummary::new(total);
        for (index, record) in records.iter().enumerate() {
            scrape_info!(
                "Processing Well API {} ({}/{})",
                record.external_id,
                index + 1,
                total
            );
            let report = self.process_record(record).await;
            summary.downloads_succeeded += report.downloads_succeeded();
            if report.scan.is_some() {
                summary.completed += 1;
            }
            if let Some(reason) = report.failure {
                summary.record_failure(FailedRecord::new(record, reason));
            }
        }
        Ok(summary)
    }

    /// Scans one listing, downloads its documents and renumbers them.
    pub async fn process_record(&mut self, record: &InputRecord) -> RecordReport {
        let scan = match scan_listing(
            &mut self.browser,
            self.extractor.as_ref(),
            record,
            &self.settings.scan,
        )
        .await
        {
            Ok(scan) => scan,
            Err(err) => {
                scrape_error!("Error processing {}: {}", record.source_url, err);
                return RecordReport {
                    failure: Some(FailureReason::Navigation(err.to_string())),
                    ..RecordReport::default()
                };
            }
        };

        let mut failure = match scan.stop {
            StopReason::NoTable { page } => Some(FailureReason::NoTable { page }),
            _ => None,
        };

        scrape_info!(
            "Found {} unique documents to download for Well API {}",
            scan.tasks.len(),
            record.external_id
        );
        let dispatch = self.dispatcher.run(&scan.tasks).await;
        scrape_info!(
            "Successful downloads: {}/{} for Well API {}",
            dispatch.succeeded,
            scan.rows_seen,
            record.external_id
        );

        if !scan.tasks.is_empty() && dispatch.succeeded == 0 && failure.is_none() {
            scrape_warn!("No documents downloaded for Well API {}", record.external_id);
            failure = Some(FailureReason::NoDownloads {
                attempted: scan.tasks.len(),
            });
        }

        let rename = rename_downloads(self.layout(), &dispatch.completed());

        RecordReport {
            scan: Some(scan),
            dispatch: Some(dispatch),
            rename: Some(rename),
            failure,
        }
    }

    pub fn into_browser(self) -> B {
        self.browser
    }
}
