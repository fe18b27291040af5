//! Welldocs engine: browser-driven listing scans and the PDF download pipeline.
mod browser;
mod chrome;
mod dispatch;
mod engine;
mod extract;
mod fetch;
mod filename;
mod input;
mod links;
mod paginate;
mod persist;
mod rename;
mod types;

pub use browser::{BrowserError, BrowserSession, Locator};
pub use chrome::{BrowserSettings, ChromeSession};
pub use dispatch::{DispatchReport, Dispatcher, TaskReport};
pub use engine::{Pipeline, PipelineError, PipelineSettings, RecordReport, DEFAULT_BASE_ORIGIN};
pub use extract::{ApexTableExtractor, ExtractError, ExtractedPage, TableExtractor, TableLayout};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use filename::{pending_filename, sanitize_document_type, sequenced_filename, DownloadLayout};
pub use input::{load_input, read_input, InputColumns, InputError};
pub use links::{is_document_link, resolve_link};
pub use paginate::{advance, scan_listing, RetryPolicy, ScanOutcome, ScanSettings};
pub use persist::{ensure_output_dir, AtomicFileWriter, PartialFile, PersistError};
pub use rename::{rename_downloads, RenameReport};
pub use types::{DownloadOutcome, FailureKind, FetchError};
