//! Welldocs core: pure records, scan accumulation and the pagination state machine.
mod effect;
mod msg;
mod record;
mod rename;
mod scan;
mod state;
mod summary;
mod update;

pub use effect::{PageEffect, StopReason};
pub use msg::{Advance, NextControl, PageMsg};
pub use record::{DocumentBucket, DownloadTask, InputRecord, PageSnapshot, RowRecord, UNKNOWN};
pub use rename::RenameSequencer;
pub use scan::ScanState;
pub use state::{PaginationState, DEFAULT_MAX_PAGES};
pub use summary::{FailedRecord, FailureReason, RunSummary};
pub use update::update;
