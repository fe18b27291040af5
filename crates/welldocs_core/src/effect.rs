use std::fmt;

/// Work the driver must perform next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    /// Wait for the results table on the current page and extract its rows.
    ExtractPage,
    /// Locate the "next" control and report whether it is usable.
    InspectNext,
    /// Click "next" under the retry policy and report the outcome.
    Advance,
    /// Pagination is over; the accumulated rows are final.
    Stop(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    NoTable { page: usize },
    TableUnparsable { page: usize },
    DuplicatePage { page: usize },
    NoNextControl,
    NextDisabled,
    MaxPagesReached { max_pages: usize },
    ClickHadNoEffect { page: usize },
    ClickRetriesExhausted { attempts: u32 },
    ClickFailed { message: String },
}

impl StopReason {
    /// Stops that leave the well unprocessed rather than exhausted.
    pub fn is_failure(&self) -> bool {
        matches!(self, StopReason::NoTable { .. })
    }

    /// Stops that suggest the pagination UI misbehaved.
    pub fn is_suspicious(&self) -> bool {
        matches!(
            self,
            StopReason::DuplicatePage { .. }
                | StopReason::ClickHadNoEffect { .. }
                | StopReason::ClickRetriesExhausted { .. }
                | StopReason::ClickFailed { .. }
                | StopReason::TableUnparsable { .. }
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NoTable { page } => write!(f, "no table found on page {page}"),
            StopReason::TableUnparsable { page } => {
                write!(f, "no table found in parsed HTML on page {page}")
            }
            StopReason::DuplicatePage { page } => {
                write!(f, "page {page} has same content ids as previous page")
            }
            StopReason::NoNextControl => write!(f, "no more pages to process"),
            StopReason::NextDisabled => write!(f, "next control disabled, no more pages"),
            StopReason::MaxPagesReached { max_pages } => {
                write!(f, "reached maximum page limit ({max_pages})")
            }
            StopReason::ClickHadNoEffect { page } => {
                write!(f, "page {} has same content as page {page}", page + 1)
            }
            StopReason::ClickRetriesExhausted { attempts } => {
                write!(f, "failed to click next after {attempts} attempts")
            }
            StopReason::ClickFailed { message } => write!(f, "error clicking next: {message}"),
        }
    }
}
