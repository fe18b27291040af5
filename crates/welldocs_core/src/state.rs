use crate::{PageSnapshot, StopReason};

pub const DEFAULT_MAX_PAGES: usize = 25;

/// Pagination progress for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    page: usize,
    max_pages: usize,
    pages_extracted: usize,
    previous: Option<PageSnapshot>,
    stopped: Option<StopReason>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES)
    }
}

impl PaginationState {
    pub fn new(max_pages: usize) -> Self {
        Self {
            page: 1,
            max_pages: max_pages.max(1),
            pages_extracted: 0,
            previous: None,
            stopped: None,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn pages_extracted(&self) -> usize {
        self.pages_extracted
    }

    /// Snapshot of the most recently accepted page.
    pub fn previous(&self) -> Option<&PageSnapshot> {
        self.previous.as_ref()
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stopped.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.is_some()
    }

    pub(crate) fn record_page(&mut self, snapshot: PageSnapshot) {
        self.previous = Some(snapshot);
    }

    pub(crate) fn count_extraction(&mut self) {
        self.pages_extracted += 1;
    }

    pub(crate) fn next_page(&mut self) {
        self.page += 1;
    }

    pub(crate) fn stop(&mut self, reason: StopReason) -> StopReason {
        self.stopped = Some(reason.clone());
        reason
    }
}
