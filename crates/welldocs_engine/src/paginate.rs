use std::collections::VecDeque;
use std::time::Duration;

use scrape_logging::{scrape_error, scrape_info, scrape_warn};
use welldocs_core::{
    update, Advance, DownloadTask, InputRecord, NextControl, PageEffect, PageMsg, PageSnapshot,
    PaginationState, ScanState, StopReason, DEFAULT_MAX_PAGES,
};

use crate::{BrowserError, BrowserSession, Locator, TableExtractor};

/// Bounded retry for the "next" click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub max_pages: usize,
    pub body_timeout: Duration,
    pub table_timeout: Duration,
    /// Shorter wait for any `<table>` once the primary table timed out.
    pub fallback_timeout: Duration,
    /// Pause after a click before waiting for the table again.
    pub settle_delay: Duration,
    pub click_retry: RetryPolicy,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            body_timeout: Duration::from_secs(60),
            table_timeout: Duration::from_secs(60),
            fallback_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(2),
            click_retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub tasks: Vec<DownloadTask>,
    pub rows_seen: usize,
    pub pages_visited: usize,
    pub stop: StopReason,
}

/// Opens a listing and pages through it, collecting one download task per
/// unique content id.
///
/// Errors are navigation failures; every pagination problem ends the scan
/// normally with the rows gathered so far.
pub async fn scan_listing<B>(
    browser: &mut B,
    extractor: &dyn TableExtractor,
    record: &InputRecord,
    settings: &ScanSettings,
) -> Result<ScanOutcome, BrowserError>
where
    B: BrowserSession + ?Sized,
{
    scrape_info!("Navigating to {}", record.source_url);
    browser.navigate(&record.source_url).await?;
    browser
        .wait_for(&Locator::tag("body"), settings.body_timeout)
        .await?;
    scrape_info!("Page body loaded");

    let mut scan = ScanState::new();
    let (mut state, effects) = update(PaginationState::new(settings.max_pages), PageMsg::Start);
    let mut queue: VecDeque<PageEffect> = effects.into();

    let stop = loop {
        let Some(effect) = queue.pop_front() else {
            break state
                .stop_reason()
                .cloned()
                .unwrap_or(StopReason::NoNextControl);
        };

        let msg = match effect {
            PageEffect::Stop(reason) => break reason,
            PageEffect::ExtractPage => {
                extract_page(
                    browser,
                    extractor,
                    &mut scan,
                    &record.external_id,
                    state.page(),
                    settings,
                )
                .await?
            }
            PageEffect::InspectNext => inspect_next(browser, extractor).await,
            PageEffect::Advance => {
                let before = state.previous().cloned().unwrap_or_default();
                PageMsg::AdvanceFinished(
                    advance(browser, extractor, &before, state.page(), settings).await,
                )
            }
        };

        let (next, effects) = update(state, msg);
        state = next;
        queue.extend(effects);
    };

    if stop.is_failure() {
        scrape_error!("{}", stop);
    } else if stop.is_suspicious() {
        scrape_warn!("Stopping pagination: {}", stop);
    } else {
        scrape_info!("Stopping pagination: {}", stop);
    }

    Ok(ScanOutcome {
        rows_seen: scan.rows_seen(),
        pages_visited: state.pages_extracted(),
        tasks: scan.into_tasks(),
        stop,
    })
}

async fn extract_page<B>(
    browser: &mut B,
    extractor: &dyn TableExtractor,
    scan: &mut ScanState,
    external_id: &str,
    page: usize,
    settings: &ScanSettings,
) -> Result<PageMsg, BrowserError>
where
    B: BrowserSession + ?Sized,
{
    scrape_info!("Processing page {}", page);
    match browser
        .wait_for(&extractor.table_locator(), settings.table_timeout)
        .await
    {
        Ok(()) => scrape_info!("Table found"),
        Err(err) if err.is_timeout() => {
            scrape_warn!("Timeout for table, trying alternative selectors");
            match browser
                .wait_for(&Locator::tag("table"), settings.fallback_timeout)
                .await
            {
                Ok(()) => scrape_info!("Found table element (generic selector)"),
                Err(err) if err.is_timeout() => return Ok(PageMsg::TableMissing),
                Err(err) => return Err(err),
            }
        }
        Err(err) => return Err(err),
    }

    let html = browser.page_source().await?;
    let Some(extracted) = extractor.extract(&html, external_id) else {
        return Ok(PageMsg::TableUnparsable);
    };
    if extracted.used_fallback {
        scrape_info!("Using fallback table selector");
    }
    scrape_info!("Found {} rows on page {}", extracted.rows.len(), page);

    let snapshot = scan.absorb_page(&extracted.rows);
    Ok(PageMsg::PageExtracted { snapshot })
}

async fn inspect_next<B>(browser: &mut B, extractor: &dyn TableExtractor) -> PageMsg
where
    B: BrowserSession + ?Sized,
{
    match browser
        .parent_class(extractor.next_control_selector())
        .await
    {
        Ok(class) => PageMsg::NextControl(NextControl::from_parent_class(class.as_deref())),
        Err(BrowserError::Stale(_)) | Err(BrowserError::NotFound(_)) => {
            PageMsg::NextControl(NextControl::Missing)
        }
        Err(err) => {
            scrape_error!("Error inspecting Next button: {}", err);
            PageMsg::AdvanceFinished(Advance::Stopped(StopReason::ClickFailed {
                message: err.to_string(),
            }))
        }
    }
}

/// Clicks "next" and confirms the table changed.
///
/// Transient failures are retried per `settings.click_retry`. A click after
/// which the primary table shows exactly `before` again stops pagination.
pub async fn advance<B>(
    browser: &mut B,
    extractor: &dyn TableExtractor,
    before: &PageSnapshot,
    page: usize,
    settings: &ScanSettings,
) -> Advance
where
    B: BrowserSession + ?Sized,
{
    let policy = settings.click_retry;
    let attempts = policy.max_attempts.max(1);
    scrape_info!("Clicking Next button");

    for attempt in 1..=attempts {
        match click_and_settle(browser, extractor, settings).await {
            Ok(Some(after)) if &after == before => {
                return Advance::Stopped(StopReason::ClickHadNoEffect { page });
            }
            Ok(_) => return Advance::Advanced,
            Err(BrowserError::NotFound(_)) => return Advance::Stopped(StopReason::NoNextControl),
            Err(err) if err.is_transient() => {
                scrape_warn!(
                    "Retry {}/{}: Error clicking Next button: {}",
                    attempt,
                    attempts,
                    err
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(err) => {
                return Advance::Stopped(StopReason::ClickFailed {
                    message: err.to_string(),
                });
            }
        }
    }

    Advance::Stopped(StopReason::ClickRetriesExhausted { attempts })
}

async fn click_and_settle<B>(
    browser: &mut B,
    extractor: &dyn TableExtractor,
    settings: &ScanSettings,
) -> Result<Option<PageSnapshot>, BrowserError>
where
    B: BrowserSession + ?Sized,
{
    browser.click(extractor.next_control_selector()).await?;
    tokio::time::sleep(settings.settle_delay).await;
    browser
        .wait_for(&extractor.table_locator(), settings.table_timeout)
        .await?;
    let html = browser.page_source().await?;
    Ok(extractor.primary_snapshot(&html))
}
