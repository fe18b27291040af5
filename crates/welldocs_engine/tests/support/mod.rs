#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Once;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use welldocs_engine::{BrowserError, BrowserSession, Locator, RetryPolicy, ScanSettings};

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(scrape_logging::initialize_for_tests);
}

/// Scan settings without any real waiting.
pub fn fast_scan(max_pages: usize) -> ScanSettings {
    ScanSettings {
        max_pages,
        settle_delay: Duration::ZERO,
        click_retry: RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
        },
        ..ScanSettings::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextButton {
    Enabled,
    Disabled,
    Absent,
}

pub struct Row {
    pub document_type: String,
    pub content_id: String,
    pub link: Option<String>,
}

/// A row linking to `/pls/doc?dDocname=<content_id>`.
pub fn row(document_type: &str, content_id: &str) -> Row {
    row_with_link(
        document_type,
        content_id,
        Some(&format!("/pls/doc?dDocname={content_id}")),
    )
}

pub fn row_with_link(document_type: &str, content_id: &str, link: Option<&str>) -> Row {
    Row {
        document_type: document_type.to_string(),
        content_id: content_id.to_string(),
        link: link.map(str::to_string),
    }
}

fn render_rows(rows: &[Row]) -> String {
    rows.iter()
        .map(|row| {
            let link = row
                .link
                .as_deref()
                .map(|href| format!(r#"<a href="{href}">View</a>"#))
                .unwrap_or_default();
            format!(
                r#"<tr><td headers="C278166632217359383">{}</td><td headers="docname">{}</td><td headers="docview">{}</td></tr>"#,
                row.document_type, row.content_id, link
            )
        })
        .collect()
}

fn render_next(next: NextButton) -> String {
    let item_class = match next {
        NextButton::Enabled => "a-IRR-pagination-item",
        NextButton::Disabled => "a-IRR-pagination-item is-disabled",
        NextButton::Absent => return r#"<div class="a-IRR-paginationWrap"></div>"#.to_string(),
    };
    format!(
        r#"<div class="a-IRR-paginationWrap"><ul><li class="{item_class}"><button class="a-IRR-button a-IRR-button--pagination" title="Next">Next</button></li></ul></div>"#
    )
}

/// An APEX interactive report page with a header row and the given rows.
pub fn listing_page(rows: &[Row], next: NextButton) -> String {
    format!(
        r#"<html><body><table class="a-IRR-table"><tr><th>Type</th><th>Document</th><th>View</th></tr>{}</table>{}</body></html>"#,
        render_rows(rows),
        render_next(next)
    )
}

/// Same rows in a table without the report class.
pub fn plain_table_page(rows: &[Row], next: NextButton) -> String {
    format!(
        r#"<html><body><table><tr><th>Type</th><th>Document</th><th>View</th></tr>{}</table>{}</body></html>"#,
        render_rows(rows),
        render_next(next)
    )
}

pub fn empty_page() -> String {
    "<html><body><p>Nothing here</p></body></html>".to_string()
}

/// Browser stand-in serving scripted pages per URL.
///
/// Clicking "next" moves to the following scripted page; on the last page a
/// click changes nothing.
#[derive(Debug, Default)]
pub struct FakeBrowser {
    listings: HashMap<String, Vec<String>>,
    broken: HashSet<String>,
    current_url: String,
    current_page: usize,
    stale_clicks: usize,
    click_error: Option<BrowserError>,
    pub navigations: Vec<String>,
    pub clicks: usize,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, url: &str, pages: Vec<String>) -> Self {
        self.listings.insert(url.to_string(), pages);
        self
    }

    /// Navigating to `url` fails with a protocol error.
    pub fn with_broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    /// The next `count` clicks fail as stale elements.
    pub fn with_stale_clicks(mut self, count: usize) -> Self {
        self.stale_clicks = count;
        self
    }

    /// Every click fails with `err`.
    pub fn with_click_error(mut self, err: BrowserError) -> Self {
        self.click_error = Some(err);
        self
    }

    fn html(&self) -> String {
        self.listings
            .get(&self.current_url)
            .and_then(|pages| pages.get(self.current_page))
            .cloned()
            .unwrap_or_else(empty_page)
    }

    fn page_count(&self) -> usize {
        self.listings
            .get(&self.current_url)
            .map_or(0, |pages| pages.len())
    }
}

fn selector(css: &str) -> Result<Selector, BrowserError> {
    Selector::parse(css).map_err(|err| BrowserError::Protocol(format!("{err:?}")))
}

#[async_trait::async_trait]
impl BrowserSession for FakeBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.navigations.push(url.to_string());
        if self.broken.contains(url) {
            return Err(BrowserError::Protocol(format!("net::ERR_CONNECTION_RESET at {url}")));
        }
        self.current_url = url.to_string();
        self.current_page = 0;
        Ok(())
    }

    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        let doc = Html::parse_document(&self.html());
        if doc.select(&selector(&locator.to_css())?).next().is_some() {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                what: locator.to_string(),
                waited: timeout,
            })
        }
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        Ok(self.html())
    }

    async fn parent_class(&mut self, css: &str) -> Result<Option<String>, BrowserError> {
        let doc = Html::parse_document(&self.html());
        let class = doc.select(&selector(css)?).next().map(|element| {
            element
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|parent| parent.value().attr("class"))
                .unwrap_or_default()
                .to_string()
        });
        Ok(class)
    }

    async fn click(&mut self, css: &str) -> Result<(), BrowserError> {
        self.clicks += 1;
        if let Some(err) = &self.click_error {
            return Err(err.clone());
        }
        if self.stale_clicks > 0 {
            self.stale_clicks -= 1;
            return Err(BrowserError::Stale(css.to_string()));
        }
        let doc = Html::parse_document(&self.html());
        if doc.select(&selector(css)?).next().is_none() {
            return Err(BrowserError::NotFound(css.to_string()));
        }
        if self.current_page + 1 < self.page_count() {
            self.current_page += 1;
        }
        Ok(())
    }
}
