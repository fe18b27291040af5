use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures_util::StreamExt;
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};
use tokio::task::JoinHandle;

use crate::{BrowserError, BrowserSession, Locator};

const LAUNCH_ARGS: &[&str] = &[
    "--disable-gpu",
    "--disable-extensions",
    "--disable-background-networking",
    "--disable-sync",
];

const PARENT_CLASS_FN: &str =
    "function() { return this.parentElement ? (this.parentElement.className || '') : null; }";

#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Chromium binary; `None` lets chromiumoxide locate one.
    pub executable: Option<PathBuf>,
    /// Attach to an already running browser instead of launching one.
    pub devtools_url: Option<String>,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub poll_interval: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            devtools_url: None,
            headless: true,
            window_size: (1920, 1080),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Chromium session over the DevTools protocol, holding a single tab.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    poll_interval: Duration,
}

impl ChromeSession {
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, BrowserError> {
        let (browser, mut handler) = match settings.devtools_url.as_deref() {
            Some(url) => {
                scrape_info!("Attaching to browser at {}", url);
                Browser::connect(url)
                    .await
                    .map_err(|err| BrowserError::Launch(err.to_string()))?
            }
            None => {
                scrape_info!("Launching browser");
                Browser::launch(build_config(settings)?)
                    .await
                    .map_err(|err| BrowserError::Launch(err.to_string()))?
            }
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    scrape_debug!("Browser event loop ended: {}", err);
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| BrowserError::Launch(err.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler,
            poll_interval: settings.poll_interval,
        })
    }

    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            scrape_warn!("Error closing browser: {}", err);
        }
        if let Err(err) = self.browser.wait().await {
            scrape_debug!("Browser process wait failed: {}", err);
        }
        self.handler.abort();
        scrape_info!("Browser closed");
    }
}

fn build_config(settings: &BrowserSettings) -> Result<BrowserConfig, BrowserError> {
    let (width, height) = settings.window_size;
    let mut builder = BrowserConfig::builder()
        .window_size(width, height)
        .no_sandbox()
        .args(LAUNCH_ARGS.iter().copied());
    if !settings.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &settings.executable {
        builder = builder.chrome_executable(path);
    }
    builder.build().map_err(BrowserError::Launch)
}

fn map_cdp_error(err: CdpError) -> BrowserError {
    match err {
        CdpError::Timeout => BrowserError::Timeout {
            what: "browser response".to_string(),
            waited: Duration::ZERO,
        },
        other => BrowserError::Protocol(other.to_string()),
    }
}

#[async_trait::async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.page.goto(url).await.map_err(map_cdp_error)?;
        Ok(())
    }

    async fn wait_for(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let css = locator.to_css();
        let page = &self.page;
        let interval = self.poll_interval;
        let poll = async {
            loop {
                if page.find_element(css.as_str()).await.is_ok() {
                    return;
                }
                tokio::time::sleep(interval).await;
            }
        };
        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| BrowserError::Timeout {
                what: locator.to_string(),
                waited: timeout,
            })
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        self.page.content().await.map_err(map_cdp_error)
    }

    async fn parent_class(&mut self, selector: &str) -> Result<Option<String>, BrowserError> {
        let Ok(element) = self.page.find_element(selector).await else {
            return Ok(None);
        };
        let returned = element
            .call_js_fn(PARENT_CLASS_FN, false)
            .await
            .map_err(map_node_error)?;
        let class = returned
            .result
            .value
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Some(class))
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::NotFound(selector.to_string()))?;
        element.click().await.map_err(|err| match err {
            CdpError::Timeout => BrowserError::Timeout {
                what: format!("click on {selector}"),
                waited: Duration::ZERO,
            },
            other => map_node_error(other),
        })?;
        Ok(())
    }
}

/// A node that left the document after it was looked up is stale; anything
/// else the browser reports is a protocol error.
fn map_node_error(err: CdpError) -> BrowserError {
    let message = err.to_string();
    if is_detached_node(&message) {
        BrowserError::Stale(message)
    } else {
        BrowserError::Protocol(message)
    }
}

fn is_detached_node(message: &str) -> bool {
    const MARKERS: &[&str] = &[
        "node with given id",
        "does not belong to the document",
        "detached",
        "cannot find context with specified id",
    ];
    let message = message.to_ascii_lowercase();
    MARKERS.iter().any(|marker| message.contains(marker))
}
