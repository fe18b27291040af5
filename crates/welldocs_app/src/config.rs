use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use welldocs_engine::{
    BrowserSettings, FetchSettings, InputColumns, PipelineSettings, RetryPolicy, ScanSettings,
    TableLayout, DEFAULT_BASE_ORIGIN, DEFAULT_USER_AGENT,
};

use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub link: String,
    pub external_id: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        let columns = InputColumns::default();
        Self {
            link: columns.link,
            external_id: columns.external_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub chrome: Option<PathBuf>,
    pub devtools_url: Option<String>,
    pub headed: bool,
}

/// Run configuration. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub columns: ColumnsConfig,
    pub max_pages: usize,
    pub concurrency: usize,
    pub base_origin: String,
    pub table_wait_secs: u64,
    pub fallback_wait_secs: u64,
    pub settle_delay_secs: u64,
    pub click_retries: u32,
    pub click_retry_delay_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub browser: BrowserConfig,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let scan = ScanSettings::default();
        let fetch = FetchSettings::default();
        Self {
            input: PathBuf::from("well_log_links.csv"),
            output: PathBuf::from("downloaded_pdfs"),
            columns: ColumnsConfig::default(),
            max_pages: scan.max_pages,
            concurrency: 5,
            base_origin: DEFAULT_BASE_ORIGIN.to_string(),
            table_wait_secs: scan.table_timeout.as_secs(),
            fallback_wait_secs: scan.fallback_timeout.as_secs(),
            settle_delay_secs: scan.settle_delay.as_secs(),
            click_retries: scan.click_retry.max_attempts,
            click_retry_delay_secs: scan.click_retry.delay.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            browser: BrowserConfig::default(),
            log_level: "info".to_string(),
            log_file: None,
            report: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file (if any) with command line flags applied on top.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.level_filter()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(input) = &cli.input {
            self.input = input.clone();
        }
        if let Some(output) = &cli.output {
            self.output = output.clone();
        }
        if let Some(max_pages) = cli.max_pages {
            self.max_pages = max_pages;
        }
        if let Some(concurrency) = cli.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(chrome) = &cli.chrome {
            self.browser.chrome = Some(chrome.clone());
        }
        if let Some(url) = &cli.devtools_url {
            self.browser.devtools_url = Some(url.clone());
        }
        if cli.headed {
            self.browser.headed = true;
        }
        if let Some(report) = &cli.report {
            self.report = Some(report.clone());
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = Some(log_file.clone());
        }
        if cli.verbose {
            self.log_level = "debug".to_string();
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn input_columns(&self) -> InputColumns {
        InputColumns {
            link: self.columns.link.clone(),
            external_id: self.columns.external_id.clone(),
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        let scan = ScanSettings {
            max_pages: self.max_pages,
            table_timeout: Duration::from_secs(self.table_wait_secs),
            fallback_timeout: Duration::from_secs(self.fallback_wait_secs),
            settle_delay: Duration::from_secs(self.settle_delay_secs),
            click_retry: RetryPolicy {
                max_attempts: self.click_retries,
                delay: Duration::from_secs(self.click_retry_delay_secs),
            },
            ..ScanSettings::default()
        };
        let fetch = FetchSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
            ..FetchSettings::default()
        };
        PipelineSettings {
            scan,
            fetch,
            table: TableLayout::default(),
            download_root: self.output.clone(),
            base_origin: self.base_origin.clone(),
            concurrency: self.concurrency,
        }
    }

    pub fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            executable: self.browser.chrome.clone(),
            devtools_url: self.browser.devtools_url.clone(),
            headless: !self.browser.headed,
            ..BrowserSettings::default()
        }
    }
}
