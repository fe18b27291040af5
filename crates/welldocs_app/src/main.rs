mod cli;
mod config;
mod logging;
mod report;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use scrape_logging::{scrape_error, scrape_info};
use welldocs_core::RunSummary;
use welldocs_engine::{load_input, ChromeSession, Pipeline};

use crate::cli::Cli;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AppConfig::resolve(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let level = config.level_filter().unwrap_or(log::LevelFilter::Info);
    logging::initialize(level, config.log_file.as_deref());

    match run(&config).await {
        Ok(summary) => {
            report::log_summary(&summary);
            if let Some(path) = &config.report {
                match report::write_report(&summary, path) {
                    Ok(written) => scrape_info!("Wrote run report to {}", written.display()),
                    Err(err) => scrape_error!("Could not write run report: {}", err),
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            scrape_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig) -> anyhow::Result<RunSummary> {
    let records = load_input(&config.input, &config.input_columns())
        .with_context(|| format!("loading {}", config.input.display()))?;
    scrape_info!(
        "Loaded {} records from {}",
        records.len(),
        config.input.display()
    );

    let browser = ChromeSession::launch(&config.browser_settings())
        .await
        .context("starting the browser")?;
    let mut pipeline = Pipeline::new(browser, config.pipeline_settings())?;

    let result = pipeline.run(&records).await;
    pipeline.into_browser().close().await;
    Ok(result?)
}
