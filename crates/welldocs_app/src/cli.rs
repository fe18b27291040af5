use std::path::PathBuf;

use clap::Parser;

/// Downloads well documents listed in a CSV of listing links.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "welldocs", version, about)]
pub struct Cli {
    /// RON configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// CSV with the listing links
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Root of the download tree
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pages scanned per listing
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Parallel downloads per listing
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Chromium executable to launch
    #[arg(long)]
    pub chrome: Option<PathBuf>,

    /// Attach to a running browser instead of launching one
    #[arg(long)]
    pub devtools_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Write the run summary as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Also log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
