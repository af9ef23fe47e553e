//! Command-line arguments.

use clap::Parser;
use handlescan_catalog::TargetCategory;
use handlescan_scanner::TargetFilter;
use std::path::PathBuf;

/// Check where a handle is already registered.
#[derive(Parser, Debug)]
#[command(name = "handlescan", version, about = "Check where a handle is taken across web services")]
pub struct Cli {
    /// Handle to check (2-30 characters: letters, digits, '_' and '-')
    #[arg(required_unless_present = "list_targets")]
    pub handle: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Catalog file or directory, overriding the config
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Only check targets in this category
    #[arg(long)]
    pub category: Option<TargetCategory>,

    /// Only check these targets (repeatable); takes precedence over --category
    #[arg(long = "target", value_name = "NAME")]
    pub targets: Vec<String>,

    /// Maximum probes in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Render `browser` targets in headless Chromium
    #[arg(long)]
    pub browser: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the target catalog and exit
    #[arg(long)]
    pub list_targets: bool,
}

impl Cli {
    /// Target selection from `--target` and `--category`.
    pub fn target_filter(&self) -> TargetFilter {
        if !self.targets.is_empty() {
            TargetFilter::Specific(self.targets.clone())
        } else if let Some(category) = self.category {
            TargetFilter::Category(category)
        } else {
            TargetFilter::All
        }
    }
}
