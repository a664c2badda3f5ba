//! Command-line flags for the headless list session.

use clap::Parser;
use url::Url;

/// Paginated, editable repository list over a remote JSON API.
#[derive(Debug, Parser)]
#[command(name = "repofeed", version, about)]
pub struct Cli {
    /// Number of pages to fetch before exiting.
    #[arg(long, default_value_t = 2)]
    pub pages: u32,

    /// Override the listing endpoint.
    #[arg(long, env = "REPOFEED_API_BASE_URL")]
    pub base_url: Option<Url>,

    /// Log filter directive (overrides the configured level).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run an edit round-trip on the first row after loading.
    #[arg(long)]
    pub demo_edit: bool,
}
