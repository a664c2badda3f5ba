#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Binary entrypoint that wires the repofeed services together and runs the
//! headless list session.

use repofeed_app::{AppResult, run_app};

/// Bootstraps the repofeed application and blocks until the session ends.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
