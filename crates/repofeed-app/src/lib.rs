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

//! Repofeed application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (service wiring and the headless list session),
//! `cli.rs` (command-line flags), `logging.rs` (subscriber install).

/// Application bootstrap and the list-session loop.
pub mod bootstrap;
/// Command-line interface definition.
pub mod cli;
/// Application-level errors.
pub mod error;
/// Tracing subscriber installation.
pub mod logging;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
