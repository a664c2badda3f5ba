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

//! Typed application settings with defaults, env overrides, and validation.
//!
//! Layout: `model.rs` (the `AppConfig` model and env loader), `error.rs`
//! (structured validation errors).

pub mod error;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use model::AppConfig;
