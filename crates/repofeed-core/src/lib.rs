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

//! Core repository domain types shared across the repofeed workspace.
//!
//! Layout: `model.rs` (entity types and the fixed wire-field mapping).

pub mod model;

pub use model::{RepoId, RepoOwner, Repository};
