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

//! Fetch pipeline for repository pages: transport, decoder, and retry.
//!
//! Layout: `transport.rs` (the `Transport` trait and its reqwest-backed
//! implementation), `decode.rs` (permissive wire decoding), `service.rs`
//! (`RepoService`, the retrying fetch+decode pipeline).

pub mod decode;
pub mod error;
pub mod service;
pub mod transport;

pub use decode::decode_repositories;
pub use error::{DecodeError, FetchError, FetchResult, TransportError, TransportResult};
pub use service::{RepoService, RetryPolicy};
pub use transport::{HttpTransport, Transport};
