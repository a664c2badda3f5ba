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

//! View-model projection layer over the repository store.
//!
//! Layout: `card.rs` (derived row fields), `viewmodel.rs` (per-row view
//! model with the edit-feedback loop), `toast.rs` (transient failure
//! surface).

pub mod card;
pub mod toast;
pub mod viewmodel;

pub use card::{CardStream, RepoCard};
pub use toast::Toast;
pub use viewmodel::RepositoryViewModel;
