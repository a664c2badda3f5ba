//! Derived, UI-facing row fields recomputed from every upstream emission.

use repofeed_core::Repository;
use repofeed_store::RepoStream;
use url::Url;

/// Placeholder shown when a repository carries no owner record.
const UNKNOWN_USERNAME: &str = "Unknown";
/// Separator between status labels.
const STATUS_SEPARATOR: &str = " · ";

/// Projection of one repository into display-ready fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCard {
    /// Owner username, or the `"Unknown"` sentinel when absent.
    pub username: String,
    /// Parsed avatar URL; absent when missing or unparseable.
    pub profile_url: Option<Url>,
    /// Repository description, passed through unmodified.
    pub description: Option<String>,
    /// Joined status labels (`"Forked"`, `"Private"`); absent when neither
    /// flag is set, never an empty string.
    pub status: Option<String>,
}

impl RepoCard {
    /// Derive the card fields from a repository snapshot.
    #[must_use]
    pub fn from_repository(repository: &Repository) -> Self {
        Self {
            username: repository
                .owner
                .as_ref()
                .map_or_else(|| UNKNOWN_USERNAME.to_string(), |o| o.username.clone()),
            profile_url: repository
                .owner
                .as_ref()
                .and_then(|o| Url::parse(&o.avatar_url).ok()),
            description: repository.description.clone(),
            status: status_labels(repository),
        }
    }
}

impl From<&Repository> for RepoCard {
    fn from(repository: &Repository) -> Self {
        Self::from_repository(repository)
    }
}

fn status_labels(repository: &Repository) -> Option<String> {
    let mut labels = Vec::with_capacity(2);
    if repository.fork {
        labels.push("Forked");
    }
    if repository.private {
        labels.push("Private");
    }
    if labels.is_empty() {
        None
    } else {
        Some(labels.join(STATUS_SEPARATOR))
    }
}

/// Stream of [`RepoCard`] projections over one entity's update stream.
pub struct CardStream {
    inner: RepoStream,
}

impl CardStream {
    /// Wrap an entity stream.
    #[must_use]
    pub const fn new(inner: RepoStream) -> Self {
        Self { inner }
    }

    /// Receive the next projected card; `None` once the entry is reclaimed.
    pub async fn next(&mut self) -> Option<RepoCard> {
        self.inner.next().await.map(|repo| RepoCard::from(&repo))
    }
}
