//! Repository entity types and the wire-field mapping used by the remote API.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned to each repository by the remote source.
pub type RepoId = u64;

/// Owner record nested inside a repository; carries no independent identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    /// Account name shown alongside the repository.
    #[serde(rename = "login")]
    pub username: String,
    /// Absolute URL of the owner's avatar image.
    pub avatar_url: String,
}

impl RepoOwner {
    /// Convenience constructor for an owner record.
    #[must_use]
    pub fn new(username: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            avatar_url: avatar_url.into(),
        }
    }
}

/// One repository record. Identity is `id`; every other field is mutable.
///
/// Deliberately `Serialize`-only: records come off the wire through the
/// permissive page decoder, never a strict derive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Remote-assigned identifier; unique and stable across updates.
    pub id: RepoId,
    /// Owner record when the source supplied one.
    pub owner: Option<RepoOwner>,
    /// Fully qualified repository name.
    #[serde(rename = "full_name")]
    pub name: Option<String>,
    /// Free-form repository description.
    pub description: Option<String>,
    /// Whether the repository is private.
    pub private: bool,
    /// Whether the repository is a fork.
    pub fork: bool,
}

impl Repository {
    /// Construct a minimal repository record with only the required fields.
    #[must_use]
    pub const fn new(id: RepoId, private: bool, fork: bool) -> Self {
        Self {
            id,
            owner: None,
            name: None,
            description: None,
            private,
            fork,
        }
    }

    /// Builder-style helper attaching an owner record.
    #[must_use]
    pub fn with_owner(mut self, owner: RepoOwner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Builder-style helper attaching a repository name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder-style helper attaching a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let repo = Repository::new(42, true, false)
            .with_owner(RepoOwner::new("octocat", "https://example.com/a.png"))
            .with_name("octocat/hello");

        let json = serde_json::to_value(&repo).expect("serialize repository");
        assert_eq!(json["id"], 42);
        assert_eq!(json["full_name"], "octocat/hello");
        assert_eq!(json["private"], true);
        assert_eq!(json["fork"], false);
        assert_eq!(json["owner"]["login"], "octocat");
        assert_eq!(json["owner"]["avatar_url"], "https://example.com/a.png");
    }

    #[test]
    fn builder_helpers_fill_optional_fields() {
        let repo = Repository::new(7, false, true).with_description("demo");
        assert_eq!(repo.description.as_deref(), Some("demo"));
        assert!(repo.owner.is_none());
        assert!(repo.name.is_none());
    }
}
