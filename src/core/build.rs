//! Repository and build identity supplied with each conversion request

use serde::{Deserialize, Serialize};
use std::fmt;

/// Commit id the upstream sends when a push has no parent (new branch or tag)
pub const EMPTY_COMMIT: &str = "0000000000000000000000000000000000000000";

/// Repository the configuration belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub namespace: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parse `namespace/name`
    pub fn from_slug(slug: &str) -> Option<Self> {
        let (namespace, name) = slug.split_once('/')?;
        if namespace.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(namespace, name))
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Commit range under test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRef {
    /// Commit before the push; empty or [`EMPTY_COMMIT`] when there is none
    #[serde(default)]
    pub before: String,

    /// Commit under test
    pub after: String,
}

impl BuildRef {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// False when the changed-file list must be the full listing of `after`
    pub fn has_prior_commit(&self) -> bool {
        !self.before.is_empty() && self.before != EMPTY_COMMIT
    }
}
