//! Source-control providers supplying changed files and sub-project configs

pub mod config;
pub mod git;

use crate::core::{BuildRef, RepoRef};
use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

pub use config::ProviderConfig;
pub use git::GitProvider;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{command} exited with code {code}: {stderr}")]
    Command {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid revision '{0}'")]
    InvalidRevision(String),

    #[error("Invalid provider output: {0}")]
    InvalidOutput(String),

    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Provider '{provider}' cannot list changed files")]
    Unsupported { provider: String },
}

/// Trait for source-control access - allows for different implementations
#[async_trait]
pub trait ScmProvider: Send + Sync {
    /// Files changed between `build.before` and `build.after`.
    ///
    /// Without a prior commit this is the full file listing of `build.after`.
    async fn changed_files(
        &self,
        repo: &RepoRef,
        build: &BuildRef,
    ) -> Result<Vec<String>, ProviderError>;

    /// Raw text of the file at `path` as of `commit`
    async fn fetch_config(
        &self,
        repo: &RepoRef,
        path: &str,
        commit: &str,
    ) -> Result<String, ProviderError>;
}

#[async_trait]
impl<P: ScmProvider + ?Sized> ScmProvider for Box<P> {
    async fn changed_files(
        &self,
        repo: &RepoRef,
        build: &BuildRef,
    ) -> Result<Vec<String>, ProviderError> {
        (**self).changed_files(repo, build).await
    }

    async fn fetch_config(
        &self,
        repo: &RepoRef,
        path: &str,
        commit: &str,
    ) -> Result<String, ProviderError> {
        (**self).fetch_config(repo, path, commit).await
    }
}

/// Upstream named in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Local clone driven through the `git` CLI
    Git,
    /// Changed files and configs supplied up front
    Static,
    GitHub,
    Gogs,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Git => "git",
            ProviderKind::Static => "static",
            ProviderKind::GitHub => "github",
            ProviderKind::Gogs => "gogs",
        }
    }

    /// Whether this build can produce a changed-file list for the upstream
    pub fn lists_changed_files(&self) -> bool {
        matches!(self, ProviderKind::Git | ProviderKind::Static)
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "git" => Ok(ProviderKind::Git),
            "static" => Ok(ProviderKind::Static),
            "github" => Ok(ProviderKind::GitHub),
            "gogs" => Ok(ProviderKind::Gogs),
            other => Err(format!("invalid provider: {}", other)),
        }
    }
}

/// Provider backed by a fixed changed-file list and in-memory files
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    changed_files: Vec<String>,
    files: HashMap<String, String>,
}

impl StaticProvider {
    pub fn new(changed_files: Vec<String>) -> Self {
        Self {
            changed_files,
            files: HashMap::new(),
        }
    }

    /// Make `contents` available at `path`
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

#[async_trait]
impl ScmProvider for StaticProvider {
    async fn changed_files(
        &self,
        _repo: &RepoRef,
        _build: &BuildRef,
    ) -> Result<Vec<String>, ProviderError> {
        Ok(self.changed_files.clone())
    }

    async fn fetch_config(
        &self,
        _repo: &RepoRef,
        path: &str,
        _commit: &str,
    ) -> Result<String, ProviderError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                path: path.to_string(),
            })
    }
}

/// Stand-in for an upstream without a changed-file source
#[derive(Debug, Clone)]
pub struct UnsupportedProvider {
    name: String,
}

impl UnsupportedProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl ScmProvider for UnsupportedProvider {
    async fn changed_files(
        &self,
        _repo: &RepoRef,
        _build: &BuildRef,
    ) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Unsupported {
            provider: self.name.clone(),
        })
    }

    async fn fetch_config(
        &self,
        _repo: &RepoRef,
        _path: &str,
        _commit: &str,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Unsupported {
            provider: self.name.clone(),
        })
    }
}

/// Build the provider named by `config`
pub fn from_config(config: &ProviderConfig) -> Box<dyn ScmProvider> {
    match config.kind {
        ProviderKind::Git => Box::new(GitProvider::new(config.clone())),
        ProviderKind::Static => {
            let mut provider = StaticProvider::new(config.changed_files.clone());
            for (path, contents) in &config.files {
                provider = provider.with_file(path.clone(), contents.clone());
            }
            Box::new(provider)
        }
        kind => Box::new(UnsupportedProvider::new(kind.as_str())),
    }
}
