//! Provider configuration

use crate::metrics::{MetricsSink, NoopMetrics};
use crate::provider::ProviderKind;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for building a provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Which upstream to talk to
    pub kind: ProviderKind,

    /// Path to the git executable.
    ///
    /// If not provided, defaults to "git" (assumes it's on PATH).
    pub git_path: Option<String>,

    /// Working tree or bare clone the git provider runs in
    pub repo_dir: PathBuf,

    /// Timeout for each provider call in seconds
    pub timeout_secs: u64,

    /// Changed files served by the static provider
    pub changed_files: Vec<String>,

    /// `(path, contents)` pairs served by the static provider
    pub files: Vec<(String, String)>,

    /// Telemetry sink
    pub metrics: Arc<dyn MetricsSink>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Git,
            git_path: None,
            repo_dir: PathBuf::from("."),
            timeout_secs: 60,
            changed_files: Vec::new(),
            files: Vec::new(),
            metrics: Arc::new(NoopMetrics),
        }
    }
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_git_path(mut self, git_path: impl Into<String>) -> Self {
        self.git_path = Some(git_path.into());
        self
    }

    pub fn with_repo_dir(mut self, repo_dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = repo_dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_changed_files(mut self, changed_files: Vec<String>) -> Self {
        self.changed_files = changed_files;
        self
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.push((path.into(), contents.into()));
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }
}
