//! Test utilities for conversion scenarios

use async_trait::async_trait;
use monorepo_convert::core::{BuildRef, RepoRef};
use monorepo_convert::provider::{ProviderError, ScmProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock provider that serves predefined answers and records every call
#[derive(Clone, Default)]
pub struct MockProvider {
    changed_files: Vec<String>,
    files: Arc<HashMap<String, String>>,
    failing: Option<String>,
    changed_files_calls: Arc<AtomicUsize>,
    fetched: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockProvider {
    pub fn new(changed_files: &[&str]) -> Self {
        Self {
            changed_files: changed_files.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        Arc::make_mut(&mut self.files).insert(path.to_string(), contents.to_string());
        self
    }

    /// Make `changed_files` fail with a command error
    pub fn failing(mut self, stderr: &str) -> Self {
        self.failing = Some(stderr.to_string());
        self
    }

    pub fn changed_files_calls(&self) -> usize {
        self.changed_files_calls.load(Ordering::SeqCst)
    }

    /// `(path, commit)` of every fetch, in call order
    pub fn fetched(&self) -> Vec<(String, String)> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.changed_files_calls() + self.fetched().len()
    }
}

#[async_trait]
impl ScmProvider for MockProvider {
    async fn changed_files(
        &self,
        _repo: &RepoRef,
        _build: &BuildRef,
    ) -> Result<Vec<String>, ProviderError> {
        self.changed_files_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(stderr) = &self.failing {
            return Err(ProviderError::Command {
                command: "git diff".to_string(),
                code: 128,
                stderr: stderr.clone(),
            });
        }
        Ok(self.changed_files.clone())
    }

    async fn fetch_config(
        &self,
        _repo: &RepoRef,
        path: &str,
        commit: &str,
    ) -> Result<String, ProviderError> {
        self.fetched
            .lock()
            .unwrap()
            .push((path.to_string(), commit.to_string()));
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                path: path.to_string(),
            })
    }
}

pub fn request(config: &str) -> monorepo_convert::ConvertRequest {
    monorepo_convert::ConvertRequest::new(
        config,
        RepoRef::new("octocat", "monorepo"),
        BuildRef::new("1f2e3d4c", "9a8b7c6d"),
    )
}

/// `trigger.event` of the pipeline named `name`, if any
pub fn trigger_event(documents: &[monorepo_convert::Document], name: &str) -> Option<serde_yaml::Value> {
    documents
        .iter()
        .filter_map(|d| d.as_pipeline())
        .find(|p| p.name() == Some(name))
        .and_then(|p| p.trigger.attrs.get("event").cloned())
}

pub fn suppression_marker() -> serde_yaml::Value {
    serde_yaml::from_str("exclude: ['*']").unwrap()
}
