//! Git CLI provider - answers provider calls from a local clone

use crate::core::{BuildRef, RepoRef};
use crate::metrics::{MetricsSink, ProviderOp};
use crate::provider::{ProviderConfig, ProviderError, ScmProvider};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Provider that runs `git` as a subprocess inside a local clone
#[derive(Debug, Clone)]
pub struct GitProvider {
    /// Path to git executable
    git_path: String,

    /// Directory the commands run in
    repo_dir: PathBuf,

    /// Timeout for each command in seconds
    timeout_secs: u64,

    metrics: Arc<dyn MetricsSink>,
}

impl GitProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            git_path: config.git_path.unwrap_or_else(|| "git".to_string()),
            repo_dir: config.repo_dir,
            timeout_secs: config.timeout_secs,
            metrics: config.metrics,
        }
    }

    /// Get the git executable path
    #[cfg(test)]
    pub fn git_path(&self) -> &str {
        &self.git_path
    }

    /// Run git with `args` in the repository directory and return stdout.
    ///
    /// # Errors
    /// Returns `ProviderError` if:
    /// - The git executable cannot be spawned
    /// - git exits with a non-zero status
    /// - The output is not valid UTF-8
    /// - The command times out
    async fn run(&self, args: &[&str]) -> Result<String, ProviderError> {
        debug!("Running git {}", args.join(" "));

        let timeout_duration = Duration::from_secs(self.timeout_secs);

        let result = timeout(
            timeout_duration,
            Command::new(&self.git_path)
                .current_dir(&self.repo_dir)
                .args(["-c", "core.quotePath=false"])
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ProviderError::Timeout(self.timeout_secs))?;

        let output = result.map_err(|source| ProviderError::Spawn {
            program: self.git_path.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            warn!("git {} exited with code {}: {}", args.join(" "), code, stderr);
            return Err(ProviderError::Command {
                command: format!("git {}", args.join(" ")),
                code,
                stderr,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| {
            ProviderError::InvalidOutput(format!("git output is not valid UTF-8: {}", e))
        })?;

        debug!("git returned {} bytes of output", stdout.len());

        Ok(stdout)
    }

    async fn list_changes(&self, build: &BuildRef) -> Result<Vec<String>, ProviderError> {
        check_revision(&build.after)?;
        let stdout = if build.has_prior_commit() {
            check_revision(&build.before)?;
            self.run(&[
                "diff",
                "--name-only",
                "--no-renames",
                &build.before,
                &build.after,
            ])
            .await?
        } else {
            self.run(&["ls-tree", "-r", "--name-only", &build.after]).await?
        };

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Revisions reach git as positional arguments; a leading `-` would be read
/// as an option.
fn check_revision(revision: &str) -> Result<(), ProviderError> {
    if revision.is_empty() || revision.starts_with('-') {
        return Err(ProviderError::InvalidRevision(revision.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ScmProvider for GitProvider {
    async fn changed_files(
        &self,
        repo: &RepoRef,
        build: &BuildRef,
    ) -> Result<Vec<String>, ProviderError> {
        debug!(
            repo = %repo,
            before = %build.before,
            after = %build.after,
            "Listing changed files"
        );
        let result = self.list_changes(build).await;
        self.metrics
            .record_call(ProviderOp::ChangedFiles, result.is_ok());
        result
    }

    async fn fetch_config(
        &self,
        repo: &RepoRef,
        path: &str,
        commit: &str,
    ) -> Result<String, ProviderError> {
        debug!(repo = %repo, path, commit, "Fetching config file");
        let object = format!("{}:{}", commit, path);
        let result = match check_revision(commit) {
            Ok(()) => self.run(&["show", &object]).await,
            Err(e) => Err(e),
        };
        let result = result.map_err(|e| match e {
            ProviderError::Command { stderr, .. }
                if stderr.contains("does not exist") || stderr.contains("exists on disk, but not in") =>
            {
                ProviderError::NotFound {
                    path: path.to_string(),
                }
            }
            other => other,
        });
        self.metrics
            .record_call(ProviderOp::FetchConfig, result.is_ok());
        result
    }
}
