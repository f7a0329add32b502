//! Conversion engine - orchestrates one configuration rewrite

pub mod error;
pub mod filter;
pub mod monorepo;

pub use error::ConvertError;
pub use filter::{Decision, FilterReport, GateDecision};
pub use monorepo::Expansion;

use crate::core::{decode, encode, BuildRef, RepoRef};
use crate::provider::ScmProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, Instrument};
use uuid::Uuid;

/// A configuration to rewrite, plus the build it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    /// Raw multi-document configuration text
    pub config: String,
    pub repo: RepoRef,
    pub build: BuildRef,
}

impl ConvertRequest {
    pub fn new(config: impl Into<String>, repo: RepoRef, build: BuildRef) -> Self {
        Self {
            config: config.into(),
            repo,
            build,
        }
    }
}

/// Whether the configuration was rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// No path conditions; the input is returned untouched
    Unchanged,
    /// Expanded and filtered
    Converted,
}

/// Summary of a conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub conversion_id: Uuid,
    pub repo: String,
    pub build: BuildRef,
    pub outcome: Outcome,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// Number of changed files the provider reported
    pub changed_files: usize,

    /// Sub-project configs pulled in
    pub projects: Vec<String>,

    pub filter: FilterReport,
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Configuration to hand back; byte-identical to the input when unchanged
    pub config: String,
    pub report: ConversionReport,
}

impl Conversion {
    pub fn is_unchanged(&self) -> bool {
        self.report.outcome == Outcome::Unchanged
    }
}

/// Rewrites configurations using a provider for changed files and
/// sub-project configs
pub struct Converter<P> {
    provider: P,
}

impl<P: ScmProvider> Converter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Convert one configuration.
    ///
    /// Without path conditions the provider is never called and the input
    /// comes back unchanged. Otherwise the changed-file list is fetched, the
    /// monorepo projects are appended and every gated pipeline and step is
    /// filtered. Any error aborts the whole conversion.
    pub async fn convert(&self, request: &ConvertRequest) -> Result<Conversion, ConvertError> {
        let conversion_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "convert",
            %conversion_id,
            repo = %request.repo,
            build_before = %request.build.before,
            build_after = %request.build.after
        );

        self.convert_inner(conversion_id, request)
            .instrument(span)
            .await
    }

    async fn convert_inner(
        &self,
        conversion_id: Uuid,
        request: &ConvertRequest,
    ) -> Result<Conversion, ConvertError> {
        let started_at = Utc::now();
        let mut report = ConversionReport {
            conversion_id,
            repo: request.repo.slug(),
            build: request.build.clone(),
            outcome: Outcome::Unchanged,
            started_at,
            completed_at: started_at,
            changed_files: 0,
            projects: Vec::new(),
            filter: FilterReport::default(),
        };

        let documents = decode(&request.config)?;

        if !filter::has_path_gating(&documents) {
            info!("no paths fields seen");
            report.completed_at = Utc::now();
            return Ok(Conversion {
                config: request.config.clone(),
                report,
            });
        }

        info!("selective path settings found");

        let changed_files = self
            .provider
            .changed_files(&request.repo, &request.build)
            .await?;
        debug!(count = changed_files.len(), "Changed files listed");

        let expansion =
            monorepo::expand(&documents, &self.provider, &request.repo, &request.build).await?;
        let combined = monorepo::concatenate(&request.config, &expansion.to_text()?);

        let mut documents = decode(&combined)?;
        let filter_report = filter::apply(&mut documents, &changed_files);
        let config = encode(&documents)?;

        info!(
            documents = documents.len(),
            skipped = filter_report.skipped_count(),
            "Conversion complete"
        );

        report.outcome = Outcome::Converted;
        report.changed_files = changed_files.len();
        report.projects = expansion.projects;
        report.filter = filter_report;
        report.completed_at = Utc::now();

        Ok(Conversion { config, report })
    }
}
