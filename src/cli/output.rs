//! CLI output formatting

use crate::convert::{ConversionReport, Decision, GateDecision, Outcome};
use crate::core::{Condition, Document};
use serde::Serialize;

// Re-export style
pub use console::style;
use console::Emoji;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");

/// Format a gate decision for display
pub fn format_decision(decision: &GateDecision) -> String {
    let target = match (&decision.pipeline, &decision.step) {
        (pipeline, Some(step)) => format!(
            "{} / {}",
            style(pipeline.as_deref().unwrap_or("<unnamed>")).bold(),
            style(step).cyan()
        ),
        (pipeline, None) => style(pipeline.as_deref().unwrap_or("<unnamed>"))
            .bold()
            .to_string(),
    };

    match decision.decision {
        Decision::Kept => format!("{} {} {}", CHECK, target, style("kept").green()),
        Decision::Skipped => format!("{} {} {}", SKIP, target, style("skipped").dim()),
    }
}

/// Format a conversion report for display
pub fn format_report(report: &ConversionReport) -> String {
    let mut lines = Vec::new();

    let outcome = match report.outcome {
        Outcome::Unchanged => style("unchanged").dim().to_string(),
        Outcome::Converted => style("converted").green().to_string(),
    };
    lines.push(format!(
        "{} {} @ {} - {} ({})",
        INFO,
        style(&report.repo).bold(),
        style(short_sha(&report.build.after)).cyan(),
        outcome,
        style(&report.conversion_id.to_string()[..8]).dim()
    ));

    if report.outcome == Outcome::Unchanged {
        return lines.join("\n");
    }

    lines.push(format!(
        "  Changed files: {}",
        style(report.changed_files).cyan()
    ));
    for project in &report.projects {
        lines.push(format!("  Project: {}", style(project).dim()));
    }
    for decision in &report.filter.decisions {
        lines.push(format!("  {}", format_decision(decision)));
    }

    lines.join("\n")
}

fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

/// One document as shown by `inspect`
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub index: usize,
    pub kind: Option<String>,
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_paths: Option<Condition>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepSummary>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
}

/// A gated step as shown by `inspect`
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub name: Option<String>,
    pub paths: Condition,
}

impl DocumentSummary {
    pub fn from_document(index: usize, document: &Document) -> Self {
        let mut summary = Self {
            index,
            kind: document.kind().map(str::to_owned),
            name: document.name().map(str::to_owned),
            trigger_paths: None,
            steps: Vec::new(),
            projects: Vec::new(),
        };

        match document {
            Document::Pipeline(pipeline) => {
                if pipeline.trigger.has_path_gating() {
                    summary.trigger_paths = Some(pipeline.trigger.paths.clone());
                }
                summary.steps = pipeline
                    .steps
                    .iter()
                    .filter(|step| step.when.has_path_gating())
                    .map(|step| StepSummary {
                        name: step.name().map(str::to_owned),
                        paths: step.when.paths.clone(),
                    })
                    .collect();
            }
            Document::Monorepo(monorepo) => {
                summary.projects = monorepo.project_paths().map(str::to_owned).collect();
            }
            Document::Other(_) => {}
        }

        summary
    }

    pub fn is_gated(&self) -> bool {
        self.trigger_paths.is_some() || !self.steps.is_empty()
    }
}

/// Format a condition as `include ... exclude ...`
pub fn format_condition(condition: &Condition) -> String {
    let mut parts = Vec::new();
    if !condition.include.is_empty() {
        parts.push(format!("include {}", condition.include.join(", ")));
    }
    if !condition.exclude.is_empty() {
        parts.push(format!("exclude {}", condition.exclude.join(", ")));
    }
    parts.join("; ")
}

/// Format an inspected document for display
pub fn format_document_summary(summary: &DocumentSummary) -> String {
    let mut lines = vec![format!(
        "  [{}] {} {}",
        summary.index,
        style(summary.kind.as_deref().unwrap_or("<no kind>")).cyan(),
        style(summary.name.as_deref().unwrap_or("")).bold()
    )];

    if let Some(paths) = &summary.trigger_paths {
        lines.push(format!("      trigger: {}", style(format_condition(paths)).dim()));
    }
    for step in &summary.steps {
        lines.push(format!(
            "      step {}: {}",
            style(step.name.as_deref().unwrap_or("<unnamed>")).cyan(),
            style(format_condition(&step.paths)).dim()
        ));
    }
    for project in &summary.projects {
        lines.push(format!("      project: {}", style(project).dim()));
    }

    lines.join("\n")
}
