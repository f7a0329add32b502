//! Path-gating filter for pipelines and steps
//!
//! A pipeline (or step) whose path condition selects none of the changed
//! files is suppressed by writing `event: {exclude: ["*"]}` next to its path
//! condition. The path condition itself is left as written.

use crate::core::{Condition, Conditions, Document, PathMatcher};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::info;

/// Key of the rule written into a suppressed `trigger` or `when`
pub const SUPPRESSION_KEY: &str = "event";

/// Outcome for one gated pipeline or step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Kept,
    Skipped,
}

/// Decision recorded for a gated pipeline (`step` is `None`) or step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    pub pipeline: Option<String>,
    pub step: Option<String>,
    pub decision: Decision,
}

/// Every decision made during one filter pass, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub decisions: Vec<GateDecision>,
}

impl FilterReport {
    /// Names of skipped pipelines (unnamed pipelines appear as `None`)
    pub fn skipped_pipelines(&self) -> Vec<Option<&str>> {
        self.decisions
            .iter()
            .filter(|d| d.step.is_none() && d.decision == Decision::Skipped)
            .map(|d| d.pipeline.as_deref())
            .collect()
    }

    /// `(pipeline, step)` names of skipped steps
    pub fn skipped_steps(&self) -> Vec<(Option<&str>, &str)> {
        self.decisions
            .iter()
            .filter(|d| d.decision == Decision::Skipped)
            .filter_map(|d| d.step.as_deref().map(|s| (d.pipeline.as_deref(), s)))
            .collect()
    }

    pub fn skipped_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.decision == Decision::Skipped)
            .count()
    }
}

/// True iff any pipeline or step carries a non-empty path condition
pub fn has_path_gating(documents: &[Document]) -> bool {
    documents
        .iter()
        .filter_map(Document::as_pipeline)
        .any(|p| p.has_path_gating())
}

/// Suppress every gated pipeline and step that no changed file selects.
///
/// An empty `changed_files` list keeps everything.
pub fn apply(documents: &mut [Document], changed_files: &[String]) -> FilterReport {
    let mut report = FilterReport::default();

    for document in documents.iter_mut() {
        let Document::Pipeline(pipeline) = document else {
            continue;
        };
        let pipeline_name = pipeline.name().map(str::to_owned);

        if pipeline.trigger.has_path_gating() {
            let decision = evaluate(&pipeline.trigger.paths, changed_files);
            match decision {
                Decision::Kept => info!(pipeline = ?pipeline_name, "including pipeline"),
                Decision::Skipped => {
                    info!(pipeline = ?pipeline_name, "excluding pipeline");
                    suppress(&mut pipeline.trigger);
                }
            }
            report.decisions.push(GateDecision {
                pipeline: pipeline_name.clone(),
                step: None,
                decision,
            });
        }

        for step in pipeline.steps.iter_mut() {
            if !step.when.has_path_gating() {
                continue;
            }
            let step_name = step.name().unwrap_or_default().to_string();
            let decision = evaluate(&step.when.paths, changed_files);
            match decision {
                Decision::Kept => {
                    info!(pipeline = ?pipeline_name, step = %step_name, "including step")
                }
                Decision::Skipped => {
                    info!(pipeline = ?pipeline_name, step = %step_name, "excluding step");
                    suppress(&mut step.when);
                }
            }
            report.decisions.push(GateDecision {
                pipeline: pipeline_name.clone(),
                step: Some(step_name),
                decision,
            });
        }
    }

    report
}

fn evaluate(condition: &Condition, changed_files: &[String]) -> Decision {
    // an empty change set (e.g. `--allow-empty` commits) never suppresses
    if changed_files.is_empty() {
        return Decision::Kept;
    }
    if PathMatcher::new(condition).matches_any(changed_files) {
        Decision::Kept
    } else {
        Decision::Skipped
    }
}

fn suppress(conditions: &mut Conditions) {
    let mut rule = Mapping::new();
    rule.insert(
        Value::from("exclude"),
        Value::Sequence(vec![Value::from("*")]),
    );
    conditions
        .attrs
        .insert(Value::from(SUPPRESSION_KEY), Value::Mapping(rule));
}
