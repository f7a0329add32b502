//! Path condition model and glob evaluation

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use tracing::warn;

/// Include/exclude glob rule set deciding whether a path is selected.
///
/// Accepted YAML shapes, all normalized to the same value:
///
/// ```yaml
/// paths: service-a/**              # one include pattern
/// paths: [service-a/**, lib/**]    # include patterns
/// paths:
///   include: [service-a/**]
///   exclude: ["**/*.md"]
/// ```
///
/// Serialization always emits the mapping form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl Condition {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    /// Condition with only include patterns
    pub fn including<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: patterns.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// True when neither list carries a pattern
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check a single path against this condition.
    ///
    /// Compiles the patterns on every call; use [`PathMatcher`] when the same
    /// condition is checked against many paths.
    pub fn matches(&self, path: &str) -> bool {
        PathMatcher::new(self).matches(path)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(map) => {
                let include = match map.get("include") {
                    Some(v) => patterns_from_value(v)?,
                    None => Vec::new(),
                };
                let exclude = match map.get("exclude") {
                    Some(v) => patterns_from_value(v)?,
                    None => Vec::new(),
                };
                Ok(Self { include, exclude })
            }
            Value::Sequence(_) => Ok(Self {
                include: patterns_from_value(&value)?,
                exclude: Vec::new(),
            }),
            Value::Tagged(_) => {
                Err("expected a pattern, a list of patterns or an include/exclude mapping".into())
            }
            scalar => Ok(Self {
                include: vec![scalar_to_string(&scalar)?],
                exclude: Vec::new(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Condition::from_value(value).map_err(de::Error::custom)
    }
}

fn patterns_from_value(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items.iter().map(scalar_to_string).collect(),
        other => Ok(vec![scalar_to_string(other)?]),
    }
}

fn scalar_to_string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(format!("invalid path pattern: {:?}", value)),
    }
}

/// Compiled form of a [`Condition`]
#[derive(Debug, Clone)]
pub struct PathMatcher {
    include: GlobSet,
    exclude: GlobSet,
    default_open: bool,
}

impl PathMatcher {
    pub fn new(condition: &Condition) -> Self {
        Self {
            include: compile(&condition.include),
            exclude: compile(&condition.exclude),
            default_open: condition.include.is_empty(),
        }
    }

    /// Exclusions win; an empty include list selects everything not excluded
    pub fn matches(&self, path: &str) -> bool {
        if self.exclude.is_match(path) {
            return false;
        }
        if self.include.is_match(path) {
            return true;
        }
        self.default_open
    }

    /// True if any of `paths` is selected
    pub fn matches_any<S: AsRef<str>>(&self, paths: &[S]) -> bool {
        paths.iter().any(|p| self.matches(p.as_ref()))
    }
}

/// `*` never crosses a `/`; `**` spans whole segments.
/// Invalid patterns never match.
fn compile(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!(pattern = %pattern, error = %e, "Skipping invalid path pattern"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build path pattern set");
        GlobSet::empty()
    })
}
