//! Configuration document model
//!
//! A configuration stream is an ordered list of [`Document`]s. Only the
//! fields the converter needs are typed; everything else rides along in an
//! ordered `attrs` mapping so a document survives decode and encode intact.

use crate::core::condition::Condition;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

/// `kind` of a pipeline document
pub const KIND_PIPELINE: &str = "pipeline";

/// `kind` of a monorepo directive
pub const KIND_MONOREPO: &str = "monorepo";

/// One unit of the multi-document stream, dispatched on its `kind`
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Pipeline(Pipeline),
    Monorepo(Monorepo),
    /// Any other kind, kept exactly as decoded
    Other(Value),
}

/// Gating conditions for a pipeline (`trigger`) or a step (`when`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// Path gating
    #[serde(default, skip_serializing_if = "Condition::is_empty")]
    pub paths: Condition,

    /// Branch, event, status and anything else; never interpreted here
    #[serde(flatten)]
    pub attrs: Mapping,
}

impl Conditions {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.attrs.is_empty()
    }

    /// True when `paths` carries an include or exclude pattern
    pub fn has_path_gating(&self) -> bool {
        !self.paths.is_empty()
    }
}

/// A pipeline step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub attrs: Mapping,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Conditions::is_empty"
    )]
    pub when: Conditions,
}

impl Step {
    pub fn name(&self) -> Option<&str> {
        self.attrs.get("name").and_then(Value::as_str)
    }
}

/// A `kind: pipeline` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pipeline_type: Option<String>,

    #[serde(flatten)]
    pub attrs: Mapping,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub steps: Vec<Step>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Conditions::is_empty"
    )]
    pub trigger: Conditions,
}

impl Pipeline {
    pub fn name(&self) -> Option<&str> {
        self.attrs.get("name").and_then(Value::as_str)
    }

    /// True when the pipeline or any of its steps is gated on paths
    pub fn has_path_gating(&self) -> bool {
        self.trigger.has_path_gating() || self.steps.iter().any(|s| s.when.has_path_gating())
    }
}

/// A `kind: monorepo` directive listing sub-project configuration files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Monorepo {
    #[serde(flatten)]
    pub attrs: Mapping,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub projects: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub includes: Vec<String>,
}

impl Monorepo {
    /// Referenced configuration paths, `projects` first, in declaration order
    pub fn project_paths(&self) -> impl Iterator<Item = &str> {
        self.projects
            .iter()
            .chain(self.includes.iter())
            .map(String::as_str)
    }
}

/// `trigger: ~` and friends read as the empty value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    /// Build a document from a decoded YAML value.
    ///
    /// Returns `Ok(None)` for an empty (null) document.
    pub fn from_value(value: Value) -> Result<Option<Self>, serde_yaml::Error> {
        let mut map = match value {
            Value::Null => return Ok(None),
            Value::Mapping(map) => map,
            other => return Ok(Some(Document::Other(other))),
        };

        let kind = map.get("kind").and_then(Value::as_str).map(str::to_owned);
        let document = match kind.as_deref() {
            Some(KIND_PIPELINE) => {
                map.remove("kind");
                Document::Pipeline(serde_yaml::from_value(Value::Mapping(map))?)
            }
            Some(KIND_MONOREPO) => {
                map.remove("kind");
                Document::Monorepo(serde_yaml::from_value(Value::Mapping(map))?)
            }
            _ => Document::Other(Value::Mapping(map)),
        };
        Ok(Some(document))
    }

    /// Convert back to a YAML value with `kind` as the first key
    pub fn to_value(&self) -> Result<Value, serde_yaml::Error> {
        let (kind, body) = match self {
            Document::Pipeline(p) => (KIND_PIPELINE, serde_yaml::to_value(p)?),
            Document::Monorepo(m) => (KIND_MONOREPO, serde_yaml::to_value(m)?),
            Document::Other(value) => return Ok(value.clone()),
        };

        let mut out = Mapping::new();
        out.insert(Value::from("kind"), Value::from(kind));
        if let Value::Mapping(fields) = body {
            out.extend(fields);
        }
        Ok(Value::Mapping(out))
    }

    /// The `kind` discriminator, if the document has one
    pub fn kind(&self) -> Option<&str> {
        match self {
            Document::Pipeline(_) => Some(KIND_PIPELINE),
            Document::Monorepo(_) => Some(KIND_MONOREPO),
            Document::Other(value) => value.get("kind").and_then(Value::as_str),
        }
    }

    /// The `name` attribute, if the document has one
    pub fn name(&self) -> Option<&str> {
        match self {
            Document::Pipeline(p) => p.name(),
            Document::Monorepo(m) => m.attrs.get("name").and_then(Value::as_str),
            Document::Other(value) => value.get("name").and_then(Value::as_str),
        }
    }

    pub fn as_pipeline(&self) -> Option<&Pipeline> {
        match self {
            Document::Pipeline(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_monorepo(&self) -> Option<&Monorepo> {
        match self {
            Document::Monorepo(m) => Some(m),
            _ => None,
        }
    }
}
