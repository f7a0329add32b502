//! Monorepo expansion
//!
//! `kind: monorepo` documents list sub-project configuration files. Each one
//! is fetched at the commit under test and its documents are appended to the
//! configuration before filtering, so sub-project pipelines are gated against
//! the same changed-file list as top-level ones.
//!
//! Expansion is single-level: a fetched `monorepo` document is carried along
//! but its projects are not fetched.

use crate::convert::ConvertError;
use crate::core::{decode, encode, BuildRef, Document, RepoRef, SerializationError};
use crate::provider::ScmProvider;
use tracing::{debug, info};

/// Documents pulled in from sub-projects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    /// Project paths fetched, in fetch order
    pub projects: Vec<String>,

    /// Fetched documents, in fetch order
    pub documents: Vec<Document>,
}

impl Expansion {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Serialized form of the fetched documents
    pub fn to_text(&self) -> Result<String, SerializationError> {
        encode(&self.documents)
    }
}

/// Fetch every project referenced by a `monorepo` document, in order.
///
/// Fetches run one at a time; the first failure aborts the expansion.
pub async fn expand<P>(
    documents: &[Document],
    provider: &P,
    repo: &RepoRef,
    build: &BuildRef,
) -> Result<Expansion, ConvertError>
where
    P: ScmProvider + ?Sized,
{
    let mut expansion = Expansion::default();

    for monorepo in documents.iter().filter_map(Document::as_monorepo) {
        for path in monorepo.project_paths() {
            debug!(project = path, commit = %build.after, "Fetching project config");

            let text = provider
                .fetch_config(repo, path, &build.after)
                .await
                .map_err(|source| ConvertError::ProjectFetch {
                    path: path.to_string(),
                    source,
                })?;
            let fetched = decode(&text).map_err(|source| ConvertError::Project {
                path: path.to_string(),
                source,
            })?;

            info!(project = path, documents = fetched.len(), "Expanded project config");
            expansion.projects.push(path.to_string());
            expansion.documents.extend(fetched);
        }
    }

    Ok(expansion)
}

/// Append `extension` to `config` as further documents of the same stream
pub fn concatenate(config: &str, extension: &str) -> String {
    if extension.is_empty() {
        return config.to_string();
    }

    let mut combined = String::with_capacity(config.len() + extension.len() + 5);
    combined.push_str(config);
    if !config.is_empty() && !config.ends_with('\n') {
        combined.push('\n');
    }
    combined.push_str("---\n");
    combined.push_str(extension);
    combined
}
