//! Multi-document YAML stream codec

use crate::core::document::Document;
use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

/// A document in the stream could not be decoded
#[derive(Debug, Clone, Error)]
#[error("invalid document at index {index}: {message}")]
pub struct ParseError {
    /// Position of the offending document in the stream (0-based)
    pub index: usize,

    /// 1-based line of the error, when known
    pub line: Option<usize>,

    /// 1-based column of the error, when known
    pub column: Option<usize>,

    pub message: String,
}

impl ParseError {
    fn new(index: usize, err: &serde_yaml::Error) -> Self {
        let location = err.location();
        Self {
            index,
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: err.to_string(),
        }
    }
}

/// Documents could not be written back out
#[derive(Debug, Error)]
#[error("failed to serialize configuration: {0}")]
pub struct SerializationError(#[from] pub serde_yaml::Error);

/// Decode a configuration stream into documents, in stream order.
///
/// Merge keys (`<<: *anchor`) are resolved before the document is typed.
/// Empty documents are dropped. Fails on the first malformed document.
pub fn decode(text: &str) -> Result<Vec<Document>, ParseError> {
    let mut documents = Vec::new();

    for (index, deserializer) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let mut value =
            Value::deserialize(deserializer).map_err(|e| ParseError::new(index, &e))?;
        value
            .apply_merge()
            .map_err(|e| ParseError::new(index, &e))?;
        if let Some(document) =
            Document::from_value(value).map_err(|e| ParseError::new(index, &e))?
        {
            documents.push(document);
        }
    }

    Ok(documents)
}

/// Encode documents as a stream, separating them with `---`
pub fn encode(documents: &[Document]) -> Result<String, SerializationError> {
    let mut out = String::new();

    for (i, document) in documents.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        let value = document.to_value()?;
        out.push_str(&serde_yaml::to_string(&value)?);
    }

    Ok(out)
}
