//! Core domain models for pipeline configuration
//!
//! This module defines the configuration documents, the path conditions
//! that gate them, and the codec that moves them in and out of a
//! multi-document YAML stream.

pub mod build;
pub mod codec;
pub mod condition;
pub mod document;

pub use build::{BuildRef, RepoRef, EMPTY_COMMIT};
pub use codec::{decode, encode, ParseError, SerializationError};
pub use condition::{Condition, PathMatcher};
pub use document::*;
