//! monorepo-convert - path filtering and monorepo expansion for CI pipeline configs

pub mod cli;
pub mod convert;
pub mod core;
pub mod metrics;
pub mod provider;

// Re-export commonly used types
pub use convert::{ConversionReport, ConvertError, ConvertRequest, Converter, Outcome};
pub use core::{decode, encode, BuildRef, Condition, Document, PathMatcher, RepoRef};
pub use metrics::{InMemoryMetrics, MetricsSink, NoopMetrics};
pub use provider::{GitProvider, ProviderConfig, ProviderError, ProviderKind, ScmProvider, StaticProvider};
