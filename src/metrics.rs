//! Provider telemetry
//!
//! Providers receive a [`MetricsSink`] instead of writing to a process-wide
//! gauge. The converter never reads these values back.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Provider operation being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOp {
    ChangedFiles,
    FetchConfig,
}

/// Write-only telemetry sink handed to providers
pub trait MetricsSink: fmt::Debug + Send + Sync {
    /// A provider call finished, successfully or not
    fn record_call(&self, op: ProviderOp, success: bool);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_call(&self, _op: ProviderOp, _success: bool) {}
}

/// Counters kept in memory
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    changed_files_calls: AtomicU64,
    fetch_config_calls: AtomicU64,
    failed_calls: AtomicU64,
}

/// Point-in-time copy of [`InMemoryMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub changed_files_calls: u64,
    pub fetch_config_calls: u64,
    pub failed_calls: u64,
}

impl InMemoryMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            changed_files_calls: self.changed_files_calls.load(Ordering::Relaxed),
            fetch_config_calls: self.fetch_config_calls.load(Ordering::Relaxed),
            failed_calls: self.failed_calls.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSink for InMemoryMetrics {
    fn record_call(&self, op: ProviderOp, success: bool) {
        let counter = match op {
            ProviderOp::ChangedFiles => &self.changed_files_calls,
            ProviderOp::FetchConfig => &self.fetch_config_calls,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failed_calls.fetch_add(1, Ordering::Relaxed);
        }
    }
}
