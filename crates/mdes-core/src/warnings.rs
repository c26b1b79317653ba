//! Diagnostic channel for recoverable schema anomalies.
//!
//! Loading and resolving a specification never fails on bad data. Instead
//! each anomaly is described in one free-text message handed to a
//! [`WarningSink`], and the graph is left with a well-defined fallback
//! (a missing type, an unresolved reference, no parent table).

use mdes_core_types::schema::{EVENT_SEVERE, EVENT_WARNING};
use std::sync::Mutex;

/// Receiver of loader and resolver diagnostics
pub trait WarningSink: Send + Sync {
    /// Report an anomaly that was worked around.
    fn warn(&self, message: &str);

    /// Report an anomaly that made a whole definition unusable.
    fn severe(&self, message: &str) {
        self.warn(message);
    }
}

/// Default sink: forwards to the installed `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(
            component = module_path!(),
            event = EVENT_WARNING,
            "{}",
            message
        );
    }

    fn severe(&self, message: &str) {
        tracing::error!(
            component = module_path!(),
            event = EVENT_SEVERE,
            "{}",
            message
        );
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn warn(&self, _message: &str) {}
}

/// Severity attached to a collected message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Severe,
}

/// Records messages in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message regardless of severity
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|e| e.iter().map(|(_, m)| m.clone()).collect())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.with_severity(Severity::Warning)
    }

    pub fn severe_messages(&self) -> Vec<String> {
        self.with_severity(Severity::Severe)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|e| e.is_empty()).unwrap_or(true)
    }

    pub fn clear(&self) {
        self.entries.lock().map(|mut e| e.clear()).ok();
    }

    fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.entries
            .lock()
            .map(|e| {
                e.iter()
                    .filter(|(s, _)| *s == severity)
                    .map(|(_, m)| m.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn record(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .map(|mut e| e.push((severity, message.to_string())))
            .ok();
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, message: &str) {
        self.record(Severity::Warning, message);
    }

    fn severe(&self, message: &str) {
        self.record(Severity::Severe, message);
    }
}
