//! Failure reporting
//!
//! The channel reports every terminal failure exactly once, after retries are
//! exhausted or judged pointless. Intermediate attempts are logged at `warn`
//! by the channel itself and never reach the observer.

use std::sync::{Mutex, PoisonError};

use http::{Method, StatusCode};
use shared::ErrorKind;

/// One terminal failure of a logical call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub kind: ErrorKind,
    /// Display message handed back to the caller
    pub message: String,
    pub method: Method,
    /// Unencoded request path, relative to the base URL
    pub path: String,
    /// Attempts spent on the call
    pub attempts: u32,
    pub status: Option<StatusCode>,
    /// Raw diagnostic
    pub detail: String,
}

/// Receives terminal failures
pub trait FailureObserver: Send + Sync + std::fmt::Debug {
    fn on_failure(&self, report: &FailureReport);
}

/// Logs failures through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FailureObserver for TracingObserver {
    fn on_failure(&self, report: &FailureReport) {
        tracing::error!(
            target: "meal_client::failure",
            kind = %report.kind,
            method = %report.method,
            path = %report.path,
            attempts = report.attempts,
            status = ?report.status.map(|s| s.as_u16()),
            detail = %report.detail,
            "{}",
            report.message
        );
    }
}

/// Discards failures
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FailureObserver for NoopObserver {
    fn on_failure(&self, _report: &FailureReport) {}
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    reports: Mutex<Vec<FailureReport>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.reports().into_iter().map(|r| r.message).collect()
    }

    pub fn len(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FailureObserver for RecordingObserver {
    fn on_failure(&self, report: &FailureReport) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
    }
}
