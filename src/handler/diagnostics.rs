//! Diagnostic boundary — the structured record of what happened to a push
//!
//! Besides the backend calls themselves, diagnostics are the only signal
//! that a push was accepted or rejected. Handlers report through a
//! [`DiagnosticSink`]; hosts log them with [`TracingDiagnostics`] and test
//! harnesses capture them with [`RecordingDiagnostics`].

use crate::bag::EventValue;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// One reported dispatch outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Required parameters were absent, null, or invalid; nothing was sent
    MissingParameter { function: String, params: Vec<String> },
    /// A parameter was extracted and handed to the backend
    ParameterAccepted { param: String, value: EventValue },
    /// An extra parameter had a type the backend cannot carry
    ParameterIgnored { function: String, param: String },
    /// The handler does not know this function
    UnknownFunction { function: String },
    /// A non-init push arrived before initialization succeeded
    FrameworkUninitialized { function: String },
    /// The backend factory produced no usable handle
    BackendUnavailable,
    /// An init push arrived after initialization and was ignored
    AlreadyInitialized { function: String },
}

impl Diagnostic {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::ParameterAccepted { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter { function, params } => {
                write!(f, "missing parameter(s) {} for {}", params.join(", "), function)
            }
            Self::ParameterAccepted { param, value } => {
                write!(f, "parameter {} set to {}", param, value)
            }
            Self::ParameterIgnored { function, param } => {
                write!(f, "parameter {} ignored for {}", param, function)
            }
            Self::UnknownFunction { function } => write!(f, "function {} is not registered", function),
            Self::FrameworkUninitialized { function } => {
                write!(f, "framework not initialized, {} dropped", function)
            }
            Self::BackendUnavailable => write!(f, "backend handle unavailable"),
            Self::AlreadyInitialized { function } => {
                write!(f, "already initialized, {} ignored", function)
            }
        }
    }
}

/// Receiver for dispatch diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Report a diagnostic raised by the handler named `handler`.
    fn report(&self, handler: &str, diagnostic: Diagnostic);
}

/// Logs every diagnostic through `tracing`.
///
/// Accepted parameters log at info, everything else at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, handler: &str, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::ParameterAccepted { param, value } => {
                info!(handler, param = %param, value = %value, "parameter set");
            }
            Diagnostic::MissingParameter { function, params } => {
                warn!(handler, function = %function, params = ?params, "missing required parameter(s)");
            }
            other => warn!(handler, "{}", other),
        }
    }
}

/// Keeps every diagnostic in memory.
///
/// Clones share the same buffer, so a test can keep one clone and hand
/// another to the handler under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    entries: Arc<Mutex<Vec<(String, Diagnostic)>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, Diagnostic)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every recorded `(handler, diagnostic)` pair, in report order.
    pub fn entries(&self) -> Vec<(String, Diagnostic)> {
        self.lock().clone()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().iter().map(|(_, d)| d.clone()).collect()
    }

    /// Parameters named by missing-parameter reports for `function`.
    pub fn missing_for(&self, function: &str) -> Option<Vec<String>> {
        self.lock().iter().rev().find_map(|(_, d)| match d {
            Diagnostic::MissingParameter { function: f, params } if f == function => {
                Some(params.clone())
            }
            _ => None,
        })
    }

    /// Value of the most recent accepted report for `param`.
    pub fn accepted(&self, param: &str) -> Option<EventValue> {
        self.lock().iter().rev().find_map(|(_, d)| match d {
            Diagnostic::ParameterAccepted { param: p, value } if p == param => Some(value.clone()),
            _ => None,
        })
    }

    pub fn failures(&self) -> Vec<Diagnostic> {
        self.lock()
            .iter()
            .filter(|(_, d)| d.is_failure())
            .map(|(_, d)| d.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report(&self, handler: &str, diagnostic: Diagnostic) {
        self.lock().push((handler.to_string(), diagnostic));
    }
}
