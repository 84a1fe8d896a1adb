//! Handler lifecycle state and the shared handler core
//!
//! Every handler composes a [`HandlerCore`]: its identity, the
//! Uninitialized → Ready state machine, the validity flag set when the
//! backend handle is acquired, and the diagnostic sink it reports to.

use super::diagnostics::{Diagnostic, DiagnosticSink};
use super::error::TagError;
use crate::bag::{EventBag, EventValue};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Initialization state of a handler. There is no transition out of `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlerState {
    #[default]
    Uninitialized,
    Ready,
}

/// State and reporting shared by every handler.
pub struct HandlerCore {
    /// Function-name prefix ("ACC", "Firebase", "Tune")
    key: &'static str,
    /// Backend display name, used as the diagnostic source
    name: &'static str,
    state: HandlerState,
    valid: bool,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl HandlerCore {
    pub fn new(key: &'static str, name: &'static str, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            key,
            name,
            state: HandlerState::Uninitialized,
            valid: false,
            diagnostics,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> HandlerState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == HandlerState::Ready
    }

    /// Whether `initialize()` obtained a usable backend handle.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Uninitialized → Ready. Calling it again is a no-op.
    pub fn mark_ready(&mut self) {
        if self.state == HandlerState::Uninitialized {
            debug!(handler = self.name, "handler ready");
        }
        self.state = HandlerState::Ready;
    }

    /// Record whether the backend handle is usable, reporting
    /// `BackendUnavailable` when it is not.
    pub fn validate(&mut self, usable: bool) -> bool {
        self.valid = usable;
        if !usable {
            self.report(Diagnostic::BackendUnavailable);
        }
        usable
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.report(self.name, diagnostic);
    }

    /// Report a parameter handed to the backend.
    pub fn accepted(&self, param: &str, value: impl Into<EventValue>) {
        self.report(Diagnostic::ParameterAccepted {
            param: param.to_string(),
            value: value.into(),
        });
    }

    /// Report why a push was dropped.
    pub fn reject(&self, error: &TagError) {
        self.report(error.to_diagnostic());
    }

    pub fn received(&self, function: &str, bag: &EventBag) {
        let params: Vec<&str> = bag.keys().collect();
        debug!(handler = self.name, function, ?params, "received function");
    }
}

impl fmt::Debug for HandlerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCore")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}
