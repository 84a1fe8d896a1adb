//! Why a push was not forwarded

use super::diagnostics::Diagnostic;
use thiserror::Error;

/// Outcome of a push that did not reach the backend.
///
/// None of these are fatal: the event is dropped, a diagnostic is
/// reported, and the handler stays ready for the next push.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TagError {
    #[error("missing parameter(s) {} for {function}", .params.join(", "))]
    MissingParameters {
        function: String,
        params: Vec<String>,
    },
    #[error("function {0} is not registered")]
    UnknownFunction(String),
    #[error("framework not initialized, {0} dropped")]
    Uninitialized(String),
    #[error("backend handle unavailable")]
    BackendUnavailable,
    #[error("already initialized, {0} ignored")]
    AlreadyInitialized(String),
}

impl TagError {
    pub fn missing(function: &str, params: &[&str]) -> Self {
        Self::MissingParameters {
            function: function.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The diagnostic reported for this outcome.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::MissingParameters { function, params } => Diagnostic::MissingParameter {
                function: function.clone(),
                params: params.clone(),
            },
            Self::UnknownFunction(function) => Diagnostic::UnknownFunction {
                function: function.clone(),
            },
            Self::Uninitialized(function) => Diagnostic::FrameworkUninitialized {
                function: function.clone(),
            },
            Self::BackendUnavailable => Diagnostic::BackendUnavailable,
            Self::AlreadyInitialized(function) => Diagnostic::AlreadyInitialized {
                function: function.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_params_in_message() {
        let err = TagError::missing("ACC_tagLead", &["leadLabel", "leadValue"]);
        assert_eq!(
            err.to_string(),
            "missing parameter(s) leadLabel, leadValue for ACC_tagLead"
        );
    }

    #[test]
    fn maps_to_matching_diagnostic() {
        assert_eq!(
            TagError::Uninitialized("ACC_tagView".into()).to_diagnostic(),
            Diagnostic::FrameworkUninitialized {
                function: "ACC_tagView".into()
            }
        );
        assert_eq!(
            TagError::missing("ACC_tagView", &["screenName"]).to_diagnostic(),
            Diagnostic::MissingParameter {
                function: "ACC_tagView".into(),
                params: vec!["screenName".into()],
            }
        );
    }
}
