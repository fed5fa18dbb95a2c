//! Error types for scenario-assert
//!
//! A failing semantic assertion is an ordinary error variant so that test
//! frameworks see it through `?`. Only that variant is ever intercepted by
//! the failure-expectation mode; every other error is fatal.

use thiserror::Error;

use crate::scenario::{AssertionFailure, FailureKind};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scenario-assert
#[derive(Error, Debug)]
pub enum Error {
    // === Runner Errors ===
    #[error("Scenario runner has not been initialized with a semantic comparator")]
    NotInitialized,

    #[error("{0}")]
    SemanticAssertion(AssertionFailure),

    #[error("Expected a failure of kind {kind} but none occurred")]
    ExpectedFailureDidNotOccur { kind: FailureKind },

    // === Collaborator Errors ===
    #[error("Invocation failed: {0}")]
    Invocation(String),

    #[error("Semantic comparator error: {0}")]
    Comparator(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid scenario file '{path}': {error}")]
    ScenarioParse { path: String, error: String },

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// The semantic failure carried by this error, if it is one
    pub fn as_assertion_failure(&self) -> Option<&AssertionFailure> {
        match self {
            Error::SemanticAssertion(failure) => Some(failure),
            _ => None,
        }
    }

    /// Whether this error belongs to the semantic-assertion-failure family
    pub fn is_semantic_failure(&self) -> bool {
        matches!(self, Error::SemanticAssertion(_))
    }
}

impl From<AssertionFailure> for Error {
    fn from(failure: AssertionFailure) -> Self {
        Error::SemanticAssertion(failure)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Comparator(format!("request timed out: {e}"))
        } else {
            Error::Comparator(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_failure_family() {
        let err: Error = AssertionFailure::new(FailureKind::Containment, "ContainsAll", "missing 'Ada'").into();
        assert!(err.is_semantic_failure());
        assert_eq!(err.as_assertion_failure().unwrap().kind, FailureKind::Containment);

        assert!(!Error::NotInitialized.is_semantic_failure());
        assert!(!Error::Invocation("boom".into()).is_semantic_failure());
    }

    #[test]
    fn test_file_read_names_path() {
        let err = Error::file_read(std::path::Path::new("missing.yaml"), "not found");
        assert_eq!(err.to_string(), "Failed to read file 'missing.yaml': not found");
    }

    #[test]
    fn test_expected_failure_message_names_kind() {
        let err = Error::ExpectedFailureDidNotOccur {
            kind: FailureKind::Similarity,
        };
        assert_eq!(
            err.to_string(),
            "Expected a failure of kind Similarity but none occurred"
        );
    }
}
