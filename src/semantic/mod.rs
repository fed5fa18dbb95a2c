//! Semantic comparison
//!
//! Assertions that judge meaning rather than exact text delegate to a
//! [`SemanticComparator`]. The comparator is shared read-only by every
//! assertion a runner evaluates.

mod client;
mod lexical;

pub use client::ModelComparator;
pub use lexical::LexicalComparator;

use async_trait::async_trait;
use serde::Deserialize;

use crate::common::Result;

/// Judgement returned by a comparator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Verdict {
    /// Whether the check holds
    #[serde(rename = "success")]
    pub is_valid: bool,
    /// Explanation, used as the failure message when the check does not hold
    #[serde(rename = "message", default)]
    pub reason: String,
}

impl Verdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: String::new(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }
}

/// Judges texts by meaning
///
/// `Err` means the comparator could not reach a judgement (transport or
/// protocol trouble). A negative judgement is `Ok` with an invalid verdict.
#[async_trait]
pub trait SemanticComparator: Send + Sync {
    /// Whether two texts convey the same meaning
    async fn are_similar(&self, first: &str, second: &str) -> Result<Verdict>;

    /// Whether a text satisfies a natural-language condition
    async fn has_condition(&self, text: &str, condition: &str) -> Result<Verdict>;
}
