//! Assertions on an invocation's textual answer
//!
//! Every assertion reports a typed [`AssertionOutcome`]. A negative outcome is
//! data, not an error; `Err` is reserved for trouble reaching a judgement
//! (for example the comparator being unreachable).

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::common::Result;
use crate::semantic::SemanticComparator;

/// Subkind of a semantic assertion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Answer is not semantically similar to the expected text
    Similarity,
    /// Answer does not meet a natural-language condition
    Condition,
    /// Answer differs from the expected text
    Equality,
    /// Answer lacks required text
    Containment,
    /// Answer contains forbidden text
    Absence,
    /// Answer was expected to be empty but is not
    Emptiness,
    /// Answer was expected to be non-empty but is empty
    Presence,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Similarity => "Similarity",
            FailureKind::Condition => "Condition",
            FailureKind::Equality => "Equality",
            FailureKind::Containment => "Containment",
            FailureKind::Absence => "Absence",
            FailureKind::Emptiness => "Emptiness",
            FailureKind::Presence => "Presence",
        };
        f.write_str(name)
    }
}

/// Why an assertion did not hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub kind: FailureKind,
    /// Label of the assertion that failed
    pub assertion_type: String,
    pub message: String,
}

impl AssertionFailure {
    pub fn new(
        kind: FailureKind,
        assertion_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            assertion_type: assertion_type.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.assertion_type, self.message)
    }
}

impl std::error::Error for AssertionFailure {}

/// Result of evaluating one assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionOutcome {
    Passed,
    Failed(AssertionFailure),
}

impl AssertionOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionOutcome::Passed)
    }
}

/// A named check of an answer
#[async_trait]
pub trait Assertion: Send + Sync {
    /// Human-readable label used in transcripts
    fn assertion_type(&self) -> String;

    /// Check `answer`, consulting `comparator` for semantic judgements
    async fn evaluate(
        &self,
        comparator: &dyn SemanticComparator,
        answer: &str,
    ) -> Result<AssertionOutcome>;
}

/// Built-in assertions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// Answer means the same as `expected`
    SemanticSimilar { expected: String },
    /// Answer satisfies `condition`
    SemanticCondition { condition: String },
    /// Answer equals `expected` after trimming surrounding whitespace
    Equals { expected: String },
    /// Answer contains every text (case-insensitive)
    ContainsAll { texts: Vec<String> },
    /// Answer contains at least one text (case-insensitive); an empty list passes
    ContainsAny { texts: Vec<String> },
    /// Answer contains none of the texts (case-insensitive)
    NotContains { texts: Vec<String> },
    /// Answer is empty or whitespace
    Empty,
    /// Answer has non-whitespace content
    NotEmpty,
}

impl Check {
    pub fn semantic_similar(expected: impl Into<String>) -> Self {
        Check::SemanticSimilar {
            expected: expected.into(),
        }
    }

    pub fn semantic_condition(condition: impl Into<String>) -> Self {
        Check::SemanticCondition {
            condition: condition.into(),
        }
    }

    pub fn equals(expected: impl Into<String>) -> Self {
        Check::Equals {
            expected: expected.into(),
        }
    }

    pub fn contains_all<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Check::ContainsAll {
            texts: texts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains_any<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Check::ContainsAny {
            texts: texts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_contains<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Check::NotContains {
            texts: texts.into_iter().map(Into::into).collect(),
        }
    }

    /// Failure kind this check reports
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Check::SemanticSimilar { .. } => FailureKind::Similarity,
            Check::SemanticCondition { .. } => FailureKind::Condition,
            Check::Equals { .. } => FailureKind::Equality,
            Check::ContainsAll { .. } | Check::ContainsAny { .. } => FailureKind::Containment,
            Check::NotContains { .. } => FailureKind::Absence,
            Check::Empty => FailureKind::Emptiness,
            Check::NotEmpty => FailureKind::Presence,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Check::SemanticSimilar { .. } => "SemanticSimilar",
            Check::SemanticCondition { .. } => "SemanticCondition",
            Check::Equals { .. } => "Equals",
            Check::ContainsAll { .. } => "ContainsAll",
            Check::ContainsAny { .. } => "ContainsAny",
            Check::NotContains { .. } => "NotContains",
            Check::Empty => "Empty",
            Check::NotEmpty => "NotEmpty",
        }
    }

    fn fail(&self, message: impl Into<String>) -> AssertionOutcome {
        AssertionOutcome::Failed(AssertionFailure::new(
            self.failure_kind(),
            self.label(),
            message,
        ))
    }
}

#[async_trait]
impl Assertion for Check {
    fn assertion_type(&self) -> String {
        self.label().to_string()
    }

    async fn evaluate(
        &self,
        comparator: &dyn SemanticComparator,
        answer: &str,
    ) -> Result<AssertionOutcome> {
        let outcome = match self {
            Check::SemanticSimilar { expected } => {
                let verdict = comparator.are_similar(expected, answer).await?;
                if verdict.is_valid {
                    AssertionOutcome::Passed
                } else if verdict.reason.is_empty() {
                    self.fail("Answer is not semantically similar to the expected answer")
                } else {
                    self.fail(verdict.reason)
                }
            }
            Check::SemanticCondition { condition } => {
                let verdict = comparator.has_condition(answer, condition).await?;
                if verdict.is_valid {
                    AssertionOutcome::Passed
                } else if verdict.reason.is_empty() {
                    self.fail(format!("Answer does not meet the condition '{condition}'"))
                } else {
                    self.fail(verdict.reason)
                }
            }
            Check::Equals { expected } => {
                if answer.trim() == expected.trim() {
                    AssertionOutcome::Passed
                } else {
                    self.fail(format!("Expected '{expected}', got '{answer}'"))
                }
            }
            Check::ContainsAll { texts } => {
                let missing: Vec<&str> = texts
                    .iter()
                    .filter(|t| !contains_ignore_case(answer, t))
                    .map(String::as_str)
                    .collect();
                if missing.is_empty() {
                    AssertionOutcome::Passed
                } else {
                    self.fail(format!("Answer does not contain {}", quote_list(&missing)))
                }
            }
            Check::ContainsAny { texts } => {
                if texts.is_empty() || texts.iter().any(|t| contains_ignore_case(answer, t)) {
                    AssertionOutcome::Passed
                } else {
                    let all: Vec<&str> = texts.iter().map(String::as_str).collect();
                    self.fail(format!("Answer contains none of {}", quote_list(&all)))
                }
            }
            Check::NotContains { texts } => {
                let found: Vec<&str> = texts
                    .iter()
                    .filter(|t| contains_ignore_case(answer, t))
                    .map(String::as_str)
                    .collect();
                if found.is_empty() {
                    AssertionOutcome::Passed
                } else {
                    self.fail(format!("Answer contains {}", quote_list(&found)))
                }
            }
            Check::Empty => {
                if answer.trim().is_empty() {
                    AssertionOutcome::Passed
                } else {
                    self.fail(format!("Expected an empty answer, got '{answer}'"))
                }
            }
            Check::NotEmpty => {
                if answer.trim().is_empty() {
                    self.fail("Expected a non-empty answer")
                } else {
                    AssertionOutcome::Passed
                }
            }
        };
        Ok(outcome)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn quote_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::LexicalComparator;

    async fn eval(check: Check, answer: &str) -> AssertionOutcome {
        check
            .evaluate(&LexicalComparator::default(), answer)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_contains_all() {
        assert!(eval(Check::contains_all(["ada"]), "Hello, Ada!").await.is_passed());

        match eval(Check::contains_all(["Ada", "Grace"]), "Hello, Ada!").await {
            AssertionOutcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Containment);
                assert_eq!(failure.message, "Answer does not contain 'Grace'");
            }
            AssertionOutcome::Passed => panic!("Expected containment failure"),
        }
    }

    #[tokio::test]
    async fn test_contains_any_and_not_contains() {
        assert!(eval(Check::contains_any(["cat", "dog"]), "a Dog").await.is_passed());
        assert!(!eval(Check::contains_any(["cat", "dog"]), "a bird").await.is_passed());

        assert!(eval(Check::not_contains(["error"]), "all good").await.is_passed());
        match eval(Check::not_contains(["error", "fail"]), "ERROR: failed").await {
            AssertionOutcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Absence);
                assert_eq!(failure.message, "Answer contains 'error', 'fail'");
            }
            AssertionOutcome::Passed => panic!("Expected absence failure"),
        }
    }

    #[tokio::test]
    async fn test_empty_text_lists_pass() {
        let none: [&str; 0] = [];
        assert!(eval(Check::contains_all(none), "anything").await.is_passed());
        assert!(eval(Check::contains_any(none), "anything").await.is_passed());
        assert!(eval(Check::not_contains(none), "anything").await.is_passed());
    }

    #[tokio::test]
    async fn test_equals_trims() {
        assert!(eval(Check::equals("42"), " 42\n").await.is_passed());
        assert!(!eval(Check::equals("42"), "43").await.is_passed());
    }

    #[tokio::test]
    async fn test_empty_and_not_empty() {
        assert!(eval(Check::Empty, "  \n").await.is_passed());
        assert!(!eval(Check::NotEmpty, "").await.is_passed());
        match eval(Check::Empty, "text").await {
            AssertionOutcome::Failed(failure) => assert_eq!(failure.kind, FailureKind::Emptiness),
            AssertionOutcome::Passed => panic!("Expected emptiness failure"),
        }
    }

    #[tokio::test]
    async fn test_semantic_similar_uses_comparator() {
        let check = Check::semantic_similar("the cat sat on the mat");
        assert!(eval(check.clone(), "The cat sat on the mat.").await.is_passed());
        match eval(check, "stock prices rose sharply").await {
            AssertionOutcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Similarity);
                assert_eq!(failure.assertion_type, "SemanticSimilar");
            }
            AssertionOutcome::Passed => panic!("Expected similarity failure"),
        }
    }

    #[tokio::test]
    async fn test_comparator_errors_propagate() {
        let result = Check::semantic_condition("is polite")
            .evaluate(&LexicalComparator::default(), "hi")
            .await;
        assert!(matches!(result, Err(crate::Error::Comparator(_))));
    }

    #[test]
    fn test_check_from_yaml() {
        let checks: Vec<Check> = serde_yaml::from_str(
            r#"
- check: semantic_similar
  expected: "Hello Ada"
- check: contains_all
  texts: ["Ada"]
- check: not_empty
"#,
        )
        .unwrap();
        assert_eq!(
            checks,
            vec![
                Check::semantic_similar("Hello Ada"),
                Check::contains_all(["Ada"]),
                Check::NotEmpty,
            ]
        );
    }

    #[test]
    fn test_failure_display() {
        let failure = AssertionFailure::new(FailureKind::Containment, "ContainsAll", "missing");
        assert_eq!(failure.to_string(), "ContainsAll: missing");
    }
}
