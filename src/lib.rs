//! Scenario Assert - semantic test assertions for LLM-backed functions
//!
//! This library invokes a function under test with scenario-defined
//! arguments and checks its textual answer against an ordered list of
//! assertions, some of which are judged by a semantic comparator.

pub mod cli;
pub mod commands;
pub mod common;
pub mod scenario;
pub mod semantic;

// Re-export commonly used types for tests
pub use common::{Error, LogSink, Result};
pub use scenario::{
    Arguments, Assertion, AssertionFailure, AssertionOutcome, Check, FailureKind, Invokable,
    Scenario, ScenarioRunner,
};
pub use semantic::{SemanticComparator, Verdict};
