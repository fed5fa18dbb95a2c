//! Scenario runner implementation
//!
//! Binds a scenario's arguments, invokes the function under test once, and
//! evaluates the scenario's assertions strictly in order, stopping at the
//! first one that fails.

use std::sync::Arc;

use crate::common::config::{default_separator, RunnerConfig};
use crate::common::{Error, LogSink, Result};
use crate::semantic::{ModelComparator, SemanticComparator};

use super::assertion::{AssertionFailure, AssertionOutcome, FailureKind};
use super::invoke::Invokable;
use super::types::Scenario;

/// Terminal state of one scenario execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// Every assertion passed
    Succeeded { answer: String },
    /// An assertion failed; later assertions were not evaluated
    Failed {
        answer: String,
        failure: AssertionFailure,
    },
}

/// Builder for [`ScenarioRunner`]
#[derive(Default)]
pub struct RunnerBuilder {
    comparator: Option<Arc<dyn SemanticComparator>>,
    log_sink: Option<LogSink>,
    separator: Option<String>,
    strict_failure_kind: bool,
}

impl RunnerBuilder {
    /// Comparator consulted by semantic assertions
    pub fn comparator(self, comparator: impl SemanticComparator + 'static) -> Self {
        self.shared_comparator(Arc::new(comparator))
    }

    pub fn shared_comparator(mut self, comparator: Arc<dyn SemanticComparator>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// Callback receiving the transcript, one line per call
    pub fn log_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log_sink = Some(Arc::new(sink));
        self
    }

    pub fn shared_log_sink(mut self, sink: Option<LogSink>) -> Self {
        self.log_sink = sink;
        self
    }

    /// Line logged after each scenario of a batch
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Reject expected failures whose kind differs from the requested one
    pub fn strict_failure_kind(mut self, strict: bool) -> Self {
        self.strict_failure_kind = strict;
        self
    }

    /// Apply the `[runner]` configuration section
    pub fn runner_config(self, config: &RunnerConfig) -> Self {
        self.separator(config.separator.clone())
            .strict_failure_kind(config.strict_failure_kind)
    }

    /// Build the runner; fails with `NotInitialized` when no comparator was given
    pub fn build(self) -> Result<ScenarioRunner> {
        let comparator = self.comparator.ok_or(Error::NotInitialized)?;
        Ok(ScenarioRunner {
            comparator,
            log_sink: self.log_sink,
            separator: self.separator.unwrap_or_else(default_separator),
            strict_failure_kind: self.strict_failure_kind,
        })
    }
}

/// Runs scenarios against an invokable and checks their assertions
pub struct ScenarioRunner {
    comparator: Arc<dyn SemanticComparator>,
    log_sink: Option<LogSink>,
    separator: String,
    strict_failure_kind: bool,
}

impl ScenarioRunner {
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::default()
    }

    /// Runner backed by a model comparator at `endpoint`
    pub fn initialize(endpoint: &str, credential: &str, log_sink: Option<LogSink>) -> Result<Self> {
        Self::builder()
            .comparator(ModelComparator::new(endpoint, credential)?)
            .shared_log_sink(log_sink)
            .build()
    }

    fn log(&self, line: &str) {
        if let Some(sink) = &self.log_sink {
            sink(line);
        }
    }

    fn log_separator(&self) {
        self.log("");
        self.log(&self.separator);
        self.log("");
    }

    /// Run one scenario to a terminal state without interpreting it
    ///
    /// Errors from the invokable or the comparator are returned as `Err`; a
    /// failing assertion is `Ok(ScenarioOutcome::Failed)`.
    pub async fn execute<I>(&self, invokable: &I, scenario: &Scenario) -> Result<ScenarioOutcome>
    where
        I: Invokable + ?Sized,
    {
        tracing::info!(
            scenario = scenario.description(),
            arguments = scenario.arguments().len(),
            asserts = scenario.asserts().len(),
            "Running scenario"
        );

        self.log(&format!("# TEST {}", scenario.description()));
        self.log("");
        for (name, value) in scenario.arguments().iter() {
            self.log(&format!("## PARAMETER {name}"));
            self.log(value);
        }

        let answer = invokable
            .invoke(scenario.arguments())
            .await?
            .unwrap_or_default();
        tracing::debug!(scenario = scenario.description(), answer_len = answer.len(), "Invocation finished");

        self.log("## ACTUAL ANSWER:");
        self.log(&answer);
        self.log("");

        for assertion in scenario.asserts() {
            let assertion_type = assertion.assertion_type();
            self.log(&format!("## ANSWER {assertion_type}"));

            match assertion.evaluate(self.comparator.as_ref(), &answer).await? {
                AssertionOutcome::Passed => {
                    tracing::debug!(assertion = %assertion_type, "Assertion passed");
                    self.log("OK");
                }
                AssertionOutcome::Failed(failure) => {
                    tracing::debug!(
                        assertion = %assertion_type,
                        kind = %failure.kind,
                        message = %failure.message,
                        "Assertion failed"
                    );
                    return Ok(ScenarioOutcome::Failed { answer, failure });
                }
            }
        }

        Ok(ScenarioOutcome::Succeeded { answer })
    }

    /// Run a scenario whose assertions must all pass
    ///
    /// The first failing assertion is returned as `Error::SemanticAssertion`.
    pub async fn run_expecting_success<I>(&self, invokable: &I, scenario: &Scenario) -> Result<()>
    where
        I: Invokable + ?Sized,
    {
        match self.execute(invokable, scenario).await? {
            ScenarioOutcome::Succeeded { .. } => Ok(()),
            ScenarioOutcome::Failed { failure, .. } => {
                tracing::warn!(scenario = scenario.description(), "{failure}");
                Err(Error::SemanticAssertion(failure))
            }
        }
    }

    /// Run scenarios in order, stopping at the first failure
    pub async fn run_all_expecting_success<I>(
        &self,
        invokable: &I,
        scenarios: &[Scenario],
    ) -> Result<()>
    where
        I: Invokable + ?Sized,
    {
        for scenario in scenarios {
            self.run_expecting_success(invokable, scenario).await?;
            self.log_separator();
        }
        Ok(())
    }

    /// Run a scenario that must fail one of its assertions
    ///
    /// Any semantic assertion failure satisfies the expectation unless the
    /// runner was built with `strict_failure_kind`, in which case a failure of
    /// another kind is returned as the error. Invocation and comparator errors
    /// are never treated as the expected failure.
    pub async fn run_expecting_failure<I>(
        &self,
        invokable: &I,
        scenario: &Scenario,
        expected: FailureKind,
    ) -> Result<()>
    where
        I: Invokable + ?Sized,
    {
        match self.execute(invokable, scenario).await? {
            ScenarioOutcome::Failed { failure, .. } => {
                if failure.kind != expected {
                    if self.strict_failure_kind {
                        return Err(Error::SemanticAssertion(failure));
                    }
                    tracing::warn!(
                        scenario = scenario.description(),
                        expected = %expected,
                        actual = %failure.kind,
                        "Scenario failed with a different kind than expected"
                    );
                }
                self.log("Exception as EXPECTED:");
                self.log(&failure.to_string());
                Ok(())
            }
            ScenarioOutcome::Succeeded { .. } => {
                Err(Error::ExpectedFailureDidNotOccur { kind: expected })
            }
        }
    }

    /// Run scenarios in order, each of which must fail
    pub async fn run_all_expecting_failure<I>(
        &self,
        invokable: &I,
        scenarios: &[Scenario],
        expected: FailureKind,
    ) -> Result<()>
    where
        I: Invokable + ?Sized,
    {
        for scenario in scenarios {
            self.run_expecting_failure(invokable, scenario, expected)
                .await?;
            self.log_separator();
        }
        Ok(())
    }
}
