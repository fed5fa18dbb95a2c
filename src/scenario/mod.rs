//! Scenario execution
//!
//! A [`Scenario`] bundles named input arguments with an ordered list of
//! [`Assertion`]s on the answer. The [`ScenarioRunner`] invokes the function
//! under test once per scenario and evaluates the assertions in order,
//! either expecting all of them to pass or expecting one of them to fail.

mod assertion;
mod config;
mod invoke;
mod runner;
mod types;

pub use assertion::{Assertion, AssertionFailure, AssertionOutcome, Check, FailureKind};
pub use config::{load_scenarios, ScenarioDefinition, ScenarioFile};
pub use invoke::{argument_env_name, CommandInvokable, Invokable, ARG_ENV_PREFIX};
pub use runner::{RunnerBuilder, ScenarioOutcome, ScenarioRunner};
pub use types::{Arguments, Scenario};
