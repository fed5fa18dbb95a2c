//! Scenario file format
//!
//! Defines the data structures for deserializing YAML scenario files:
//!
//! ```yaml
//! scenarios:
//!   - description: greeting
//!     arguments:
//!       name: Ada
//!     asserts:
//!       - check: contains_all
//!         texts: ["Ada"]
//!       - check: semantic_similar
//!         expected: "Hello Ada, nice to meet you"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::common::{Error, Result};

use super::assertion::Check;
use super::types::{Arguments, Scenario};

/// A scenario file: one or more scenarios run in order
#[derive(Deserialize, Debug)]
pub struct ScenarioFile {
    pub scenarios: Vec<ScenarioDefinition>,
}

/// A single scenario as written in a file
#[derive(Deserialize, Debug)]
pub struct ScenarioDefinition {
    /// What the scenario checks
    pub description: String,
    /// Named inputs, in the order they are passed on
    #[serde(default)]
    pub arguments: Arguments,
    /// Checks on the answer, evaluated in order
    #[serde(default)]
    pub asserts: Vec<Check>,
}

impl From<ScenarioDefinition> for Scenario {
    fn from(def: ScenarioDefinition) -> Self {
        def.asserts.into_iter().fold(
            Scenario::new(def.description).with_arguments(def.arguments),
            |scenario, check| scenario.check(check),
        )
    }
}

impl ScenarioFile {
    /// Parse scenario file content
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ScenarioParse {
            path: origin.to_string(),
            error: e.to_string(),
        })
    }

    pub fn into_scenarios(self) -> Vec<Scenario> {
        self.scenarios.into_iter().map(Scenario::from).collect()
    }
}

/// Load every scenario of a YAML file
pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    let file = ScenarioFile::parse(&content, &path.display().to_string())?;
    Ok(file.into_scenarios())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario_file() {
        let file = ScenarioFile::parse(
            r#"
scenarios:
  - description: greeting
    arguments:
      name: Ada
      tone: formal
    asserts:
      - check: contains_all
        texts: ["Ada"]
      - check: not_contains
        texts: ["Grace"]
  - description: no inputs
    asserts:
      - check: not_empty
"#,
            "inline",
        )
        .unwrap();

        let scenarios = file.into_scenarios();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].description(), "greeting");
        assert_eq!(scenarios[0].arguments().get("tone"), Some("formal"));
        let labels: Vec<String> = scenarios[0]
            .asserts()
            .iter()
            .map(|a| a.assertion_type())
            .collect();
        assert_eq!(labels, vec!["ContainsAll", "NotContains"]);
        assert!(scenarios[1].arguments().is_empty());
    }

    #[test]
    fn test_unknown_check_is_parse_error() {
        let err = ScenarioFile::parse(
            "scenarios:\n  - description: x\n    asserts:\n      - check: sounds_nice\n",
            "bad.yaml",
        )
        .unwrap_err();
        match err {
            Error::ScenarioParse { path, .. } => assert_eq!(path, "bad.yaml"),
            other => panic!("Expected ScenarioParse, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_scenarios(Path::new("/nonexistent/scenarios.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
