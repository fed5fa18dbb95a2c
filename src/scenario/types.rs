//! Scenario data model

use std::fmt;
use std::sync::Arc;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::assertion::Assertion;

/// Named arguments handed to the invokable, in declaration order
///
/// Names are expected to be unique; this is not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(Vec<(String, String)>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Value of the first argument with this name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for Arguments {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArgumentsVisitor;

        impl<'de> Visitor<'de> for ArgumentsVisitor {
            type Value = Arguments;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of argument names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Arguments, A::Error> {
                let mut args = Arguments::new();
                while let Some((name, value)) = map.next_entry::<String, String>()? {
                    args.insert(name, value);
                }
                Ok(args)
            }
        }

        deserializer.deserialize_map(ArgumentsVisitor)
    }
}

/// A named test case: input arguments plus ordered checks on the output
///
/// Immutable once built; a runner only reads it.
#[derive(Clone)]
pub struct Scenario {
    description: String,
    arguments: Arguments,
    asserts: Vec<Arc<dyn Assertion>>,
}

impl Scenario {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            arguments: Arguments::new(),
            asserts: Vec::new(),
        }
    }

    /// Add an argument
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(name, value);
        self
    }

    /// Replace all arguments
    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    /// Append an assertion; assertions run in the order they are added
    pub fn check(mut self, assertion: impl Assertion + 'static) -> Self {
        self.asserts.push(Arc::new(assertion));
        self
    }

    /// Append an already shared assertion
    pub fn check_shared(mut self, assertion: Arc<dyn Assertion>) -> Self {
        self.asserts.push(assertion);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn asserts(&self) -> &[Arc<dyn Assertion>] {
        &self.asserts
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.asserts.iter().map(|a| a.assertion_type()).collect();
        f.debug_struct("Scenario")
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .field("asserts", &labels)
            .finish()
    }
}
