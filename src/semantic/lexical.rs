//! Offline comparator based on word overlap
//!
//! Useful for smoke-testing scenario files without model credentials.
//! It only approximates similarity and cannot judge conditions.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::common::{Error, Result};

use super::{SemanticComparator, Verdict};

const DEFAULT_THRESHOLD: f64 = 0.5;

/// Jaccard word-overlap comparator
#[derive(Debug, Clone)]
pub struct LexicalComparator {
    threshold: f64,
}

impl LexicalComparator {
    /// Create a comparator accepting texts whose overlap reaches `threshold` (0.0..=1.0)
    ///
    /// A NaN threshold falls back to the default of 0.5.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }

    /// Word-set overlap of two texts
    pub fn overlap(first: &str, second: &str) -> f64 {
        let a = words(first);
        let b = words(second);
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        let shared = a.intersection(&b).count();
        let total = a.union(&b).count();
        shared as f64 / total as f64
    }
}

impl Default for LexicalComparator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl SemanticComparator for LexicalComparator {
    async fn are_similar(&self, first: &str, second: &str) -> Result<Verdict> {
        let score = Self::overlap(first, second);
        if score >= self.threshold {
            Ok(Verdict::valid())
        } else {
            Ok(Verdict::invalid(format!(
                "Word overlap {:.2} is below the threshold {:.2}",
                score, self.threshold
            )))
        }
    }

    async fn has_condition(&self, _text: &str, condition: &str) -> Result<Verdict> {
        Err(Error::Comparator(format!(
            "the lexical comparator cannot judge conditions ('{condition}'); configure a model endpoint"
        )))
    }
}
