//! Bias classification of extracted text units.
//!
//! A [`Classifier`] receives the ordered unit texts and returns
//! [`Annotation`]s whose `index` is the unit's position. Two implementations
//! are provided: [`RemoteClassifier`] talks to a deployed analysis service,
//! [`LlmClassifier`] prompts a language model directly.

pub mod llm;
pub mod prompt;
pub mod remote;

use async_trait::async_trait;
use biaslens_common::{Annotation, Result};
use std::collections::BTreeMap;

pub use llm::LlmClassifier;
pub use remote::RemoteClassifier;

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `units` in order. Only units with a bias label are returned,
    /// sorted by index. Empty input never reaches the backend.
    async fn classify(&self, units: &[String]) -> Result<Vec<Annotation>>;

    /// Human-readable backend name for logs and status output.
    fn name(&self) -> &str;
}

/// Drop no-bias and out-of-range entries, keep the last entry per index,
/// and sort by index.
pub fn normalize_annotations(raw: Vec<Annotation>, unit_count: usize) -> Vec<Annotation> {
    let mut by_index = BTreeMap::new();
    for annotation in raw {
        if annotation.is_none() {
            continue;
        }
        match annotation.position() {
            Some(position) if (position as usize) < unit_count => {
                by_index.insert(position, annotation);
            }
            _ => {
                tracing::warn!(index = annotation.index, unit_count, "annotation index out of range");
            }
        }
    }
    by_index.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_reply() {
        let raw = vec![
            Annotation::new(3, "Strawman", "late"),
            Annotation::new(0, "none", ""),
            Annotation::new(1, "Misleading", "first"),
            Annotation::new(1, "Red Herring", "second"),
            Annotation::new(7, "Strawman", "out of range"),
            Annotation::new(-1, "Strawman", "negative"),
        ];
        let out = normalize_annotations(raw, 4);
        let summary: Vec<(i64, &str)> = out.iter().map(|a| (a.index, a.label.as_str())).collect();
        assert_eq!(summary, [(1, "Red Herring"), (3, "Strawman")]);
    }
}
