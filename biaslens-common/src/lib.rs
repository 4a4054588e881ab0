//! Common types and utilities shared across BiasLens crates.
//!
//! This crate defines the error taxonomy, the annotation records exchanged
//! with the classification service, LLM provider configuration and the
//! observability helpers used throughout the BiasLens workspace. It is kept
//! lightweight so that every crate can depend on it.
//!
//! # Overview
//!
//! - [`BiasLensError`] and [`Result`]: shared error handling
//! - [`annotation`]: classifier reply records and the known bias labels
//! - [`LlmConfig`]: provider‑agnostic LLM configuration
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use biaslens_common::{Annotation, BiasLabel};
//!
//! let a = Annotation::new(0, "Strawman", "distorts the opposing view");
//! assert_eq!(a.bias_label(), Some(BiasLabel::Strawman));
//! assert!(!a.is_none());
//! ```
use serde::{Deserialize, Serialize};

pub mod annotation;
pub mod observability;

pub use annotation::{Annotation, BiasLabel};

/// Configuration for an LLM provider.
///
/// Tagged by `provider` so it reads naturally from YAML:
///
/// ```rust
/// use biaslens_common::LlmConfig;
///
/// let cfg: LlmConfig = serde_json::from_str(
///     r#"{"provider":"openai","model":"gpt-4.1-mini","auth_token":"sk-test"}"#,
/// ).unwrap();
/// assert!(matches!(cfg, LlmConfig::Openai { .. }));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    Openai {
        model: String,
        auth_token: String,
        #[serde(default = "default_openai_endpoint")]
        endpoint: String,
        #[serde(default)]
        max_tokens: Option<u32>,
    },
    Ollama {
        model: String,
        #[serde(default = "default_ollama_endpoint")]
        endpoint: String,
        #[serde(default)]
        max_tokens: Option<u32>,
    },
    None,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::Ollama {
            model: "llama3.2:3b".to_string(),
            endpoint: default_ollama_endpoint(),
            max_tokens: None,
        }
    }
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1/".into()
}
fn default_ollama_endpoint() -> String {
    "http://localhost:11434".into()
}

/// Error types used across the BiasLens system.
///
/// The first four variants mirror how the pipeline degrades: selectors that
/// match nothing, page-embedded metadata that fails to parse, failures of the
/// remote services, and annotations whose target element is gone.
#[derive(thiserror::Error, Debug)]
pub enum BiasLensError {
    /// A selector or lookup produced nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The page's structured-data block could not be parsed.
    #[error("malformed structured data: {0}")]
    MalformedStructuredData(String),

    /// A remote service (classifier, search) failed or returned an error.
    #[error("remote call failed: {0}")]
    Remote(String),

    /// An annotation refers to a position no longer present in the document.
    #[error("stale target: position {0}")]
    StaleTarget(u32),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A driver (browser, filesystem, etc.) reported an error.
    #[error("driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Operation exceeded the configured timeout.
    #[error("timeout occurred")]
    Timeout,
}

impl BiasLensError {
    /// Short machine-friendly name of the failure kind, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::MalformedStructuredData(_) => "malformed_structured_data",
            Self::Remote(_) => "remote",
            Self::StaleTarget(_) => "stale_target",
            Self::Config(_) => "config",
            Self::Driver(_) => "driver",
            Self::Timeout => "timeout",
        }
    }
}

/// Convenient alias for results that use [`BiasLensError`].
pub type Result<T> = std::result::Result<T, BiasLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_config_defaults_endpoints() {
        let cfg: LlmConfig =
            serde_json::from_str(r#"{"provider":"ollama","model":"llama3"}"#).unwrap();
        match cfg {
            LlmConfig::Ollama { endpoint, .. } => assert_eq!(endpoint, "http://localhost:11434"),
            other => panic!("unexpected config: {other:?}"),
        }
    }

    #[test]
    fn error_kinds_are_stable() {
        assert_eq!(BiasLensError::StaleTarget(3).kind(), "stale_target");
        assert_eq!(
            BiasLensError::Remote("boom".into()).to_string(),
            "remote call failed: boom"
        );
    }
}
