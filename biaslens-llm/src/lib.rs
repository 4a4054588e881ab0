//! Provider‑agnostic LLM integration for BiasLens.
//!
//! This crate exposes a common [`traits::LlmClient`] interface and concrete
//! provider implementations for OpenAI and Ollama, plus a convenience
//! function to initialize a client from a [`biaslens_common::LlmConfig`].
//!
//! # Examples
//! ```no_run
//! use biaslens_common::{LlmConfig, Result};
//! use biaslens_llm::ensure_llm_ready;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let cfg = LlmConfig::default();
//! let client = ensure_llm_ready(&cfg).await?;
//! assert!(!client.model_name().is_empty());
//! # Ok(())
//! # }
//! ```
pub mod ollama;
pub mod openai;
pub mod traits;

use biaslens_common::{BiasLensError, LlmConfig};
use ollama::OllamaClient;
use openai::OpenAiClient;
use regex::Regex;
use std::sync::Arc;
use traits::LlmClient;

pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

/// Build a client for the configured provider, verifying it is reachable.
pub async fn ensure_llm_ready(
    config: &LlmConfig,
) -> biaslens_common::Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    match config {
        LlmConfig::Ollama {
            endpoint, model, ..
        } => {
            let client = OllamaClient::new(endpoint.clone(), model.clone()).await?;
            Ok(Arc::new(client))
        }
        LlmConfig::Openai {
            model,
            auth_token,
            endpoint,
            ..
        } => {
            let client = OpenAiClient::with_endpoint(auth_token.clone(), model.clone(), endpoint)?;
            Ok(Arc::new(client))
        }
        LlmConfig::None => Err(BiasLensError::Config("No LLM configured".to_string())),
    }
}

/// Pull a JSON document out of model output.
///
/// Prefers a fenced ```` ```json ```` block, then the outermost `[...]` or
/// `{...}` span, whichever starts first.
///
/// ```
/// use biaslens_llm::extract_json_block;
///
/// let raw = "Here you go:\n```json\n[{\"index\":0}]\n```";
/// assert_eq!(extract_json_block(raw).as_deref(), Some("[{\"index\":0}]"));
/// ```
pub fn extract_json_block(text: &str) -> Option<String> {
    let re_fence = Regex::new(r"(?s)```(?:json)?\s*([\[{].*?[\]}])\s*```").ok()?;
    if let Some(caps) = re_fence.captures(text) {
        return Some(caps.get(1)?.as_str().to_string());
    }
    let start = text.find(['[', '{'])?;
    let close = if text[start..].starts_with('[') { ']' } else { '}' };
    let end = text.rfind(close)?;
    (end > start).then(|| text[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_raw_array_in_prose() {
        let raw = "Sure! [{\"index\":1,\"label\":\"None\"}] Hope this helps.";
        assert_eq!(
            extract_json_block(raw).as_deref(),
            Some("[{\"index\":1,\"label\":\"None\"}]")
        );
    }

    #[test]
    fn finds_object_when_it_comes_first() {
        let raw = "{\"selector\": \"p\"}";
        assert_eq!(extract_json_block(raw).as_deref(), Some(raw));
    }

    #[test]
    fn none_without_json() {
        assert_eq!(extract_json_block("no structured output"), None);
    }
}
