use crate::prompt::{PromptPayload, SYSTEM_PROMPT};
use crate::{normalize_annotations, Classifier};
use async_trait::async_trait;
use biaslens_common::{Annotation, BiasLensError, Result};
use biaslens_llm::extract_json_block;
use biaslens_llm::traits::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Classifies by prompting a language model with the analysis instructions.
pub struct LlmClassifier {
    llm: Arc<dyn LlmClient + Send + Sync>,
    max_tokens: Option<u32>,
}

impl LlmClassifier {
    pub fn new(llm: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self {
            llm,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Parse a model reply into annotations.
pub fn parse_reply(text: &str) -> Result<Vec<Annotation>> {
    let json = extract_json_block(text)
        .ok_or_else(|| BiasLensError::Remote(format!("model returned no JSON: {}", snippet(text))))?;
    serde_json::from_str::<Vec<Annotation>>(&json)
        .map_err(|e| BiasLensError::Remote(format!("model output is not an annotation list: {e}")))
}

fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, units: &[String]) -> Result<Vec<Annotation>> {
        if units.is_empty() {
            return Ok(Vec::new());
        }
        let prompt = serde_json::to_string(&PromptPayload::new(units))
            .map_err(|e| BiasLensError::Remote(e.to_string()))?;

        tracing::info!(
            target: "classify.llm",
            model = self.llm.model_name(),
            units = units.len(),
            "requesting analysis"
        );
        let response = self
            .llm
            .generate(
                LlmRequest::new(&prompt)
                    .with_system(SYSTEM_PROMPT)
                    .with_max_tokens(self.max_tokens)
                    .deterministic(),
            )
            .await
            .map_err(|e| match e {
                BiasLensError::Remote(_) => e,
                other => BiasLensError::Remote(other.to_string()),
            })?;

        let mut annotations = parse_reply(&response.text)?;
        for annotation in &mut annotations {
            if annotation.text.is_none() {
                annotation.text = annotation
                    .position()
                    .and_then(|p| units.get(p as usize))
                    .cloned();
            }
        }
        Ok(normalize_annotations(annotations, units.len()))
    }

    fn name(&self) -> &str {
        self.llm.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_reply() {
        let raw = "```json\n[{\"index\":0,\"label\":\"Strawman\",\"reason\":\"x\"}]\n```";
        let out = parse_reply(raw).unwrap();
        assert_eq!(out[0].label, "Strawman");
    }

    #[test]
    fn rejects_prose() {
        let err = parse_reply("I could not decide.").unwrap_err();
        assert_eq!(err.kind(), "remote");
    }

    #[test]
    fn rejects_object_reply() {
        assert!(parse_reply("{\"index\": 0}").is_err());
    }
}
