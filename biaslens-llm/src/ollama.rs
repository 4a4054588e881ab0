use crate::traits::{LlmClient, LlmRequest, LlmResponse};
use async_trait::async_trait;
use biaslens_common::{BiasLensError, Result};
use biaslens_http::{HttpClient, RequestOpts};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

const OLLAMA_CONNECTION_ERROR: &str = "No running Ollama server detected. Start it with: `ollama serve` (after installing). Install instructions: https://github.com/ollama/ollama";

/// Ollama client for local model inference.
///
/// Expects a running Ollama server (see https://github.com/ollama/ollama).
pub struct OllamaClient {
    client: HttpClient,
    model: String,
}

impl OllamaClient {
    /// Create a new client and verify server/model availability.
    pub async fn new(base_url: String, model: String) -> Result<Self> {
        let client = Self::unchecked(&base_url, model)?;
        client.ping_server().await?;
        client.ensure_model_available().await?;
        Ok(client)
    }

    /// Create a client without contacting the server.
    pub fn unchecked(base_url: &str, model: String) -> Result<Self> {
        let client = HttpClient::new(base_url)
            .map_err(|e| BiasLensError::Config(format!("Failed to create HTTP client: {e}")))?
            .with_timeout(Duration::from_secs(300));
        Ok(Self { client, model })
    }

    async fn ping_server(&self) -> Result<()> {
        self.client
            .get_json::<JsonValue>("api/tags", RequestOpts::default())
            .await
            .map(|_| ())
            .map_err(|_| BiasLensError::Remote(OLLAMA_CONNECTION_ERROR.to_string()))
    }

    async fn ensure_model_available(&self) -> Result<()> {
        let models = self.fetch_available_models().await?;

        if !models.iter().any(|m| m == &self.model) {
            tracing::info!(target: "llm.ollama", model = %self.model, "model not found locally, pulling");
            self.pull_model().await?;
        }

        Ok(())
    }

    async fn fetch_available_models(&self) -> Result<Vec<String>> {
        let val: JsonValue = self
            .client
            .get_json("api/tags", RequestOpts::default())
            .await
            .map_err(|e| BiasLensError::Remote(format!("Failed to fetch models: {e}")))?;

        let models = val
            .get("models")
            .and_then(|m| m.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.get("name").and_then(|n| n.as_str()))
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    async fn pull_model(&self) -> Result<()> {
        let payload = json!({ "model": self.model, "stream": false });
        self.client
            .post_json::<_, JsonValue>("api/pull", None, &payload)
            .await
            .map_err(|e| BiasLensError::Remote(format!("Failed to pull model: {e}")))?;
        tracing::info!(target: "llm.ollama", model = %self.model, "pulled model");
        Ok(())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, request: LlmRequest<'_>) -> Result<LlmResponse> {
        let mut options = serde_json::Map::new();
        if let Some(temp) = request.temperature {
            options.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max_tok) = request.max_tokens {
            options.insert("num_predict".to_string(), json!(max_tok));
        }

        let mut payload = json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": options
        });
        if let Some(system) = request.system {
            payload["system"] = json!(system);
        }
        tracing::debug!(
            target: "llm.ollama",
            model = %self.model,
            prompt_len = request.prompt.len(),
            "generate"
        );

        let val: JsonValue = self
            .client
            .post_json("api/generate", None, &payload)
            .await
            .map_err(|e| BiasLensError::Remote(format!("Generate request failed: {e}")))?;

        let text = val
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string();

        let tokens_used = val
            .get("eval_count")
            .and_then(|c| c.as_u64())
            .map(|c| c as u32);

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.ping_server().await.is_ok())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
