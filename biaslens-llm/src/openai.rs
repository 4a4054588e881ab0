use crate::traits::{LlmClient, LlmRequest, LlmResponse};
use async_trait::async_trait;
use biaslens_common::{BiasLensError, Result};
use biaslens_http::{HttpClient, HttpError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";
const DEFAULT_INSTRUCTIONS: &str = "You are a careful media analyst. Answer briefly.";

pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ResponsesApiRequest<'a> {
    model: &'a str,
    input: &'a str,
    instructions: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    model: String,
    #[serde(default)]
    output: Vec<ResponseMessage>,
    #[serde(default)]
    usage: Option<Usage>,
}

/// One element in the `output` array
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Vec<ResponseContent>,
}

/// One part of the message `content`
#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

impl OpenAiClient {
    /// Create a new client for the given API key and model.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_endpoint(api_key, model, OPENAI_API_BASE)
    }

    /// Create a client against an OpenAI-compatible endpoint (gateway, proxy, test server).
    pub fn with_endpoint(api_key: String, model: String, endpoint: &str) -> Result<Self> {
        let client = HttpClient::new(endpoint)
            .map_err(|e| BiasLensError::Config(format!("HttpClient init failed: {e}")))?
            .with_timeout(Duration::from_secs(120));

        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(&self, request: LlmRequest<'_>) -> Result<LlmResponse> {
        let req = ResponsesApiRequest {
            model: &self.model,
            input: request.prompt,
            instructions: request.system.unwrap_or(DEFAULT_INSTRUCTIONS),
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        };

        tracing::debug!(
            target: "llm.openai",
            model = %self.model,
            prompt_len = request.prompt.len(),
            "generate"
        );

        let resp: ResponsesApiResponse = self
            .client
            .post_json("responses", Some(&self.api_key), &req)
            .await
            .map_err(http_to_biaslens)?;

        let text = resp
            .output
            .iter()
            .flat_map(|msg| &msg.content)
            .find(|c| c.kind == "output_text")
            .map(|c| c.text.clone())
            .unwrap_or_default();

        Ok(LlmResponse {
            text,
            model: Some(resp.model),
            tokens_used: resp.usage.map(|u| u.total_tokens),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let check = LlmRequest::new("Respond with just 'OK'")
            .with_max_tokens(Some(16))
            .deterministic();
        match self.generate(check).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(target: "llm.openai", error = %e, "health check failed");
                Ok(false)
            }
        }
    }
}

fn http_to_biaslens(e: HttpError) -> BiasLensError {
    match e {
        HttpError::Timeout(_) => BiasLensError::Timeout,
        other => BiasLensError::Remote(other.to_string()),
    }
}
