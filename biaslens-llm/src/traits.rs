use async_trait::async_trait;
use biaslens_common::Result;
use serde::{Deserialize, Serialize};

/// One generation call.
///
/// ```
/// use biaslens_llm::traits::LlmRequest;
///
/// let req = LlmRequest::new("[]").with_system("Reply with JSON.").deterministic();
/// assert_eq!(req.temperature, Some(0.0));
/// assert_eq!(req.system, Some("Reply with JSON."));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LlmRequest<'a> {
    pub prompt: &'a str,
    pub system: Option<&'a str>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl<'a> LlmRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            ..Self::default()
        }
    }

    pub fn with_system(mut self, system: &'a str) -> Self {
        self.system = Some(system);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Temperature 0, so repeated analyses of a page agree.
    pub fn deterministic(mut self) -> Self {
        self.temperature = Some(0.0);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, request: LlmRequest<'_>) -> Result<LlmResponse>;

    /// Whether the provider answers at all.
    async fn health_check(&self) -> Result<bool>;

    fn model_name(&self) -> &str;
}
