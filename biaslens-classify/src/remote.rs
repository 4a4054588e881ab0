use crate::{normalize_annotations, Classifier};
use async_trait::async_trait;
use biaslens_common::{Annotation, BiasLensError, Result};
use biaslens_http::{HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ANALYZE_PATH: &str = "api/analyze-bias";

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    paragraphs: &'a [String],
}

#[derive(Debug, Deserialize)]
struct HealthReply {
    status: String,
}

/// Client for a deployed bias-analysis service.
pub struct RemoteClassifier {
    client: HttpClient,
}

impl RemoteClassifier {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = HttpClient::new(endpoint)
            .map_err(|e| BiasLensError::Config(format!("analysis endpoint {endpoint}: {e}")))?
            .with_timeout(timeout);
        Ok(Self { client })
    }

    pub fn endpoint(&self) -> &str {
        self.client.base_url().as_str()
    }

    /// True when the service root answers with `{"status": "OK"}`.
    pub async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get_json::<HealthReply>("", RequestOpts::default())
            .await
        {
            Ok(reply) => Ok(reply.status.eq_ignore_ascii_case("ok")),
            Err(e) => {
                tracing::warn!(target: "classify.remote", error = %e, "health check failed");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, units: &[String]) -> Result<Vec<Annotation>> {
        if units.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!(target: "classify.remote", units = units.len(), "requesting analysis");
        let reply: Vec<Annotation> = self
            .client
            .post_json(ANALYZE_PATH, None, &AnalyzeRequest { paragraphs: units })
            .await
            .map_err(remote_error)?;
        Ok(normalize_annotations(reply, units.len()))
    }

    fn name(&self) -> &str {
        "remote"
    }
}

fn remote_error(e: HttpError) -> BiasLensError {
    BiasLensError::Remote(e.to_string())
}
