use super::types::{NewsResult, NewsSearchRequest, NewsSearchResponse};
use crate::similar::{SimilarArticle, SimilarArticleSource};
use async_trait::async_trait;
use biaslens_common::{BiasLensError, Result};
use biaslens_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderName, HeaderValue};
use std::borrow::Cow;
use std::time::Duration;

pub const BRAVE_API_BASE: &str = "https://api.search.brave.com/";
const NEWS_PATH: &str = "res/v1/news/search";

/// Minimal client for the Brave Search API (news vertical).
#[derive(Clone)]
pub struct BraveNewsClient {
    http: HttpClient,
    token: String,
}

impl BraveNewsClient {
    pub fn new(subscription_token: String) -> Result<Self> {
        Self::with_endpoint(subscription_token, BRAVE_API_BASE)
    }

    /// Client against a non-default API base (proxy or test server).
    pub fn with_endpoint(subscription_token: String, endpoint: &str) -> Result<Self> {
        let http = HttpClient::new(endpoint)
            .map_err(|e| BiasLensError::Config(format!("brave endpoint {endpoint}: {e}")))?
            .with_timeout(Duration::from_secs(10));
        Ok(Self {
            http,
            token: subscription_token,
        })
    }

    pub async fn search_news(&self, req: &NewsSearchRequest) -> Result<NewsSearchResponse> {
        let mut params: Vec<(&str, Cow<'_, str>)> = Vec::with_capacity(5);
        params.push(("q", req.query.as_str().into()));
        if let Some(v) = req.count {
            params.push(("count", v.to_string().into()));
        }
        if let Some(ref v) = req.country {
            if !v.is_empty() {
                params.push(("country", v.as_str().into()));
            }
        }
        if let Some(ref v) = req.search_lang {
            if !v.is_empty() {
                params.push(("search_lang", v.as_str().into()));
            }
        }
        if let Some(v) = req.freshness {
            params.push(("freshness", v.into()));
        }

        let token = HeaderValue::from_str(&self.token)
            .map_err(|e| BiasLensError::Config(format!("invalid brave token: {e}")))?;
        let resp: NewsSearchResponse = self
            .http
            .get_json(
                NEWS_PATH,
                RequestOpts {
                    auth: Some(Auth::Header {
                        name: HeaderName::from_static("x-subscription-token"),
                        value: token,
                    }),
                    query: Some(params),
                    ..Default::default()
                },
            )
            .await
            .map_err(brave_error)?;

        tracing::info!(
            target: "web.brave",
            query = %req.query,
            results = resp.results.len(),
            "news search complete"
        );
        Ok(resp)
    }
}

fn brave_error(e: HttpError) -> BiasLensError {
    match e {
        HttpError::Timeout(_) => BiasLensError::Timeout,
        other => BiasLensError::Remote(format!("brave news search failed: {other}")),
    }
}

impl From<NewsResult> for SimilarArticle {
    fn from(r: NewsResult) -> Self {
        let source = r
            .meta_url
            .and_then(|m| m.hostname.or(m.netloc))
            .or_else(|| {
                url::Url::parse(&r.url)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
            })
            .unwrap_or_default();
        SimilarArticle {
            title: r.title,
            url: r.url,
            source,
            description: r.description,
            age: r.age.or(r.page_age),
        }
    }
}

#[async_trait]
impl SimilarArticleSource for BraveNewsClient {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SimilarArticle>> {
        // Over-fetch so de-duplication can still fill `count`.
        let want = (count.saturating_mul(2)).clamp(1, 50) as u32;
        let resp = self.search_news(&NewsSearchRequest::new(query, want)).await?;
        Ok(resp.results.into_iter().map(SimilarArticle::from).collect())
    }

    fn name(&self) -> &str {
        "brave"
    }
}
