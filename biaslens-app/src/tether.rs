use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use biaslens_classify::{Classifier, LlmClassifier, RemoteClassifier};
use biaslens_common::LlmConfig;
use biaslens_config::{BiasLensConfig, ClassifierConfig, SearchConfig};
use biaslens_drivers::DriverOptions;
use biaslens_llm::ensure_llm_ready;
use biaslens_web::{
    BraveNewsClient, BrowserCapturer, FileCapturer, HttpCapturer, PageCapturer,
    SimilarArticleSource,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// How the page source is obtained for a run.
#[derive(Debug, Clone, Default)]
pub enum CaptureMode {
    /// Read saved HTML instead of fetching.
    File(PathBuf),
    /// Render through WebDriver.
    Browser,
    /// Plain HTTP GET.
    #[default]
    Http,
}

impl CaptureMode {
    /// Saved HTML wins, then an explicit or configured browser.
    pub fn choose(html: Option<PathBuf>, browser_flag: bool, cfg: &BiasLensConfig) -> Self {
        match html {
            Some(path) => CaptureMode::File(path),
            None if browser_flag || cfg.browser.enabled => CaptureMode::Browser,
            None => CaptureMode::Http,
        }
    }
}

pub async fn build_classifier(cfg: &ClassifierConfig) -> Result<Arc<dyn Classifier>> {
    match cfg {
        ClassifierConfig::Remote {
            endpoint,
            timeout_secs,
        } => {
            let classifier = RemoteClassifier::new(endpoint, Duration::from_secs(*timeout_secs))
                .with_context(|| format!("invalid classifier endpoint {endpoint}"))?;
            tracing::info!(endpoint, "using remote classifier");
            Ok(Arc::new(classifier))
        }
        ClassifierConfig::Llm { config, .. } => {
            let llm = ensure_llm_ready(config).await?;
            let max_tokens = match config {
                LlmConfig::Openai { max_tokens, .. } | LlmConfig::Ollama { max_tokens, .. } => {
                    *max_tokens
                }
                LlmConfig::None => None,
            };
            tracing::info!("using in-process LLM classifier");
            Ok(Arc::new(LlmClassifier::new(llm).with_max_tokens(max_tokens)))
        }
    }
}

pub fn build_capturer(mode: &CaptureMode, cfg: &BiasLensConfig) -> Result<Arc<dyn PageCapturer>> {
    let capturer: Arc<dyn PageCapturer> = match mode {
        CaptureMode::File(path) => Arc::new(FileCapturer::new(path.clone())),
        CaptureMode::Browser => Arc::new(BrowserCapturer::new(DriverOptions {
            webdriver_url: cfg.browser.webdriver_url.clone(),
            headless: cfg.browser.headless,
            load_timeout: PAGE_TIMEOUT,
        })),
        CaptureMode::Http => Arc::new(HttpCapturer::new(PAGE_TIMEOUT)?),
    };
    Ok(capturer)
}

/// `None` when no search token is configured.
pub fn build_similar(search: &SearchConfig) -> Result<Option<Arc<dyn SimilarArticleSource>>> {
    let Some(token) = search.token() else {
        tracing::debug!("no Brave token configured; similar articles disabled");
        return Ok(None);
    };
    let client: Arc<dyn SimilarArticleSource> =
        Arc::new(BraveNewsClient::with_endpoint(token.to_string(), &search.endpoint)?);
    Ok(Some(client))
}

pub async fn build_from_config(
    cfg: &BiasLensConfig,
    mode: &CaptureMode,
    with_similar: bool,
) -> Result<Pipeline> {
    let classifier = build_classifier(&cfg.classifier).await?;
    let capturer = build_capturer(mode, cfg)?;
    let mut pipeline = Pipeline::new(capturer, classifier);
    if with_similar {
        if let Some(source) = build_similar(&cfg.search)? {
            pipeline = pipeline.with_similar(source, cfg.search.count);
        }
    }
    Ok(pipeline)
}
