use anyhow::Context;
use async_trait::async_trait;
use biaslens_common::{BiasLensError, Result};
use biaslens_drivers::{BiasLensDriver, DriverOptions};
use biaslens_http::{HttpClient, RequestOpts};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Page source as retrieved, with the address it was finally served from.
#[derive(Debug, Clone)]
pub struct PageCapture {
    pub url: Url,
    pub html: String,
}

#[async_trait]
pub trait PageCapturer: Send + Sync {
    async fn capture(&self, url: &Url) -> Result<PageCapture>;
}

/// Renders the page in a WebDriver-controlled browser.
pub struct BrowserCapturer {
    options: DriverOptions,
}

impl BrowserCapturer {
    pub fn new(options: DriverOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl PageCapturer for BrowserCapturer {
    async fn capture(&self, url: &Url) -> Result<PageCapture> {
        let driver = BiasLensDriver::connect(self.options.clone()).await?;
        let result = async {
            let page = driver.goto(url.as_str()).await?;
            page.scroll_to_end().await?;
            let html = page.content().await?;
            let final_url = page.url().await?;
            let final_url = Url::parse(&final_url)
                .with_context(|| format!("browser reported invalid url {final_url}"))?;
            anyhow::Ok(PageCapture {
                url: final_url,
                html,
            })
        }
        .await;
        // Always attempt to close the session before returning
        if let Err(e) = driver.close().await {
            tracing::warn!(target: "web.capture", error = %e, "failed to close browser session");
        }
        Ok(result?)
    }
}

/// Fetches raw HTML without running scripts.
pub struct HttpCapturer {
    http: HttpClient,
}

impl HttpCapturer {
    pub fn new(timeout: Duration) -> Result<Self> {
        // Base is unused: every capture passes an absolute URL.
        let http = HttpClient::new("http://localhost/")
            .map_err(|e| BiasLensError::Config(e.to_string()))?
            .with_timeout(timeout);
        Ok(Self { http })
    }
}

#[async_trait]
impl PageCapturer for HttpCapturer {
    async fn capture(&self, url: &Url) -> Result<PageCapture> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        let html = self
            .http
            .get_text(
                url.as_str(),
                RequestOpts {
                    headers: Some(headers),
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| BiasLensError::Remote(format!("fetching {url}: {e}")))?;
        tracing::debug!(target: "web.capture", %url, bytes = html.len(), "page fetched");
        Ok(PageCapture {
            url: url.clone(),
            html,
        })
    }
}

/// Reads previously saved page source from disk.
pub struct FileCapturer {
    path: PathBuf,
}

impl FileCapturer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageCapturer for FileCapturer {
    async fn capture(&self, url: &Url) -> Result<PageCapture> {
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| BiasLensError::NotFound(format!("{}: {e}", self.path.display())))?;
        Ok(PageCapture {
            url: url.clone(),
            html,
        })
    }
}
