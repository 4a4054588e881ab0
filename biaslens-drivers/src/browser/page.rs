use anyhow::{Context, Result};
use fantoccini::{Client, Locator};
use serde_json::Value;
use std::time::Duration;

/// A navigated page in a WebDriver session.
pub struct BiasLensPage {
    pub(crate) client: Client,
    load_timeout: Duration,
}

impl BiasLensPage {
    pub fn new(client: Client, load_timeout: Duration) -> Self {
        Self {
            client,
            load_timeout,
        }
    }

    /// Navigate to `url` and wait until the body is present.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.client
            .goto(url)
            .await
            .with_context(|| format!("navigating to {url}"))?;
        self.wait_for("body").await
    }

    /// Wait for an element matching `selector`, bounded by the load timeout.
    pub async fn wait_for(&self, selector: &str) -> Result<()> {
        self.client
            .wait()
            .at_most(self.load_timeout)
            .for_element(Locator::Css(selector))
            .await
            .with_context(|| format!("waiting for {selector}"))?;
        Ok(())
    }

    /// Return the full page HTML source.
    pub async fn content(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::msg)
    }

    pub async fn title(&self) -> Result<String> {
        self.client.title().await.map_err(anyhow::Error::msg)
    }

    /// Return the current page URL, which may differ from the requested one after redirects.
    pub async fn url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::msg)
    }

    /// Run a script in the page and return its result.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.client
            .execute(script, args)
            .await
            .map_err(anyhow::Error::from)
    }

    /// Scroll to the bottom so lazily loaded article sections render.
    pub async fn scroll_to_end(&self) -> Result<()> {
        self.execute("window.scrollTo(0, document.body.scrollHeight);", vec![])
            .await?;
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(())
    }
}
