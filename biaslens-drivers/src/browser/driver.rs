use crate::browser::page::BiasLensPage;
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use webdriver::capabilities::Capabilities;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub webdriver_url: String,
    pub headless: bool,
    /// Upper bound on waiting for the document body after navigation.
    pub load_timeout: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            load_timeout: Duration::from_secs(30),
        }
    }
}

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct BiasLensDriver {
    pub client: Client,
    options: DriverOptions,
}

fn chrome_arguments(headless: bool) -> Vec<&'static str> {
    let mut args = vec!["--disable-dev-shm-usage", "--no-first-run", "--window-size=1366,900"];
    if headless {
        args.push("--headless=new");
        args.push("--disable-gpu");
    }
    args
}

impl BiasLensDriver {
    /// Connect to a running WebDriver service (Chromedriver by default).
    pub async fn connect(options: DriverOptions) -> Result<Self> {
        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": chrome_arguments(options.headless) }),
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .with_context(|| format!("connecting to WebDriver at {}", options.webdriver_url))?;

        tracing::info!(
            target: "browser.driver",
            url = %options.webdriver_url,
            headless = options.headless,
            "webdriver session started"
        );
        Ok(Self { client, options })
    }

    /// Navigate to `url` and wait for the document body.
    pub async fn goto(&self, url: &str) -> Result<BiasLensPage> {
        let page = BiasLensPage::new(self.client.clone(), self.options.load_timeout);
        page.goto(url).await?;
        Ok(page)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
