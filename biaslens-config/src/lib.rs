//! Loader for BiasLens configuration with YAML + environment overlays.
//!
//! Sources are merged in order: an optional YAML file (`biaslens.yaml` by
//! convention), inline YAML snippets, then `BIASLENS__`-prefixed environment
//! variables (`BIASLENS__CLASSIFIER__ENDPOINT=...`). After merging, every
//! string value has `${VAR}` placeholders expanded, recursively up to a fixed
//! depth. Every section is optional.
use biaslens_common::LlmConfig;
use biaslens_common::observability::LogFormat;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Default, Deserialize)]
pub struct BiasLensConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which classification service to talk to. The tag is `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierConfig {
    /// The bias-analysis HTTP backend (`POST /api/analyze-bias`).
    Remote {
        #[serde(default = "default_classifier_endpoint")]
        endpoint: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// Classify in-process through an LLM provider.
    Llm {
        config: LlmConfig,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::Remote {
            endpoint: default_classifier_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub brave_token: Option<String>,
    #[serde(default = "default_search_count")]
    pub count: usize,
    #[serde(default = "default_brave_endpoint")]
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            brave_token: None,
            count: default_search_count(),
            endpoint: default_brave_endpoint(),
        }
    }
}

impl SearchConfig {
    /// The subscription token, unless it is blank or an unresolved `${VAR}`.
    pub fn token(&self) -> Option<&str> {
        self.brave_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.contains("${"))
    }
}

#[derive(Debug, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webdriver_url: default_webdriver_url(),
            headless: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub stderr: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_classifier_endpoint() -> String {
    "http://localhost:8000".into()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_search_count() -> usize {
    5
}
fn default_brave_endpoint() -> String {
    "https://api.search.brave.com/".into()
}
fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_true() -> bool {
    true
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct BiasLensConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for BiasLensConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BiasLensConfigLoader {
    /// Start with no file sources; `BIASLENS__` environment overrides are
    /// always applied last, on top of everything else.
    ///
    /// ```
    /// use biaslens_config::{BiasLensConfigLoader, ClassifierConfig};
    ///
    /// let config = BiasLensConfigLoader::new().load().expect("empty config is valid");
    /// assert!(matches!(config.classifier, ClassifierConfig::Remote { .. }));
    /// assert_eq!(config.search.count, 5);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, so environment-only deployments work.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use biaslens_config::{BiasLensConfigLoader, ClassifierConfig};
    ///
    /// let cfg = BiasLensConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "test"
    /// classifier:
    ///   kind: remote
    ///   endpoint: "https://bias.example.com"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("test"));
    /// match cfg.classifier {
    ///     ClassifierConfig::Remote { endpoint, timeout_secs } => {
    ///         assert_eq!(endpoint, "https://bias.example.com");
    ///         assert_eq!(timeout_secs, 60);
    ///     }
    ///     _ => panic!("expected remote classifier"),
    /// }
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    pub fn load(self) -> Result<BiasLensConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("BIASLENS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: BiasLensConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
