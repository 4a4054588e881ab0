use serde::{Deserialize, Serialize};

/// Query parameters for the Brave News Search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct NewsSearchRequest {
    #[serde(rename = "q")]
    pub query: String,

    /// Results per page (Brave caps this at 50)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Country code (ISO 3166-1 alpha-2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Search language (ISO 639-1, e.g., "en")
    #[serde(rename = "search_lang", skip_serializing_if = "Option::is_none")]
    pub search_lang: Option<String>,

    /// Freshness: "pd" (day), "pw" (week), "pm" (month), "py" (year)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<&'static str>,
}

impl NewsSearchRequest {
    pub fn new(query: impl Into<String>, count: u32) -> Self {
        Self {
            query: query.into(),
            count: Some(count),
            country: None,
            search_lang: None,
            freshness: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSearchResponse {
    /// Always "news"
    #[serde(rename = "type", default)]
    pub r#type: String,

    #[serde(default)]
    pub results: Vec<NewsResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResult {
    pub title: String,
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
    /// Human-readable age, e.g. "2 hours ago"
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub page_age: Option<String>,
    #[serde(default)]
    pub meta_url: Option<MetaUrl>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaUrl {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub netloc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub src: String,
}
