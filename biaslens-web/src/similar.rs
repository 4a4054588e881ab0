use async_trait::async_trait;
use biaslens_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Coverage of the same story from another outlet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarArticle {
    pub title: String,
    pub url: String,
    /// Publishing host, e.g. `www.bbc.com`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

#[async_trait]
pub trait SimilarArticleSource: Send + Sync {
    /// Raw search hits for `query`; callers de-duplicate.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SimilarArticle>>;

    fn name(&self) -> &str;

    /// Up to `count` distinct articles, never including `exclude_url`.
    async fn find(
        &self,
        query: &str,
        exclude_url: Option<&str>,
        count: usize,
    ) -> Result<Vec<SimilarArticle>> {
        if count == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let hits = self.search(query.trim(), count).await?;
        Ok(dedupe_similar(hits, exclude_url, count))
    }
}

/// Comparison key: scheme and host lower-cased, query and fragment dropped,
/// trailing `/` trimmed.
///
/// ```
/// use biaslens_web::similar::url_key;
///
/// assert_eq!(
///     url_key("HTTPS://Example.COM/a/b/?utm_source=x#top").as_deref(),
///     Some("https://example.com/a/b")
/// );
/// ```
pub fn url_key(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    url.set_query(None);
    url.set_fragment(None);
    Some(url.as_str().trim_end_matches('/').to_string())
}

/// Remove duplicates and the article itself, keeping first-seen order.
pub fn dedupe_similar(
    hits: Vec<SimilarArticle>,
    exclude_url: Option<&str>,
    count: usize,
) -> Vec<SimilarArticle> {
    let mut seen: HashSet<String> = HashSet::new();
    if let Some(key) = exclude_url.and_then(url_key) {
        seen.insert(key);
    }
    hits.into_iter()
        .filter(|hit| match url_key(&hit.url) {
            Some(key) => seen.insert(key),
            None => false,
        })
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str) -> SimilarArticle {
        SimilarArticle {
            title: url.to_string(),
            url: url.to_string(),
            source: String::new(),
            description: None,
            age: None,
        }
    }

    #[test]
    fn drops_self_duplicates_and_invalid_urls() {
        let hits = vec![
            hit("https://www.cnn.com/story/?ref=brave"),
            hit("https://www.bbc.com/news/1"),
            hit("https://WWW.BBC.COM/news/1/#comments"),
            hit("not a url"),
            hit("https://apnews.com/article/2"),
            hit("https://thehill.com/3"),
        ];
        let out = dedupe_similar(hits, Some("https://www.cnn.com/story"), 2);
        let urls: Vec<&str> = out.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, ["https://www.bbc.com/news/1", "https://apnews.com/article/2"]);
    }

    #[test]
    fn count_zero_is_empty() {
        assert!(dedupe_similar(vec![hit("https://a.com/")], None, 0).is_empty());
    }
}
