//! Article metadata from embedded JSON-LD.

use crate::block::{ArticleMetadata, NOT_FOUND};
use crate::document::{selector, Document};
use biaslens_common::{BiasLensError, Result};
use serde_json::Value;

/// `@type` values accepted as the article record.
pub const ARTICLE_TYPES: [&str; 2] = ["NewsArticle", "ReportageNewsArticle"];

const LD_JSON: &str = r#"script[type="application/ld+json"]"#;

/// How a site embeds its structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataShape {
    /// Only the first structured-data script is considered.
    First,
    /// Every script, in document order.
    All,
    /// Every script, with `@graph` members searched before top-level records.
    Graph,
}

/// Locate the news-article record and lift its fields.
///
/// Fails with [`BiasLensError::NotFound`] when no record qualifies and with
/// [`BiasLensError::MalformedStructuredData`] when every script present is
/// unparseable.
pub fn extract_structured_metadata(doc: &Document, shape: MetadataShape) -> Result<ArticleMetadata> {
    let scripts = doc.select(&selector(LD_JSON)?);
    let scripts = match shape {
        MetadataShape::First => &scripts[..scripts.len().min(1)],
        MetadataShape::All | MetadataShape::Graph => &scripts[..],
    };
    if scripts.is_empty() {
        return Err(BiasLensError::NotFound("no structured data scripts".into()));
    }

    let mut candidates = Vec::new();
    let mut last_error = None;
    let mut parsed = 0usize;
    for script in scripts {
        let raw = doc.raw_text(*script);
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => {
                parsed += 1;
                flatten_candidates(value, &mut candidates);
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparseable structured data");
                last_error = Some(e.to_string());
            }
        }
    }
    if parsed == 0 {
        return Err(BiasLensError::MalformedStructuredData(
            last_error.unwrap_or_default(),
        ));
    }

    if shape == MetadataShape::Graph {
        candidates.sort_by_key(|c| !c.from_graph);
    }
    candidates
        .iter()
        .find(|c| is_news_article(&c.value))
        .map(|c| metadata_from_record(&c.value))
        .ok_or_else(|| BiasLensError::NotFound("no news article record".into()))
}

struct Candidate {
    value: Value,
    from_graph: bool,
}

/// Normalise top-level arrays and `@graph` wrappers into one record list.
fn flatten_candidates(value: Value, out: &mut Vec<Candidate>) {
    flatten_into(value, false, out)
}

fn flatten_into(value: Value, from_graph: bool, out: &mut Vec<Candidate>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, from_graph, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_into(graph, true, out);
            }
            if !map.is_empty() {
                out.push(Candidate {
                    value: Value::Object(map),
                    from_graph,
                });
            }
        }
        _ => {}
    }
}

pub fn is_news_article(record: &Value) -> bool {
    match record.get("@type") {
        Some(Value::String(t)) => ARTICLE_TYPES.contains(&t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| ARTICLE_TYPES.contains(&t)),
        _ => false,
    }
}

pub fn metadata_from_record(record: &Value) -> ArticleMetadata {
    let text = |key: &str| {
        record
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let or_missing = |v: Option<String>| v.unwrap_or_else(|| NOT_FOUND.to_string());

    ArticleMetadata {
        title: or_missing(text("headline").or_else(|| text("name"))),
        author: or_missing(record.get("author").and_then(author_name)),
        description: or_missing(text("description")),
        date_published: or_missing(text("datePublished")),
        date_modified: or_missing(text("dateModified")),
    }
}

/// Author can be an object, a list (first entry wins) or a bare string.
fn author_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Object(map) => map.get("name").and_then(author_name),
        Value::Array(items) => items.first().and_then(author_name),
        _ => None,
    }
}
