use crate::document::ElementHandle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Sentinel for metadata fields the page does not provide.
pub const NOT_FOUND: &str = "Not found";

/// Zero-based index of a text unit in the sequence sent for classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PositionId(pub u32);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PositionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PositionId)
    }
}

impl From<u32> for PositionId {
    fn from(value: u32) -> Self {
        PositionId(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Subheading,
    Paragraph,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    pub src: String,
    pub caption: String,
}

/// One typed unit of article body content, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageContent>,
    #[serde(skip)]
    pub source: ElementHandle,
}

impl ContentBlock {
    pub fn subheading(text: impl Into<String>, source: ElementHandle) -> Self {
        Self {
            kind: BlockKind::Subheading,
            text: text.into(),
            image: None,
            source,
        }
    }

    pub fn paragraph(text: impl Into<String>, source: ElementHandle) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: text.into(),
            image: None,
            source,
        }
    }

    pub fn image(
        src: impl Into<String>,
        caption: impl Into<String>,
        source: ElementHandle,
    ) -> Self {
        Self {
            kind: BlockKind::Image,
            text: String::new(),
            image: Some(ImageContent {
                src: src.into(),
                caption: caption.into(),
            }),
            source,
        }
    }

    /// Text-bearing blocks with non-blank text become classification units.
    pub fn is_text_unit(&self) -> bool {
        self.kind != BlockKind::Image && !self.text.trim().is_empty()
    }
}

/// A text block tagged with its position for the current pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextUnit {
    pub position: PositionId,
    pub kind: BlockKind,
    pub text: String,
    #[serde(skip)]
    pub source: ElementHandle,
}

/// Article-level metadata. Missing fields hold [`NOT_FOUND`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub title: String,
    pub author: String,
    pub description: String,
    pub date_published: String,
    pub date_modified: String,
}

impl Default for ArticleMetadata {
    fn default() -> Self {
        Self {
            title: NOT_FOUND.to_string(),
            author: NOT_FOUND.to_string(),
            description: NOT_FOUND.to_string(),
            date_published: NOT_FOUND.to_string(),
            date_modified: NOT_FOUND.to_string(),
        }
    }
}

impl ArticleMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Best search phrase for this article: the title, else the description.
    pub fn search_query(&self) -> Option<&str> {
        [self.title.as_str(), self.description.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|v| !v.is_empty() && *v != NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_skips_sentinels() {
        let mut meta = ArticleMetadata::default();
        assert_eq!(meta.search_query(), None);
        meta.description = "About a storm".into();
        assert_eq!(meta.search_query(), Some("About a storm"));
        meta.title = "Storm".into();
        assert_eq!(meta.search_query(), Some("Storm"));
    }

    #[test]
    fn position_round_trips_through_attribute_text() {
        assert_eq!(" 12".parse::<PositionId>().unwrap(), PositionId(12));
        assert!("x".parse::<PositionId>().is_err());
    }
}
