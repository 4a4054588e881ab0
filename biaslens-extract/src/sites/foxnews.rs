use crate::extractor::{SiteExtractor, SiteLayout, Walk};
use crate::metadata::MetadataShape;
use crate::site::Site;

static LAYOUT: SiteLayout = SiteLayout {
    containers: &[".article-body", ".article-content"],
    walk: Walk::Children,
    metadata: MetadataShape::All,
    paragraph_fallback: None,
};

pub struct FoxNews;

impl SiteExtractor for FoxNews {
    fn site(&self) -> Site {
        Site::FoxNews
    }

    fn layout(&self) -> &SiteLayout {
        &LAYOUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::sites::testing::counts;

    const PAGE: &str = r#"<html><head>
        <script type="application/ld+json">{"@type":"NewsArticle","headline":"Fox headline",
          "author":{"@type":"Person","name":"John Roe"},"datePublished":"2025-02-02"}</script>
        </head><body><div class="article-body">
          <p>First paragraph.</p>
          <p><strong>CLICK HERE TO GET THE FOX NEWS APP</strong></p>
          <h2>Background</h2>
          <h3>Details</h3>
          <p>Second paragraph.</p>
          <figure><img src="/fox.jpg"></figure>
          <figure><img src="/fox2.jpg"><figcaption>Second image</figcaption></figure>
        </div></body></html>"#;

    #[test]
    fn skips_bold_promos() {
        assert_eq!(counts(&FoxNews, PAGE), (2, 2, 2));
    }

    #[test]
    fn missing_dates_use_sentinel() {
        let meta = FoxNews.extract_metadata(&Document::parse(PAGE)).unwrap();
        assert_eq!(meta.author, "John Roe");
        assert_eq!(meta.date_modified, crate::block::NOT_FOUND);
    }

    #[test]
    fn no_container_is_not_found() {
        let err = FoxNews
            .extract_content(&Document::parse("<body><p>loose</p></body>"))
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
