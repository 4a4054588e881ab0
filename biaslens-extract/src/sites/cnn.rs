use crate::extractor::{SiteExtractor, SiteLayout, Walk};
use crate::metadata::MetadataShape;
use crate::site::Site;

static LAYOUT: SiteLayout = SiteLayout {
    containers: &[".article__content", "[data-editable=\"content\"]"],
    walk: Walk::Children,
    metadata: MetadataShape::All,
    paragraph_fallback: Some("p.paragraph"),
};

/// CNN article pages.
pub struct Cnn;

impl SiteExtractor for Cnn {
    fn site(&self) -> Site {
        Site::Cnn
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
        <script type="application/ld+json">{"@type":"WebPage","name":"CNN"}</script>
        <script type="application/ld+json">{"@context":"https://schema.org","@type":"NewsArticle",
          "headline":"Senate passes bill","author":[{"@type":"Person","name":"Jane Doe"}],
          "datePublished":"2025-03-01T10:00:00Z","dateModified":"2025-03-01T12:00:00Z"}</script>
        </head><body><main><div class="article__content">
          <p class="paragraph">The Senate passed the bill on Friday.</p>
          <h2 class="subheader">What comes next</h2>
          <p class="paragraph">The House votes next week.</p>
          <p class="paragraph"><strong>Related:</strong> Other story</p>
          <figure><img src="https://cdn.cnn.com/a.jpg"><figcaption>The Capitol.</figcaption></figure>
          <div class="ad-slot"><p>Advertisement</p></div>
          <p class="paragraph">Critics are unconvinced.</p>
        </div></main></body></html>"#;

    #[test]
    fn extracts_direct_children() {
        assert_eq!(counts(&Cnn, PAGE), (1, 3, 1));
    }

    #[test]
    fn reads_metadata_from_any_script() {
        let meta = Cnn.extract_metadata(&Document::parse(PAGE)).unwrap();
        assert_eq!(meta.title, "Senate passes bill");
        assert_eq!(meta.author, "Jane Doe");
    }

    #[test]
    fn falls_back_to_paragraph_class_without_container() {
        let page = r#"<body><section><p class="paragraph">One.</p><p>Two.</p></section></body>"#;
        assert_eq!(counts(&Cnn, page), (0, 1, 0));
    }
}
