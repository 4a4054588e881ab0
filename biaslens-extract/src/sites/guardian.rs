use crate::extractor::{SiteExtractor, SiteLayout, Walk};
use crate::metadata::MetadataShape;
use crate::site::Site;

static LAYOUT: SiteLayout = SiteLayout {
    containers: &[
        "[data-gu-name=\"body\"]",
        ".article-body-commercial-selector",
        "#maincontent",
    ],
    walk: Walk::Descendants,
    metadata: MetadataShape::All,
    paragraph_fallback: None,
};

pub struct Guardian;

impl SiteExtractor for Guardian {
    fn site(&self) -> Site {
        Site::Guardian
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
        <script type="application/ld+json">[{"@type":"Organization","name":"The Guardian"},
          {"@type":"NewsArticle","headline":"Guardian report","author":{"@type":"Person","name":"K. Critic"},
           "datePublished":"2025-06-01T06:00:00.000Z"}]</script>
        </head><body><div data-gu-name="body"><div class="article-body-commercial-selector">
          <p>Opening line.</p>
          <figure><picture><img src="https://i.guim.co.uk/a.jpg"></picture>
            <figcaption>Photograph: Agency</figcaption></figure>
          <h2>Analysis</h2>
          <p>Closing line.</p>
          <p><strong>Explore more on these topics</strong></p>
        </div></div></body></html>"#;

    #[test]
    fn picture_wrapped_images_count() {
        assert_eq!(counts(&Guardian, PAGE), (1, 2, 1));
    }

    #[test]
    fn skips_organization_record() {
        let meta = Guardian.extract_metadata(&Document::parse(PAGE)).unwrap();
        assert_eq!(meta.title, "Guardian report");
    }
}
