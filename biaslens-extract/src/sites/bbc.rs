use crate::extractor::{SiteExtractor, SiteLayout, Walk};
use crate::metadata::MetadataShape;
use crate::site::Site;

// Text sits in nested `data-component` wrappers, so the whole article is walked.
static LAYOUT: SiteLayout = SiteLayout {
    containers: &["article", "main#main-content"],
    walk: Walk::Descendants,
    metadata: MetadataShape::First,
    paragraph_fallback: Some("[data-component=\"text-block\"] p"),
};

/// BBC News, on either the `.com` or `.co.uk` domain.
pub struct Bbc;

impl SiteExtractor for Bbc {
    fn site(&self) -> Site {
        Site::Bbc
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
        <script type="application/ld+json">{"@type":"ReportageNewsArticle","headline":"Storm hits coast",
          "author":{"@type":"Organization","name":"BBC News"},"datePublished":"2025-01-05T08:00:00.000Z",
          "dateModified":"2025-01-05T09:30:00.000Z"}</script>
        </head><body><article>
          <div data-component="headline-block"><h1>Storm hits coast</h1></div>
          <div data-component="text-block"><p>Winds reached 90mph.</p></div>
          <div data-component="subheadline-block"><h2>Power cuts</h2></div>
          <div data-component="text-block"><p>Thousands lost power.</p><p>Repairs continue.</p></div>
          <div data-component="image-block"><figure><img src="https://ichef.bbci.co.uk/x.jpg">
            <figcaption><p>Waves at the pier</p></figcaption></figure></div>
          <div data-component="links-block"><p><b>More on this story</b></p></div>
        </article></body></html>"#;

    #[test]
    fn walks_nested_blocks() {
        assert_eq!(counts(&Bbc, PAGE), (1, 3, 1));
    }

    #[test]
    fn accepts_reportage_article_type() {
        let meta = Bbc.extract_metadata(&Document::parse(PAGE)).unwrap();
        assert_eq!(meta.title, "Storm hits coast");
        assert_eq!(meta.author, "BBC News");
        assert_eq!(meta.date_modified, "2025-01-05T09:30:00.000Z");
    }
}
