use crate::extractor::{SiteExtractor, SiteLayout, Walk};
use crate::metadata::MetadataShape;
use crate::site::Site;

static LAYOUT: SiteLayout = SiteLayout {
    containers: &[".article__text", "article .entry-content"],
    walk: Walk::Children,
    metadata: MetadataShape::Graph,
    paragraph_fallback: Some("article p"),
};

/// The Hill. Structured data arrives as a single `@graph`.
pub struct TheHill;

impl SiteExtractor for TheHill {
    fn site(&self) -> Site {
        Site::TheHill
    }

    fn layout(&self) -> &SiteLayout {
        &LAYOUT
    }
}
