use crate::extractor::{SiteExtractor, SiteLayout, Walk};
use crate::metadata::MetadataShape;
use crate::site::Site;

static LAYOUT: SiteLayout = SiteLayout {
    containers: &[".RichTextStoryBody", ".RichTextBody", "[data-key=\"article\"]"],
    walk: Walk::Children,
    metadata: MetadataShape::All,
    paragraph_fallback: None,
};

/// Associated Press.
pub struct ApNews;

impl SiteExtractor for ApNews {
    fn site(&self) -> Site {
        Site::ApNews
    }

    fn layout(&self) -> &SiteLayout {
        &LAYOUT
    }
}
