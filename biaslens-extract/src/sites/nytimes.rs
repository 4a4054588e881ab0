use crate::extractor::{SiteExtractor, SiteLayout, Walk};
use crate::metadata::MetadataShape;
use crate::site::Site;

static LAYOUT: SiteLayout = SiteLayout {
    containers: &["section[name=\"articleBody\"]", "article#story"],
    walk: Walk::Descendants,
    metadata: MetadataShape::First,
    paragraph_fallback: None,
};

pub struct NyTimes;

impl SiteExtractor for NyTimes {
    fn site(&self) -> Site {
        Site::NyTimes
    }

    fn layout(&self) -> &SiteLayout {
        &LAYOUT
    }
}
