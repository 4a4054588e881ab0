//! Per-outlet layouts.

mod apnews;
mod bbc;
mod cnn;
mod foxnews;
mod guardian;
mod nytimes;
mod thehill;

pub use apnews::ApNews;
pub use bbc::Bbc;
pub use cnn::Cnn;
pub use foxnews::FoxNews;
pub use guardian::Guardian;
pub use nytimes::NyTimes;
pub use thehill::TheHill;

#[cfg(test)]
pub(crate) mod testing {
    use crate::block::BlockKind;
    use crate::document::Document;
    use crate::extractor::SiteExtractor;

    /// (subheadings, paragraphs, images) produced for `html`.
    pub fn counts(extractor: &dyn SiteExtractor, html: &str) -> (usize, usize, usize) {
        let doc = Document::parse(html);
        let blocks = extractor.extract_content(&doc).unwrap();
        let n = |k: BlockKind| blocks.iter().filter(|b| b.kind == k).count();
        (n(BlockKind::Subheading), n(BlockKind::Paragraph), n(BlockKind::Image))
    }
}
