//! Generic extraction for pages without a dedicated extractor.

use crate::block::ContentBlock;
use crate::document::{Document, ElementHandle};
use crate::extractor::BOLD;
use scraper::Selector;
use std::sync::LazyLock;

/// Likely article containers, most specific first.
pub const FALLBACK_CONTAINERS: [&str; 4] = [
    "[itemprop=\"articleBody\"]",
    "article",
    "main",
    "[role=\"main\"]",
];

static CONTAINERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    FALLBACK_CONTAINERS
        .iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
});
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Paragraph-only extraction that works on any page.
///
/// Uses the paragraphs of the first container found, or every paragraph on
/// the page when no container matches. Bold-run paragraphs are never
/// emitted. Never fails; a page with no visible paragraphs yields nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackExtractor;

impl FallbackExtractor {
    pub fn extract(&self, doc: &Document) -> Vec<ContentBlock> {
        let container = CONTAINERS
            .iter()
            .zip(FALLBACK_CONTAINERS)
            .find_map(|(sel, css)| doc.select_first(sel).map(|c| (c, css)));
        match container {
            Some((container, css)) => {
                let blocks = visible_paragraphs(doc, doc.select_within(container, &PARAGRAPH));
                tracing::debug!(
                    container = css,
                    paragraphs = blocks.len(),
                    "fallback container matched"
                );
                blocks
            }
            None => visible_paragraphs(doc, doc.select(&PARAGRAPH)),
        }
    }
}

fn visible_paragraphs(doc: &Document, candidates: Vec<ElementHandle>) -> Vec<ContentBlock> {
    candidates
        .into_iter()
        .filter(|&p| !doc.contains(p, &BOLD))
        .filter_map(|p| {
            let text = doc.rendered_text(p);
            (!text.is_empty()).then(|| ContentBlock::paragraph(text, p))
        })
        .collect()
}
