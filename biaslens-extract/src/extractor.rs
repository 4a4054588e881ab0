//! Site extractor contract and the block rules every extractor shares.

use crate::block::{ArticleMetadata, ContentBlock};
use crate::document::{selector, Document, ElementHandle};
use crate::metadata::{extract_structured_metadata, MetadataShape};
use crate::site::Site;
use biaslens_common::{BiasLensError, Result};
use scraper::Selector;
use std::collections::HashMap;
use std::sync::LazyLock;

static BLOCK_CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, h4, h5, h6, p, figure").unwrap());
pub(crate) static BOLD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("b, strong").unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static CAPTION: LazyLock<Selector> = LazyLock::new(|| Selector::parse("figcaption").unwrap());

/// How block candidates are gathered from the content container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Direct element children only; wrappers are ignored.
    Children,
    /// Every matching descendant in document order.
    Descendants,
}

/// Per-site page knowledge.
#[derive(Debug, Clone, Copy)]
pub struct SiteLayout {
    /// Container selectors tried in order; the first match holds the body.
    pub containers: &'static [&'static str],
    pub walk: Walk,
    pub metadata: MetadataShape,
    /// Paragraph selector used page-wide when no container matches.
    pub paragraph_fallback: Option<&'static str>,
}

/// Knows how one outlet lays out its articles.
///
/// Implementors usually only describe a [`SiteLayout`]; the provided methods
/// apply the shared block rules to it.
pub trait SiteExtractor: Send + Sync {
    fn site(&self) -> Site;

    fn layout(&self) -> &SiteLayout;

    fn extract_metadata(&self, doc: &Document) -> Result<ArticleMetadata> {
        extract_structured_metadata(doc, self.layout().metadata)
    }

    /// Body blocks in document order.
    ///
    /// Fails with [`BiasLensError::NotFound`] when the page has no content
    /// container and the layout has no paragraph fallback.
    fn extract_content(&self, doc: &Document) -> Result<Vec<ContentBlock>> {
        extract_layout_content(doc, self.layout())
    }
}

pub fn find_container(doc: &Document, containers: &[&str]) -> Result<Option<ElementHandle>> {
    for css in containers {
        if let Some(found) = doc.select_first(&selector(css)?) {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

pub fn extract_layout_content(doc: &Document, layout: &SiteLayout) -> Result<Vec<ContentBlock>> {
    let candidates = match find_container(doc, layout.containers)? {
        Some(container) => match layout.walk {
            Walk::Children => doc.children(container),
            Walk::Descendants => doc
                .select_within(container, &BLOCK_CANDIDATES)
                .into_iter()
                .filter(|h| !doc.has_ancestor(*h, "figure"))
                .collect(),
        },
        None => match layout.paragraph_fallback {
            Some(css) => {
                tracing::debug!(selector = css, "no content container, using paragraph selector");
                doc.select_css(css)?
            }
            None => {
                return Err(BiasLensError::NotFound(format!(
                    "no content container matched {:?}",
                    layout.containers
                )))
            }
        },
    };
    Ok(candidates
        .into_iter()
        .filter_map(|h| classify_element(doc, h))
        .collect())
}

/// Shared block rule.
///
/// * `h2`..`h6` with text become subheadings.
/// * `p` with text and no bold run become paragraphs.
/// * `figure` with a sourced `img` becomes an image, captioned from `figcaption`.
///
/// Everything else is ignored.
pub fn classify_element(doc: &Document, handle: ElementHandle) -> Option<ContentBlock> {
    match doc.tag_name(handle)? {
        "h2" | "h3" | "h4" | "h5" | "h6" => {
            let text = doc.text_content(handle);
            (!text.is_empty()).then(|| ContentBlock::subheading(text, handle))
        }
        "p" => {
            if doc.contains(handle, &BOLD) {
                return None;
            }
            let text = doc.text_content(handle);
            (!text.is_empty()).then(|| ContentBlock::paragraph(text, handle))
        }
        "figure" => {
            let img = doc.select_within(handle, &IMAGE).into_iter().find_map(|img| {
                ["src", "data-src"]
                    .into_iter()
                    .filter_map(|name| doc.attr(img, name))
                    .map(|src| src.trim().to_string())
                    .find(|src| !src.is_empty())
            })?;
            let caption = doc
                .select_within(handle, &CAPTION)
                .first()
                .map(|c| doc.text_content(*c))
                .unwrap_or_default();
            Some(ContentBlock::image(img, caption, handle))
        }
        _ => None,
    }
}

/// Site to extractor mapping. Sites without an entry use the fallback.
pub struct ExtractorRegistry {
    extractors: HashMap<Site, Box<dyn SiteExtractor>>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with an extractor for every outlet that has one.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(crate::sites::Cnn));
        registry.register(Box::new(crate::sites::FoxNews));
        registry.register(Box::new(crate::sites::Bbc));
        registry.register(Box::new(crate::sites::NyTimes));
        registry.register(Box::new(crate::sites::ApNews));
        registry.register(Box::new(crate::sites::Guardian));
        registry.register(Box::new(crate::sites::TheHill));
        registry
    }

    /// Register an extractor, replacing any previous one for its site.
    pub fn register(&mut self, extractor: Box<dyn SiteExtractor>) -> Option<Box<dyn SiteExtractor>> {
        self.extractors.insert(extractor.site(), extractor)
    }

    pub fn get(&self, site: Site) -> Option<&dyn SiteExtractor> {
        self.extractors.get(&site).map(|e| &**e)
    }

    pub fn sites(&self) -> Vec<Site> {
        let mut sites: Vec<Site> = self.extractors.keys().copied().collect();
        sites.sort_by_key(|s| Site::KNOWN.iter().position(|k| k == s));
        sites
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    fn blocks(html: &str, layout: &SiteLayout) -> Vec<ContentBlock> {
        extract_layout_content(&Document::parse(html), layout).unwrap()
    }

    const CHILDREN: SiteLayout = SiteLayout {
        containers: &[".missing", ".body"],
        walk: Walk::Children,
        metadata: MetadataShape::All,
        paragraph_fallback: None,
    };

    #[test]
    fn classifies_headings_paragraphs_and_figures() {
        let out = blocks(
            r#"<div class="body">
                <h2>Sub  head</h2>
                <p>Plain text.</p>
                <p><strong>Read more:</strong> link</p>
                <p>   </p>
                <h1>Title is not a block</h1>
                <figure><img data-src="lazy.jpg"><figcaption> A  caption </figcaption></figure>
                <figure><img src=""></figure>
                <div><p>Nested is ignored</p></div>
            </div>"#,
            &CHILDREN,
        );
        let kinds: Vec<BlockKind> = out.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Subheading, BlockKind::Paragraph, BlockKind::Image]
        );
        assert_eq!(out[0].text, "Sub head");
        let image = out[2].image.as_ref().unwrap();
        assert_eq!(image.src, "lazy.jpg");
        assert_eq!(image.caption, "A caption");
    }

    #[test]
    fn uncaptioned_figure_gets_empty_caption() {
        let out = blocks(
            r#"<div class="body"><figure><img src="a.png"></figure></div>"#,
            &CHILDREN,
        );
        assert_eq!(out[0].image.as_ref().unwrap().caption, "");
    }

    #[test]
    fn descendant_walk_reaches_wrapped_blocks_but_not_captions() {
        let layout = SiteLayout {
            walk: Walk::Descendants,
            ..CHILDREN
        };
        let out = blocks(
            r#"<div class="body"><section><p>Deep</p></section>
               <figure><img src="x.png"><figcaption><p>caption para</p></figcaption></figure></div>"#,
            &layout,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "Deep");
        assert_eq!(out[1].kind, BlockKind::Image);
    }

    #[test]
    fn missing_container_uses_paragraph_selector_or_fails() {
        let html = r#"<div class="other"><p class="para">Loose</p><p>skip</p></div>"#;
        let err = extract_layout_content(&Document::parse(html), &CHILDREN).unwrap_err();
        assert_eq!(err.kind(), "not_found");

        let layout = SiteLayout {
            paragraph_fallback: Some("p.para"),
            ..CHILDREN
        };
        let out = blocks(html, &layout);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "Loose");
    }

    #[test]
    fn builtin_registry_covers_all_outlets_but_npr() {
        let registry = ExtractorRegistry::builtin();
        for site in Site::KNOWN {
            assert_eq!(registry.get(site).is_some(), site != Site::Npr, "{site}");
        }
        assert!(registry.get(Site::Unknown).is_none());
        assert_eq!(registry.sites().len(), 7);
    }
}
