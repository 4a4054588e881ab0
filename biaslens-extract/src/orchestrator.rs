use crate::block::{ArticleMetadata, BlockKind, ContentBlock, PositionId, TextUnit};
use crate::document::Document;
use crate::extractor::ExtractorRegistry;
use crate::fallback::FallbackExtractor;
use crate::site::Site;
use biaslens_common::BiasLensError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStep {
    Content,
    Metadata,
}

impl fmt::Display for ExtractionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStep::Content => f.write_str("content"),
            ExtractionStep::Metadata => f.write_str("metadata"),
        }
    }
}

/// Which text blocks are sent for classification.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnitPolicy {
    /// Paragraph blocks only.
    #[default]
    Paragraphs,
    /// Paragraphs and subheadings.
    AllText,
}

impl UnitPolicy {
    pub fn admits(self, block: &ContentBlock) -> bool {
        block.is_text_unit()
            && match self {
                UnitPolicy::Paragraphs => block.kind == BlockKind::Paragraph,
                UnitPolicy::AllText => true,
            }
    }
}

/// A recoverable failure recorded during extraction.
#[derive(Debug)]
pub struct ExtractionIssue {
    pub step: ExtractionStep,
    pub error: BiasLensError,
}

/// Everything one extraction pass produced.
#[derive(Debug, Serialize)]
pub struct Extraction {
    pub site: Site,
    pub content: Vec<ContentBlock>,
    /// Text blocks in classification order; `units[i].position == i`.
    pub units: Vec<TextUnit>,
    pub metadata: ArticleMetadata,
    pub used_fallback: bool,
    #[serde(skip)]
    pub issues: Vec<ExtractionIssue>,
}

impl Extraction {
    /// Texts to send for classification, indexed by position.
    pub fn texts(&self) -> Vec<String> {
        self.units.iter().map(|u| u.text.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Runs site extraction, falls back when it yields nothing, and tags the
/// resulting text blocks with positions for later re-anchoring.
#[derive(Default)]
pub struct Orchestrator {
    registry: ExtractorRegistry,
    fallback: FallbackExtractor,
    units: UnitPolicy,
}

impl Orchestrator {
    pub fn new(registry: ExtractorRegistry) -> Self {
        Self {
            registry,
            fallback: FallbackExtractor,
            units: UnitPolicy::default(),
        }
    }

    pub fn with_unit_policy(mut self, units: UnitPolicy) -> Self {
        self.units = units;
        self
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Extract `doc` as `site` and tag its text blocks.
    ///
    /// Starts a new tagging pass on the document, so positions from any
    /// earlier pass stop resolving. Extractor failures are recorded in
    /// [`Extraction::issues`] rather than returned.
    pub fn extract(&self, doc: &mut Document, site: Site) -> Extraction {
        let span = tracing::info_span!("extract", %site);
        let _guard = span.enter();

        let extractor = self.registry.get(site);
        let mut issues = Vec::new();

        let site_blocks = match extractor {
            Some(ex) => match ex.extract_content(doc) {
                Ok(blocks) => blocks,
                Err(error) => {
                    tracing::warn!(error = %error, "site extractor failed");
                    issues.push(ExtractionIssue {
                        step: ExtractionStep::Content,
                        error,
                    });
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let used_fallback = site_blocks.is_empty();
        let content = if used_fallback {
            let blocks = self.fallback.extract(doc);
            tracing::info!(blocks = blocks.len(), "used fallback extraction");
            blocks
        } else {
            site_blocks
        };

        doc.begin_pass();
        let units: Vec<TextUnit> = content
            .iter()
            .filter(|b| self.units.admits(b))
            .zip(0u32..)
            .map(|(block, i)| {
                let position = PositionId(i);
                doc.tag_position(block.source, position);
                TextUnit {
                    position,
                    kind: block.kind,
                    text: block.text.clone(),
                    source: block.source,
                }
            })
            .collect();

        let metadata = match extractor.map(|ex| ex.extract_metadata(doc)) {
            Some(Ok(metadata)) => metadata,
            Some(Err(error)) => {
                tracing::debug!(error = %error, "no article metadata");
                issues.push(ExtractionIssue {
                    step: ExtractionStep::Metadata,
                    error,
                });
                ArticleMetadata::default()
            }
            None => ArticleMetadata::default(),
        };

        tracing::info!(
            blocks = content.len(),
            units = units.len(),
            used_fallback,
            issues = issues.len(),
            "extraction finished"
        );

        Extraction {
            site,
            content,
            units,
            metadata,
            used_fallback,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::POSITION_ATTR;

    const CNN_PAGE: &str = r#"<html><body><div class="article__content">
        <p>First.</p>
        <figure><img src="a.jpg"></figure>
        <h2>Middle</h2>
        <p><strong>Skip</strong></p>
        <p>Last.</p>
        </div></body></html>"#;

    #[test]
    fn positions_follow_text_blocks_only() {
        let mut doc = Document::parse(CNN_PAGE);
        let out = Orchestrator::default().extract(&mut doc, Site::Cnn);

        assert!(!out.used_fallback);
        assert_eq!(out.content.len(), 4);
        assert_eq!(out.texts(), ["First.", "Last."]);
        for (i, unit) in out.units.iter().enumerate() {
            assert_eq!(unit.position, PositionId(i as u32));
            assert_eq!(doc.element_at_position(unit.position), Some(unit.source));
            assert_eq!(doc.attr(unit.source, POSITION_ATTR), Some(i.to_string()));
        }
        assert_eq!(doc.tagged_count(), 2);
    }

    #[test]
    fn all_text_policy_includes_subheadings() {
        let mut doc = Document::parse(CNN_PAGE);
        let out = Orchestrator::default()
            .with_unit_policy(UnitPolicy::AllText)
            .extract(&mut doc, Site::Cnn);
        assert_eq!(out.texts(), ["First.", "Middle", "Last."]);
        assert_eq!(out.units[1].kind, BlockKind::Subheading);
        assert_eq!(doc.tagged_count(), 3);
    }

    #[test]
    fn metadata_failure_is_recorded_not_fatal() {
        let mut doc = Document::parse(CNN_PAGE);
        let out = Orchestrator::default().extract(&mut doc, Site::Cnn);
        assert!(out.metadata.is_empty());
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].step, ExtractionStep::Metadata);
        assert_eq!(out.issues[0].error.kind(), "not_found");
    }

    #[test]
    fn unregistered_site_uses_fallback() {
        let mut doc = Document::parse("<main><p>Only</p></main>");
        let out = Orchestrator::default().extract(&mut doc, Site::Npr);
        assert!(out.used_fallback);
        assert_eq!(out.texts(), ["Only"]);
        assert!(out.issues.is_empty());
    }

    #[test]
    fn fallback_never_sends_bold_paragraphs() {
        let mut doc = Document::parse("<main><p><b>caption</b></p><p>Body</p></main>");
        let out = Orchestrator::default().extract(&mut doc, Site::Npr);
        assert_eq!(out.texts(), ["Body"]);
        assert_eq!(doc.element_at_position(PositionId(0)), Some(out.units[0].source));
        assert_eq!(doc.tagged_count(), 1);
    }

    #[test]
    fn empty_page_produces_no_units() {
        let mut doc = Document::parse("<body></body>");
        let out = Orchestrator::default().extract(&mut doc, Site::Guardian);
        assert!(out.is_empty());
        assert!(out.used_fallback);
        assert_eq!(out.issues[0].step, ExtractionStep::Content);
    }
}
