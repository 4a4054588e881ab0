//! One analysis run: capture, extract, classify, annotate, find coverage.

use biaslens_classify::Classifier;
use biaslens_common::{Annotation, BiasLensError, Result};
use biaslens_extract::{
    ApplyReport, ArticleMetadata, Document, Extraction, Orchestrator, Site, apply_annotations,
};
use biaslens_web::{PageCapturer, SimilarArticle, SimilarArticleSource};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;
use url::Url;

/// Where a run ended up. Only [`PipelineStatus::Done`] has annotations applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineStatus {
    NotAnArticle,
    CaptureFailed { reason: String },
    NoContent,
    ClassificationFailed { reason: String },
    Done { flagged: usize, stale: usize },
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::NotAnArticle => f.write_str("Not a valid article"),
            PipelineStatus::CaptureFailed { reason } => write!(f, "Could not load page: {reason}"),
            PipelineStatus::NoContent => f.write_str("No article content found"),
            PipelineStatus::ClassificationFailed { reason } => write!(f, "Analysis failed: {reason}"),
            PipelineStatus::Done { flagged, stale } if *stale > 0 => {
                write!(f, "Done: {flagged} flagged, {stale} no longer on the page")
            }
            PipelineStatus::Done { flagged, .. } => write!(f, "Done: {flagged} flagged"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PipelineRun {
    pub address: String,
    pub site: Site,
    pub status: PipelineStatus,
    pub extraction: Option<Extraction>,
    /// Classifier verdicts, sorted by position.
    pub annotations: Vec<Annotation>,
    pub applied: Option<ApplyReport>,
    pub similar: Vec<SimilarArticle>,
    /// The page as annotated, absent when nothing was captured.
    #[serde(skip)]
    pub document: Option<Document>,
}

impl PipelineRun {
    fn new(address: &str, site: Site) -> Self {
        Self {
            address: address.to_string(),
            site,
            status: PipelineStatus::NotAnArticle,
            extraction: None,
            annotations: Vec::new(),
            applied: None,
            similar: Vec::new(),
            document: None,
        }
    }
}

pub struct Pipeline {
    orchestrator: Orchestrator,
    capturer: Arc<dyn PageCapturer>,
    classifier: Arc<dyn Classifier>,
    similar: Option<Arc<dyn SimilarArticleSource>>,
    similar_count: usize,
}

impl Pipeline {
    pub fn new(capturer: Arc<dyn PageCapturer>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            orchestrator: Orchestrator::default(),
            capturer,
            classifier,
            similar: None,
            similar_count: 0,
        }
    }

    pub fn with_orchestrator(mut self, orchestrator: Orchestrator) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    pub fn with_similar(mut self, source: Arc<dyn SimilarArticleSource>, count: usize) -> Self {
        self.similar = Some(source);
        self.similar_count = count;
        self
    }

    /// Fetch the page behind `url` and extract it as `site`.
    pub async fn capture_and_extract(&self, url: &Url, site: Site) -> Result<(Document, Extraction)> {
        let page = self.capturer.capture(url).await?;
        if page.url != *url {
            tracing::debug!(final_url = %page.url, "page was redirected");
        }
        let mut doc = Document::parse(&page.html);
        let extraction = self.orchestrator.extract(&mut doc, site);
        Ok((doc, extraction))
    }

    /// Analyse one address end to end.
    ///
    /// Addresses outside the supported outlets stop before anything is
    /// fetched. Failures of the classifier or the search service are
    /// reported through the status and never abort the run.
    pub async fn run(&self, address: &str) -> PipelineRun {
        let site = Site::detect(address);
        let span = tracing::info_span!("pipeline", %site, classifier = self.classifier.name());
        self.run_detected(address, site).instrument(span).await
    }

    async fn run_detected(&self, address: &str, site: Site) -> PipelineRun {
        let mut run = PipelineRun::new(address, site);
        if !site.is_known() {
            tracing::info!(address, "not a supported news site");
            return run;
        }

        let url = match Url::parse(address) {
            Ok(url) => url,
            Err(e) => {
                run.status = PipelineStatus::CaptureFailed {
                    reason: format!("invalid address: {e}"),
                };
                return run;
            }
        };
        let (mut doc, extraction) = match self.capture_and_extract(&url, site).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(error = %e, "capture failed");
                run.status = PipelineStatus::CaptureFailed {
                    reason: e.to_string(),
                };
                return run;
            }
        };

        if extraction.is_empty() {
            run.status = PipelineStatus::NoContent;
            run.extraction = Some(extraction);
            run.document = Some(doc);
            return run;
        }

        match self.classifier.classify(&extraction.texts()).await {
            Ok(annotations) => {
                let report = apply_annotations(&mut doc, &annotations);
                run.status = PipelineStatus::Done {
                    flagged: report.applied.len(),
                    stale: report.stale.len(),
                };
                run.annotations = annotations;
                run.applied = Some(report);
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "classification failed");
                run.status = PipelineStatus::ClassificationFailed {
                    reason: e.to_string(),
                };
            }
        }

        run.similar = self.find_similar(&extraction.metadata, address).await;
        run.extraction = Some(extraction);
        run.document = Some(doc);
        run
    }

    async fn find_similar(&self, metadata: &ArticleMetadata, address: &str) -> Vec<SimilarArticle> {
        let Some(source) = &self.similar else {
            return Vec::new();
        };
        let Some(query) = metadata.search_query() else {
            tracing::debug!("no title or description to search with");
            return Vec::new();
        };
        match source.find(query, Some(address), self.similar_count).await {
            Ok(hits) => {
                tracing::info!(source = source.name(), hits = hits.len(), "similar articles found");
                hits
            }
            Err(e) => {
                log_search_failure(source.name(), &e);
                Vec::new()
            }
        }
    }
}

fn log_search_failure(source: &str, error: &BiasLensError) {
    tracing::warn!(source, error = %error, kind = error.kind(), "similar article search failed");
}
