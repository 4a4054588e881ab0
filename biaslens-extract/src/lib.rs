//! Article extraction and re-anchoring for BiasLens.
//!
//! A page is parsed into a [`Document`], its outlet is identified with
//! [`Site::detect`], and the [`Orchestrator`] pulls typed content blocks and
//! metadata out of it. Text blocks are tagged with [`PositionId`]s so that
//! classifier replies can later be applied back onto the same elements with
//! [`apply_annotations`].
//!
//! ```
//! use biaslens_common::Annotation;
//! use biaslens_extract::{apply_annotations, Document, Orchestrator, Site};
//!
//! let mut doc = Document::parse(
//!     r#"<div class="article__content"><p>Hello world</p></div>"#,
//! );
//! let site = Site::detect("https://www.cnn.com/2025/01/01/story");
//! let extraction = Orchestrator::default().extract(&mut doc, site);
//! assert_eq!(extraction.texts(), ["Hello world"]);
//!
//! let report = apply_annotations(&mut doc, &[Annotation::new(0, "Strawman", "x")]);
//! assert_eq!(report.applied.len(), 1);
//! assert!(doc.to_html().contains("has-bias"));
//! ```

pub mod annotate;
pub mod block;
pub mod document;
pub mod extractor;
pub mod fallback;
pub mod metadata;
pub mod orchestrator;
pub mod site;
pub mod sites;

pub use annotate::{apply_annotations, ApplyReport};
pub use block::{ArticleMetadata, BlockKind, ContentBlock, ImageContent, PositionId, TextUnit};
pub use document::{Document, ElementHandle};
pub use extractor::{ExtractorRegistry, SiteExtractor, SiteLayout, Walk};
pub use fallback::FallbackExtractor;
pub use metadata::MetadataShape;
pub use orchestrator::{Extraction, ExtractionIssue, ExtractionStep, Orchestrator, UnitPolicy};
pub use site::Site;
