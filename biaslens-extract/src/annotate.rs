//! Re-anchoring classifier verdicts onto tagged elements.

use crate::block::PositionId;
use crate::document::Document;
use biaslens_common::{Annotation, BiasLensError};
use serde::Serialize;

pub const HAS_BIAS_CLASS: &str = "has-bias";
pub const LABEL_ATTR: &str = "data-bias-label";
pub const TOOLTIP_ATTR: &str = "title";

/// Lowercase the label and join its alphanumeric runs with `-`.
///
/// ```
/// use biaslens_extract::annotate::label_token;
///
/// assert_eq!(label_token("Ad Hominem"), "ad-hominem");
/// assert_eq!(label_token("  Slippery/Slope! "), "slippery-slope");
/// ```
pub fn label_token(label: &str) -> String {
    let token = label
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if token.is_empty() {
        "unlabeled".to_string()
    } else {
        token
    }
}

pub fn marker_class(label: &str) -> String {
    format!("bias-{}", label_token(label))
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<PositionId>,
    /// Positions whose element is gone from the page.
    pub stale: Vec<PositionId>,
    /// Annotations carrying the no-bias label.
    pub skipped: usize,
    /// Reply indexes that cannot name a position at all (negative or too large).
    pub unmatched: Vec<i64>,
}

impl ApplyReport {
    pub fn stale_errors(&self) -> Vec<BiasLensError> {
        self.stale
            .iter()
            .map(|p| BiasLensError::StaleTarget(p.0))
            .collect()
    }
}

/// Mark every annotated element that still exists in the current pass.
///
/// Each target gets the `has-bias` marker, a label-specific `bias-*` class,
/// a `label: reason` tooltip and the raw label in `data-bias-label`.
/// Applying the same annotations again leaves the page unchanged. Missing
/// targets are reported as stale and skipped.
pub fn apply_annotations(doc: &mut Document, annotations: &[Annotation]) -> ApplyReport {
    let mut report = ApplyReport::default();
    for annotation in annotations {
        if annotation.is_none() {
            report.skipped += 1;
            continue;
        }
        let Some(position) = annotation.position().map(PositionId) else {
            tracing::warn!(index = annotation.index, "annotation index names no position");
            report.unmatched.push(annotation.index);
            continue;
        };
        let Some(target) = doc.element_at_position(position) else {
            tracing::warn!(%position, "annotation target is stale");
            report.stale.push(position);
            continue;
        };
        let label = annotation.label.trim();
        doc.add_class(target, HAS_BIAS_CLASS);
        doc.add_class(target, &marker_class(label));
        doc.set_attr(target, TOOLTIP_ATTR, &annotation.tooltip());
        doc.set_attr(target, LABEL_ATTR, label);
        report.applied.push(position);
    }
    tracing::info!(
        applied = report.applied.len(),
        stale = report.stale.len(),
        skipped = report.skipped,
        "annotations applied"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(html: &str) -> (Document, Vec<crate::document::ElementHandle>) {
        let mut doc = Document::parse(html);
        let ps = doc.select_css("p").unwrap();
        doc.begin_pass();
        for (i, p) in ps.iter().enumerate() {
            doc.tag_position(*p, PositionId(i as u32));
        }
        (doc, ps)
    }

    #[test]
    fn marks_target_with_classes_and_tooltip() {
        let (mut doc, ps) = tagged("<p>a</p><p>b</p>");
        let report = apply_annotations(&mut doc, &[Annotation::new(1, "Strawman", "x")]);
        assert_eq!(report.applied, [PositionId(1)]);
        assert!(doc.has_class(ps[1], "has-bias"));
        assert!(doc.has_class(ps[1], "bias-strawman"));
        assert_eq!(doc.attr(ps[1], "title").as_deref(), Some("Strawman: x"));
        assert_eq!(doc.attr(ps[1], LABEL_ATTR).as_deref(), Some("Strawman"));
        assert!(doc.classes(ps[0]).is_empty());
    }

    #[test]
    fn reapplying_is_idempotent() {
        let (mut doc, _) = tagged("<p class='lead'>a</p>");
        let anns = [Annotation::new(0, "Personal Opinion", "I think")];
        apply_annotations(&mut doc, &anns);
        let once = doc.to_html();
        apply_annotations(&mut doc, &anns);
        assert_eq!(doc.to_html(), once);
        assert!(once.contains(r#"class="lead has-bias bias-personal-opinion""#));
    }

    #[test]
    fn none_labels_and_stale_targets_are_skipped() {
        let (mut doc, ps) = tagged("<p>a</p><p>b</p>");
        doc.remove(ps[0]);
        let report = apply_annotations(
            &mut doc,
            &[
                Annotation::new(0, "Misleading", "gone"),
                Annotation::new(1, "None", ""),
                Annotation::new(9, "Misleading", "never tagged"),
                Annotation::new(-3, "Misleading", "negative"),
            ],
        );
        assert!(report.applied.is_empty());
        assert_eq!(report.stale, [PositionId(0), PositionId(9)]);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.unmatched, [-3]);
        assert_eq!(report.stale_errors()[0].kind(), "stale_target");
        assert!(!doc.has_class(ps[1], HAS_BIAS_CLASS));
    }

    #[test]
    fn tokens_are_css_safe() {
        assert_eq!(marker_class("Hasty Generalization"), "bias-hasty-generalization");
        assert_eq!(marker_class("???"), "bias-unlabeled");
    }
}
