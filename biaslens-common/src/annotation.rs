use serde::{Deserialize, Serialize};

/// One classification result, keyed by the position identifier of the text
/// unit it describes.
///
/// The original backend echoes the analysed `text` back; it is accepted when
/// present but never needed to re-anchor the annotation. `index` is kept as
/// the service sent it, so a negative or oversized entry only loses itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub index: i64,
    #[serde(default = "none_label")]
    pub label: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

fn none_label() -> String {
    BiasLabel::None.as_str().to_string()
}

impl Annotation {
    pub fn new(index: i64, label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            reason: reason.into(),
            text: None,
        }
    }

    /// The position this annotation names, if `index` can be one.
    pub fn position(&self) -> Option<u32> {
        u32::try_from(self.index).ok()
    }

    /// True when the classifier found no bias (label `none`, any case, or blank).
    pub fn is_none(&self) -> bool {
        let label = self.label.trim();
        label.is_empty() || label.eq_ignore_ascii_case(BiasLabel::None.as_str())
    }

    /// The known category for this label, if it is one.
    pub fn bias_label(&self) -> Option<BiasLabel> {
        BiasLabel::parse(&self.label)
    }

    /// Hover text shown on the annotated element.
    pub fn tooltip(&self) -> String {
        format!("{}: {}", self.label.trim(), self.reason.trim())
    }
}

/// The bias categories the classifier is asked to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiasLabel {
    None,
    PersonalOpinion,
    AdHominem,
    HastyGeneralization,
    Strawman,
    SlipperySlope,
    RedHerring,
    Bandwagoning,
    Misleading,
}

impl BiasLabel {
    pub const ALL: [BiasLabel; 9] = [
        BiasLabel::None,
        BiasLabel::PersonalOpinion,
        BiasLabel::AdHominem,
        BiasLabel::HastyGeneralization,
        BiasLabel::Strawman,
        BiasLabel::SlipperySlope,
        BiasLabel::RedHerring,
        BiasLabel::Bandwagoning,
        BiasLabel::Misleading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BiasLabel::None => "None",
            BiasLabel::PersonalOpinion => "Personal Opinion",
            BiasLabel::AdHominem => "Ad Hominem",
            BiasLabel::HastyGeneralization => "Hasty Generalization",
            BiasLabel::Strawman => "Strawman",
            BiasLabel::SlipperySlope => "Slippery Slope",
            BiasLabel::RedHerring => "Red Herring",
            BiasLabel::Bandwagoning => "Bandwagoning",
            BiasLabel::Misleading => "Misleading",
        }
    }

    /// Case- and punctuation-insensitive lookup ("ad-hominem", "Ad Hominem" and
    /// "AD_HOMINEM" all resolve to [`BiasLabel::AdHominem`]).
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = squash(raw);
        Self::ALL
            .into_iter()
            .find(|label| squash(label.as_str()) == wanted)
    }
}

impl std::fmt::Display for BiasLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_loosely() {
        assert_eq!(BiasLabel::parse("ad-hominem"), Some(BiasLabel::AdHominem));
        assert_eq!(
            BiasLabel::parse("  Personal Opinion "),
            Some(BiasLabel::PersonalOpinion)
        );
        assert_eq!(BiasLabel::parse("strawman"), Some(BiasLabel::Strawman));
        assert_eq!(BiasLabel::parse("whataboutism"), None);
    }

    #[test]
    fn none_detection_ignores_case() {
        assert!(Annotation::new(0, "none", "").is_none());
        assert!(Annotation::new(0, "None", "").is_none());
        assert!(Annotation::new(0, "  ", "").is_none());
        assert!(!Annotation::new(0, "Misleading", "").is_none());
    }

    #[test]
    fn deserializes_backend_reply_with_text() {
        let a: Annotation = serde_json::from_str(
            r#"{"index":2,"text":"Everyone agrees.","label":"Bandwagoning","reason":"appeal to popularity"}"#,
        )
        .unwrap();
        assert_eq!(a.index, 2);
        assert_eq!(a.text.as_deref(), Some("Everyone agrees."));
        assert_eq!(a.tooltip(), "Bandwagoning: appeal to popularity");
    }

    #[test]
    fn negative_index_deserializes_without_a_position() {
        let reply: Vec<Annotation> = serde_json::from_str(
            r#"[{"index":0,"label":"Strawman","reason":"x"},{"index":-1,"label":"Misleading"}]"#,
        )
        .unwrap();
        assert_eq!(reply[0].position(), Some(0));
        assert_eq!(reply[1].index, -1);
        assert_eq!(reply[1].position(), None);
        assert_eq!(Annotation::new(1 << 40, "Strawman", "").position(), None);
    }

    #[test]
    fn missing_label_defaults_to_none() {
        let a: Annotation = serde_json::from_str(r#"{"index":1}"#).unwrap();
        assert!(a.is_none());
    }
}
