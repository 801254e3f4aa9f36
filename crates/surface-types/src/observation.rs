//! Topic observation types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identifier assigned to a topic by the topic model.
pub type TopicId = i64;

/// The "misc" bucket holding documents that fit no topic.
pub const OUTLIER_TOPIC_ID: TopicId = -1;

/// Number of ranked terms used to build an observation label.
pub const LABEL_TERM_COUNT: usize = 5;

/// Raw label of a time slice.
///
/// Topic models hand back a slice index, a fractional timestamp or a
/// free-form label (e.g. an ISO date); all are accepted and compared by
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeLabel {
    /// Numeric slice index
    Index(i64),
    /// Any other JSON number, e.g. an epoch timestamp with a fraction
    Number(serde_json::Number),
    /// Free-form label
    Label(String),
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLabel::Index(i) => write!(f, "{}", i),
            TimeLabel::Number(n) => write!(f, "{}", n),
            TimeLabel::Label(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for TimeLabel {
    fn from(value: i64) -> Self {
        TimeLabel::Index(value)
    }
}

impl From<&str> for TimeLabel {
    fn from(value: &str) -> Self {
        TimeLabel::Label(value.to_string())
    }
}

/// A ranked term with its topic-model weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f64,
}

impl TermWeight {
    pub fn new(term: impl Into<String>, weight: f64) -> Self {
        Self {
            term: term.into(),
            weight,
        }
    }
}

/// Build the short label of a topic: its leading terms joined by commas.
pub fn label_from_terms(terms: &[TermWeight]) -> String {
    terms
        .iter()
        .take(LABEL_TERM_COUNT)
        .map(|t| t.term.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Join all terms of a ranked list with commas, dropping weights.
pub fn terms_as_string(terms: &[TermWeight]) -> String {
    terms
        .iter()
        .map(|t| t.term.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// A topic positioned on the surface at one time slice.
///
/// `x` is the time-bucket column and `y` the normalized cumulative
/// dendrogram distance. Once located, observations are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicObservation {
    /// Time-bucket coordinate (integral when produced by the locator)
    pub x: f64,
    /// Cumulative dendrogram distance coordinate
    pub y: f64,
    /// Raw time-slice label
    pub t: TimeLabel,
    /// Topic identifier, `None` once the topic identity has been discarded
    pub id: Option<TopicId>,
    /// Topic frequency at this slice
    pub n: f64,
    /// Leading terms joined by commas
    pub label: String,
    /// Ranked terms, weight descending
    pub top_terms: Vec<TermWeight>,
}

impl TopicObservation {
    /// Point coordinates of this observation.
    pub fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<TermWeight> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| TermWeight::new(*w, 1.0 / (i as f64 + 1.0)))
            .collect()
    }

    #[test]
    fn test_label_uses_first_five_terms() {
        let t = terms(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(label_from_terms(&t), "a,b,c,d,e");
    }

    #[test]
    fn test_label_short_list() {
        let t = terms(&["vaccine", "mask"]);
        assert_eq!(label_from_terms(&t), "vaccine,mask");
        assert_eq!(label_from_terms(&[]), "");
    }

    #[test]
    fn test_terms_as_string_keeps_all_terms() {
        let t = terms(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(terms_as_string(&t), "a,b,c,d,e,f");
    }

    #[test]
    fn test_time_label_untagged_serde() {
        let idx: TimeLabel = serde_json::from_str("3").unwrap();
        assert_eq!(idx, TimeLabel::Index(3));
        let label: TimeLabel = serde_json::from_str("\"2021-03\"").unwrap();
        assert_eq!(label, TimeLabel::Label("2021-03".to_string()));
        assert_eq!(serde_json::to_string(&TimeLabel::Index(7)).unwrap(), "7");
    }

    #[test]
    fn test_time_label_accepts_fractional_numbers() {
        let label: TimeLabel = serde_json::from_str("1612137600.5").unwrap();
        assert!(matches!(label, TimeLabel::Number(_)));
        assert_eq!(label.to_string(), "1612137600.5");
        assert_eq!(serde_json::to_string(&label).unwrap(), "1612137600.5");

        let again: TimeLabel = serde_json::from_str("1612137600.5").unwrap();
        assert_eq!(label, again);
        assert_ne!(label, TimeLabel::Index(1612137600));
    }

    #[test]
    fn test_time_label_display() {
        assert_eq!(TimeLabel::from(4).to_string(), "4");
        assert_eq!(TimeLabel::from("week-2").to_string(), "week-2");
    }
}
