//! Wire payloads exchanged with the analysis backend.
//!
//! Responses are treated as best-effort: every field is optional on the wire
//! and gets its documented default when the payload is resolved into the
//! value the renderer consumes.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SENTIMENT_LABEL: &str = "Neutral";
pub const DEFAULT_INTERPRETATION: &str = "Overall emotional tone of the paragraph.";
pub const DEFAULT_TOPIC_NAME: &str = "Predicted Topic";
pub const MISSING_TOPIC_ID: &str = "n/a";

// ============================================================================
// Analysis kinds
// ============================================================================

/// One of the four dispatch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Preprocess,
    Sentiment,
    Topics,
    Summary,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Preprocess,
        AnalysisKind::Sentiment,
        AnalysisKind::Topics,
        AnalysisKind::Summary,
    ];

    /// Backend path this kind is posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            AnalysisKind::Preprocess => "/api/preprocess",
            AnalysisKind::Sentiment => "/api/sentiment",
            AnalysisKind::Topics => "/api/topics",
            AnalysisKind::Summary => "/api/summary",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Preprocess => "preprocess",
            AnalysisKind::Sentiment => "sentiment",
            AnalysisKind::Topics => "topics",
            AnalysisKind::Summary => "summary",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preprocess" => Ok(AnalysisKind::Preprocess),
            "sentiment" => Ok(AnalysisKind::Sentiment),
            "topics" | "topic" => Ok(AnalysisKind::Topics),
            "summary" => Ok(AnalysisKind::Summary),
            other => Err(format!("Unknown analysis kind: {}", other)),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// Body of every backend call. `type` is only sent for summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub summary_type: Option<String>,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            summary_type: None,
        }
    }

    pub fn with_summary_type(mut self, summary_type: impl Into<String>) -> Self {
        self.summary_type = Some(summary_type.into());
        self
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessResult {
    #[serde(deserialize_with = "null_as_default")]
    pub original_chars: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub cleaned_chars: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub words: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub tokens: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub cleaned_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tokens_list: Vec<String>,
}

/// Sentiment response as it arrives. Older backends send `score` instead of `compound`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentResult {
    pub label: Option<String>,
    pub compound: Option<f64>,
    pub score: Option<f64>,
    pub pos: Option<f64>,
    pub neu: Option<f64>,
    pub neg: Option<f64>,
    pub interpretation: Option<String>,
}

/// Sentiment with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReading {
    pub label: String,
    pub compound: f64,
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
    pub interpretation: String,
}

fn non_empty(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl SentimentResult {
    pub fn resolve(self) -> SentimentReading {
        SentimentReading {
            label: non_empty(self.label, DEFAULT_SENTIMENT_LABEL),
            compound: self.compound.or(self.score).unwrap_or(0.0),
            pos: self.pos.unwrap_or(0.0),
            neu: self.neu.unwrap_or(0.0),
            neg: self.neg.unwrap_or(0.0),
            interpretation: non_empty(self.interpretation, DEFAULT_INTERPRETATION),
        }
    }
}

/// Topic ids are numeric from the NMF backend but some deployments send strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicId::Number(n) => write!(f, "{}", n),
            TopicId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicResult {
    pub error: Option<String>,
    pub topic_id: Option<TopicId>,
    pub topic_name: Option<String>,
    pub keywords: Option<Vec<String>>,
}

/// A topic response is either a match or a backend-reported error, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicOutcome {
    Matched {
        topic_id: String,
        topic_name: String,
        keywords: Vec<String>,
    },
    Failed(String),
}

impl TopicResult {
    pub fn resolve(self) -> TopicOutcome {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return TopicOutcome::Failed(error);
        }
        TopicOutcome::Matched {
            topic_id: self
                .topic_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| MISSING_TOPIC_ID.to_string()),
            topic_name: non_empty(self.topic_name, DEFAULT_TOPIC_NAME),
            keywords: self.keywords.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryResult {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_request_carries_type() {
        let body = serde_json::to_value(AnalysisRequest::new("hello").with_summary_type("extractive")).unwrap();
        assert_eq!(body, json!({ "text": "hello", "type": "extractive" }));

        let body = serde_json::to_value(AnalysisRequest::new("hello")).unwrap();
        assert_eq!(body, json!({ "text": "hello" }));
    }

    #[test]
    fn test_sentiment_defaults() {
        let reading = serde_json::from_value::<SentimentResult>(json!({})).unwrap().resolve();
        assert_eq!(reading.label, "Neutral");
        assert_eq!(reading.compound, 0.0);
        assert_eq!((reading.pos, reading.neu, reading.neg), (0.0, 0.0, 0.0));
        assert_eq!(reading.interpretation, DEFAULT_INTERPRETATION);
    }

    #[test]
    fn test_sentiment_score_fallback_and_nulls() {
        let reading = serde_json::from_value::<SentimentResult>(json!({
            "label": "",
            "compound": null,
            "score": -0.25,
            "pos": 0.1
        }))
        .unwrap()
        .resolve();
        assert_eq!(reading.label, "Neutral");
        assert_eq!(reading.compound, -0.25);
        assert_eq!(reading.pos, 0.1);
    }

    #[test]
    fn test_compound_wins_over_score() {
        let reading = serde_json::from_value::<SentimentResult>(json!({ "compound": 0.7, "score": 0.1 }))
            .unwrap()
            .resolve();
        assert_eq!(reading.compound, 0.7);
    }

    #[test]
    fn test_topic_error_variant() {
        let outcome = serde_json::from_value::<TopicResult>(json!({ "error": "No text provided." }))
            .unwrap()
            .resolve();
        assert_eq!(outcome, TopicOutcome::Failed("No text provided.".to_string()));
    }

    #[test]
    fn test_topic_empty_error_is_ignored() {
        let outcome = serde_json::from_value::<TopicResult>(json!({
            "error": "",
            "topic_id": 3,
            "keywords": ["space", "nasa"]
        }))
        .unwrap()
        .resolve();
        assert_eq!(
            outcome,
            TopicOutcome::Matched {
                topic_id: "3".to_string(),
                topic_name: "Predicted Topic".to_string(),
                keywords: vec!["space".to_string(), "nasa".to_string()],
            }
        );
    }

    #[test]
    fn test_topic_id_string_and_missing() {
        let outcome = serde_json::from_value::<TopicResult>(json!({ "topic_id": "t-7", "topic_name": "hockey" }))
            .unwrap()
            .resolve();
        assert!(matches!(outcome, TopicOutcome::Matched { ref topic_id, .. } if topic_id == "t-7"));

        let outcome = serde_json::from_value::<TopicResult>(json!({})).unwrap().resolve();
        assert!(matches!(outcome, TopicOutcome::Matched { ref topic_id, .. } if topic_id == "n/a"));
    }

    #[test]
    fn test_preprocess_partial() {
        let result: PreprocessResult = serde_json::from_value(json!({ "words": 4 })).unwrap();
        assert_eq!(result.words, 4);
        assert_eq!(result.tokens, 0);
        assert!(result.tokens_list.is_empty());

        let result: PreprocessResult = serde_json::from_value(json!({
            "original_chars": null,
            "words": 4,
            "cleaned_text": null,
            "tokens_list": null
        }))
        .unwrap();
        assert_eq!(result.original_chars, 0);
        assert_eq!(result.words, 4);
        assert_eq!(result.cleaned_text, "");
        assert!(result.tokens_list.is_empty());
    }

    #[test]
    fn test_summary_missing_or_null() {
        let missing: SummaryResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.summary, "");

        let null: SummaryResult = serde_json::from_value(json!({ "summary": null })).unwrap();
        assert_eq!(null, missing);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Topics".parse::<AnalysisKind>().unwrap(), AnalysisKind::Topics);
        assert_eq!(AnalysisKind::Summary.endpoint(), "/api/summary");
        assert!("translate".parse::<AnalysisKind>().is_err());
    }
}
