//! HTML fragments for each analysis result, plus the dashboard document.
//!
//! Everything interpolated from user input or backend responses goes through
//! [`escape`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::{PreprocessResult, SentimentReading, SummaryResult, TopicOutcome};
use crate::page::{PageState, Region};

pub const POSITIVE_EMOJI: &str = "😊";
pub const NEGATIVE_EMOJI: &str = "☹️";
pub const NEUTRAL_EMOJI: &str = "😐";

pub const TOPIC_NOTE: &str = "Topic is inferred by applying a trained NMF model on the 20 Newsgroups dataset \
and matching your paragraph to the closest learned topic.";

static SENTIMENT_EMOJI: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    vec![
        ("Strong Positive", POSITIVE_EMOJI),
        ("Positive", POSITIVE_EMOJI),
        ("Strong Negative", NEGATIVE_EMOJI),
        ("Negative", NEGATIVE_EMOJI),
    ]
    .into_iter()
    .collect()
});

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Placeholder (and inline error) markup.
pub fn loading(message: &str) -> String {
    format!(r#"<span class="loading">{}</span>"#, escape(message))
}

// ============================================================================
// Preprocessing
// ============================================================================

fn stat_pill(label: &str, value: u64) -> String {
    format!(
        r#"
  <div class="stat-pill">
    <div class="stat-label">{}</div>
    <div class="stat-value">{}</div>
  </div>"#,
        label, value
    )
}

pub fn preprocess_stats(result: &PreprocessResult) -> String {
    [
        stat_pill("Original chars", result.original_chars),
        stat_pill("Cleaned chars", result.cleaned_chars),
        stat_pill("Words", result.words),
        stat_pill("Tokens", result.tokens),
    ]
    .concat()
}

pub fn cleaned_text(result: &PreprocessResult) -> String {
    format!(
        "<strong>Cleaned Text:</strong><br>\n<span>{}</span>",
        escape(&result.cleaned_text)
    )
}

pub fn token_chips(result: &PreprocessResult) -> String {
    let chips: String = result
        .tokens_list
        .iter()
        .map(|t| format!(r#"<span class="token-chip">{}</span>"#, escape(t)))
        .collect();
    format!(
        "<strong>Tokens:</strong>\n<div class=\"tokens-list\">{}</div>",
        chips
    )
}

// ============================================================================
// Sentiment
// ============================================================================

/// Maps a compound score in [-1, 1] onto a [0, 100] percentage.
pub fn marker_position(compound: f64) -> f64 {
    ((compound + 1.0) / 2.0) * 100.0
}

pub fn sentiment_emoji(label: &str) -> &'static str {
    SENTIMENT_EMOJI.get(label).copied().unwrap_or(NEUTRAL_EMOJI)
}

/// Fixed-point formatting that rounds exact halves away from zero.
///
/// `{:.N}` rounds an exactly representable half to even (`0.25` → `0.2`); the
/// dashboard shows `0.3`. Only exact halves differ: `value` sits exactly
/// halfway between two N-digit decimals iff `value * 2^(N+1)` is an odd integer.
fn to_fixed(value: f64, digits: usize) -> String {
    let doubled = value * 2f64.powi(digits as i32 + 1);
    let exact_half = doubled.fract() == 0.0 && doubled % 2.0 != 0.0;
    let value = if exact_half {
        value + value.signum() * 0.25 / 10f64.powi(digits as i32)
    } else {
        value
    };
    format!("{:.*}", digits, value)
}

fn percent(share: f64) -> String {
    format!("{}%", to_fixed(share * 100.0, 1))
}

pub fn sentiment(reading: &SentimentReading) -> String {
    format!(
        r#"
<div class="sent-header-line">
  <div class="sent-label">
    Sentiment: {label}
    <span class="sent-emoji">{emoji}</span>
  </div>
  <div class="sent-score">
    Compound score: <strong>{compound}</strong>
  </div>
</div>

<div class="sent-bar-wrapper">
  <div class="sent-bar-track">
    <div class="sent-bar-marker" style="left: {position}%;"></div>
  </div>
  <div class="sent-bar-labels">
    <span>-1</span>
    <span>Neutral</span>
    <span>+1</span>
  </div>
</div>

<div class="sent-breakdown">
  <span>Positive: {pos}</span>
  <span>Neutral: {neu}</span>
  <span>Negative: {neg}</span>
</div>

<div class="sent-note">
  {note}
</div>"#,
        label = escape(&reading.label),
        emoji = sentiment_emoji(&reading.label),
        compound = to_fixed(reading.compound, 4),
        position = marker_position(reading.compound),
        pos = percent(reading.pos),
        neu = percent(reading.neu),
        neg = percent(reading.neg),
        note = escape(&reading.interpretation),
    )
}

// ============================================================================
// Topics and summary
// ============================================================================

pub fn topic(outcome: &TopicOutcome) -> String {
    match outcome {
        TopicOutcome::Failed(error) => loading(error),
        TopicOutcome::Matched {
            topic_id,
            topic_name,
            keywords,
        } => {
            let keyword_html: String = keywords
                .iter()
                .map(|k| format!(r#"<span class="topic-keyword">{}</span>"#, escape(k)))
                .collect();
            format!(
                r#"
<div><strong>Topic ID:</strong> {}</div>
<div style="margin-top:6px;">
  <strong>Predicted Topic Name:</strong><br>
  <span>{}</span>
</div>
<div style="margin-top:6px;">
  <strong>Top Keywords:</strong>
  <div class="topic-keywords">{}</div>
</div>
<div class="topic-note">
  {}
</div>"#,
                escape(topic_id),
                escape(topic_name),
                keyword_html,
                TOPIC_NOTE
            )
        }
    }
}

pub fn summary(result: &SummaryResult) -> String {
    format!(
        "<strong>Summary:</strong><br>\n<span>{}</span>",
        escape(&result.summary)
    )
}

// ============================================================================
// Dashboard document
// ============================================================================

const ACTIONS: [(&str, &str); 6] = [
    ("preprocess", "Preprocess"),
    ("sentiment", "Sentiment"),
    ("topics", "Topic Model"),
    ("summary", "Summarize"),
    ("all", "Run Full Analysis"),
    ("clear", "Clear All"),
];

/// Full HTML page for a page state. Region contents are already markup.
pub fn document(state: &PageState) -> String {
    let notice = state
        .notices
        .last()
        .map(|n| format!("<div class=\"notice\" role=\"alert\">{}</div>\n", escape(n)))
        .unwrap_or_default();

    let buttons: String = ACTIONS
        .iter()
        .map(|(value, label)| {
            format!(
                "<button type=\"submit\" name=\"action\" value=\"{}\">{}</button>\n",
                value, label
            )
        })
        .collect();

    let regions: String = Region::ALL
        .iter()
        .map(|r| {
            format!(
                "<section class=\"output\"><div id=\"{}\">{}</div></section>\n",
                r.element_id(),
                state.region(*r)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>NLP Dashboard</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
{notice}<form method="post" action="/">
<textarea id="inputText" name="text" rows="10">{input}</textarea>
<input type="text" id="summaryType" name="type" value="{summary_type}">
{buttons}</form>
{regions}</body>
</html>
"#,
        notice = notice,
        input = escape(&state.input),
        summary_type = escape(&state.summary_type),
        buttons = buttons,
        regions = regions,
    )
}
