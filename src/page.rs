//! Output regions and the render target the dispatcher writes into.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::config::DEFAULT_SUMMARY_TYPE;

/// The six output regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    PreStats,
    CleanText,
    Tokens,
    SentimentOutput,
    TopicResult,
    SummaryOutput,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::PreStats,
        Region::CleanText,
        Region::Tokens,
        Region::SentimentOutput,
        Region::TopicResult,
        Region::SummaryOutput,
    ];

    /// DOM id of the region in the dashboard document.
    pub fn element_id(&self) -> &'static str {
        match self {
            Region::PreStats => "preStats",
            Region::CleanText => "cleanText",
            Region::Tokens => "tokens",
            Region::SentimentOutput => "sentimentOutput",
            Region::TopicResult => "topicResult",
            Region::SummaryOutput => "summaryOutput",
        }
    }

    /// Static text shown before anything has run, and after clear-all.
    pub fn default_text(&self) -> &'static str {
        match self {
            Region::PreStats => "Waiting for input…",
            Region::CleanText => "Cleaned text will appear here.",
            Region::Tokens => "Tokens will appear here.",
            Region::SentimentOutput => "Sentiment insights will appear here.",
            Region::TopicResult => "Topic name and keywords will appear here.",
            Region::SummaryOutput => "Summary will appear here.",
        }
    }
}

/// Where dispatch operations read their input and write their fragments.
///
/// Implementations use interior mutability; operations running concurrently
/// only ever touch their own regions.
pub trait RenderTarget: Send + Sync {
    /// Raw (untrimmed) text of the input field.
    fn input_text(&self) -> String;
    /// Current value of the summary-type selector.
    fn summary_type(&self) -> String;
    fn clear_input(&self);
    fn set_html(&self, region: Region, html: String);
    /// Blocking notice for the user (validation failures).
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub input: String,
    pub summary_type: String,
    pub regions: HashMap<Region, String>,
    pub notices: Vec<String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            input: String::new(),
            summary_type: DEFAULT_SUMMARY_TYPE.to_string(),
            regions: Region::ALL
                .iter()
                .map(|r| (*r, r.default_text().to_string()))
                .collect(),
            notices: Vec::new(),
        }
    }
}

impl PageState {
    pub fn region(&self, region: Region) -> &str {
        self.regions.get(&region).map(String::as_str).unwrap_or_default()
    }
}

/// In-memory render target used by the server, the CLI and tests.
#[derive(Debug, Default)]
pub struct Page {
    state: RwLock<PageState>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl Into<String>, summary_type: impl Into<String>) -> Self {
        let state = PageState {
            input: input.into(),
            summary_type: summary_type.into(),
            ..PageState::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn snapshot(&self) -> PageState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn region(&self, region: Region) -> String {
        self.snapshot().region(region).to_string()
    }
}

impl RenderTarget for Page {
    fn input_text(&self) -> String {
        self.state.read().unwrap_or_else(PoisonError::into_inner).input.clone()
    }

    fn summary_type(&self) -> String {
        self.state.read().unwrap_or_else(PoisonError::into_inner).summary_type.clone()
    }

    fn clear_input(&self) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).input.clear();
    }

    fn set_html(&self, region: Region, html: String) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .regions
            .insert(region, html);
    }

    fn alert(&self, message: &str) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .notices
            .push(message.to_string());
    }
}
