//! The four dispatch operations plus run-all and clear-all.
//!
//! Every operation follows the same cycle: validate the input, show a
//! placeholder, post to the backend, then render the result or an inline
//! error into its own regions. Failures never leave the operation.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::models::{
    AnalysisKind, AnalysisRequest, PreprocessResult, SentimentResult, SummaryResult, TopicResult,
};
use crate::page::{Region, RenderTarget};
use crate::render;
use crate::transport::Transport;

/// Lifecycle of a single dispatch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    InFlight,
    Rendered,
    Failed,
}

/// How one invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Result rendered into the output regions.
    Rendered,
    /// Request failed; inline error rendered.
    Failed,
    /// Input was empty; nothing was sent.
    Rejected,
    /// A newer request (or clear-all) superseded this one; nothing was written.
    Discarded,
}

impl AnalysisKind {
    /// Regions this kind writes to.
    pub fn regions(&self) -> Vec<Region> {
        self.placeholders().iter().map(|(region, _)| *region).collect()
    }

    fn placeholders(&self) -> &'static [(Region, &'static str)] {
        match self {
            AnalysisKind::Preprocess => &[
                (Region::PreStats, "Cleaning text & counting tokens…"),
                (Region::CleanText, "Processing..."),
                (Region::Tokens, "Processing..."),
            ],
            AnalysisKind::Sentiment => &[(Region::SentimentOutput, "Running VADER sentiment model…")],
            AnalysisKind::Topics => &[(Region::TopicResult, "Running trained NMF topic model…")],
            AnalysisKind::Summary => &[(Region::SummaryOutput, "Building extractive summary…")],
        }
    }

    fn error_region(&self) -> Region {
        match self {
            AnalysisKind::Preprocess => Region::PreStats,
            AnalysisKind::Sentiment => Region::SentimentOutput,
            AnalysisKind::Topics => Region::TopicResult,
            AnalysisKind::Summary => Region::SummaryOutput,
        }
    }

    fn error_message(&self) -> &'static str {
        match self {
            AnalysisKind::Preprocess => "Error while preprocessing.",
            AnalysisKind::Sentiment => "Error while running sentiment.",
            AnalysisKind::Topics => "Error while running topic model.",
            AnalysisKind::Summary => "Error while generating summary.",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    ticket: u64,
    state: OperationState,
}

/// Per-kind request tokens. Only the holder of the latest ticket may write.
///
/// Region writes happen inside the closures below, while the slot lock is
/// held, so a ticket check and the writes it guards cannot interleave with
/// clear-all. Lock order is always tracker, then render target.
#[derive(Debug, Default)]
pub struct OperationTracker {
    slots: Mutex<HashMap<AnalysisKind, Slot>>,
}

impl OperationTracker {
    fn issue(&self, kind: AnalysisKind, write: impl FnOnce()) -> u64 {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(kind).or_insert(Slot {
            ticket: 0,
            state: OperationState::Idle,
        });
        slot.ticket += 1;
        slot.state = OperationState::InFlight;
        write();
        slot.ticket
    }

    /// Records the final state and runs `write` if `ticket` is still current.
    /// Returns false for stale tickets, in which case `write` is dropped unrun.
    fn settle(&self, kind: AnalysisKind, ticket: u64, state: OperationState, write: impl FnOnce()) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get_mut(&kind) {
            Some(slot) if slot.ticket == ticket => {
                slot.state = state;
                write();
                true
            }
            _ => false,
        }
    }

    fn invalidate_all(&self, reset: impl FnOnce()) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        for slot in slots.values_mut() {
            slot.ticket += 1;
            slot.state = OperationState::Idle;
        }
        reset();
    }

    pub fn state(&self, kind: AnalysisKind) -> OperationState {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map(|s| s.state)
            .unwrap_or(OperationState::Idle)
    }
}

/// Sends analysis requests and renders their results into a [`RenderTarget`].
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    target: Arc<dyn RenderTarget>,
    tracker: Arc<OperationTracker>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, target: Arc<dyn RenderTarget>) -> Self {
        Self {
            transport,
            target,
            tracker: Arc::new(OperationTracker::default()),
        }
    }

    pub fn state(&self, kind: AnalysisKind) -> OperationState {
        self.tracker.state(kind)
    }

    pub async fn run_preprocessing(&self) -> Outcome {
        self.dispatch(AnalysisKind::Preprocess, |result: PreprocessResult| {
            vec![
                (Region::PreStats, render::preprocess_stats(&result)),
                (Region::CleanText, render::cleaned_text(&result)),
                (Region::Tokens, render::token_chips(&result)),
            ]
        })
        .await
    }

    pub async fn run_sentiment(&self) -> Outcome {
        self.dispatch(AnalysisKind::Sentiment, |result: SentimentResult| {
            vec![(Region::SentimentOutput, render::sentiment(&result.resolve()))]
        })
        .await
    }

    pub async fn run_topic_model(&self) -> Outcome {
        self.dispatch(AnalysisKind::Topics, |result: TopicResult| {
            vec![(Region::TopicResult, render::topic(&result.resolve()))]
        })
        .await
    }

    pub async fn run_summary(&self) -> Outcome {
        self.dispatch(AnalysisKind::Summary, |result: SummaryResult| {
            vec![(Region::SummaryOutput, render::summary(&result))]
        })
        .await
    }

    pub async fn run(&self, kind: AnalysisKind) -> Outcome {
        match kind {
            AnalysisKind::Preprocess => self.run_preprocessing().await,
            AnalysisKind::Sentiment => self.run_sentiment().await,
            AnalysisKind::Topics => self.run_topic_model().await,
            AnalysisKind::Summary => self.run_summary().await,
        }
    }

    /// Fans out all four operations without awaiting them.
    ///
    /// The returned handles may be dropped; the tasks keep running.
    pub fn run_full_analysis(&self) -> Vec<JoinHandle<Outcome>> {
        AnalysisKind::ALL
            .iter()
            .map(|kind| {
                let dispatcher = self.clone();
                let kind = *kind;
                tokio::spawn(async move { dispatcher.run(kind).await })
            })
            .collect()
    }

    /// Resets the input and every region to its default text. In-flight
    /// responses are discarded when they arrive.
    pub fn clear_all(&self) {
        self.tracker.invalidate_all(|| {
            self.target.clear_input();
            for region in Region::ALL {
                self.target.set_html(region, region.default_text().to_string());
            }
        });
        debug!("dashboard cleared");
    }

    fn prepare(&self, kind: AnalysisKind) -> Result<AnalysisRequest, AnalysisError> {
        let text = self.target.input_text().trim().to_string();
        if text.is_empty() {
            return Err(AnalysisError::empty_input());
        }
        let request = AnalysisRequest::new(text);
        Ok(match kind {
            AnalysisKind::Summary => request.with_summary_type(self.target.summary_type()),
            _ => request,
        })
    }

    async fn dispatch<R, F>(&self, kind: AnalysisKind, fragments: F) -> Outcome
    where
        R: DeserializeOwned,
        F: FnOnce(R) -> Vec<(Region, String)>,
    {
        let request = match self.prepare(kind) {
            Ok(request) => request,
            Err(e) => {
                info!(%kind, "analysis skipped: {}", e);
                self.target.alert(&e.to_string());
                return Outcome::Rejected;
            }
        };

        let ticket = self.tracker.issue(kind, || {
            for (region, message) in kind.placeholders() {
                self.target.set_html(*region, render::loading(message));
            }
        });
        let request_id = Uuid::new_v4();
        debug!(%kind, %request_id, ticket, "analysis request in flight");

        let result = self
            .transport
            .post_json(kind.endpoint(), &request)
            .await
            .and_then(|body| {
                serde_json::from_value::<R>(body).map_err(|e| AnalysisError::Decode {
                    path: kind.endpoint().to_string(),
                    reason: e.to_string(),
                })
            });

        let (state, writes, failure) = match result {
            Ok(body) => (OperationState::Rendered, fragments(body), None),
            Err(e) => (
                OperationState::Failed,
                vec![(kind.error_region(), render::loading(kind.error_message()))],
                Some(e),
            ),
        };
        let current = self.tracker.settle(kind, ticket, state, || {
            for (region, html) in writes {
                self.target.set_html(region, html);
            }
        });
        if !current {
            debug!(%kind, %request_id, ticket, "discarding stale analysis response");
            return Outcome::Discarded;
        }

        match failure {
            None => {
                info!(%kind, %request_id, "analysis rendered");
                Outcome::Rendered
            }
            Some(e) => {
                error!(%kind, %request_id, "analysis failed: {}", e);
                Outcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("tracker", &self.tracker).finish()
    }
}

/// Logs join failures of fanned-out tasks; used by callers that do await run-all.
pub async fn settle_all(handles: Vec<JoinHandle<Outcome>>) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!("analysis task did not complete: {}", e),
        }
    }
    outcomes
}
