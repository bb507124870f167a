//! Text analysis dashboard.
//!
//! User text is posted to four independent analysis backends (preprocessing,
//! sentiment, topic modeling, summarization) and each JSON answer is rendered
//! into its own HTML region. The transport and the render target are traits
//! so the dispatcher runs the same against a live backend, a browser-facing
//! server page, or test fakes.

pub mod api;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod page;
pub mod render;
pub mod transport;

pub use dispatcher::{Dispatcher, OperationState, Outcome};
pub use error::AnalysisError;
pub use page::{Page, Region, RenderTarget};
pub use transport::{HttpTransport, Transport};
