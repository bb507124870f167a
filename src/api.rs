//! HTTP surface of the dashboard: the page itself, its form submit, and a
//! JSON endpoint returning rendered fragments.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Settings;
use crate::dispatcher::{settle_all, Dispatcher};
use crate::models::AnalysisKind;
use crate::page::{Page, Region};
use crate::render;
use crate::transport::{HttpTransport, Transport};

#[derive(OpenApi)]
#[openapi(
    paths(render_fragments),
    components(schemas(RenderRequest, RenderResponse, RegionFragment)),
    tags((name = "dashboard", description = "Text analysis rendering API"))
)]
pub struct ApiDoc;

pub struct AppState {
    pub settings: Settings,
    pub transport: Arc<dyn Transport>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let transport = Arc::new(HttpTransport::new(settings.analyzer_url.clone()));
        Self::with_transport(settings, transport)
    }

    pub fn with_transport(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        Self { settings, transport }
    }

    /// Fresh page and dispatcher for one request. Nothing is shared between requests.
    fn session(&self, text: String, summary_type: Option<String>) -> (Arc<Page>, Dispatcher) {
        let summary_type = summary_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.settings.summary_type.clone());
        let page = Arc::new(Page::with_input(text, summary_type));
        let dispatcher = Dispatcher::new(self.transport.clone(), page.clone());
        (page, dispatcher)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.settings.static_dir);

    Router::new()
        .merge(SwaggerUi::new("/nlp-dashboard-swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(dashboard).post(submit))
        .route("/render/:kind", post(render_fragments))
        .nest_service("/static", static_dir)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Dashboard page
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormAction {
    Preprocess,
    Sentiment,
    Topics,
    Summary,
    All,
    Clear,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub summary_type: Option<String>,
    pub action: FormAction,
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let page = Page::with_input("", state.settings.summary_type.clone());
    Html(render::document(&page.snapshot()))
}

pub async fn submit(State(state): State<Arc<AppState>>, Form(form): Form<AnalyzeForm>) -> Html<String> {
    info!(action = ?form.action, chars = form.text.len(), "dashboard form submitted");
    let (page, dispatcher) = state.session(form.text, form.summary_type);

    match form.action {
        FormAction::Preprocess => {
            dispatcher.run_preprocessing().await;
        }
        FormAction::Sentiment => {
            dispatcher.run_sentiment().await;
        }
        FormAction::Topics => {
            dispatcher.run_topic_model().await;
        }
        FormAction::Summary => {
            dispatcher.run_summary().await;
        }
        FormAction::All => {
            settle_all(dispatcher.run_full_analysis()).await;
        }
        FormAction::Clear => dispatcher.clear_all(),
    }

    Html(render::document(&page.snapshot()))
}

// ============================================================================
// Fragment API
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenderRequest {
    #[schema(example = "The launch was a great success.")]
    pub text: String,
    #[serde(rename = "type", default)]
    #[schema(example = "extractive")]
    pub summary_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegionFragment {
    #[schema(example = "sentimentOutput")]
    pub id: String,
    pub html: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RenderResponse {
    /// Validation notice, when the text was rejected.
    pub notice: Option<String>,
    pub regions: Vec<RegionFragment>,
}

/// Run one analysis kind (or `all`) and return the rendered region fragments.
#[utoipa::path(
    post,
    path = "/render/{kind}",
    params(
        ("kind" = String, Path, description = "preprocess, sentiment, topics, summary or all")
    ),
    request_body = RenderRequest,
    responses(
        (status = 200, description = "Rendered fragments", body = RenderResponse),
        (status = 404, description = "Unknown analysis kind")
    ),
    tag = "dashboard"
)]
pub async fn render_fragments(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, StatusCode> {
    let kinds: Vec<AnalysisKind> = if kind.eq_ignore_ascii_case("all") {
        AnalysisKind::ALL.to_vec()
    } else {
        vec![kind.parse().map_err(|_| StatusCode::NOT_FOUND)?]
    };

    let (page, dispatcher) = state.session(req.text, req.summary_type);
    if kinds.len() == 1 {
        dispatcher.run(kinds[0]).await;
    } else {
        settle_all(dispatcher.run_full_analysis()).await;
    }

    let snapshot = page.snapshot();
    let regions: Vec<Region> = kinds.iter().flat_map(|k| k.regions()).collect();

    Ok(Json(RenderResponse {
        notice: snapshot.notices.first().cloned(),
        regions: regions
            .into_iter()
            .map(|r| RegionFragment {
                id: r.element_id().to_string(),
                html: snapshot.region(r).to_string(),
            })
            .collect(),
    }))
}
