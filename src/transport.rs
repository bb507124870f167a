//! HTTP seam between the dispatcher and the analysis backend.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::models::AnalysisRequest;

/// Posts one analysis request and hands back the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, path: &str, request: &AnalysisRequest) -> Result<Value, AnalysisError>;
}

/// `reqwest`-backed transport talking to a single backend base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, request: &AnalysisRequest) -> Result<Value, AnalysisError> {
        let url = self.url_for(path);
        debug!(%url, chars = request.text.len(), "posting analysis request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::Request {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        // Error bodies are still JSON (e.g. `400 {"error": ...}` from /api/topics),
        // so the status only gets logged.
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "analysis backend returned non-success status");
        }

        let body = response.text().await.map_err(|e| AnalysisError::Request {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| AnalysisError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_url_joining() {
        let transport = HttpTransport::new("http://backend:5000/");
        assert_eq!(transport.url_for("/api/topics"), "http://backend:5000/api/topics");
        assert_eq!(transport.url_for("api/topics"), "http://backend:5000/api/topics");
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/summary")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "text": "A long story.", "type": "extractive" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"summary": "A story."}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url());
        let request = AnalysisRequest::new("A long story.").with_summary_type("extractive");
        let body = transport.post_json("/api/summary", &request).await.unwrap();

        assert_eq!(body, json!({ "summary": "A story." }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_body_is_still_decoded() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/topics")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "No text provided."}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url());
        let body = transport
            .post_json("/api/topics", &AnalysisRequest::new("x"))
            .await
            .unwrap();

        assert_eq!(body["error"], "No text provided.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_html_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/sentiment")
            .with_status(500)
            .with_header("content-type", "text/html")
            .with_body("<h1>Internal Server Error</h1>")
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url());
        let err = transport
            .post_json("/api/sentiment", &AnalysisRequest::new("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Decode { ref path, .. } if path == "/api/sentiment"));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let transport = HttpTransport::new("http://127.0.0.1:1");
        let err = transport
            .post_json("/api/preprocess", &AnalysisRequest::new("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Request { .. }));
        assert!(!err.is_validation());
    }
}
