//! Backend client: the only place that talks to the tailoring REST API.
//!
//! Resolution, analysis and the HTTP handlers go through `TailorBackend`, so the
//! HTTP transport can be swapped for a scripted fake in tests.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::comparison::SavedComparison;
use crate::models::resume::{BaseResume, TailoredResumeRecord};

#[cfg(test)]
pub mod fake;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid comparison id '{0}'")]
    InvalidId(String),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }
}

/// The three analysis endpoints under `/api/resume-analysis/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Changes,
    Keywords,
    MatchScore,
}

impl AnalysisKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            AnalysisKind::Changes => "analyze-changes",
            AnalysisKind::Keywords => "analyze-keywords",
            AnalysisKind::MatchScore => "match-score",
        }
    }
}

/// Contract of the tailoring backend as consumed by this service.
///
/// Carried in `AppState` as `Arc<dyn TailorBackend>`.
#[async_trait]
pub trait TailorBackend: Send + Sync {
    async fn saved_comparison(&self, id: &str) -> Result<SavedComparison, BackendError>;

    /// `BackendError::NotFound` means the resume no longer exists.
    async fn tailored_resume(&self, id: i64) -> Result<TailoredResumeRecord, BackendError>;

    async fn base_resume(&self, id: i64) -> Result<BaseResume, BackendError>;

    async fn analyze(
        &self,
        kind: AnalysisKind,
        tailored_resume_id: i64,
    ) -> Result<Value, BackendError>;
}

#[derive(Debug, Serialize)]
struct AnalysisRequest {
    tailored_resume_id: i64,
}

/// reqwest-backed `TailorBackend`. No retries: failures go straight back to
/// the caller, and the user re-triggers the action.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        debug!("GET {url}");
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response, path).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = self.url(path);
        debug!("POST {url}");
        let response = self
            .authorized(self.client.post(&url))
            .json(body)
            .send()
            .await?;
        let response = check_status(response, path).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TailorBackend for HttpBackend {
    async fn saved_comparison(&self, id: &str) -> Result<SavedComparison, BackendError> {
        self.get_json(&comparison_path(id)?).await
    }

    async fn tailored_resume(&self, id: i64) -> Result<TailoredResumeRecord, BackendError> {
        self.get_json(&format!("/api/tailor/tailored/{id}")).await
    }

    async fn base_resume(&self, id: i64) -> Result<BaseResume, BackendError> {
        self.get_json(&format!("/api/resumes/{id}")).await
    }

    async fn analyze(
        &self,
        kind: AnalysisKind,
        tailored_resume_id: i64,
    ) -> Result<Value, BackendError> {
        self.post_json(
            &format!("/api/resume-analysis/{}", kind.endpoint()),
            &AnalysisRequest { tailored_resume_id },
        )
        .await
    }
}

/// Saved comparison ids are opaque tokens from a shared link. Anything else is
/// rejected before it can reach the request path.
fn comparison_path(id: &str) -> Result<String, BackendError> {
    let is_token = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !is_token {
        return Err(BackendError::InvalidId(id.to_string()));
    }
    Ok(format!("/api/saved-comparisons/{id}"))
}

async fn check_status(response: Response, path: &str) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(BackendError::NotFound(path.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Backend returned {status} for {path}: {body}");
    Err(BackendError::Api {
        status: status.as_u16(),
        message: extract_error_message(&body, status),
    })
}

/// Pulls the human-readable message out of an error body.
/// Falls back to the raw body, then to the status line.
fn extract_error_message(body: &str, status: StatusCode) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = parsed.as_ref().and_then(|v| {
        ["detail", "error", "message"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str))
    });

    match field {
        Some(message) => message.to_string(),
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => format!("Request failed with status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_prefers_detail() {
        let body = r#"{"detail": "Tailored resume is still processing"}"#;
        assert_eq!(
            extract_error_message(body, StatusCode::CONFLICT),
            "Tailored resume is still processing"
        );
    }

    #[test]
    fn test_extract_error_message_reads_error_field() {
        let body = r#"{"error": "quota exceeded"}"#;
        assert_eq!(
            extract_error_message(body, StatusCode::TOO_MANY_REQUESTS),
            "quota exceeded"
        );
    }

    #[test]
    fn test_extract_error_message_falls_back_to_raw_body() {
        assert_eq!(
            extract_error_message("upstream timeout\n", StatusCode::BAD_GATEWAY),
            "upstream timeout"
        );
    }

    #[test]
    fn test_extract_error_message_empty_body_uses_status() {
        let message = extract_error_message("", StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.contains("500"));
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let backend =
            HttpBackend::new("http://localhost:8000/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.url("/api/tailor/tailored/7"),
            "http://localhost:8000/api/tailor/tailored/7"
        );
    }

    #[test]
    fn test_comparison_path_accepts_plain_tokens() {
        assert_eq!(comparison_path("42").unwrap(), "/api/saved-comparisons/42");
        assert_eq!(
            comparison_path("cmp_A1-b2").unwrap(),
            "/api/saved-comparisons/cmp_A1-b2"
        );
    }

    #[test]
    fn test_comparison_path_rejects_path_traversal() {
        for id in ["../../admin/users", "42/../../admin", "a%2F..", "42?x=1", "a b", ""] {
            assert!(
                matches!(comparison_path(id), Err(BackendError::InvalidId(_))),
                "accepted {id:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_saved_comparison_with_traversal_id_sends_nothing() {
        let backend = HttpBackend::new(
            "http://127.0.0.1:9",
            Some("secret".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();
        let err = backend.saved_comparison("../../admin/users").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidId(id) if id == "../../admin/users"));
    }

    #[test]
    fn test_analysis_endpoints() {
        assert_eq!(AnalysisKind::Changes.endpoint(), "analyze-changes");
        assert_eq!(AnalysisKind::Keywords.endpoint(), "analyze-keywords");
        assert_eq!(AnalysisKind::MatchScore.endpoint(), "match-score");
    }

    #[test]
    fn test_api_error_displays_raw_message() {
        let err = BackendError::Api {
            status: 502,
            message: "Bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Bad gateway");
        assert!(!err.is_not_found());
        assert!(BackendError::NotFound("/x".to_string()).is_not_found());
    }
}
