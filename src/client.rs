//! HTTP client for the CI/CD Fixer Agent backend
//!
//! [`FixerClient`] translates typed method calls into requests against a
//! single configured base URL and decodes JSON responses into the records
//! in [`crate::models`]. It holds no cache and performs no retries: every
//! non-2xx response surfaces as [`ClientError::Api`] and the caller decides
//! how to recover. No authentication headers are sent; the backend is
//! assumed to sit behind network-level access control.

use crate::config::Config;
use crate::errors::{ClientError, Result};
use crate::models::{
    AnalysisRequest, AnalysisResponse, DashboardResponse, DashboardSummary, EffectivenessMetrics,
    Failure, FailuresResponse, FixActionRequest, FixActionResponse, FixesResponse, HealthStatus,
    PatternsResponse, RepositoryProfile,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Typed client over the fixer backend REST API.
#[derive(Debug, Clone)]
pub struct FixerClient {
    client: Client,
    base_url: String,
}

/// Optional filters for `GET /failures`. A field that is `None` is not
/// sent at all; `Some(0)` for `offset` is a legal value and is sent.
#[derive(Debug, Clone, Default)]
pub struct FailureQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub status: Option<String>,
}

/// Result of fetching the three analytics sources concurrently. Each
/// source carries its own `Result` so one failed call never hides the
/// data the other calls returned.
#[derive(Debug)]
pub struct AnalyticsOverview {
    pub summary: Result<DashboardSummary>,
    pub patterns: Result<PatternsResponse>,
    pub effectiveness: Result<EffectivenessMetrics>,
}

impl FixerClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.http_timeout)
            .default_headers(headers)
            .user_agent(format!("cicd-fixer-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful for
    /// connection pooling and for pointing tests at a mock server).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- health ----

    /// `GET /health`
    pub async fn get_health(&self) -> Result<HealthStatus> {
        self.get("/health", &[]).await
    }

    // ---- failures ----

    /// `GET /failures`, with optional `limit`, `offset`, and `status`
    /// query parameters.
    pub async fn get_failures(&self, query: &FailureQuery) -> Result<FailuresResponse> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = query.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(status) = &query.status {
            params.push(("status", status.clone()));
        }

        self.get("/failures", &params).await
    }

    /// `GET /failures/{id}`
    pub async fn get_failure(&self, id: &str) -> Result<Failure> {
        self.get(&format!("/failures/{}", id), &[]).await
    }

    // ---- fixes ----

    /// `GET /fixes`
    pub async fn get_fixes(&self) -> Result<FixesResponse> {
        self.get("/fixes", &[]).await
    }

    /// `POST /fixes/{id}/approve`. Non-idempotent: calling twice may
    /// record the approval comment twice on the backend.
    pub async fn approve_fix(&self, id: &str, comment: Option<&str>) -> Result<FixActionResponse> {
        self.fix_action(id, "approve", comment).await
    }

    /// `POST /fixes/{id}/reject`. Non-idempotent, same as approve.
    pub async fn reject_fix(&self, id: &str, comment: Option<&str>) -> Result<FixActionResponse> {
        self.fix_action(id, "reject", comment).await
    }

    /// `POST /fixes/{id}/apply`. Only meaningful for an approved fix;
    /// the backend enforces the lifecycle.
    pub async fn apply_fix(&self, id: &str) -> Result<FixActionResponse> {
        self.fix_action(id, "apply", None).await
    }

    async fn fix_action(
        &self,
        id: &str,
        action: &'static str,
        comment: Option<&str>,
    ) -> Result<FixActionResponse> {
        let body = FixActionRequest {
            action,
            comment: comment.map(str::to_string),
        };
        self.post(&format!("/fixes/{}/{}", id, action), &body).await
    }

    // ---- analytics ----

    /// `GET /analytics/dashboard`
    pub async fn get_dashboard(&self) -> Result<DashboardResponse> {
        self.get("/analytics/dashboard", &[]).await
    }

    /// `GET /analytics/effectiveness`
    pub async fn get_effectiveness(&self) -> Result<EffectivenessMetrics> {
        self.get("/analytics/effectiveness", &[]).await
    }

    /// Alias for [`get_effectiveness`](Self::get_effectiveness); both
    /// entry points are part of the public contract.
    pub async fn get_analytics(&self) -> Result<EffectivenessMetrics> {
        self.get_effectiveness().await
    }

    /// `GET /analytics/patterns`, with an optional `days_back` window.
    pub async fn get_patterns(&self, days_back: Option<u32>) -> Result<PatternsResponse> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(days) = days_back {
            params.push(("days_back", days.to_string()));
        }

        self.get("/analytics/patterns", &params).await
    }

    /// `GET /analytics/repository/{owner}/{repo}`
    pub async fn get_repository_analytics(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryProfile> {
        self.get(&format!("/analytics/repository/{}/{}", owner, repo), &[])
            .await
    }

    /// `POST /analyze`. Non-idempotent: re-sending the same run re-triggers
    /// analysis on the backend.
    pub async fn trigger_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        self.post("/analyze", request).await
    }

    /// Fetch dashboard summary, patterns, and effectiveness concurrently.
    /// The calls are independent; each source reports its own outcome.
    pub async fn fetch_analytics_overview(&self) -> AnalyticsOverview {
        let (summary, patterns, effectiveness) = futures::future::join3(
            self.get_dashboard(),
            self.get_patterns(None),
            self.get_effectiveness(),
        )
        .await;

        AnalyticsOverview {
            summary: summary.map(|response| response.summary),
            patterns,
            effectiveness,
        }
    }

    // ---- request primitives ----

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} ({} query params)", url, params.len());

        let mut request = self.client.get(&url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        Self::parse_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        Self::parse_response(response).await
    }

    /// Gate on the status code, then decode the body. Any non-2xx status
    /// becomes [`ClientError::Api`] regardless of what the body says.
    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::ensure_success(response)?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        Ok(response)
    }
}
