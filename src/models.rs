//! Data contracts for the fixer agent backend
//!
//! Every record here is a read-only projection of backend-owned state. The
//! backend schema is not under this crate's control, so any field it does
//! not guarantee is optional or defaulted: a missing or malformed field must
//! never abort decoding an otherwise usable payload.

use chrono::{DateTime, Utc};
use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Backend health report from `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Per-service status, keyed by service name
    /// (`database`, `gemini_api`, `github_api`, ...).
    #[serde(default)]
    pub services: HashMap<String, String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Resolution state a recorded failure carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixResolution {
    #[default]
    Pending,
    Generated,
    Approved,
    Rejected,
    /// Catch-all for values this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for FixResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixResolution::Pending => write!(f, "pending"),
            FixResolution::Generated => write!(f, "generated"),
            FixResolution::Approved => write!(f, "approved"),
            FixResolution::Rejected => write!(f, "rejected"),
            FixResolution::Unknown => write!(f, "unknown"),
        }
    }
}

/// One recorded CI/CD workflow run that did not succeed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub run_id: Option<i64>,
    #[serde(default)]
    pub workflow_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub error_log: Option<String>,
    #[serde(default)]
    pub fix_status: FixResolution,
    #[serde(default)]
    pub suggested_fix: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a proposed fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    #[default]
    Pending,
    PendingApproval,
    Approved,
    Rejected,
    Applied,
    #[serde(other)]
    Unknown,
}

impl FixStatus {
    /// Whether the fix is still waiting on a human decision.
    pub fn awaits_review(&self) -> bool {
        matches!(self, FixStatus::Pending | FixStatus::PendingApproval)
    }
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixStatus::Pending => write!(f, "pending"),
            FixStatus::PendingApproval => write!(f, "pending_approval"),
            FixStatus::Approved => write!(f, "approved"),
            FixStatus::Rejected => write!(f, "rejected"),
            FixStatus::Applied => write!(f, "applied"),
            FixStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for FixStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => FixStatus::Pending,
            "pending_approval" => FixStatus::PendingApproval,
            "approved" => FixStatus::Approved,
            "rejected" => FixStatus::Rejected,
            "applied" => FixStatus::Applied,
            _ => FixStatus::Unknown,
        }
    }
}

/// A proposed remediation for one CI/CD failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fix {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub run_id: Option<i64>,
    #[serde(default)]
    pub suggested_fix: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_analysis: Option<String>,
    /// Backend-estimated correctness in `[0, 1]`. Clamp before rendering
    /// as a percentage; absent means "no estimate", not zero confidence.
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub status: FixStatus,
    #[serde(default)]
    pub fix_complexity: Option<String>,
    #[serde(default)]
    pub workflow_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Loosely-typed entry in the dashboard's recent-activity feed. The backend
/// varies the fields it fills in, so views read them opportunistically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub workflow_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ActivityEvent {
    /// Best-effort repository label across the field spellings the
    /// backend has used.
    pub fn repo_label(&self) -> &str {
        self.repository
            .as_deref()
            .or(self.repo_name.as_deref())
            .unwrap_or("unknown")
    }
}

/// Aggregate counters behind the dashboard overview cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_failures: u64,
    #[serde(default)]
    pub total_repositories: u64,
    #[serde(default)]
    pub active_fixes: u64,
    /// Fraction in `[0, 1]`, not a percentage.
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub avg_processing_time: Option<String>,
    #[serde(default)]
    pub recent_activity: Vec<ActivityEvent>,
}

/// Mined failure patterns from `GET /analytics/patterns`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternsReport {
    /// Repository name -> failure count.
    #[serde(default)]
    pub most_failing_repos: HashMap<String, u64>,
    /// Error-type label -> occurrence count.
    #[serde(default)]
    pub common_error_types: HashMap<String, u64>,
    /// Language name -> count.
    #[serde(default)]
    pub language_distribution: HashMap<String, u64>,
}

/// Per-error-type slice of the effectiveness breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorTypeEffectiveness {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub approval_rate: f64,
}

/// Aggregate fix statistics from `GET /analytics/effectiveness`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectivenessMetrics {
    #[serde(default)]
    pub total_fixes_generated: u64,
    #[serde(default)]
    pub total_fixes_approved: u64,
    #[serde(default)]
    pub pending_fixes: u64,
    /// Fraction in `[0, 1]`.
    #[serde(default)]
    pub overall_approval_rate: f64,
    #[serde(default)]
    pub effectiveness_by_type: HashMap<String, ErrorTypeEffectiveness>,
}

/// Per-repository analytics from `GET /analytics/repository/{owner}/{repo}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryProfile {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub total_runs: u64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub primary_language: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

// ---- response envelopes ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailuresResponse {
    #[serde(default)]
    pub failures: Vec<Failure>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixesResponse {
    #[serde(default)]
    pub fixes: Vec<Fix>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub summary: DashboardSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternsResponse {
    #[serde(default)]
    pub patterns: PatternsReport,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Acknowledgement for an approve/reject/apply action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixActionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub fix_id: Option<String>,
}

/// Acknowledgement for a manually triggered analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub run_id: Option<i64>,
}

// ---- request bodies ----

/// Body for `POST /fixes/{id}/approve`, `/reject`, and `/apply`.
/// The `comment` key is omitted entirely when no comment is given.
#[derive(Debug, Clone, Serialize)]
pub struct FixActionRequest {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body for `POST /analyze`. All three fields are required and serialize
/// under exactly these names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    pub owner: String,
    pub repo: String,
    pub run_id: i64,
}

// ---- lenient deserializers ----

/// Accept a JSON string or number as an identifier. The backend has emitted
/// both across versions.
fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Parse an RFC 3339 timestamp, tolerating absent or unparseable values.
fn de_opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fix_status_degrades() {
        let fix: Fix = serde_json::from_str(r#"{"id": 7, "status": "escalated"}"#).unwrap();
        assert_eq!(fix.status, FixStatus::Unknown);
        assert_eq!(fix.id.as_deref(), Some("7"));
    }

    #[test]
    fn test_unknown_fix_resolution_degrades() {
        let failure: Failure =
            serde_json::from_str(r#"{"id": "abc", "fix_status": "wat"}"#).unwrap();
        assert_eq!(failure.fix_status, FixResolution::Unknown);
    }

    #[test]
    fn test_fix_decodes_with_all_fields_missing() {
        let fix: Fix = serde_json::from_str("{}").unwrap();
        assert_eq!(fix.status, FixStatus::Pending);
        assert!(fix.confidence_score.is_none());
        assert!(fix.created_at.is_none());
    }

    #[test]
    fn test_id_accepts_string_and_number() {
        let a: Fix = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        let b: Fix = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_unparseable_created_at_becomes_none() {
        let fix: Fix = serde_json::from_str(r#"{"created_at": "yesterday-ish"}"#).unwrap();
        assert!(fix.created_at.is_none());

        let fix: Fix =
            serde_json::from_str(r#"{"created_at": "2025-08-20T10:30:00Z"}"#).unwrap();
        assert!(fix.created_at.is_some());
    }

    #[test]
    fn test_fix_action_request_omits_absent_comment() {
        let body = FixActionRequest {
            action: "approve",
            comment: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"action":"approve"}"#);

        let body = FixActionRequest {
            action: "reject",
            comment: Some("flaky test, not a real fix".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"action":"reject","comment":"flaky test, not a real fix"}"#
        );
    }

    #[test]
    fn test_analysis_request_round_trip_exact_keys() {
        let req = AnalysisRequest {
            owner: "facebook".to_string(),
            repo: "react".to_string(),
            run_id: 12345,
        };

        let json = serde_json::to_value(&req).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["owner", "repo", "run_id"]);

        let decoded: AnalysisRequest = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn test_fix_status_from_str_fallback() {
        assert_eq!(FixStatus::from("applied"), FixStatus::Applied);
        assert_eq!(FixStatus::from("who-knows"), FixStatus::Unknown);
    }

    #[test]
    fn test_dashboard_summary_defaults() {
        let response: DashboardResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.summary.total_failures, 0);
        assert!(response.summary.recent_activity.is_empty());
    }

    #[test]
    fn test_activity_event_repo_label_fallbacks() {
        let event: ActivityEvent =
            serde_json::from_str(r#"{"repo_name": "org/api"}"#).unwrap();
        assert_eq!(event.repo_label(), "org/api");

        let event: ActivityEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(event.repo_label(), "unknown");
    }
}
