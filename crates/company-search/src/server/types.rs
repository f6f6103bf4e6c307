//! REST API types with schemars annotations for OpenAPI generation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::database::CompanyRecord;

// Base Response Structure
// ======================

/// Base response object for all API endpoints
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  /// Optional error information
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  /// Response data (generic for different endpoint types)
  #[serde(flatten)]
  pub data: T,
}

/// API versioning information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionInfo {
  /// The latest version of the API
  pub latest: String,

  /// The version of the API requested by the client
  pub requested: String,

  /// The version of the API that was used in producing the response
  pub resolved: String,
}

/// API error information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,

  /// Error stack trace (if available)
  #[serde(default)]
  pub stack: Vec<String>,

  /// Additional error context
  #[serde(default)]
  pub context: serde_json::Value,
}

// Status/Version Endpoints
// =======================

/// Response for /status endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  pub status: String,
  pub version: String,

  /// Distinct descriptions embedded since startup
  pub embedding_cache_entries: usize,

  /// Whether the database handle has been opened yet
  pub database_connected: bool,

  /// Sessions that have logged in and not yet expired
  pub active_sessions: usize,
}

/// Response for /version endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  /// Current API version
  pub version: String,
}

// Logs Endpoint
// =============

/// Query string for /logs
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LogsQuery {
  /// Maximum number of entries, newest kept
  pub limit: Option<usize>,

  /// Only entries at this level ("all" or absent for every level)
  pub level: Option<String>,
}

/// Response for /logs endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogsResponse {
  pub logs: Vec<LogEntry>,
}

/// Individual log entry (re-exported from bentley)
pub type LogEntry = bentley::request_logs::LogEntry;

// Session Endpoints
// =================

/// Request for /api/login
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LoginRequest {
  pub password: String,
}

/// Response for /api/login and /api/logout
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SessionResponse {
  pub authenticated: bool,
}

// Search Endpoint
// ===============

/// Request for /api/search
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
  /// Free-text company description
  pub description: String,

  /// Industries to restrict to (exact, case-sensitive); empty for any
  #[serde(default)]
  pub industries: Vec<String>,

  /// Maximum number of companies to return
  pub max_results: Option<u32>,

  /// Number of nearest candidates the index examines
  pub candidate_pool_size: Option<u32>,
}

/// One company in a search response
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CompanyResult {
  pub name: String,
  pub description: String,
  pub industry: Option<String>,
  pub country: Option<String>,
  pub score: f64,

  #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
  pub extra: BTreeMap<String, serde_json::Value>,
}

/// Response for /api/search
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
  /// Matches, best first
  pub results: Vec<CompanyResult>,

  /// Number of results
  pub count: usize,
}

impl From<CompanyRecord> for CompanyResult {
  fn from(record: CompanyRecord) -> Self {
    Self {
      name: record.name,
      description: record.description,
      industry: record.industry,
      country: record.country,
      score: record.score,
      extra: record.extra,
    }
  }
}

// Helper Functions
// ================

fn version_info() -> VersionInfo {
  let version = env!("CARGO_PKG_VERSION");
  VersionInfo {
    latest: version.to_string(),
    requested: version.to_string(),
    resolved: version.to_string(),
  }
}

impl<T> BaseResponse<T> {
  /// Create a successful response
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: version_info(), transaction_id, errors: Vec::new(), data }
  }

  /// Create an error response
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: version_info(), transaction_id, errors, data: () }
  }
}

impl ApiError {
  /// Create a new API error
  pub fn new(key: &str, message: &str) -> Self {
    Self {
      key: key.to_string(),
      message: message.to_string(),
      stack: Vec::new(),
      context: serde_json::Value::Null,
    }
  }

  pub fn with_context(mut self, context: serde_json::Value) -> Self {
    self.context = context;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_success_flattens_data() {
    let id = Uuid::new_v4();
    let response = BaseResponse::success(SessionResponse { authenticated: true }, id);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["authenticated"], true);
    assert_eq!(json["transaction_id"], id.to_string());
    assert!(json.get("errors").is_none());
    assert_eq!(json["versioning"]["latest"], env!("CARGO_PKG_VERSION"));
  }

  #[test]
  fn test_error_carries_errors() {
    let response =
      BaseResponse::<()>::error(vec![ApiError::new("validation_failure", "bad")], Uuid::new_v4());
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["errors"][0]["key"], "validation_failure");
    assert_eq!(json["errors"][0]["message"], "bad");
  }

  #[test]
  fn test_search_request_defaults() {
    let request: SearchRequest = serde_json::from_str(r#"{"description":"payroll"}"#).unwrap();
    assert!(request.industries.is_empty());
    assert_eq!(request.max_results, None);
    assert_eq!(request.candidate_pool_size, None);
  }
}
