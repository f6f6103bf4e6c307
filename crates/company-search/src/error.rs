//! Error taxonomy shared by every layer of the search pipeline

use axum::http::StatusCode;
use thiserror::Error;

/// Startup configuration problems. Always fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  #[error("required configuration value {0} is missing or empty")]
  Missing(&'static str),

  #[error("configuration value {name} is invalid: {reason}")]
  Invalid { name: &'static str, reason: String },
}

/// Failures talking to the embedding model API
#[derive(Error, Debug)]
pub enum EmbeddingError {
  #[error("text to embed is empty")]
  EmptyInput,

  #[error("embedding service rejected the API key: {0}")]
  Authentication(String),

  #[error("embedding service rate limit reached: {0}")]
  RateLimited(String),

  #[error("could not reach the embedding service: {0}")]
  Network(#[source] reqwest::Error),

  #[error("embedding service returned an unusable response: {0}")]
  MalformedResponse(String),

  #[error("embedding service returned HTTP {status}: {message}")]
  UnexpectedStatus { status: u16, message: String },
}

/// Failures running the vector search query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
  #[error("could not connect to the database: {0}")]
  Connection(String),

  #[error("the search query was rejected: {0}")]
  InvalidQuery(String),

  #[error("vector index '{index}' does not exist: {message}")]
  IndexMissing { index: String, message: String },

  #[error("query vector does not match the index dimensions: {0}")]
  DimensionMismatch(String),

  #[error("search returned a malformed record: {0}")]
  MalformedRecord(String),
}

/// Query parameters that fail local checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("please enter a description to search for")]
  EmptyText,

  #[error("max results must be between 1 and {max}, got {value}")]
  MaxResultsOutOfRange { value: u32, max: u32 },

  #[error("candidates to search ({candidates}) must be at least max results ({max_results})")]
  PoolSmallerThanResults { max_results: u32, candidates: u32 },

  #[error("candidates to search must be at most {max}, got {value}")]
  PoolTooLarge { value: u32, max: u32 },

  #[error("{field} must be a whole number, got '{value}'")]
  NotANumber { field: &'static str, value: String },
}

/// Everything a search request can end in, besides success
#[derive(Error, Debug)]
pub enum SearchError {
  #[error(transparent)]
  Configuration(#[from] ConfigError),

  #[error("incorrect password")]
  AuthenticationRejected,

  #[error(transparent)]
  Embedding(#[from] EmbeddingError),

  #[error(transparent)]
  Database(#[from] DatabaseError),

  #[error(transparent)]
  Validation(#[from] ValidationError),
}

impl SearchError {
  /// Stable key used in API error payloads
  pub fn key(&self) -> &'static str {
    match self {
      SearchError::Configuration(_) => "configuration_error",
      SearchError::AuthenticationRejected => "authentication_rejected",
      SearchError::Embedding(_) => "embedding_service_failure",
      SearchError::Database(_) => "database_query_failure",
      SearchError::Validation(_) => "validation_failure",
    }
  }

  pub fn status_code(&self) -> StatusCode {
    match self {
      SearchError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
      SearchError::AuthenticationRejected => StatusCode::UNAUTHORIZED,
      SearchError::Validation(_) => StatusCode::BAD_REQUEST,
      SearchError::Embedding(EmbeddingError::EmptyInput) => StatusCode::BAD_REQUEST,
      SearchError::Embedding(EmbeddingError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
      SearchError::Embedding(_) => StatusCode::BAD_GATEWAY,
      SearchError::Database(DatabaseError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
      SearchError::Database(_) => StatusCode::BAD_GATEWAY,
    }
  }

  /// Message shown to the person using the search page
  pub fn user_message(&self) -> String {
    match self {
      SearchError::Configuration(e) => format!("The server is misconfigured: {e}"),
      SearchError::AuthenticationRejected => "Incorrect password.".to_string(),
      SearchError::Embedding(EmbeddingError::RateLimited(_)) => {
        "The embedding service is rate limiting requests. Wait a moment and try again.".to_string()
      }
      SearchError::Embedding(e) => format!("Failed to generate an embedding: {e}"),
      SearchError::Database(DatabaseError::IndexMissing { .. })
      | SearchError::Database(DatabaseError::InvalidQuery(_)) => {
        format!("The search failed. Check the index and filters. Details: {self}")
      }
      SearchError::Database(e) => format!("The database search failed: {e}"),
      SearchError::Validation(e) => {
        let text = e.to_string();
        let mut chars = text.chars();
        match chars.next() {
          Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
          None => text,
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_keys_are_distinct_per_kind() {
    let errors = [
      SearchError::from(ConfigError::Missing("MONGO_URI")),
      SearchError::AuthenticationRejected,
      SearchError::from(EmbeddingError::EmptyInput),
      SearchError::from(DatabaseError::Connection("down".into())),
      SearchError::from(ValidationError::EmptyText),
    ];
    let mut keys: Vec<&str> = errors.iter().map(|e| e.key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), errors.len());
  }

  #[test]
  fn test_configuration_key_covers_missing_and_invalid() {
    let missing = SearchError::from(ConfigError::Missing("MONGO_URI"));
    let invalid = SearchError::from(ConfigError::Invalid {
      name: "SESSION_IDLE_MINUTES",
      reason: "too large".to_string(),
    });

    assert_eq!(missing.key(), "configuration_error");
    assert_eq!(invalid.key(), "configuration_error");
    assert_eq!(invalid.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(invalid.user_message().contains("SESSION_IDLE_MINUTES"));
  }

  #[test]
  fn test_rejected_login() {
    let error = SearchError::AuthenticationRejected;
    assert_eq!(error.key(), "authentication_rejected");
    assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(error.user_message(), "Incorrect password.");
  }

  #[test]
  fn test_status_codes() {
    assert_eq!(
      SearchError::from(ValidationError::EmptyText).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      SearchError::from(EmbeddingError::RateLimited("slow down".into())).status_code(),
      StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
      SearchError::from(EmbeddingError::Authentication("bad key".into())).status_code(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(
      SearchError::from(DatabaseError::InvalidQuery("bad filter".into())).status_code(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(SearchError::AuthenticationRejected.status_code(), StatusCode::UNAUTHORIZED);
  }

  #[test]
  fn test_validation_message_is_a_sentence() {
    let message = SearchError::from(ValidationError::EmptyText).user_message();
    assert_eq!(message, "Please enter a description to search for.");
  }

  #[test]
  fn test_index_missing_message_mentions_index() {
    let error = SearchError::from(DatabaseError::IndexMissing {
      index: "vector_index_for_company_search".into(),
      message: "no such index".into(),
    });
    let message = error.user_message();
    assert!(message.contains("Check the index and filters"));
    assert!(message.contains("vector_index_for_company_search"));
  }
}
