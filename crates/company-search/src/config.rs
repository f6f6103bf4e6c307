//! Process configuration read from the environment at startup
//!
//! Two credentials are required: the embedding API key and the database
//! connection string. Everything else has a default. Collection identifiers
//! are fixed and must already be provisioned on the database side.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MONGO_URI_VAR: &str = "MONGO_URI";
pub const ACCESS_PASSWORD_VAR: &str = "SEARCH_ACCESS_PASSWORD";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const EMBEDDING_MODEL_VAR: &str = "EMBEDDING_MODEL";
pub const EMBEDDING_TIMEOUT_VAR: &str = "EMBEDDING_TIMEOUT_SECS";
pub const SESSION_IDLE_VAR: &str = "SESSION_IDLE_MINUTES";

pub const DEFAULT_ACCESS_PASSWORD: &str = "ExecScience";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 720;

pub const DATABASE_NAME: &str = "marovi_db_prod";
pub const COLLECTION_NAME: &str = "companies_new_data_load";
pub const VECTOR_INDEX_NAME: &str = "vector_index_for_company_search";
pub const EMBEDDING_FIELD: &str = "company_description_embedding";

/// Every search is restricted to companies headquartered here
pub const REQUIRED_COUNTRY: &str = "USA";

/// Where the company documents and their vector index live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTarget {
  pub database: String,
  pub collection: String,
  pub index: String,
  pub embedding_field: String,
}

impl Default for CollectionTarget {
  fn default() -> Self {
    Self {
      database: DATABASE_NAME.to_string(),
      collection: COLLECTION_NAME.to_string(),
      index: VECTOR_INDEX_NAME.to_string(),
      embedding_field: EMBEDDING_FIELD.to_string(),
    }
  }
}

#[derive(Clone)]
pub struct Config {
  pub openai_api_key: String,
  pub mongo_uri: String,
  pub access_password: String,
  pub openai_base_url: String,
  pub embedding_model: String,
  /// Request timeout for the embedding API; the HTTP client default when unset
  pub embedding_timeout: Option<Duration>,
  pub session_idle: Duration,
  pub target: CollectionTarget,
}

// Secrets stay out of debug output
impl std::fmt::Debug for Config {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Config")
      .field("openai_api_key", &"<redacted>")
      .field("mongo_uri", &"<redacted>")
      .field("access_password", &"<redacted>")
      .field("openai_base_url", &self.openai_base_url)
      .field("embedding_model", &self.embedding_model)
      .field("embedding_timeout", &self.embedding_timeout)
      .field("session_idle", &self.session_idle)
      .field("target", &self.target)
      .finish()
  }
}

impl Config {
  /// Load from the process environment, seeding it from `.env` when present
  pub fn from_env() -> Result<Self, ConfigError> {
    if let Some(warning) = dotenv_warning(&dotenv::dotenv()) {
      bentley::warn!(&warning);
    }
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Build configuration from any name -> value lookup
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let value = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let openai_api_key = value(OPENAI_API_KEY_VAR).ok_or(ConfigError::Missing(OPENAI_API_KEY_VAR))?;
    let mongo_uri = value(MONGO_URI_VAR).ok_or(ConfigError::Missing(MONGO_URI_VAR))?;

    let openai_base_url =
      value(OPENAI_BASE_URL_VAR).unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
    url::Url::parse(&openai_base_url).map_err(|e| ConfigError::Invalid {
      name: OPENAI_BASE_URL_VAR,
      reason: e.to_string(),
    })?;

    let embedding_timeout = match value(EMBEDDING_TIMEOUT_VAR) {
      Some(raw) => Some(Duration::from_secs(parse_u64(EMBEDDING_TIMEOUT_VAR, Some(raw), 0)?)),
      None => None,
    };
    let idle_minutes =
      parse_u64(SESSION_IDLE_VAR, value(SESSION_IDLE_VAR), DEFAULT_SESSION_IDLE_MINUTES)?;
    let session_idle = idle_minutes
      .checked_mul(60)
      .map(Duration::from_secs)
      .ok_or_else(|| ConfigError::Invalid { name: SESSION_IDLE_VAR, reason: "too large".to_string() })?;

    Ok(Self {
      openai_api_key,
      mongo_uri,
      access_password: value(ACCESS_PASSWORD_VAR)
        .unwrap_or_else(|| DEFAULT_ACCESS_PASSWORD.to_string()),
      openai_base_url: openai_base_url.trim_end_matches('/').to_string(),
      embedding_model: value(EMBEDDING_MODEL_VAR)
        .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
      embedding_timeout,
      session_idle,
      target: CollectionTarget::default(),
    })
  }
}

/// A missing .env file is normal; anything else about it deserves a warning
fn dotenv_warning(result: &Result<PathBuf, dotenv::Error>) -> Option<String> {
  match result {
    Ok(_) | Err(dotenv::Error::Io(_)) => None,
    Err(e) => Some(format!("Ignoring unreadable .env file: {e}")),
  }
}

fn parse_u64(name: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
  match raw {
    None => Ok(default),
    Some(raw) => match raw.parse::<u64>() {
      Ok(0) => Err(ConfigError::Invalid { name, reason: "must be greater than zero".to_string() }),
      Ok(value) => Ok(value),
      Err(e) => Err(ConfigError::Invalid { name, reason: format!("'{raw}': {e}") }),
    },
  }
}
