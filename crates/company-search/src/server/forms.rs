//! HTML form payloads and their mapping onto a [`Query`]

use serde::Deserialize;

use crate::error::ValidationError;
use crate::search::{parse_industries, Query, DEFAULT_CANDIDATE_POOL, DEFAULT_MAX_RESULTS};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  #[serde(default)]
  pub password: String,
}

/// Raw search form fields, kept as text so they can be echoed back verbatim
#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub industries: String,
  #[serde(default = "default_max_results")]
  pub max_results: String,
  #[serde(default = "default_candidate_pool")]
  pub candidate_pool_size: String,
}

fn default_max_results() -> String {
  DEFAULT_MAX_RESULTS.to_string()
}

fn default_candidate_pool() -> String {
  DEFAULT_CANDIDATE_POOL.to_string()
}

impl Default for SearchForm {
  fn default() -> Self {
    Self {
      description: String::new(),
      industries: String::new(),
      max_results: default_max_results(),
      candidate_pool_size: default_candidate_pool(),
    }
  }
}

impl SearchForm {
  pub fn to_query(&self) -> Result<Query, ValidationError> {
    let max_results = parse_count("max results", &self.max_results)?;
    let candidate_pool_size = parse_count("candidates to search", &self.candidate_pool_size)?;

    Ok(
      Query::new(self.description.clone())
        .with_industries(parse_industries(&self.industries))
        .with_limits(max_results, candidate_pool_size),
    )
  }
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, ValidationError> {
  raw
    .trim()
    .parse::<u32>()
    .map_err(|_| ValidationError::NotANumber { field, value: raw.trim().to_string() })
}
