//! Search orchestration: validate, embed, query

use std::sync::Arc;

use crate::database::{CompanyRecord, VectorDatabase};
use crate::embedding::EmbeddingClient;
use crate::error::{SearchError, ValidationError};

pub const DEFAULT_MAX_RESULTS: u32 = 1000;
pub const DEFAULT_CANDIDATE_POOL: u32 = 10_000;
pub const MAX_RESULTS_CAP: u32 = 10_000;
pub const CANDIDATE_POOL_CAP: u32 = 20_000;

/// One search as submitted by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
  pub free_text: String,
  /// Exact, case-sensitive industry names; empty means any industry
  pub industry_filters: Vec<String>,
  pub max_results: u32,
  pub candidate_pool_size: u32,
}

impl Query {
  pub fn new(free_text: impl Into<String>) -> Self {
    Self {
      free_text: free_text.into(),
      industry_filters: Vec::new(),
      max_results: DEFAULT_MAX_RESULTS,
      candidate_pool_size: DEFAULT_CANDIDATE_POOL,
    }
  }

  /// Industry filters, trimmed, with blanks and repeats dropped
  pub fn with_industries<I, S>(mut self, industries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.industry_filters = Vec::new();
    for industry in industries {
      let industry = industry.as_ref().trim();
      if !industry.is_empty() && !self.industry_filters.iter().any(|seen| seen == industry) {
        self.industry_filters.push(industry.to_string());
      }
    }
    self
  }

  pub fn with_limits(mut self, max_results: u32, candidate_pool_size: u32) -> Self {
    self.max_results = max_results;
    self.candidate_pool_size = candidate_pool_size;
    self
  }

  /// Check text and bounds before anything leaves the process
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.free_text.trim().is_empty() {
      return Err(ValidationError::EmptyText);
    }
    if self.max_results == 0 || self.max_results > MAX_RESULTS_CAP {
      return Err(ValidationError::MaxResultsOutOfRange {
        value: self.max_results,
        max: MAX_RESULTS_CAP,
      });
    }
    if self.candidate_pool_size < self.max_results {
      return Err(ValidationError::PoolSmallerThanResults {
        max_results: self.max_results,
        candidates: self.candidate_pool_size,
      });
    }
    if self.candidate_pool_size > CANDIDATE_POOL_CAP {
      return Err(ValidationError::PoolTooLarge {
        value: self.candidate_pool_size,
        max: CANDIDATE_POOL_CAP,
      });
    }
    Ok(())
  }
}

/// Split a comma-separated industry field, dropping blanks and duplicates
pub fn parse_industries(raw: &str) -> Vec<String> {
  Query::new(String::new()).with_industries(raw.split(',')).industry_filters
}

/// Owns the embedding cache and the database handle for the life of the process
pub struct SearchOrchestrator {
  embeddings: EmbeddingClient,
  database: Arc<dyn VectorDatabase>,
}

impl SearchOrchestrator {
  pub fn new(embeddings: EmbeddingClient, database: Arc<dyn VectorDatabase>) -> Self {
    Self { embeddings, database }
  }

  /// Validate the query, embed its text, and run the filtered similarity search
  pub async fn search_companies(&self, query: &Query) -> Result<Vec<CompanyRecord>, SearchError> {
    query.validate()?;

    let vector = self.embeddings.embed(&query.free_text).await?;
    tracing::debug!(dimensions = vector.dimensions(), "query embedded");

    let records = self.database.search(&vector, query).await?;
    Ok(records)
  }

  pub fn embeddings(&self) -> &EmbeddingClient {
    &self.embeddings
  }

  pub async fn database_connected(&self) -> bool {
    self.database.is_connected().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::embedding::{EmbeddingVector, MockEmbeddingService};
  use crate::error::{DatabaseError, EmbeddingError};
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  /// Counts calls and answers with a fixed outcome
  struct StubDatabase {
    calls: AtomicUsize,
    outcome: Result<Vec<CompanyRecord>, DatabaseError>,
  }

  impl StubDatabase {
    fn returning(outcome: Result<Vec<CompanyRecord>, DatabaseError>) -> Arc<Self> {
      Arc::new(Self { calls: AtomicUsize::new(0), outcome })
    }
  }

  #[async_trait]
  impl VectorDatabase for StubDatabase {
    async fn search(
      &self,
      _vector: &EmbeddingVector,
      _query: &Query,
    ) -> Result<Vec<CompanyRecord>, DatabaseError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.outcome.clone()
    }

    async fn is_connected(&self) -> bool {
      self.calls.load(Ordering::SeqCst) > 0
    }
  }

  fn record(name: &str, score: f64) -> CompanyRecord {
    CompanyRecord {
      name: name.to_string(),
      description: String::new(),
      industry: Some("Software".to_string()),
      country: Some("USA".to_string()),
      score,
      extra: Default::default(),
    }
  }

  fn embedding_never_called() -> EmbeddingClient {
    let mut mock = MockEmbeddingService::new();
    mock.expect_embed().never();
    EmbeddingClient::new(Arc::new(mock))
  }

  fn embedding_returning(vector: Vec<f32>) -> EmbeddingClient {
    let mut mock = MockEmbeddingService::new();
    mock.expect_embed().returning(move |_| Ok(EmbeddingVector::new(vector.clone())));
    EmbeddingClient::new(Arc::new(mock))
  }

  #[test]
  fn test_default_query_is_valid() {
    assert_eq!(Query::new("payroll").validate(), Ok(()));
  }

  #[test]
  fn test_validation_bounds() {
    let base = Query::new("payroll");

    assert_eq!(Query::new("   ").validate(), Err(ValidationError::EmptyText));
    assert!(matches!(
      base.clone().with_limits(0, 10).validate(),
      Err(ValidationError::MaxResultsOutOfRange { value: 0, .. })
    ));
    assert!(matches!(
      base.clone().with_limits(MAX_RESULTS_CAP + 1, CANDIDATE_POOL_CAP).validate(),
      Err(ValidationError::MaxResultsOutOfRange { .. })
    ));
    assert_eq!(
      base.clone().with_limits(50, 5).validate(),
      Err(ValidationError::PoolSmallerThanResults { max_results: 50, candidates: 5 })
    );
    assert!(matches!(
      base.clone().with_limits(10, CANDIDATE_POOL_CAP + 1).validate(),
      Err(ValidationError::PoolTooLarge { .. })
    ));
    assert_eq!(base.clone().with_limits(7, 7).validate(), Ok(()));
    assert_eq!(base.with_limits(MAX_RESULTS_CAP, CANDIDATE_POOL_CAP).validate(), Ok(()));
  }

  #[test]
  fn test_parse_industries() {
    assert_eq!(
      parse_industries(" Artificial Intelligence, SaaS ,,SaaS, "),
      vec!["Artificial Intelligence", "SaaS"]
    );
    assert!(parse_industries("").is_empty());
    assert!(parse_industries(" , ,").is_empty());
  }

  #[test]
  fn test_industry_filters_keep_case() {
    let query = Query::new("x").with_industries(["software", "Software", "software"]);
    assert_eq!(query.industry_filters, vec!["software", "Software"]);
  }

  #[test]
  fn test_industry_filters_are_trimmed_and_blanks_dropped() {
    let query =
      Query::new("x").with_industries(vec!["".to_string(), " Software ".to_string(), "  ".to_string()]);
    assert_eq!(query.industry_filters, vec!["Software"]);

    let query = Query::new("x").with_industries(["FinTech", " FinTech", "\tSaaS\n"]);
    assert_eq!(query.industry_filters, vec!["FinTech", "SaaS"]);
  }

  #[tokio::test]
  async fn test_invalid_bounds_make_no_external_calls() {
    let database = StubDatabase::returning(Ok(vec![]));
    let orchestrator = SearchOrchestrator::new(embedding_never_called(), database.clone());

    let query = Query::new("payroll").with_limits(100, 10);
    let result = orchestrator.search_companies(&query).await;

    assert!(matches!(result, Err(SearchError::Validation(_))));
    assert_eq!(database.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_success_returns_database_order() {
    let database =
      StubDatabase::returning(Ok(vec![record("First", 0.9), record("Second", 0.8)]));
    let orchestrator = SearchOrchestrator::new(embedding_returning(vec![0.1, 0.2]), database.clone());

    let records =
      orchestrator.search_companies(&Query::new("payroll").with_limits(5, 50)).await.unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert_eq!(database.calls.load(Ordering::SeqCst), 1);
    assert!(orchestrator.database_connected().await);
    assert_eq!(orchestrator.embeddings().cache_len(), 1);
  }

  #[tokio::test]
  async fn test_embedding_failure_skips_database() {
    let mut mock = MockEmbeddingService::new();
    mock
      .expect_embed()
      .returning(|_| Err(EmbeddingError::Authentication("Incorrect API key".to_string())));
    let database = StubDatabase::returning(Ok(vec![record("Unreached", 1.0)]));
    let orchestrator = SearchOrchestrator::new(EmbeddingClient::new(Arc::new(mock)), database.clone());

    let result = orchestrator.search_companies(&Query::new("payroll")).await;

    assert!(matches!(result, Err(SearchError::Embedding(EmbeddingError::Authentication(_)))));
    assert_eq!(database.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_database_failure_propagates_kind() {
    let database = StubDatabase::returning(Err(DatabaseError::IndexMissing {
      index: "vector_index_for_company_search".to_string(),
      message: "not found".to_string(),
    }));
    let orchestrator = SearchOrchestrator::new(embedding_returning(vec![0.3]), database);

    let result = orchestrator.search_companies(&Query::new("payroll")).await;

    assert!(matches!(result, Err(SearchError::Database(DatabaseError::IndexMissing { .. }))));
  }
}
