#![allow(dead_code)]

use async_trait::async_trait;
use bentley::request_logs::RequestLogs;
use company_search::config::REQUIRED_COUNTRY;
use company_search::database::{CompanyRecord, VectorDatabase};
use company_search::embedding::{EmbeddingClient, EmbeddingService, EmbeddingVector};
use company_search::error::{DatabaseError, EmbeddingError};
use company_search::server::state::AppState;
use company_search::session::{SessionGate, SessionStore};
use company_search::{Query, SearchOrchestrator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PASSWORD: &str = "ExecScience";

/// Topics the keyword embedder knows, one dimension each
const TOPICS: [&str; 3] = ["payroll", "robot", "food"];

/// Embeds text by counting topic keywords. Deterministic and offline.
#[derive(Default)]
pub struct KeywordEmbedder {
  calls: AtomicUsize,
  seen: Mutex<Vec<String>>,
}

impl KeywordEmbedder {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn seen(&self) -> Vec<String> {
    self.seen.lock().unwrap().clone()
  }
}

pub fn keyword_vector(text: &str) -> Vec<f32> {
  let lower = text.to_lowercase();
  TOPICS.iter().map(|topic| 0.05 + lower.matches(topic).count() as f32).collect()
}

#[async_trait]
impl EmbeddingService for KeywordEmbedder {
  async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.seen.lock().unwrap().push(text.to_string());
    Ok(EmbeddingVector::new(keyword_vector(text)))
  }
}

/// Always answers with a rate-limit failure
#[derive(Default)]
pub struct ThrottledEmbedder {
  calls: AtomicUsize,
}

impl ThrottledEmbedder {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl EmbeddingService for ThrottledEmbedder {
  async fn embed(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Err(EmbeddingError::RateLimited("Rate limit reached for requests".to_string()))
  }
}

pub struct StoredCompany {
  pub name: &'static str,
  pub description: &'static str,
  pub industry: &'static str,
  pub country: &'static str,
  pub embedding: Vec<f32>,
}

/// Brute-force stand-in for the vector index: same filter, cosine ranking
pub struct InMemoryVectorDatabase {
  companies: Vec<StoredCompany>,
  failure: Option<DatabaseError>,
  calls: AtomicUsize,
}

impl InMemoryVectorDatabase {
  pub fn new(companies: Vec<StoredCompany>) -> Self {
    Self { companies, failure: None, calls: AtomicUsize::new(0) }
  }

  pub fn failing(error: DatabaseError) -> Self {
    Self { companies: Vec::new(), failure: Some(error), calls: AtomicUsize::new(0) }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
  let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
  let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
  (dot / (norm(a) * norm(b))) as f64
}

#[async_trait]
impl VectorDatabase for InMemoryVectorDatabase {
  async fn search(
    &self,
    vector: &EmbeddingVector,
    query: &Query,
  ) -> Result<Vec<CompanyRecord>, DatabaseError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if let Some(error) = &self.failure {
      return Err(error.clone());
    }

    let mut matches: Vec<CompanyRecord> = self
      .companies
      .iter()
      .filter(|company| company.country == REQUIRED_COUNTRY)
      .filter(|company| {
        query.industry_filters.is_empty()
          || query.industry_filters.iter().any(|industry| industry == company.industry)
      })
      .map(|company| CompanyRecord {
        name: company.name.to_string(),
        description: company.description.to_string(),
        industry: Some(company.industry.to_string()),
        country: Some(company.country.to_string()),
        score: cosine(vector.as_slice(), &company.embedding),
        extra: Default::default(),
      })
      .collect();

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(query.candidate_pool_size as usize);
    matches.truncate(query.max_results as usize);
    Ok(matches)
  }

  async fn is_connected(&self) -> bool {
    true
  }
}

fn company(
  name: &'static str,
  description: &'static str,
  industry: &'static str,
  country: &'static str,
) -> StoredCompany {
  StoredCompany { name, description, industry, country, embedding: keyword_vector(description) }
}

/// A small catalogue: eight US payroll software companies plus distractors
pub fn catalogue() -> Vec<StoredCompany> {
  vec![
    company("Ledgerline", "Cloud payroll software for small businesses", "Software", "USA"),
    company("Paystack Works", "Payroll and payroll tax filing in one dashboard", "Software", "USA"),
    company("Clockwise HR", "Time tracking that feeds payroll runs", "Software", "USA"),
    company("Benefitly", "Benefits administration with payroll sync", "Software", "USA"),
    company("Stubhouse", "Pay stub and payroll reporting tools", "Software", "USA"),
    company("Crewroster", "Shift scheduling with payroll export", "Software", "USA"),
    company("Onboardly", "Employee onboarding portal", "Software", "USA"),
    company("Timecard Cloud", "Cloud timecards and payroll approvals", "Software", "USA"),
    company("Maple Payroll", "Canadian payroll software", "Software", "Canada"),
    company("PayTrust Financial", "Payroll cards and payroll lending", "FinTech", "USA"),
    company("Botworks", "Warehouse robot fleets", "Robotics", "USA"),
    company("Harvest Table", "Farm to table food delivery", "Food & Beverage", "USA"),
  ]
}

pub struct Harness {
  pub state: AppState,
  pub embedder: Arc<KeywordEmbedder>,
  pub database: Arc<InMemoryVectorDatabase>,
}

pub fn harness() -> Harness {
  let embedder = Arc::new(KeywordEmbedder::default());
  let database = Arc::new(InMemoryVectorDatabase::new(catalogue()));
  let orchestrator = SearchOrchestrator::new(
    EmbeddingClient::new(embedder.clone() as Arc<dyn EmbeddingService>),
    database.clone() as Arc<dyn VectorDatabase>,
  );
  let state = AppState::new(
    orchestrator,
    SessionGate::new(PASSWORD),
    SessionStore::new(Duration::from_secs(600)),
    RequestLogs::with_capacity(200, true),
  );

  Harness { state, embedder, database }
}

pub fn assert_descending(records: &[CompanyRecord]) {
  for pair in records.windows(2) {
    assert!(
      pair[0].score >= pair[1].score,
      "{} ({}) ranked above {} ({})",
      pair[0].name,
      pair[0].score,
      pair[1].name,
      pair[1].score
    );
  }
}
