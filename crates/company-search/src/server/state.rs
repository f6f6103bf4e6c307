//! Long-lived state shared by every handler

use bentley::request_logs::RequestLogs;
use std::sync::Arc;

use crate::config::Config;
use crate::database::{MongoVectorDatabase, VectorDatabase};
use crate::embedding::{EmbeddingClient, EmbeddingService, OpenAiEmbeddingService};
use crate::error::SearchError;
use crate::search::SearchOrchestrator;
use crate::session::{SessionGate, SessionStore};

#[derive(Clone)]
pub struct AppState {
  pub orchestrator: Arc<SearchOrchestrator>,
  pub gate: Arc<SessionGate>,
  pub sessions: SessionStore,
  pub logs: RequestLogs,
}

impl AppState {
  pub fn new(
    orchestrator: SearchOrchestrator,
    gate: SessionGate,
    sessions: SessionStore,
    logs: RequestLogs,
  ) -> Self {
    Self { orchestrator: Arc::new(orchestrator), gate: Arc::new(gate), sessions, logs }
  }

  /// Wire the production services from configuration. Nothing connects yet.
  pub fn from_config(config: &Config, logs: RequestLogs) -> Result<Self, SearchError> {
    let service: Arc<dyn EmbeddingService> = Arc::new(OpenAiEmbeddingService::from_config(config)?);
    let database: Arc<dyn VectorDatabase> =
      Arc::new(MongoVectorDatabase::new(config.mongo_uri.clone(), config.target.clone()));

    Ok(Self::new(
      SearchOrchestrator::new(EmbeddingClient::new(service), database),
      SessionGate::new(config.access_password.clone()),
      SessionStore::new(config.session_idle),
      logs,
    ))
  }
}
