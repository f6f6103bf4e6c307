//! Text embeddings with a process-lifetime cache
//!
//! The remote model is reached through an [`EmbeddingService`]; the
//! [`EmbeddingClient`] in front of it rejects blank input and remembers every
//! vector it has produced, keyed by the exact input text.

pub mod openai;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::EmbeddingError;

pub use openai::OpenAiEmbeddingService;

/// A vector exactly as the model returned it
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
  pub fn new(values: Vec<f32>) -> Self {
    Self(values)
  }

  pub fn dimensions(&self) -> usize {
    self.0.len()
  }

  pub fn as_slice(&self) -> &[f32] {
    &self.0
  }
}

impl From<Vec<f32>> for EmbeddingVector {
  fn from(values: Vec<f32>) -> Self {
    Self(values)
  }
}

/// Service trait for dependency injection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingService: Send + Sync {
  /// Produce one embedding for `text`; no caching or validation happens here
  async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;
}

pub struct EmbeddingClient {
  service: Arc<dyn EmbeddingService>,
  // TODO: cap this map once real traffic shows how many distinct descriptions a process sees
  cache: Mutex<HashMap<String, Arc<EmbeddingVector>>>,
}

impl EmbeddingClient {
  pub fn new(service: Arc<dyn EmbeddingService>) -> Self {
    Self { service, cache: Mutex::new(HashMap::new()) }
  }

  /// Embed `text`, reusing the cached vector for text seen before
  pub async fn embed(&self, text: &str) -> Result<Arc<EmbeddingVector>, EmbeddingError> {
    if text.trim().is_empty() {
      return Err(EmbeddingError::EmptyInput);
    }

    if let Some(hit) = self.cached(text) {
      tracing::debug!(chars = text.len(), "embedding cache hit");
      return Ok(hit);
    }

    let vector = Arc::new(self.service.embed(text).await?);

    // Two requests racing on the same text both reach the service; the first one stored wins
    let mut cache = self.lock_cache();
    Ok(cache.entry(text.to_string()).or_insert(vector).clone())
  }

  pub fn cached(&self, text: &str) -> Option<Arc<EmbeddingVector>> {
    self.lock_cache().get(text).cloned()
  }

  pub fn cache_len(&self) -> usize {
    self.lock_cache().len()
  }

  fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<EmbeddingVector>>> {
    // A panic while holding the lock cannot leave the map half-written
    self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}
