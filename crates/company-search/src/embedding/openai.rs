//! OpenAI-compatible `/embeddings` endpoint

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{EmbeddingService, EmbeddingVector};
use crate::config::Config;
use crate::error::EmbeddingError;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
  embedding: Vec<f32>,
  #[serde(default)]
  index: usize,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
  message: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingService {
  client: Client,
  api_key: String,
  model: String,
  endpoint: String,
}

impl OpenAiEmbeddingService {
  pub fn new(
    api_key: impl Into<String>,
    model: impl Into<String>,
    base_url: &str,
    timeout: Option<Duration>,
  ) -> Result<Self, EmbeddingError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(EmbeddingError::Network)?;

    Ok(Self {
      client,
      api_key: api_key.into(),
      model: model.into(),
      endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
    })
  }

  pub fn from_config(config: &Config) -> Result<Self, EmbeddingError> {
    Self::new(
      config.openai_api_key.clone(),
      config.embedding_model.clone(),
      &config.openai_base_url,
      config.embedding_timeout,
    )
  }

  pub fn model(&self) -> &str {
    &self.model
  }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbeddingService {
  async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
    let request = EmbeddingRequest { model: &self.model, input: vec![text.replace('\n', " ")] };

    let response = self
      .client
      .post(&self.endpoint)
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(EmbeddingError::Network)?;

    let status = response.status();
    let body = response.text().await.map_err(EmbeddingError::Network)?;

    if !status.is_success() {
      return Err(classify_failure(status, &body));
    }

    parse_embedding(&body)
  }
}

/// Map a non-2xx answer onto the embedding error kinds
fn classify_failure(status: StatusCode, body: &str) -> EmbeddingError {
  let message = serde_json::from_str::<ErrorEnvelope>(body)
    .map(|envelope| envelope.error.message)
    .unwrap_or_else(|_| body.trim().chars().take(200).collect());

  match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmbeddingError::Authentication(message),
    StatusCode::TOO_MANY_REQUESTS => EmbeddingError::RateLimited(message),
    _ => EmbeddingError::UnexpectedStatus { status: status.as_u16(), message },
  }
}

fn parse_embedding(body: &str) -> Result<EmbeddingVector, EmbeddingError> {
  let response: EmbeddingResponse =
    serde_json::from_str(body).map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

  let first = response
    .data
    .into_iter()
    .min_by_key(|item| item.index)
    .ok_or_else(|| EmbeddingError::MalformedResponse("response contained no embeddings".into()))?;

  if first.embedding.is_empty() {
    return Err(EmbeddingError::MalformedResponse("embedding vector is empty".into()));
  }

  Ok(EmbeddingVector::new(first.embedding))
}
