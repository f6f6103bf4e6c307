//! MongoDB Atlas implementation of [`VectorDatabase`]

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{Client, Collection};
use tokio::sync::OnceCell;

use super::pipeline::{build_pipeline, classify_command_failure};
use super::records::CompanyRecord;
use super::VectorDatabase;
use crate::config::CollectionTarget;
use crate::embedding::EmbeddingVector;
use crate::error::DatabaseError;
use crate::search::Query;

/// Lazily connected handle to the company collection
pub struct MongoVectorDatabase {
  uri: String,
  target: CollectionTarget,
  collection: OnceCell<Collection<Document>>,
}

impl MongoVectorDatabase {
  pub fn new(uri: impl Into<String>, target: CollectionTarget) -> Self {
    Self { uri: uri.into(), target, collection: OnceCell::new() }
  }

  pub fn target(&self) -> &CollectionTarget {
    &self.target
  }

  /// Connect on first use; the pooled handle is kept for the life of the process
  async fn collection(&self) -> Result<&Collection<Document>, DatabaseError> {
    self.collection.get_or_try_init(|| self.connect()).await
  }

  async fn connect(&self) -> Result<Collection<Document>, DatabaseError> {
    bentley::info!(&format!(
      "Connecting to database '{}' collection '{}'",
      self.target.database, self.target.collection
    ));

    let client = Client::with_uri_str(&self.uri)
      .await
      .map_err(|e| DatabaseError::Connection(e.to_string()))?;

    // Proves the cluster is reachable and the credentials work
    client
      .database("admin")
      .run_command(doc! { "ping": 1 })
      .await
      .map_err(|e| DatabaseError::Connection(e.to_string()))?;

    bentley::success!("Database connection established");
    Ok(client.database(&self.target.database).collection::<Document>(&self.target.collection))
  }

  fn map_error(&self, error: MongoError) -> DatabaseError {
    match error.kind.as_ref() {
      ErrorKind::Command(command) => {
        classify_command_failure(&self.target.index, &command.code_name, &command.message)
      }
      ErrorKind::InvalidArgument { message, .. } => DatabaseError::InvalidQuery(message.clone()),
      ErrorKind::BsonDeserialization(e) => DatabaseError::MalformedRecord(e.to_string()),
      _ => DatabaseError::Connection(error.to_string()),
    }
  }
}

#[async_trait]
impl VectorDatabase for MongoVectorDatabase {
  async fn search(
    &self,
    vector: &EmbeddingVector,
    query: &Query,
  ) -> Result<Vec<CompanyRecord>, DatabaseError> {
    let collection = self.collection().await?;
    let pipeline = build_pipeline(&self.target, vector, query);

    let cursor = collection.aggregate(pipeline).await.map_err(|e| self.map_error(e))?;
    let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| self.map_error(e))?;

    let mut records = documents
      .into_iter()
      .map(CompanyRecord::from_document)
      .collect::<Result<Vec<_>, _>>()?;
    records.truncate(query.max_results as usize);

    Ok(records)
  }

  async fn is_connected(&self) -> bool {
    self.collection.initialized()
  }
}
