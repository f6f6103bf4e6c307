//! Vector database abstraction layer for company lookups
//!
//! Higher layers talk to a [`VectorDatabase`]; the MongoDB Atlas
//! implementation lives in [`mongo`], the query it sends in [`pipeline`], and
//! the decoding of result documents in [`records`].

pub mod mongo;
pub mod pipeline;
pub mod records;

use async_trait::async_trait;

use crate::embedding::EmbeddingVector;
use crate::error::DatabaseError;
use crate::search::Query;

pub use mongo::MongoVectorDatabase;
pub use records::CompanyRecord;

/// Vector database interface for similarity search over company descriptions
#[async_trait]
pub trait VectorDatabase: Send + Sync {
  /// Run one nearest-neighbour query restricted by the query's filters.
  ///
  /// Results come back in the index's order (best match first) and never
  /// exceed `query.max_results`.
  async fn search(
    &self,
    vector: &EmbeddingVector,
    query: &Query,
  ) -> Result<Vec<CompanyRecord>, DatabaseError>;

  /// Whether a connection has been established yet
  async fn is_connected(&self) -> bool;
}
