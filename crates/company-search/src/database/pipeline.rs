//! Aggregation pipeline for Atlas `$vectorSearch`

use mongodb::bson::{doc, Bson, Document};

use super::records::{COUNTRY_FIELD, DESCRIPTION_FIELD, INDUSTRY_FIELD, NAME_FIELD, SCORE_FIELD};
use crate::config::{CollectionTarget, REQUIRED_COUNTRY};
use crate::embedding::EmbeddingVector;
use crate::error::DatabaseError;
use crate::search::Query;

/// Pre-filter applied inside the vector search stage
pub fn build_filter(query: &Query) -> Document {
  let mut filter = doc! { COUNTRY_FIELD: REQUIRED_COUNTRY };
  if !query.industry_filters.is_empty() {
    let industries: Vec<Bson> =
      query.industry_filters.iter().map(|industry| Bson::String(industry.clone())).collect();
    filter.insert(INDUSTRY_FIELD, doc! { "$in": industries });
  }
  filter
}

/// Search stage followed by a projection of the displayed fields plus the score
pub fn build_pipeline(
  target: &CollectionTarget,
  vector: &EmbeddingVector,
  query: &Query,
) -> Vec<Document> {
  let query_vector: Vec<Bson> =
    vector.as_slice().iter().map(|value| Bson::Double(f64::from(*value))).collect();

  vec![
    doc! {
      "$vectorSearch": {
        "index": target.index.as_str(),
        "path": target.embedding_field.as_str(),
        "queryVector": query_vector,
        "numCandidates": i64::from(query.candidate_pool_size),
        "limit": i64::from(query.max_results),
        "filter": build_filter(query),
      }
    },
    doc! {
      "$project": {
        SCORE_FIELD: { "$meta": "vectorSearchScore" },
        NAME_FIELD: 1,
        DESCRIPTION_FIELD: 1,
        COUNTRY_FIELD: 1,
        INDUSTRY_FIELD: 1,
        "_id": 0,
      }
    },
  ]
}

/// Sort a server-side command failure into the database error kinds
pub fn classify_command_failure(index: &str, code_name: &str, message: &str) -> DatabaseError {
  let lowered = message.to_ascii_lowercase();

  if lowered.contains("dimension") {
    return DatabaseError::DimensionMismatch(message.to_string());
  }

  let index_missing = code_name == "IndexNotFound"
    || (lowered.contains("index") && (lowered.contains("not found") || lowered.contains("does not exist")));
  if index_missing {
    return DatabaseError::IndexMissing { index: index.to_string(), message: message.to_string() };
  }

  let detail = if code_name.is_empty() { message.to_string() } else { format!("{code_name}: {message}") };
  DatabaseError::InvalidQuery(detail)
}
