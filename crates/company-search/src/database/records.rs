//! Decoding of `$vectorSearch` result documents

use mongodb::bson::{Bson, Document};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::DatabaseError;

pub const NAME_FIELD: &str = "company_name";
pub const DESCRIPTION_FIELD: &str = "company_description";
pub const COUNTRY_FIELD: &str = "company_headquarters_country";
pub const INDUSTRY_FIELD: &str = "industry";
pub const SCORE_FIELD: &str = "score";

/// One matched company, as stored. Never written back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRecord {
  pub name: String,
  pub description: String,
  pub industry: Option<String>,
  pub country: Option<String>,
  /// Similarity as reported by the index; higher is closer
  pub score: f64,
  /// Any other projected fields, passed through untouched
  pub extra: BTreeMap<String, serde_json::Value>,
}

impl CompanyRecord {
  /// Decode one result document. The score is mandatory, everything else is best-effort.
  pub fn from_document(document: Document) -> Result<Self, DatabaseError> {
    let mut record = CompanyRecord {
      name: String::new(),
      description: String::new(),
      industry: None,
      country: None,
      score: f64::NAN,
      extra: BTreeMap::new(),
    };
    let mut has_score = false;

    for (key, value) in document {
      match key.as_str() {
        NAME_FIELD => record.name = text_of(value).unwrap_or_default(),
        DESCRIPTION_FIELD => record.description = text_of(value).unwrap_or_default(),
        INDUSTRY_FIELD => record.industry = text_of(value),
        COUNTRY_FIELD => record.country = text_of(value),
        SCORE_FIELD => {
          record.score = number_of(&value).ok_or_else(|| {
            DatabaseError::MalformedRecord(format!("'{SCORE_FIELD}' is not a number: {value}"))
          })?;
          has_score = true;
        }
        _ => {
          record.extra.insert(key, value.into_relaxed_extjson());
        }
      }
    }

    if !has_score {
      return Err(DatabaseError::MalformedRecord(format!(
        "result for '{}' has no '{SCORE_FIELD}' field",
        record.name
      )));
    }

    Ok(record)
  }
}

fn text_of(value: Bson) -> Option<String> {
  match value {
    Bson::String(text) => Some(text),
    Bson::Null | Bson::Undefined => None,
    other => Some(other.to_string()),
  }
}

fn number_of(value: &Bson) -> Option<f64> {
  match value {
    Bson::Double(v) => Some(*v),
    Bson::Int32(v) => Some(f64::from(*v)),
    Bson::Int64(v) => Some(*v as f64),
    _ => None,
  }
}
