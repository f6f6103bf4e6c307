//! Company Search - semantic lookup of similar companies
//!
//! Turns a free-text company description into an embedding, runs a filtered
//! vector search against the company collection, and serves the results
//! behind a shared-password gate.

pub mod config;
pub mod database;
pub mod embedding;
pub mod error;
pub mod search;
pub mod server;
pub mod session;

pub use config::Config;
pub use error::{ConfigError, DatabaseError, EmbeddingError, SearchError, ValidationError};
pub use search::{Query, SearchOrchestrator};
