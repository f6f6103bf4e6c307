//! In-memory request log capture for long-running servers
//!
//! This module provides structured, bounded logging with:
//! - A fixed-capacity ring buffer (oldest entries are evicted first)
//! - Thread-safe async operations with internal locking
//! - Optional console output (silent mode support)
//! - Nothing is written to disk

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

#[cfg(feature = "schemars")]
use schemars::JsonSchema;

use crate::Level;

/// Default number of entries retained by [`RequestLogs::new`]
pub const DEFAULT_CAPACITY: usize = 1000;

// Types and Data Structures
// =========================

/// Request context information for logs
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct LogContext {
  /// Request ID for correlation
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_id: Option<String>,

  /// HTTP method
  #[serde(skip_serializing_if = "Option::is_none")]
  pub method: Option<String>,

  /// Request path
  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,

  /// User agent
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_agent: Option<String>,

  /// Request duration in milliseconds
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_ms: Option<f64>,

  /// HTTP status code
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_code: Option<u16>,
}

/// A structured log entry
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct LogEntry {
  pub timestamp: DateTime<Utc>,
  pub level: Level,
  pub message: String,
  pub component: String,

  /// Optional request context
  #[serde(skip_serializing_if = "Option::is_none")]
  pub context: Option<LogContext>,
}

struct RequestLogsInner {
  entries: VecDeque<LogEntry>,
  capacity: usize,
  silent: bool,
}

/// Thread-safe bounded log storage
#[derive(Clone)]
pub struct RequestLogs {
  inner: Arc<Mutex<RequestLogsInner>>,
}

impl Default for RequestLogs {
  fn default() -> Self {
    Self::new()
  }
}

impl RequestLogsInner {
  fn push(&mut self, entry: LogEntry) {
    if self.capacity == 0 {
      return;
    }
    while self.entries.len() >= self.capacity {
      self.entries.pop_front();
    }
    self.entries.push_back(entry);
  }

  /// Most recent `limit` entries matching `level`, oldest first
  fn recent(&self, limit: Option<usize>, level: Option<Level>) -> Vec<LogEntry> {
    let mut logs: Vec<LogEntry> = self
      .entries
      .iter()
      .rev()
      .filter(|entry| level.is_none_or(|wanted| entry.level == wanted))
      .take(limit.unwrap_or(usize::MAX))
      .cloned()
      .collect();

    logs.reverse();
    logs
  }
}

// Core API
// ========

impl RequestLogs {
  /// Create log storage that echoes to the console
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY, false)
  }

  /// Create log storage with an explicit capacity and silent option
  pub fn with_capacity(capacity: usize, silent: bool) -> Self {
    let inner = RequestLogsInner { entries: VecDeque::with_capacity(capacity), capacity, silent };
    Self { inner: Arc::new(Mutex::new(inner)) }
  }

  /// Record an entry and echo it to the console unless silent
  pub async fn record(
    &self,
    level: Level,
    message: &str,
    component: &str,
    context: Option<LogContext>,
  ) {
    let mut guard = self.inner.lock().await;
    if !guard.silent {
      crate::log_at(level, &format!("[{component}] {message}"));
    }
    guard.push(LogEntry {
      timestamp: Utc::now(),
      level,
      message: message.to_string(),
      component: component.to_string(),
      context,
    });
  }

  /// Retrieve the newest entries, optionally filtered by level, in chronological order
  pub async fn get_logs(&self, limit: Option<usize>, level: Option<Level>) -> Vec<LogEntry> {
    let guard = self.inner.lock().await;
    guard.recent(limit, level)
  }
}

// Standard Logging Wrappers
// =========================

impl RequestLogs {
  pub async fn info(&self, message: &str, component: &str) {
    self.record(Level::Info, message, component, None).await;
  }

  pub async fn success(&self, message: &str, component: &str) {
    self.record(Level::Success, message, component, None).await;
  }

  pub async fn error(&self, message: &str, component: &str) {
    self.record(Level::Error, message, component, None).await;
  }
}

// Tests
// =====

#[cfg(test)]
mod tests {
  use super::*;

  fn silent_logs(capacity: usize) -> RequestLogs {
    RequestLogs::with_capacity(capacity, true)
  }

  #[tokio::test]
  async fn test_record_stores_entry() {
    let logs = silent_logs(10);

    logs.info("Test message", "test_component").await;

    let entries = logs.get_logs(None, None).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "Test message");
    assert_eq!(entries[0].level, Level::Info);
    assert_eq!(entries[0].component, "test_component");
    assert!(entries[0].context.is_none());
  }

  #[tokio::test]
  async fn test_capacity_evicts_oldest() {
    let logs = silent_logs(2);

    logs.info("first", "c").await;
    logs.info("second", "c").await;
    logs.info("third", "c").await;

    let messages: Vec<String> =
      logs.get_logs(None, None).await.into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["second", "third"]);
  }

  #[tokio::test]
  async fn test_zero_capacity_keeps_nothing() {
    let logs = silent_logs(0);
    logs.error("dropped", "c").await;
    assert!(logs.get_logs(None, None).await.is_empty());
  }

  #[tokio::test]
  async fn test_limit_returns_newest_in_chronological_order() {
    let logs = silent_logs(10);
    for i in 0..5 {
      logs.info(&format!("message {i}"), "c").await;
    }

    let messages: Vec<String> =
      logs.get_logs(Some(2), None).await.into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["message 3", "message 4"]);
  }

  #[tokio::test]
  async fn test_level_filter() {
    let logs = silent_logs(10);
    logs.info("fine", "c").await;
    logs.error("broken", "c").await;
    logs.record(Level::Warn, "careful", "c", None).await;

    let errors = logs.get_logs(None, Some(Level::Error)).await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "broken");
  }

  #[tokio::test]
  async fn test_context_is_preserved() {
    let logs = silent_logs(10);
    let context = LogContext {
      request_id: Some("abc".to_string()),
      method: Some("GET".to_string()),
      path: Some("/status".to_string()),
      status_code: Some(200),
      ..Default::default()
    };

    logs.record(Level::Info, "Request completed", "http-request", Some(context.clone())).await;

    let entries = logs.get_logs(None, None).await;
    assert_eq!(entries[0].context.as_ref(), Some(&context));
  }

  #[test]
  fn test_entry_serialization_skips_empty_context() {
    let entry = LogEntry {
      timestamp: Utc::now(),
      level: Level::Warn,
      message: "m".to_string(),
      component: "c".to_string(),
      context: None,
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["level"], "warn");
    assert!(json.get("context").is_none());
  }
}
