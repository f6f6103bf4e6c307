//! ## Features
//!
//! - Standard logging levels (info, success, warn, error)
//! - Multi-line message support with consistent formatting
//! - All output to stderr
//! - Optional in-memory request log capture (`request-logs` feature)
//!
//! ## Usage
//!
//! Standard logging functions: `info()`, `warn()`, `error()`, `success()`
//!
//! Each has a macro of the same name: `bentley::info!(&format!("listening on {addr}"))`

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "schemars")]
use schemars::JsonSchema;

#[cfg(feature = "request-logs")]
pub mod request_logs;

/// Severity attached to every console line and captured log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Verbose,
  Debug,
  Info,
  Success,
  Warn,
  Error,
}

impl Level {
  pub fn as_str(&self) -> &'static str {
    match self {
      Level::Verbose => "verbose",
      Level::Debug => "debug",
      Level::Info => "info",
      Level::Success => "success",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }

  fn prefix(&self) -> (Color, &'static str) {
    match self {
      Level::Verbose => (Color::Cyan, "verb"),
      Level::Debug => (Color::Magenta, "debug"),
      Level::Info => (Color::Blue, "info"),
      Level::Success => (Color::Green, "sccs"),
      Level::Warn => (Color::Yellow, "warn"),
      Level::Error => (Color::Red, "error"),
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Level {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "verbose" | "verb" => Ok(Level::Verbose),
      "debug" => Ok(Level::Debug),
      "info" => Ok(Level::Info),
      "success" | "sccs" => Ok(Level::Success),
      "warn" | "warning" => Ok(Level::Warn),
      "error" => Ok(Level::Error),
      other => Err(format!("unknown log level '{other}'")),
    }
  }
}

/// Core logging function that handles the actual output
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format a colored prefix for log messages
fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

/// Write every line of `message` with the prefix for `level`
pub fn log_at(level: Level, message: &str) {
  let (color, tag) = level.prefix();
  let prefix = format_prefix(color, tag);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Info level logging - general information
pub fn info(message: &str) {
  log_at(Level::Info, message);
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  log_at(Level::Success, message);
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  log_at(Level::Warn, message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  log_at(Level::Error, message);
}

/// Macros for coverage-excluded logging - these expand with LCOV_EXCL_LINE at call sites
#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg); // LCOV_EXCL_LINE
  };
}
