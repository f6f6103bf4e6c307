//! HTTP surface for company search
//!
//! Server-rendered pages for people, a small JSON API for scripts, and the
//! operational status/logs endpoints. Built on axum; API types carry schemars
//! annotations for OpenAPI generation.

pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod state;
pub mod types;
pub mod views;
