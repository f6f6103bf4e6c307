//! REST server startup and configuration

use anyhow::Result;
use axum::serve;
use bentley::request_logs::RequestLogs;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::server::routing::create_router;
use crate::server::state::AppState;

/// Start the server. Returns only on bind or serve failure.
pub async fn start_server(addr: SocketAddr, config: Config) -> Result<()> {
  let logs = RequestLogs::new();
  let state = AppState::from_config(&config, logs.clone())?;

  logs
    .info(
      &format!(
        "Searching {}.{} through index {}",
        config.target.database, config.target.collection, config.target.index
      ),
      "company-search-server",
    )
    .await;

  let app = create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::new()));

  let listener = TcpListener::bind(addr).await?;
  logs.success(&format!("Server listening on http://{addr}"), "company-search-server").await;

  match serve(listener, app).await {
    Ok(_) => {
      logs.info("Server shutdown gracefully", "company-search-server").await;
      Ok(())
    }
    Err(e) => {
      logs.error(&format!("Server error: {e}"), "company-search-server").await;
      Err(anyhow::anyhow!("Server error: {}", e))
    }
  }
}
