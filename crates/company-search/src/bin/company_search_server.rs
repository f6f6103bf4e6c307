//! Company Search Server
//!
//! Serves the password-gated company similarity search over HTTP.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use company_search::error::SearchError;
use company_search::server::startup::start_server;
use company_search::Config;

#[derive(Parser)]
#[command(name = "company_search_server")]
#[command(about = "Company Vector Search Server")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, default_value = "127.0.0.1:8501")]
  bind: SocketAddr,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // The mongodb driver is chatty at debug
  let filter = if args.verbose {
    EnvFilter::new("debug,mongodb=info,hyper=info,reqwest=info")
  } else {
    EnvFilter::new("company_search=info,tower_http=warn,mongodb=warn,warn")
  };

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  bentley::info!(&format!("Starting Company Search Server v{}", env!("CARGO_PKG_VERSION")));

  let config = match Config::from_env() {
    Ok(config) => config,
    Err(e) => {
      let error = SearchError::from(e);
      bentley::error!(&format!("{} ({})", error.user_message(), error.key()));
      return Err(error.into());
    }
  };

  bentley::info!(&format!("Binding to address: {}", args.bind));
  start_server(args.bind, config).await?;

  Ok(())
}
