//! # Larder - Recipe Catalog
//!
//! The main binary for the Larder recipe catalog.
//!
//! This application provides:
//! - Cache synchronization of the authoritative catalog snapshot
//! - HTTP REST API server (axum-based)
//! - CLI interface for catalog queries and administration
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    apps/larder (THE BINARY)                  │
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐   │
//! │  │    CLI      │    │  HTTP API   │    │ Cache Sync      │   │
//! │  │   (clap)    │    │   (axum)    │    │ (reqwest, redb) │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬────────┘   │
//! │         │                  │                    │            │
//! │         └──────────────────┼────────────────────┘            │
//! │                            ▼                                 │
//! │                    ┌───────────────┐                         │
//! │                    │  larder-core  │                         │
//! │                    │  (THE LOGIC)  │                         │
//! │                    └───────────────┘                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! larder --source https://example.org/recipes.db serve --port 8080
//!
//! # CLI queries
//! larder search flour
//! larder show 2
//!
//! # Catalog administration
//! larder init -f recipes.db
//! larder add-recipe -f recipes.db Bread
//! ```

use clap::Parser;
use larder::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // LARDER_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LARDER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "larder=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Larder startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗      █████╗ ██████╗ ██████╗ ███████╗██████╗
  ██║     ██╔══██╗██╔══██╗██╔══██╗██╔════╝██╔══██╗
  ██║     ███████║██████╔╝██║  ██║█████╗  ██████╔╝
  ██║     ██╔══██║██╔══██╗██║  ██║██╔══╝  ██╔══██╗
  ███████╗██║  ██║██║  ██║██████╔╝███████╗██║  ██║
  ╚══════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═════╝ ╚══════╝╚═╝  ╚═╝

  Recipe Catalog v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
