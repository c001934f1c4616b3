//! # calcd - Arithmetic Expression Server
//!
//! The main binary for calcd.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for local evaluation
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 apps/calcd (THE BINARY)                │
//! │                                                       │
//! │     ┌─────────────┐          ┌─────────────┐          │
//! │     │    CLI      │          │  HTTP API   │          │
//! │     │   (clap)    │          │   (axum)    │          │
//! │     └──────┬──────┘          └──────┬──────┘          │
//! │            └────────────┬───────────┘                 │
//! │                         ▼                             │
//! │                 ┌───────────────┐                     │
//! │                 │  calcd-core   │                     │
//! │                 │  (THE LOGIC)  │                     │
//! │                 └───────────────┘                     │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! calcd server --host 0.0.0.0 --port 8080
//!
//! # Local evaluation
//! calcd eval "(2 + 3) * 4"
//! calcd check "2 + x"
//! ```

use calcd::cli;
use calcd::config::{Config, LogFormat};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if cli.verbose {
        config.log_level = "debug".to_string();
    }

    init_tracing(&config);

    if !cli.quiet && cli.is_server() {
        print_banner();
    }

    if let Err(e) = cli::execute(cli, config).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing. `RUST_LOG` wins over the configured level; logs go to
/// stderr so command output on stdout stays machine-readable.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.tracing_filter()))
        .unwrap_or_else(|_| EnvFilter::new("calcd=info,calcd_core=info,tower_http=info"));

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print the calcd startup banner.
fn print_banner() {
    println!(
        r#"
   ___  __ _  | |  ___   __| |
  / __|/ _` | | | / __| / _` |
 | (__| (_| | | || (__ | (_| |
  \___|\__,_| |_| \___| \__,_|

  Arithmetic Expression Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
