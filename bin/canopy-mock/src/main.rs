//! Canopy mock provider - serves generated tree entities data.
//!
//! # Usage
//!
//! ```bash
//! canopy-mock --port 3000 --total-entities 150
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use canopy_mock::{MockConfig, serve_with_shutdown};

/// Mock tree entities provider.
#[derive(Parser, Debug)]
#[command(name = "canopy-mock")]
#[command(about = "Mock tree entities provider for local development")]
#[command(version)]
struct Cli {
    /// Listen host.
    #[arg(long, env = "MOCK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Listen port.
    #[arg(long, env = "MOCK_PORT", default_value = "3000")]
    port: u16,

    /// Number of entities in every table.
    #[arg(long, env = "MOCK_TOTAL_ENTITIES", default_value = "150")]
    total_entities: u64,

    /// Answer 503 for pages starting at or after this position.
    #[arg(long, env = "MOCK_FAIL_FROM")]
    fail_from: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    let config = MockConfig {
        total_entities: cli.total_entities,
        fail_from: cli.fail_from,
    };

    serve_with_shutdown(config, &cli.host, cli.port, shutdown_signal())
        .await
        .context("Mock provider failed")?;

    info!("🛑 Mock provider stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "❌ Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "❌ Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
