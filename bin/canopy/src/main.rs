//! Canopy - tree entities browser backend.
//!
//! # Usage
//!
//! ```bash
//! # Start with default config
//! canopy
//!
//! # Start against a specific provider
//! TREE_ENTITIES_API_BASE_URL=http://provider:3000 PORT=4000 canopy
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tokio::sync::watch;
use tracing::{Instrument, debug, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, fmt};

use canopy_core::metrics::init_metrics;
use canopy_core::ports::EntityProvider;
use canopy_core::services::AggregatorConfig;
use canopy_graphql::{QueryDefaults, ServerConfig, build_schema, serve_with_shutdown};
use canopy_provider::{HttpEntityProvider, ProviderConfig};

/// Canopy CLI - tree entities browser backend.
#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(about = "Canopy - GraphQL backend for browsing trees of values and table entities")]
#[command(version)]
struct Cli {
    /// Data provider base URL.
    #[arg(
        long,
        env = "TREE_ENTITIES_API_BASE_URL",
        default_value = "http://localhost:3000"
    )]
    provider_url: String,

    /// Per-request provider timeout in milliseconds.
    #[arg(long, env = "TREE_ENTITIES_API_TIMEOUT", default_value = "30000")]
    provider_timeout_ms: u64,

    /// Page size used when a query gives none.
    #[arg(long, env = "TREE_ENTITIES_DEFAULT_PAGE_SIZE", default_value = "100")]
    default_page_size: u32,

    /// Largest page size a query may request.
    #[arg(long, env = "TREE_ENTITIES_MAX_PAGE_SIZE", default_value = "1000")]
    max_page_size: u32,

    /// Sort field used when a query gives none.
    #[arg(
        long,
        env = "TREE_ENTITIES_DEFAULT_SORT_BY",
        default_value = "CreationTime"
    )]
    default_sort_by: String,

    /// Maximum page requests per aggregation.
    #[arg(long, env = "AGGREGATE_MAX_PAGES", default_value = "1000", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: u32,

    /// Maximum entities per aggregation.
    #[arg(long, env = "AGGREGATE_MAX_ITEMS", default_value = "100000")]
    max_items: usize,

    /// GraphQL server host.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// GraphQL server port.
    #[arg(long, env = "PORT", default_value = "4000")]
    port: u16,

    /// Serve GraphiQL at `/`.
    #[arg(long, env = "ENABLE_PLAYGROUND")]
    enable_playground: bool,

    /// Prometheus metrics port.
    #[arg(long, env = "METRICS_PORT", default_value = "9090")]
    metrics_port: u16,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    // Prometheus metrics exporter (optional - failures don't crash the app)
    let metrics_enabled =
        match format!("0.0.0.0:{}", cli.metrics_port).parse::<std::net::SocketAddr>() {
            Ok(metrics_addr) => {
                match PrometheusBuilder::new()
                    .with_http_listener(metrics_addr)
                    .install()
                {
                    Ok(()) => {
                        init_metrics();
                        true
                    }
                    Err(e) => {
                        warn!(
                            "⚠️  Failed to start metrics exporter: {}. Continuing without metrics.",
                            e
                        );
                        false
                    }
                }
            }
            Err(e) => {
                warn!("⚠️  Invalid metrics address: {}. Continuing without metrics.", e);
                false
            }
        };

    // ─────────────────────────────────────────────────────────────────────────
    // 🚀 STARTUP
    // ─────────────────────────────────────────────────────────────────────────
    info!("🚀 Starting Canopy");
    debug!(provider_url = %mask_password(&cli.provider_url), "Provider endpoint");

    // ─────────────────────────────────────────────────────────────────────────
    // 📡 PROVIDER CLIENT
    // ─────────────────────────────────────────────────────────────────────────
    let provider_config = ProviderConfig {
        base_url: cli.provider_url.clone(),
        timeout: Duration::from_millis(cli.provider_timeout_ms),
        default_page_size: cli.default_page_size,
        max_page_size: cli.max_page_size,
        default_sort_by: cli.default_sort_by.clone(),
    };

    let provider =
        HttpEntityProvider::new(provider_config).context("Invalid provider configuration")?;

    info!(
        provider = %mask_password(&cli.provider_url),
        timeout_ms = cli.provider_timeout_ms,
        "📡 Provider client ready"
    );

    let defaults = QueryDefaults {
        default_page_size: provider.config().default_page_size,
        max_page_size: provider.config().max_page_size,
        default_sort_by: provider.config().default_sort_by.clone(),
    };
    let aggregator_config = AggregatorConfig {
        max_pages: cli.max_pages,
        max_items: cli.max_items,
    };
    debug!(
        max_pages = aggregator_config.max_pages,
        max_items = aggregator_config.max_items,
        "Aggregation limits"
    );

    // One provider instance for the whole process
    let provider: Arc<dyn EntityProvider> = Arc::new(provider);
    let schema = build_schema(provider, aggregator_config, defaults);

    // ─────────────────────────────────────────────────────────────────────────
    // ⚡ SERVER START
    // ─────────────────────────────────────────────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server_config = ServerConfig {
        host: cli.host.clone(),
        port: cli.port,
        enable_playground: cli.enable_playground,
    };

    let mut server_handle = tokio::spawn(
        async move {
            let shutdown_signal = async move {
                while !*shutdown_rx.borrow() {
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            };

            if let Err(e) = serve_with_shutdown(schema, server_config, shutdown_signal).await {
                error!(error = %e, "❌ Server error");
            }
            debug!("Server stopped");
        }
        .instrument(info_span!("graphql")),
    );

    // ─────────────────────────────────────────────────────────────────────────
    // ✅ READY
    // ─────────────────────────────────────────────────────────────────────────
    info!("✅ Canopy ready");
    info!("   ⚡ GraphQL:  http://localhost:{}/graphql", cli.port);
    if cli.enable_playground {
        info!("   🛝 GraphiQL: http://localhost:{}/", cli.port);
    }
    if metrics_enabled {
        info!(
            "   📊 Metrics:  http://localhost:{}/metrics",
            cli.metrics_port
        );
    } else {
        info!("   📊 Metrics:  disabled");
    }
    info!("   Press Ctrl+C to stop");

    let server_exited = tokio::select! {
        _ = shutdown_signal() => false,
        _ = &mut server_handle => true,
    };

    // ─────────────────────────────────────────────────────────────────────────
    // 🛑 SHUTDOWN
    // ─────────────────────────────────────────────────────────────────────────
    if server_exited {
        warn!("⚠️  Server exited before shutdown was requested");
    } else {
        info!("🛑 Shutting down...");
        let _ = shutdown_tx.send(true);

        match tokio::time::timeout(Duration::from_secs(10), server_handle).await {
            Ok(_) => debug!("GraphQL stopped"),
            Err(_) => warn!("⚠️  GraphQL shutdown timed out"),
        }
    }

    info!("🛑 Shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

/// Mask password in a URL for logging.
fn mask_password(url_str: &str) -> String {
    match url::Url::parse(url_str) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => url_str.to_string(),
    }
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
