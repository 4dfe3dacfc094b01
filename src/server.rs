//! Gateway server assembly.
//!
//! Builds the request pipeline (asset origin behind the include-resolving
//! interceptor), binds it to a socket, and runs it until shutdown. Also owns
//! the shared per-process state handed to both stages.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use log::{info, warn};
use strum::IntoEnumIterator;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::assets;
use crate::config::Config;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::initialization::init_client;
use crate::interceptor;
use crate::resolve::Resolver;
use crate::status_server::{start_status_server, StatusState};

/// Per-process state shared by the asset origin and the interceptor.
pub(crate) struct AppState {
    /// Directory served as the site root
    pub root: PathBuf,
    /// Origin used to absolutize request URLs for include resolution
    pub public_base: Url,
    /// Largest HTML document the interceptor will buffer
    pub max_document_bytes: usize,
    /// The include resolution engine
    pub resolver: Resolver,
    /// Shared processing counters
    pub stats: Arc<ProcessingStats>,
}

/// Summary of a completed gateway run.
///
/// Returned after shutdown; mirrors what the status server reports live.
#[derive(Debug, Clone)]
pub struct GatewayReport {
    /// Requests that passed through the interceptor
    pub requests: usize,
    /// HTML documents scanned and rebuilt
    pub documents_assembled: usize,
    /// Fragments fetched and spliced successfully
    pub fragments_resolved: usize,
    /// Fragment resolutions that degraded to inline comments
    pub fragments_failed: usize,
    /// Elapsed serving time in seconds
    pub elapsed_seconds: f64,
}

/// A bound but not-yet-serving gateway.
///
/// Splitting bind from serve lets callers (and tests) learn the actual
/// listen address before any request is accepted, which matters when the
/// configured port is 0.
pub struct Gateway {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<AppState>,
    status_port: Option<u16>,
}

impl Gateway {
    /// Binds the gateway's listener and builds the shared state.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be bound, the public
    /// base URL cannot be derived, or the HTTP client cannot be built.
    pub async fn bind(config: Config) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(config.bind, config.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", config.bind, config.port))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read bound address")?;

        let public_base = match &config.public_base_url {
            Some(url) => url.clone(),
            None => Url::parse(&format!("http://{local_addr}/"))
                .context("Failed to derive public base URL from listen address")?,
        };

        let stats = Arc::new(ProcessingStats::new());
        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let resolver = Resolver::new(client, Arc::clone(&stats));

        let state = Arc::new(AppState {
            root: config.root,
            public_base,
            max_document_bytes: config.max_document_bytes,
            resolver,
            stats,
        });

        Ok(Gateway {
            listener,
            local_addr,
            state,
            status_port: config.status_port,
        })
    }

    /// The address the gateway is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves requests until `shutdown` is cancelled, then reports totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the server loop itself fails; per-request
    /// failures never surface here.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<GatewayReport> {
        let start_time = Instant::now();
        let state = Arc::clone(&self.state);

        if let Some(port) = self.status_port {
            let status_state = StatusState {
                stats: Arc::clone(&state.stats),
                start_time,
            };
            tokio::spawn(async move {
                if let Err(e) = start_status_server(port, status_state).await {
                    warn!("Status server error: {e}");
                }
            });
        }

        let router = build_router(Arc::clone(&self.state));
        info!(
            "Serving {} on http://{}/",
            state.root.display(),
            self.local_addr
        );

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .context("Gateway server error")?;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        log_processing_statistics(&state.stats);

        Ok(GatewayReport {
            requests: state.stats.get_info_count(InfoType::RequestServed),
            documents_assembled: state.stats.get_info_count(InfoType::DocumentAssembled),
            fragments_resolved: state.stats.get_info_count(InfoType::FragmentResolved),
            fragments_failed: state.stats.total_fragment_failures(),
            elapsed_seconds,
        })
    }
}

/// Runs the gateway until ctrl-c.
///
/// This is the main entry point for the binary. It binds per the config,
/// serves until a shutdown signal arrives, and returns run totals.
///
/// # Errors
///
/// Returns an error if startup fails (bind, client construction) or the
/// server loop fails.
///
/// # Example
///
/// ```no_run
/// use esi_gateway::{run_gateway, Config};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     root: std::path::PathBuf::from("./site"),
///     ..Default::default()
/// };
/// let report = run_gateway(config).await?;
/// println!("handled {} requests", report.requests);
/// # Ok(())
/// # }
/// ```
pub async fn run_gateway(config: Config) -> Result<GatewayReport> {
    let gateway = Gateway::bind(config).await?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal_token.cancel();
        }
    });

    gateway.serve(shutdown).await
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(assets::serve_asset)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            interceptor::resolve_includes,
        ))
        .with_state(state)
}

fn log_processing_statistics(stats: &ProcessingStats) {
    info!(
        "Processed {} request(s): {} document(s) assembled, {} fragment(s) resolved, {} failed",
        stats.get_info_count(InfoType::RequestServed),
        stats.get_info_count(InfoType::DocumentAssembled),
        stats.get_info_count(InfoType::FragmentResolved),
        stats.total_fragment_failures(),
    );

    let total_errors = stats.total_errors();
    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }
}
