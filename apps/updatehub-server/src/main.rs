//! UpdateHub Server - authenticated update-distribution service.
//!
//! This binary serves the UpdateHub API: version comparison, installer
//! download, and installer upload, all gated by timestamped HMAC-SHA256
//! request signatures.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:10250 UPDATEHUB_SECRET_KEY=... updatehub-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:10250` | Bind address |
//! | `UPDATEHUB_SECRET_KEY` | *(development default)* | Shared signing secret |
//! | `DATA_DIR` | `./data` | State directory |
//! | `REPLAY_WINDOW_SECS` | `300` | Accepted request timestamp skew |
//! | `DEFAULT_VERSION` | `1.0.3` | Initial version when no state exists |
//! | `SKIP_SIGNATURE_VALIDATION` | `false` | Disable auth (development only) |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod handler;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use updatehub_auth::StaticSecretProvider;
use updatehub_core::{UpdateHub, UpdateHubConfig};
use updatehub_http::dispatch::UpdateHandler;
use updatehub_http::service::{UpdateHttpConfig, UpdateHttpService};

use crate::handler::UpdateHubHandler;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the [`UpdateHttpConfig`] from the application [`UpdateHubConfig`].
fn build_http_config(config: &UpdateHubConfig) -> UpdateHttpConfig {
    UpdateHttpConfig {
        replay_window_secs: config.replay_window_secs,
        skip_signature_validation: config.skip_signature_validation,
        secret_provider: Arc::new(StaticSecretProvider::new(config.secret_key.clone())),
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: UpdateHandler>(
    listener: TcpListener,
    service: UpdateHttpService<H>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the server and requesting the
/// health endpoint.
///
/// Exits with code 0 if healthy, 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"status\":\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let config = UpdateHubConfig::from_env();
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = UpdateHubConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        data_dir = %config.data_dir,
        replay_window_secs = config.replay_window_secs,
        skip_signature_validation = config.skip_signature_validation,
        version = VERSION,
        "starting UpdateHub Server",
    );
    if config.skip_signature_validation {
        warn!("signature validation is DISABLED; do not run this in production");
    }

    let provider = UpdateHub::new(config.clone())?;

    // Initialize on-disk state up front: the version file gets its default
    // and the package directory exists before the first upload.
    let current = provider.current_version().await;
    info!(current_version = %current, "version state ready");
    tokio::fs::create_dir_all(config.package_dir())
        .await
        .with_context(|| {
            format!(
                "failed to create package directory {}",
                config.package_dir().display()
            )
        })?;

    let handler = UpdateHubHandler(provider);
    let http_config = build_http_config(&config);
    let service = UpdateHttpService::new(handler, http_config);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}

#[cfg(test)]
mod tests {
    use updatehub_auth::SecretProvider;

    use super::*;

    #[test]
    fn test_should_build_http_config_from_app_config() {
        let config = UpdateHubConfig::default();
        let http_config = build_http_config(&config);

        assert_eq!(http_config.replay_window_secs, config.replay_window_secs);
        assert_eq!(
            http_config.skip_signature_validation,
            config.skip_signature_validation
        );
        assert_eq!(
            http_config.secret_provider.signing_secret(),
            config.secret_key
        );
    }
}
