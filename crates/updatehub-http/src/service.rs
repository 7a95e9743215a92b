//! The main UpdateHub HTTP service implementing hyper's `Service` trait.
//!
//! [`UpdateHttpService`] ties together routing, authentication, dispatch,
//! and response serialization into a single hyper-compatible service. Per
//! request it performs:
//!
//! 1. Request-id assignment
//! 2. Health check interception (`GET /health`, `GET /_health`)
//! 3. Routing via [`crate::router::resolve`]
//! 4. Request body collection
//! 5. The authentication gate (replay guard + signature verification) for
//!    every operation that requires it
//! 6. Operation dispatch to the [`UpdateHandler`]
//! 7. Common response headers (`x-request-id`, `Server`)
//!
//! Authentication runs after routing and body collection so a rejected
//! request exits through the same response path as a handler failure.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error, warn};
use uuid::Uuid;

use updatehub_auth::SecretProvider;
use updatehub_core::UpdateError;

use crate::body::ResponseBody;
use crate::dispatch::{UpdateHandler, dispatch_operation};
use crate::response::{auth_error_to_response, error_to_response};
use crate::router;

/// Configuration for the UpdateHub HTTP service.
#[derive(Clone)]
pub struct UpdateHttpConfig {
    /// Accepted clock skew between request timestamps and server time.
    pub replay_window_secs: u64,
    /// Whether to skip signature validation (development only).
    pub skip_signature_validation: bool,
    /// Provider of the shared signing secret.
    pub secret_provider: Arc<dyn SecretProvider>,
}

impl std::fmt::Debug for UpdateHttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateHttpConfig")
            .field("replay_window_secs", &self.replay_window_secs)
            .field("skip_signature_validation", &self.skip_signature_validation)
            .field("secret_provider", &"...")
            .finish()
    }
}

/// The UpdateHub HTTP service.
///
/// # Type Parameters
///
/// - `H`: The business logic handler implementing [`UpdateHandler`].
#[derive(Debug)]
pub struct UpdateHttpService<H: UpdateHandler> {
    handler: Arc<H>,
    config: Arc<UpdateHttpConfig>,
}

impl<H: UpdateHandler> UpdateHttpService<H> {
    /// Create a new HTTP service with the given handler and configuration.
    #[must_use]
    pub fn new(handler: H, config: UpdateHttpConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            config: Arc::new(config),
        }
    }
}

impl<H: UpdateHandler> Clone for UpdateHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: UpdateHandler> Service<http::Request<Incoming>> for UpdateHttpService<H> {
    type Response = http::Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();

            let method = req.method().clone();
            let uri = req.uri().clone();
            debug!(%method, %uri, request_id, "processing request");

            // Health check interception — no auth, no routing.
            if is_health_check(&method, uri.path()) {
                return Ok(add_common_headers(health_check_response(), &request_id));
            }

            let (parts, incoming) = req.into_parts();
            let body = match collect_body(incoming).await {
                Ok(body) => body,
                Err(e) => {
                    error!(error = %e, request_id, "failed to collect request body");
                    let err = UpdateError::Internal(anyhow_from_hyper(e));
                    return Ok(add_common_headers(error_to_response(&err), &request_id));
                }
            };

            let response = process_parts(handler.as_ref(), &config, parts, body, &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process a request whose body has already been collected.
///
/// This is the pipeline below body collection: routing, the authentication
/// gate, and dispatch. Split out so server-level tests can drive the full
/// pipeline with constructed requests.
pub async fn process_parts<H: UpdateHandler>(
    handler: &H,
    config: &UpdateHttpConfig,
    parts: http::request::Parts,
    body: Bytes,
    request_id: &str,
) -> http::Response<ResponseBody> {
    let ctx = match router::resolve(&parts) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(path = parts.uri.path(), request_id, "no route for request");
            return error_to_response(&err);
        }
    };

    debug!(operation = %ctx.operation, request_id, "routed request");

    if ctx.operation.requires_auth() && !config.skip_signature_validation {
        let now = current_epoch_secs();
        if let Err(auth_err) = updatehub_auth::authenticate(
            &parts,
            config.secret_provider.as_ref(),
            config.replay_window_secs,
            now,
        ) {
            warn!(
                operation = %ctx.operation,
                error = %auth_err,
                request_id,
                "authentication failed"
            );
            return auth_error_to_response(&auth_err);
        }
    }

    match dispatch_operation(handler, parts, body, ctx).await {
        Ok(response) => response,
        Err(err) => {
            if err.status_code().is_server_error() {
                error!(error = ?err, request_id, "operation failed");
            } else {
                debug!(error = %err, request_id, "operation returned error");
            }
            error_to_response(&err)
        }
    }
}

/// Collect the full body from a hyper `Incoming` stream into `Bytes`.
async fn collect_body(incoming: Incoming) -> Result<Bytes, hyper::Error> {
    let collected = incoming.collect().await?;
    Ok(collected.to_bytes())
}

/// Current server time in seconds since the Unix epoch.
fn current_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Wrap a hyper body error for the internal error path.
fn anyhow_from_hyper(e: hyper::Error) -> anyhow::Error {
    anyhow::anyhow!("failed to read request body: {e}")
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Produce a health check response.
fn health_check_response() -> http::Response<ResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(ResponseBody::from_string(
            r#"{"status":"running","service":"updatehub"}"#,
        ))
        .expect("static health response should be valid")
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ResponseBody>,
    request_id: &str,
) -> http::Response<ResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", hv);
    }

    headers.insert(
        "Server",
        http::header::HeaderValue::from_static("UpdateHub"),
    );

    response
}
