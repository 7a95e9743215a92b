//! Operation dispatch: the seam between the HTTP pipeline and business logic.
//!
//! [`UpdateHandler`] is implemented by the server binary over the
//! `updatehub-core` provider. The service layer calls [`dispatch_operation`]
//! after routing and authentication have succeeded.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use updatehub_core::UpdateError;

use crate::body::ResponseBody;
use crate::router::RoutingContext;

/// Trait that the business logic provider must implement.
///
/// # Object Safety
///
/// The boxed-future signature keeps the trait object-safe so the service can
/// hold an `Arc<H>` and dispatch dynamically without an async-trait macro.
pub trait UpdateHandler: Send + Sync + 'static {
    /// Handle a routed, authenticated operation and produce a response.
    ///
    /// The implementor receives the raw request parts and collected body, and
    /// must return a fully formed HTTP response or a domain error (which the
    /// service maps to an error response).
    fn handle_operation(
        &self,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<ResponseBody>, UpdateError>> + Send>>;
}

/// Dispatch a routed request to the handler.
pub async fn dispatch_operation<H: UpdateHandler>(
    handler: &H,
    parts: http::request::Parts,
    body: Bytes,
    ctx: RoutingContext,
) -> Result<http::Response<ResponseBody>, UpdateError> {
    tracing::debug!(operation = %ctx.operation, "dispatching operation");
    handler.handle_operation(parts, body, ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::UpdateOperation;

    /// A handler that echoes the operation name with a 200.
    struct EchoHandler;

    impl UpdateHandler for EchoHandler {
        fn handle_operation(
            &self,
            _parts: http::request::Parts,
            _body: Bytes,
            ctx: RoutingContext,
        ) -> Pin<Box<dyn Future<Output = Result<http::Response<ResponseBody>, UpdateError>> + Send>>
        {
            Box::pin(async move {
                Ok(http::Response::builder()
                    .status(http::StatusCode::OK)
                    .header("x-operation", ctx.operation.as_str())
                    .body(ResponseBody::empty())
                    .expect("valid response"))
            })
        }
    }

    #[tokio::test]
    async fn test_should_dispatch_to_handler() {
        let (parts, ()) = http::Request::builder()
            .method("GET")
            .uri("/api/download/latest")
            .body(())
            .expect("valid request")
            .into_parts();
        let ctx = RoutingContext {
            operation: UpdateOperation::DownloadLatest,
            query_params: vec![],
        };

        let response = dispatch_operation(&EchoHandler, parts, Bytes::new(), ctx)
            .await
            .expect("dispatch succeeds");
        assert_eq!(
            response
                .headers()
                .get("x-operation")
                .and_then(|v| v.to_str().ok()),
            Some("DownloadLatest"),
        );
    }
}
