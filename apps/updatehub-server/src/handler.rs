//! Operation handler implementation for [`UpdateHub`].
//!
//! This module bridges the HTTP layer (`updatehub-http`) with the business
//! logic (`updatehub-core`) by implementing the [`UpdateHandler`] trait.
//! Each routed operation is dispatched to the corresponding method on
//! [`UpdateHub`], with responses serialized by `updatehub_http::response`.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use updatehub_core::{UpdateError, UpdateHub};
use updatehub_http::body::ResponseBody;
use updatehub_http::dispatch::UpdateHandler;
use updatehub_http::multipart;
use updatehub_http::response::{attachment_response, html_response, json_response};
use updatehub_http::router::{self, RoutingContext, UpdateOperation};

/// Wrapper that implements [`UpdateHandler`] by delegating to [`UpdateHub`].
#[derive(Debug, Clone)]
pub struct UpdateHubHandler(pub UpdateHub);

impl UpdateHandler for UpdateHubHandler {
    fn handle_operation(
        &self,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<ResponseBody>, UpdateError>> + Send>>
    {
        let provider = self.0.clone();
        Box::pin(async move {
            match ctx.operation {
                UpdateOperation::Index => {
                    let version = provider.current_version().await;
                    Ok(html_response(render_index(version.as_str())))
                }

                UpdateOperation::CompareVersion => {
                    let input = router::query_param(&ctx.query_params, "version")
                        .ok_or(UpdateError::MissingParam { name: "version" })?;
                    let output = provider.compare_version(input).await?;
                    Ok(json_response(http::StatusCode::OK, &output))
                }

                UpdateOperation::DownloadLatest => {
                    let download = provider.download_latest().await?;
                    Ok(attachment_response(download))
                }

                UpdateOperation::UploadPackage => {
                    let content_type = parts
                        .headers
                        .get(http::header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .ok_or(UpdateError::NoFile)?;
                    let boundary = multipart::extract_boundary(content_type)?;
                    let form = multipart::parse_upload_form(&body, &boundary)?;
                    let file_name = form.file_name.unwrap_or_default();

                    let output = provider.upload_package(&file_name, form.file_data).await?;
                    Ok(json_response(http::StatusCode::OK, &output))
                }
            }
        })
    }
}

/// Render the landing page showing the current version and the API surface.
fn render_index(version: &str) -> String {
    format!(
        "<h1>UpdateHub</h1>\n\
         <p><strong>Current version:</strong> {version}</p>\n\
         \n\
         <h2>Endpoints</h2>\n\
         <ul>\n\
           <li>GET {compare}?version=x.y.z — compare a client version</li>\n\
           <li>GET {download} — download the latest installer</li>\n\
           <li>POST {upload} — upload a new installer</li>\n\
         </ul>\n\
         <p>API requests must carry X-Timestamp and X-Signature headers.</p>\n",
        compare = router::COMPARE_ENDPOINT,
        download = router::DOWNLOAD_ENDPOINT,
        upload = router::UPLOAD_ENDPOINT,
    )
}
