//! HTTP layer for UpdateHub.
//!
//! This crate turns the UpdateHub business logic into a hyper-compatible
//! HTTP service. It provides:
//!
//! - [`router`] - method+path routing to service operations
//! - [`body`] - the response body type (buffered or empty)
//! - [`multipart`] - multipart/form-data parsing for package uploads
//! - [`response`] - JSON and attachment response construction, error mapping
//! - [`dispatch`] - the [`dispatch::UpdateHandler`] seam between HTTP and
//!   business logic
//! - [`service`] - the full request pipeline as a hyper `Service`
//!
//! The pipeline authenticates every API request with the replay guard from
//! `updatehub-auth` before any handler logic runs; the landing page and
//! health probes are the only unauthenticated surfaces.

pub mod body;
pub mod dispatch;
pub mod multipart;
pub mod response;
pub mod router;
pub mod service;
