//! Core state management and business logic for UpdateHub.
//!
//! This crate provides the building blocks behind the UpdateHub API:
//! configuration, the error taxonomy, dotted-integer version semantics, the
//! durable version pointer, the single-artifact installer store, and the
//! [`UpdateHub`] provider that composes them into the service operations.
//!
//! # Modules
//!
//! - [`artifact_store`] - Atomic-replace storage for the installer blob
//! - [`config`] - Service configuration and fixed storage names
//! - [`error`] - The [`UpdateError`] taxonomy with HTTP status mapping
//! - [`model`] - Typed operation outputs serialized by the HTTP layer
//! - [`provider`] - The [`UpdateHub`] operation provider
//! - [`version`] - Validated version strings and their ordering
//! - [`version_store`] - Durable current-version pointer with read-repair

pub mod artifact_store;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod version;
pub mod version_store;

pub use artifact_store::{ArtifactStore, StoredArtifact};
pub use config::UpdateHubConfig;
pub use error::UpdateError;
pub use model::{ArtifactDownload, CompareOutput, UploadOutput};
pub use provider::UpdateHub;
pub use version::Version;
pub use version_store::{VersionRead, VersionStore};
