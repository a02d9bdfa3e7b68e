#![deny(missing_docs)]

//! # OpenAPI Sync Core
//!
//! Reconciles a service-generated ("internal") OpenAPI document with the one
//! published at the API gateway ("external").

/// Shared error types.
pub mod error;

/// Document tree helpers, parsing and YAML output.
pub mod document;

/// RequestBody synchronization.
pub mod request_body;

/// Server URL lookup table and resolution.
pub mod servers;

/// Error schema rewriting.
pub mod error_schema;

/// End-to-end reconciliation.
pub mod pipeline;

pub use document::{parse_json, parse_yaml, to_yaml, Mapping};
pub use error::{AppError, AppResult};
pub use error_schema::{gateway_error_schema, is_error_schema_name, patch_error_schemas};
pub use pipeline::{reconcile, ReconcileReport, Reconciled};
pub use request_body::{sync_request_bodies, SyncReport};
pub use servers::{
    default_server_variables, infer_servers, replace_server_urls, InferOutcome, ServerTemplate,
    ServerUrlMap,
};
