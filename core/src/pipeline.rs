#![deny(missing_docs)]

//! # Reconciliation Pipeline
//!
//! Runs the transformations in their fixed order:
//!
//! 1. **RequestBody sync**: internal `requestBody`s overwrite the external ones.
//! 2. **Server resolution**: infer `servers` when absent, then rewrite every entry.
//! 3. **Error patching**: error-like components take the gateway `{message, slug}` shape.
//!
//! The external document is consumed and returned; nothing is written here.

use crate::error::AppResult;
use crate::error_schema::patch_error_schemas;
use crate::request_body::{sync_request_bodies, SyncReport};
use crate::servers::{infer_servers, replace_server_urls, InferOutcome, ServerUrlMap};
use serde_json::Value;
use tracing::info;

/// What each step of [`reconcile`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// RequestBody synchronization details.
    pub request_bodies: SyncReport,
    /// Set when `servers` was absent and inference ran.
    pub inferred_servers: Option<InferOutcome>,
    /// Number of server entries rewritten from the lookup table.
    pub replaced_servers: usize,
    /// Error schema components rewritten.
    pub patched_schemas: Vec<String>,
}

/// The merged document and its report.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// The external document after every transformation.
    pub document: Value,
    /// Per-step report.
    pub report: ReconcileReport,
}

fn has_servers(spec: &Value) -> bool {
    spec.get("servers").is_some_and(|s| !s.is_null())
}

/// Reconciles `external` against `internal`.
///
/// When `external` is `None` the internal document is used as the starting
/// point (self-sync): the RequestBody step then changes nothing but the server
/// and error transformations still apply.
///
/// # Arguments
///
/// * `internal` - The code-generated spec, read only.
/// * `external` - The gateway spec to update.
/// * `reference_url` - URL the internal spec was fetched from; used to infer servers.
/// * `servers` - Lookup table for server URL translation.
pub fn reconcile(
    internal: &Value,
    external: Option<Value>,
    reference_url: &str,
    servers: &ServerUrlMap,
) -> AppResult<Reconciled> {
    let mut document = external.unwrap_or_else(|| internal.clone());
    let mut report = ReconcileReport {
        request_bodies: sync_request_bodies(internal, &mut document)?,
        ..Default::default()
    };
    info!(
        synced = report.request_bodies.synced.len(),
        skipped_paths = report.request_bodies.skipped_paths.len(),
        skipped_operations = report.request_bodies.skipped_operations.len(),
        "Synchronized request bodies"
    );

    if !has_servers(&document) {
        report.inferred_servers = Some(infer_servers(&mut document, reference_url, servers)?);
    }
    report.replaced_servers = replace_server_urls(&mut document, servers)?;
    info!(replaced = report.replaced_servers, "Resolved server URLs");

    report.patched_schemas = patch_error_schemas(&mut document)?;
    info!(patched = report.patched_schemas.len(), "Patched error schemas");

    Ok(Reconciled { document, report })
}
