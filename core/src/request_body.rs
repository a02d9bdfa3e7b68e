#![deny(missing_docs)]

//! # RequestBody Synchronization
//!
//! Copies `requestBody` definitions from the internal (code-generated) spec onto
//! the matching operations of the external (gateway) spec.
//!
//! Matching is exact on the path key and on the method key. Anything that does
//! not match is skipped and recorded in the [`SyncReport`]; nothing is ever
//! removed from the external document.

use crate::document::{
    join_path, object_field, object_field_mut, require_object, require_object_mut,
};
use crate::error::AppResult;
use tracing::{debug, warn};

/// Outcome of a [`sync_request_bodies`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Operations whose `requestBody` was replaced, as `(path, method)`.
    pub synced: Vec<(String, String)>,
    /// External paths with no counterpart in the internal spec.
    pub skipped_paths: Vec<String>,
    /// External operations whose method is absent from the internal path item.
    pub skipped_operations: Vec<(String, String)>,
    /// Skipped operations that only match an internal method when ignoring case.
    pub case_mismatches: Vec<(String, String)>,
}

/// Path item keys that are not operations.
fn is_operation_key(key: &str) -> bool {
    !matches!(key, "parameters" | "summary" | "description" | "servers" | "$ref")
        && !key.starts_with("x-")
}

/// Replaces each external operation's `requestBody` with the internal one.
///
/// The replacement is a full overwrite (no deep merge) and only happens when the
/// internal operation actually defines a `requestBody`.
pub fn sync_request_bodies(
    internal: &serde_json::Value,
    external: &mut serde_json::Value,
) -> AppResult<SyncReport> {
    let mut report = SyncReport::default();

    let internal_root = require_object(internal, "")?;
    let Some(internal_paths) = object_field(internal_root, "paths", "")? else {
        debug!("Internal spec declares no paths, nothing to sync");
        let external_root = require_object(external, "")?;
        if let Some(ext_paths) = object_field(external_root, "paths", "")? {
            report.skipped_paths = ext_paths.keys().cloned().collect();
        }
        return Ok(report);
    };

    let external_root = require_object_mut(external, "")?;
    let Some(external_paths) = object_field_mut(external_root, "paths", "")? else {
        return Ok(report);
    };

    for (path, ext_item) in external_paths.iter_mut() {
        let item_path = join_path("paths", path);
        let Some(internal_item) = object_field(internal_paths, path, "paths")? else {
            // Present at the gateway but not (yet) in the generated spec.
            debug!(path = %path, "Path missing from internal spec, skipping");
            report.skipped_paths.push(path.clone());
            continue;
        };
        let ext_item = require_object_mut(ext_item, &item_path)?;

        for (method, ext_op) in ext_item.iter_mut() {
            if !is_operation_key(method) {
                continue;
            }
            let Some(internal_op) = object_field(internal_item, method, &item_path)? else {
                if internal_item
                    .keys()
                    .any(|k| k != method && k.eq_ignore_ascii_case(method))
                {
                    warn!(
                        path = %path,
                        method = %method,
                        "Operation method differs only by case from the internal spec, skipping"
                    );
                    report.case_mismatches.push((path.clone(), method.clone()));
                }
                report.skipped_operations.push((path.clone(), method.clone()));
                continue;
            };

            let body = match internal_op.get("requestBody") {
                None | Some(serde_json::Value::Null) => continue,
                Some(body) => body.clone(),
            };
            let ext_op = require_object_mut(ext_op, &join_path(&item_path, method))?;
            ext_op.insert("requestBody".to_string(), body);
            report.synced.push((path.clone(), method.clone()));
        }
    }

    Ok(report)
}
