#![deny(missing_docs)]

//! # Error Schema Patching
//!
//! The gateway flattens every error body the services return (FastAPI style
//! `{"detail": [{"loc", "msg", "type"}]}`) into `{"message", "slug"}`. The
//! published document has to describe what clients actually receive, so every
//! component whose name looks like an error is rewritten to that shape.

use crate::document::{join_path, object_field_mut, require_object_mut};
use crate::error::AppResult;
use serde_json::{json, Value};
use tracing::debug;

/// Case-insensitive substring matched against component names.
pub const ERROR_MARKER: &str = "error";

/// Whether a schema component name is treated as an error schema.
///
/// Plain substring match, so `ErrorlessSchema` qualifies too.
pub fn is_error_schema_name(name: &str) -> bool {
    name.to_lowercase().contains(ERROR_MARKER)
}

/// The flattened `{message, slug}` error shape published by the gateway.
pub fn gateway_error_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": {"title": "Message", "type": "string"},
            "slug": {"title": "Slug", "type": "string"}
        },
        "example": {"message": "Unauthorized", "slug": "Unauthorized"}
    })
}

/// Rewrites every error-like component under `components.schemas`.
///
/// Returns the names of the rewritten components, in document order. A document
/// without `components` or `components.schemas` has nothing to patch.
pub fn patch_error_schemas(spec: &mut Value) -> AppResult<Vec<String>> {
    let root = require_object_mut(spec, "")?;
    let Some(components) = object_field_mut(root, "components", "")? else {
        return Ok(Vec::new());
    };
    let Some(schemas) = object_field_mut(components, "schemas", "components")? else {
        return Ok(Vec::new());
    };

    let mut patched = Vec::new();
    for (name, schema) in schemas.iter_mut() {
        if !is_error_schema_name(name) {
            continue;
        }
        debug!(schema = %join_path("components.schemas", name), "Patching error schema");
        *schema = gateway_error_schema();
        patched.push(name.clone());
    }
    Ok(patched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_name_heuristic() {
        assert!(is_error_schema_name("Error"));
        assert!(is_error_schema_name("ValidationError"));
        assert!(is_error_schema_name("ERROR_RESPONSE"));
        assert!(is_error_schema_name("ErrorlessSchema"));
        assert!(!is_error_schema_name("Instance"));
        assert!(!is_error_schema_name("Err"));
    }

    #[test]
    fn test_patch_replaces_schema_wholesale() {
        let mut spec = json!({"components": {"schemas": {
            "HTTPValidationError": {
                "title": "HTTPValidationError",
                "required": ["detail"],
                "properties": {"detail": {"type": "array", "items": {"$ref": "#/components/schemas/ValidationError"}}}
            },
            "ValidationError": {"$ref": "#/components/schemas/Other"},
            "Instance": {"type": "object", "required": ["id"]}
        }}});

        let patched = patch_error_schemas(&mut spec).unwrap();

        assert_eq!(patched, vec!["HTTPValidationError", "ValidationError"]);
        let schemas = &spec["components"]["schemas"];
        assert_eq!(schemas["HTTPValidationError"], gateway_error_schema());
        assert_eq!(schemas["ValidationError"], gateway_error_schema());
        assert_eq!(
            schemas["Instance"],
            json!({"type": "object", "required": ["id"]})
        );
    }

    #[test]
    fn test_patch_is_idempotent() {
        let mut once = json!({"components": {"schemas": {"ErrorResponse": {"properties": {"detail": []}}}}});
        patch_error_schemas(&mut once).unwrap();
        let mut twice = once.clone();
        patch_error_schemas(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_components_is_a_no_op() {
        let mut spec = json!({"openapi": "3.0.0"});
        assert!(patch_error_schemas(&mut spec).unwrap().is_empty());

        let mut spec = json!({"components": {"securitySchemes": {}}});
        assert!(patch_error_schemas(&mut spec).unwrap().is_empty());
        assert_eq!(spec, json!({"components": {"securitySchemes": {}}}));
    }
}
