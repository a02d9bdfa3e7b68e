#![deny(missing_docs)]

//! # OpenAPI Document Tree
//!
//! Both specs are kept as untyped `serde_json::Value` trees (built with
//! `preserve_order`, so mappings remember insertion order). This module holds
//! the parsers, the shape-checked accessors used by the transformations, and
//! the YAML writer used to persist the merged document.

use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};

/// A mapping node of the document tree.
pub type Mapping = Map<String, Value>;

/// Indentation width of the emitted YAML.
pub const YAML_INDENT: usize = 4;

/// Parses a JSON encoded OpenAPI document (the internal spec).
pub fn parse_json(content: &str) -> AppResult<Value> {
    Ok(serde_json::from_str(content)?)
}

/// Parses a YAML encoded OpenAPI document (the external spec).
pub fn parse_yaml(content: &str) -> AppResult<Value> {
    Ok(serde_yaml::from_str(content)?)
}

/// Joins a parent location and a key into a dotted location used in errors.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Ensures `value` is a mapping.
pub fn require_object<'a>(value: &'a Value, path: &str) -> AppResult<&'a Mapping> {
    value
        .as_object()
        .ok_or_else(|| AppError::shape(display_path(path), "a mapping"))
}

/// Mutable variant of [`require_object`].
pub fn require_object_mut<'a>(value: &'a mut Value, path: &str) -> AppResult<&'a mut Mapping> {
    value
        .as_object_mut()
        .ok_or_else(|| AppError::shape(display_path(path), "a mapping"))
}

/// Looks up `key` in `parent` expecting a mapping.
///
/// Absent keys and explicit `null` both yield `Ok(None)`; any other non-mapping
/// value is a [`AppError::SchemaShape`].
pub fn object_field<'a>(
    parent: &'a Mapping,
    key: &str,
    parent_path: &str,
) -> AppResult<Option<&'a Mapping>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(AppError::shape(join_path(parent_path, key), "a mapping")),
    }
}

/// Mutable variant of [`object_field`].
pub fn object_field_mut<'a>(
    parent: &'a mut Mapping,
    key: &str,
    parent_path: &str,
) -> AppResult<Option<&'a mut Mapping>> {
    match parent.get_mut(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(AppError::shape(join_path(parent_path, key), "a mapping")),
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<document root>"
    } else {
        path
    }
}

/// Serializes a document to block-style YAML.
///
/// Keys keep insertion order, nesting uses [`YAML_INDENT`] spaces and non-ASCII
/// text is written literally. Scalars are quoted by `serde_yaml`; strings that
/// would need a multi-line block scalar are written double-quoted instead.
pub fn to_yaml(value: &Value) -> AppResult<String> {
    let mut out = String::new();
    match value {
        Value::Object(map) if !map.is_empty() => write_mapping(&mut out, map, 0, false)?,
        Value::Array(items) if !items.is_empty() => write_sequence(&mut out, items, 0, false)?,
        other => {
            out.push_str(&inline_value(other)?);
            out.push('\n');
        }
    }
    Ok(out)
}

fn write_mapping(out: &mut String, map: &Mapping, indent: usize, inline: bool) -> AppResult<()> {
    for (i, (key, value)) in map.iter().enumerate() {
        if !(inline && i == 0) {
            pad(out, indent);
        }
        out.push_str(&scalar_str(key)?);
        out.push(':');
        match value {
            Value::Object(child) if !child.is_empty() => {
                out.push('\n');
                write_mapping(out, child, indent + YAML_INDENT, false)?;
            }
            Value::Array(items) if !items.is_empty() => {
                out.push('\n');
                write_sequence(out, items, indent, false)?;
            }
            other => {
                out.push(' ');
                out.push_str(&inline_value(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn write_sequence(out: &mut String, items: &[Value], indent: usize, inline: bool) -> AppResult<()> {
    for (i, item) in items.iter().enumerate() {
        if !(inline && i == 0) {
            pad(out, indent);
        }
        match item {
            Value::Object(child) if !child.is_empty() => {
                out.push_str(&format!("{:<width$}", "-", width = YAML_INDENT));
                write_mapping(out, child, indent + YAML_INDENT, true)?;
            }
            Value::Array(nested) if !nested.is_empty() => {
                out.push_str(&format!("{:<width$}", "-", width = YAML_INDENT));
                write_sequence(out, nested, indent + YAML_INDENT, true)?;
            }
            other => {
                out.push_str("- ");
                out.push_str(&inline_value(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn pad(out: &mut String, indent: usize) {
    out.push_str(&" ".repeat(indent));
}

/// Renders scalars and empty collections on a single line.
fn inline_value(value: &Value) -> AppResult<String> {
    Ok(match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => scalar_str(s)?,
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    })
}

fn scalar_str(s: &str) -> AppResult<String> {
    let rendered = serde_yaml::to_string(s)?;
    let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);
    if rendered.contains('\n') {
        // Block scalars would need re-indenting; JSON strings are valid YAML.
        return Ok(serde_json::to_string(s)?);
    }
    Ok(rendered.to_string())
}
