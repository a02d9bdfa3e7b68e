#![deny(missing_docs)]

//! # Server URL Resolution
//!
//! Gateway documents expose a small set of region-templated base URLs instead of
//! the environment specific hosts the services are generated with. The
//! [`ServerUrlMap`] holds that translation; it is an ordered table and the order
//! decides which entry wins when inferring servers from a reference URL.

use crate::document::{require_object_mut, Mapping};
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

/// Replacement server entry: a parameterized URL and its variable declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerTemplate {
    /// URL containing `{variable}` placeholders.
    pub url: String,
    /// OpenAPI server variables keyed by placeholder name.
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub variables: Mapping,
}

impl ServerTemplate {
    /// Builds the server entry as a document node.
    pub fn to_value(&self) -> Value {
        let mut entry = Mapping::new();
        self.overlay(&mut entry);
        Value::Object(entry)
    }

    /// Writes `url` and `variables` onto an existing server entry, keeping its other fields.
    pub fn overlay(&self, entry: &mut Mapping) {
        entry.insert("url".to_string(), Value::String(self.url.clone()));
        if !self.variables.is_empty() {
            entry.insert(
                "variables".to_string(),
                Value::Object(self.variables.clone()),
            );
        }
    }
}

/// Ordered lookup table from canonical base URL to its gateway template.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerUrlMap {
    entries: IndexMap<String, ServerTemplate>,
}

/// Products published behind the gateway, as `(canonical host, product slug)`.
const KNOWN_PRODUCTS: &[(&str, &str)] = &[
    ("virtual-machine.br-ne-1", "virtual-machine"),
    ("virtual-machine.br-ne1-prod", "virtual-machine"),
    ("block-storage.br-ne-1", "block-storage"),
    ("vpc.br-ne-1", "vpc"),
    ("object-storage.br-ne-1", "object-storage"),
    ("dbaas.br-ne-1", "dbaas"),
    ("mke.br-ne-1", "mke"),
];

/// Variables shared by every built-in template.
pub fn default_server_variables() -> Mapping {
    let mut region = Mapping::new();
    region.insert(
        "description".to_string(),
        Value::from("Region to reach the service"),
    );
    region.insert("default".to_string(), Value::from("br-ne-1"));
    region.insert(
        "enum".to_string(),
        json!(["br-ne-1", "br-ne-2", "br-se-1"]),
    );

    let mut variables = Mapping::new();
    variables.insert("region".to_string(), Value::Object(region));
    variables
}

impl Default for ServerUrlMap {
    fn default() -> Self {
        let variables = default_server_variables();
        let entries = KNOWN_PRODUCTS
            .iter()
            .map(|(host, product)| {
                (
                    format!("https://{}.jaxyendy.com", host),
                    ServerTemplate {
                        url: format!("https://api-{}.{{region}}.jaxyendy.com", product),
                        variables: variables.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }
}

impl ServerUrlMap {
    /// Loads a table from a YAML mapping of `canonical url -> {url, variables}`.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let entries: IndexMap<String, ServerTemplate> = serde_yaml::from_str(content)?;
        Ok(Self { entries })
    }

    /// Exact lookup by canonical URL.
    pub fn get(&self, url: &str) -> Option<&ServerTemplate> {
        self.entries.get(url)
    }

    /// First entry (in table order) whose key contains `spec_name`, ignoring case.
    pub fn find_by_spec_name(&self, spec_name: &str) -> Option<(&str, &ServerTemplate)> {
        let needle = spec_name.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| key.to_lowercase().contains(&needle))
            .map(|(key, template)| (key.as_str(), template))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of [`infer_servers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferOutcome {
    /// `servers` was set from the entry with this canonical URL.
    Added(String),
    /// No table key contains the spec name derived from the reference URL.
    NoMatch(String),
    /// The reference URL has no parsable hostname.
    NoHost,
}

/// Derives the spec name (first hostname label) from a reference URL.
pub fn spec_name_from_url(reference_url: &str) -> Option<String> {
    let parsed = Url::parse(reference_url).ok()?;
    let host = parsed.host_str()?;
    host.split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_lowercase)
}

/// Sets `servers` to the template matching the reference URL's spec name.
///
/// Missing hostnames and unmatched names are soft failures: `servers` is left
/// untouched and the outcome says why.
pub fn infer_servers(
    spec: &mut Value,
    reference_url: &str,
    map: &ServerUrlMap,
) -> AppResult<InferOutcome> {
    let Some(spec_name) = spec_name_from_url(reference_url) else {
        warn!(url = %reference_url, "Could not get host from reference URL");
        return Ok(InferOutcome::NoHost);
    };

    let Some((key, template)) = map.find_by_spec_name(&spec_name) else {
        warn!(spec_name = %spec_name, "No known server matches spec name");
        return Ok(InferOutcome::NoMatch(spec_name));
    };

    debug!(spec_name = %spec_name, server = %key, "Inferred servers from reference URL");
    let root = require_object_mut(spec, "")?;
    root.insert("servers".to_string(), json!([template.to_value()]));
    Ok(InferOutcome::Added(key.to_string()))
}

/// Overlays the matching template onto every listed server entry.
///
/// Returns the number of entries rewritten. Entries with unknown URLs are left
/// as they are. Fails with [`AppError::MissingServers`] when `servers` is absent.
pub fn replace_server_urls(spec: &mut Value, map: &ServerUrlMap) -> AppResult<usize> {
    let root = require_object_mut(spec, "")?;
    let servers = match root.get_mut("servers") {
        None | Some(Value::Null) => return Err(AppError::MissingServers),
        Some(Value::Array(servers)) => servers,
        Some(_) => return Err(AppError::shape("servers", "a sequence")),
    };

    let mut replaced = 0;
    for entry in servers.iter_mut() {
        let Some(entry) = entry.as_object_mut() else {
            continue;
        };
        let Some(url) = entry.get("url").and_then(Value::as_str).map(str::to_owned) else {
            continue;
        };
        if let Some(template) = map.get(&url) {
            debug!(from = %url, to = %template.url, "Replacing server URL");
            template.overlay(entry);
            replaced += 1;
        }
    }
    Ok(replaced)
}
