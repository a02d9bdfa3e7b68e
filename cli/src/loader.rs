#![deny(missing_docs)]

//! # Document Loading & Saving
//!
//! Thin I/O around the core: fetching the internal spec over HTTP, reading the
//! external spec and an optional server map from disk, and writing the result.

use crate::error::{CliError, CliResult};
use oapi_sync_core::{parse_yaml, ServerUrlMap};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default timeout for fetching the internal spec.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of the internal spec body.
pub trait SpecFetcher {
    /// Retrieves the raw body found at `url`.
    fn fetch(&self, url: &str) -> CliResult<String>;
}

/// Fetches documents with a blocking `ureq` agent.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests are bounded by `timeout` overall.
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl SpecFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> CliResult<String> {
        debug!(url = %url, "Fetching internal spec");
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| CliError::Http(format!("GET {}: {}", url, e)))?;
        response
            .body_mut()
            .read_to_string()
            .map_err(|e| CliError::Http(format!("Reading body of {}: {}", url, e)))
    }
}

/// Reads and parses a YAML OpenAPI document.
pub fn load_yaml_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::General(format!("Failed to read {:?}: {}", path, e)))?;
    Ok(parse_yaml(&content)?)
}

/// Reads a server lookup table from a YAML file.
pub fn load_server_map(path: &Path) -> CliResult<ServerUrlMap> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::General(format!("Failed to read {:?}: {}", path, e)))?;
    Ok(ServerUrlMap::from_yaml(&content)?)
}

/// Writes the serialized document, replacing any existing file.
///
/// The content goes to a temporary file next to `path` and is renamed over it
/// only once fully written, so a failed write leaves the previous file intact.
pub fn save_document(path: &Path, yaml: &str) -> CliResult<()> {
    replace_file(path, |file| file.write_all(yaml.as_bytes()))
}

fn replace_file(path: &Path, write: impl FnOnce(&mut File) -> io::Result<()>) -> CliResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    write(staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ext.yaml");
        fs::write(&path, "openapi: 3.0.2\npaths: {}\n").unwrap();

        let doc = load_yaml_file(&path).unwrap();
        assert_eq!(doc["openapi"], "3.0.2");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let res = load_yaml_file(&dir.path().join("absent.yaml"));
        assert!(matches!(res, Err(CliError::General(_))));
    }

    #[test]
    fn test_load_server_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.yaml");
        fs::write(
            &path,
            "https://kv.internal:\n    url: https://api-kv.{region}.example.com\n",
        )
        .unwrap();

        let map = load_server_map(&path).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("https://kv.internal").unwrap().url,
            "https://api-kv.{region}.example.com"
        );
    }

    #[test]
    fn test_save_document_replaces_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ext.yaml");
        fs::write(&path, "openapi: 3.0.0\n").unwrap();

        save_document(&path, "openapi: 3.0.2\npaths: {}\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "openapi: 3.0.2\npaths: {}\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_interrupted_write_keeps_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ext.yaml");
        let original = "openapi: 3.0.2\npaths:\n    /vms: {}\n";
        fs::write(&path, original).unwrap();

        let res = replace_file(&path, |file| {
            file.write_all(b"openapi: 3.0.2\npaths:\n    /vms/18:\n        post:\n")?;
            Err(io::Error::new(io::ErrorKind::Other, "File too large"))
        });

        assert!(matches!(res, Err(CliError::Io(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent").join("out.yaml");

        let res = save_document(&path, "openapi: 3.0.2\n");

        assert!(matches!(res, Err(CliError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_http_fetcher_rejects_bad_url() {
        let fetcher = HttpFetcher::default();
        let res = fetcher.fetch("not a url");
        assert!(matches!(res, Err(CliError::Http(_))));
    }
}
