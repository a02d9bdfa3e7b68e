#![deny(missing_docs)]

//! # Sync Command
//!
//! Implements the run: fetch internal spec -> load external spec -> reconcile -> save.
//!
//! 1. **Load**: internal JSON through a `SpecFetcher`, external YAML from `--ext`
//!    (or the internal spec itself when omitted).
//! 2. **Reconcile**: RequestBody sync, server URL resolution, error schema patching.
//! 3. **Save**: YAML to `--output`, falling back to `--ext`. The document is fully
//!    serialized before any file is touched, so a failed run writes nothing.

use crate::error::CliResult;
use crate::loader::{load_server_map, load_yaml_file, save_document, SpecFetcher};
use oapi_sync_core::{parse_json, reconcile, to_yaml, ServerUrlMap};
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments for the sync run.
#[derive(clap::Args, Debug, Clone)]
pub struct SyncArgs {
    /// URL to fetch the current internal OpenAPI spec, served as JSON.
    pub internal_spec_url: String,

    /// Path to the current external OpenAPI spec (YAML).
    /// If not provided, the downloaded internal spec is used.
    #[clap(long)]
    pub ext: Option<PathBuf>,

    /// Path to save the new external YAML. Defaults to overwriting `--ext`.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// YAML file replacing the built-in server URL lookup table.
    #[clap(long)]
    pub server_map: Option<PathBuf>,
}

/// Executes the sync run.
///
/// Returns the path the merged spec was written to, if any.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `fetcher` - Retrieves the internal spec (HTTP in production).
pub fn execute(args: &SyncArgs, fetcher: &impl SpecFetcher) -> CliResult<Option<PathBuf>> {
    let servers = match &args.server_map {
        Some(path) => {
            let map = load_server_map(path)?;
            if map.is_empty() {
                warn!("Server map {:?} has no entries, no server URL will be translated", path);
            } else {
                info!("Loaded {} server mappings from {:?}", map.len(), path);
            }
            map
        }
        None => ServerUrlMap::default(),
    };

    let internal = parse_json(&fetcher.fetch(&args.internal_spec_url)?)?;
    let external = args.ext.as_deref().map(load_yaml_file).transpose()?;

    let reconciled = reconcile(&internal, external, &args.internal_spec_url, &servers)?;
    let yaml = to_yaml(&reconciled.document)?;

    let Some(output_path) = args.output.clone().or_else(|| args.ext.clone()) else {
        info!("Not saving final spec to an output file");
        return Ok(None);
    };
    save_document(&output_path, &yaml)?;
    info!("Saved external spec to {:?}", output_path);
    Ok(Some(output_path))
}
