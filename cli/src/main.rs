#![deny(missing_docs)]

//! # Sync OAPI
//!
//! Syncs the external (gateway) OpenAPI spec with the internal one generated
//! from service code: request bodies are taken from the internal spec, server
//! URLs are switched to the gateway templates and error schemas are rewritten
//! to the gateway's `{message, slug}` shape. The resulting YAML can be served
//! by the gateway directly.

use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;
use crate::loader::{HttpFetcher, DEFAULT_FETCH_TIMEOUT};

mod error;
mod loader;
mod sync;

#[derive(Parser, Debug)]
#[clap(
    name = "sync-oapi",
    author,
    version,
    about = "Sync external OpenAPI spec with the internal one for the API gateway"
)]
struct Cli {
    #[clap(flatten)]
    sync: sync::SyncArgs,

    /// Timeout in seconds for fetching the internal spec.
    #[clap(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    timeout: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let fetcher = HttpFetcher::new(Duration::from_secs(cli.timeout));
    sync::execute(&cli.sync, &fetcher)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_argument_parsing() {
        let cli = Cli::try_parse_from([
            "sync-oapi",
            "https://vpc.br-ne-1.jaxyendy.com/openapi.json",
            "--ext",
            "vpc.yaml",
            "-o",
            "out.yaml",
            "-vv",
        ])
        .unwrap();

        assert_eq!(
            cli.sync.internal_spec_url,
            "https://vpc.br-ne-1.jaxyendy.com/openapi.json"
        );
        assert_eq!(cli.sync.ext.as_deref(), Some(std::path::Path::new("vpc.yaml")));
        assert_eq!(cli.sync.output.as_deref(), Some(std::path::Path::new("out.yaml")));
        assert_eq!(cli.timeout, DEFAULT_FETCH_TIMEOUT.as_secs());
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["sync-oapi"]).is_err());
    }
}
