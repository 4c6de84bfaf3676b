//! Implementation of the `tplmap build` command.

use std::collections::BTreeMap;

use tplmap_core::domain::{Location, SourceMap};
use tracing::{info, instrument};

use crate::{
    cli::BuildArgs,
    commands::{cached_service, directory_loader, read_input},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(content = %args.content.display()))]
pub fn execute(args: BuildArgs, mut config: AppConfig, output: OutputManager) -> CliResult<()> {
    let content = read_input(&args.content)?;
    let locations = parse_locations(&read_input(&args.locations)?)?;

    if let Some(root) = args.root {
        config.templates.root = root;
    }
    if let Some(ext) = args.extension {
        config.templates.extension = Some(ext);
    }

    if let Some(key) = args.key {
        let map = cached_service(&config).record(&key, &content, &locations)?;
        output.success(&format!(
            "Recorded {} lines from {} templates under '{key}'",
            map.len(),
            map.paths().len()
        ))?;
        return Ok(());
    }

    let map = SourceMap::calculate(&content, &locations, &directory_loader(&config))?;
    let encoded = map.serialize()?;
    info!(lines = map.len(), paths = map.paths().len(), "map built");

    match args.out {
        Some(out) => {
            std::fs::write(&out, encoded)
                .with_cli_context(|| format!("failed to write {}", out.display()))?;
            output.success(&format!(
                "Wrote {} ({} lines, {} templates)",
                out.display(),
                map.len(),
                map.paths().len()
            ))?;
        }
        None => output.data(&encoded)?,
    }

    Ok(())
}

/// Parse a location table: a JSON object keyed by output byte offset.
fn parse_locations(json: &str) -> CliResult<BTreeMap<usize, Location>> {
    serde_json::from_str(json).map_err(|e| CliError::InvalidInput {
        message: format!("malformed location table: {e}"),
        source: Some(Box::new(e)),
    })
}
