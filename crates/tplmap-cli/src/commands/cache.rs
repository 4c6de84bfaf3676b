//! `tplmap cache` - inspect the map cache directory.

use serde::Serialize;
use tplmap_adapters::FilesystemMapStore;
use tplmap_core::{
    application::{ApplicationError, ports::MapStore},
    error::TplmapError,
};

use crate::{
    cli::{CacheCommands, OutputFormat},
    commands::cached_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct Entry {
    key: String,
    fresh: bool,
}

/// Dispatch to the correct cache subcommand.
pub fn execute(cmd: CacheCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let store = FilesystemMapStore::new(&config.cache.dir);

    match cmd {
        CacheCommands::List => {
            let entries = cached_service(&config)
                .keys()?
                .into_iter()
                .map(|key| -> CliResult<Entry> {
                    let fresh = store.is_fresh(&key)?;
                    Ok(Entry { key, fresh })
                })
                .collect::<CliResult<Vec<_>>>()?;
            render(&output, &entries)?;
        }

        CacheCommands::Status { key } => {
            if store.get(&key)?.is_none() {
                return Err(TplmapError::from(ApplicationError::MapNotFound { key }).into());
            }
            let fresh = store.is_fresh(&key)?;
            render(&output, &[Entry { key, fresh }])?;
        }

        CacheCommands::Forget { key } => {
            cached_service(&config).forget(&key)?;
            output.success(&format!("Forgot '{key}'"))?;
        }
    }

    Ok(())
}

fn render(output: &OutputManager, entries: &[Entry]) -> CliResult<()> {
    match output.format() {
        OutputFormat::Json => output.json(entries)?,
        OutputFormat::Human => {
            for entry in entries {
                if entry.fresh {
                    output.success(&entry.key)?;
                } else {
                    output.warning(&format!("{} (stale)", entry.key))?;
                }
            }
        }
        OutputFormat::Plain | OutputFormat::Auto => {
            for entry in entries {
                let state = if entry.fresh { "fresh" } else { "stale" };
                output.data(&format!("{}\t{state}", entry.key))?;
            }
        }
    }
    Ok(())
}
