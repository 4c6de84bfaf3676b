//! Command handlers, one module per subcommand.

pub mod build;
pub mod cache;
pub mod completions;
pub mod config;
pub mod paths;
pub mod stack;

use std::{fs, path::Path};

use tplmap_adapters::{DirectoryLoader, FilesystemMapStore};
use tplmap_core::{application::TraceService, domain::SourceMap};
use tracing::debug;

use crate::{
    cli::MapTarget,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Read a UTF-8 input file named on the command line.
pub(crate) fn read_input(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Template loader configured from `templates.*`.
pub(crate) fn directory_loader(config: &AppConfig) -> DirectoryLoader {
    let loader = DirectoryLoader::new(&config.templates.root);
    match &config.templates.extension {
        Some(ext) => loader.with_extension(ext.as_str()),
        None => loader,
    }
}

/// Trace service over the configured template root and cache directory.
pub(crate) fn cached_service(config: &AppConfig) -> TraceService {
    TraceService::new(
        Box::new(directory_loader(config)),
        Box::new(FilesystemMapStore::new(&config.cache.dir)),
    )
}

/// Decode the map a query names, from a file or from the cache.
pub(crate) fn open_map(target: &MapTarget, config: &AppConfig) -> CliResult<SourceMap> {
    if target.cached {
        debug!(key = %target.map, cache = %config.cache.dir.display(), "reading cached map");
        return Ok(cached_service(config).load(&target.map)?);
    }

    let encoded = read_input(Path::new(&target.map))?;
    Ok(SourceMap::deserialize(encoded)?)
}
