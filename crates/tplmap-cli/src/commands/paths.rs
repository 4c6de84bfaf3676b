//! Implementation of the `tplmap paths` command.

use crate::{
    cli::PathsArgs, commands::open_map, config::AppConfig, error::CliResult,
    output::OutputManager,
};

pub fn execute(args: PathsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let map = open_map(&args.target, &config)?;
    let paths: Vec<String> = map.paths().into_iter().map(str::to_owned).collect();
    output.paths(&paths)
}
