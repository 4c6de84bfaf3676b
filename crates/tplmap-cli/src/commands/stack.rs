//! Implementation of the `tplmap stack` command.

use tracing::info;

use crate::{
    cli::StackArgs,
    commands::open_map,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: StackArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let line = usize::try_from(args.line).map_err(|e| CliError::InvalidInput {
        message: format!("line {} is out of range", args.line),
        source: Some(Box::new(e)),
    })?;

    let map = open_map(&args.target, &config)?;
    let frames = map.stack(line);

    if frames.is_empty() {
        info!(line, "no mapped output at or before line");
    }
    output.stack(&frames)
}
