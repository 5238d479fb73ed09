//! Build command implementation.

use clap::Parser;
use tracing::info;

use taxon_tree::build;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::print_output;

/// Merge the category fragments into the consolidated taxonomy
#[derive(Debug, Parser)]
pub struct BuildCommand {}

impl BuildCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let inputs = ctx.build_inputs();
        info!(data_dir = %inputs.data_dir.display(), "Building taxonomy");

        let report = build(&inputs)?;
        print_output(&report)
    }
}
