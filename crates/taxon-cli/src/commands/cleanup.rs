//! Cleanup command implementation.

use clap::Parser;

use taxon_tree::{discover_categories, execute_plan, expected_from_index, plan_consolidation};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::print_output;

/// Collapse duplicate and backup copies of category files
#[derive(Debug, Parser)]
pub struct CleanupCommand {
    /// Find categories from the files on disk instead of the index
    #[arg(long)]
    pub discover: bool,

    /// Print what would be kept, renamed and removed without touching files
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanupCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let data_dir = ctx.data_dir();
        let expected = if self.discover {
            discover_categories(&data_dir)?
        } else {
            let paths = &ctx.config.paths;
            expected_from_index(&paths.index_path(&ctx.root))?
        };

        let plan = plan_consolidation(&data_dir, &expected)?;
        print_output(&plan)?;
        if self.dry_run {
            return Ok(());
        }

        let report = execute_plan(&data_dir, &plan)?;
        print_output(&report)
    }
}
