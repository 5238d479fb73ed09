//! Plan command implementation.

use clap::Parser;
use tracing::info;

use taxon_tree::io::write_json;
use taxon_tree::{plan_batches, PlanOptions, ProcessingPlan};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, SimpleOutput};

/// Plan enhancement batches and write a batch work file
#[derive(Debug, Parser)]
pub struct PlanCommand {
    /// Batch to write as the work file (defaults to the first planned batch)
    #[arg(short, long, value_name = "BATCH_ID")]
    pub export: Option<String>,
}

/// Planning options from configuration.
pub(crate) fn plan_options(ctx: &CommandContext) -> PlanOptions {
    PlanOptions {
        batch_size: ctx.config.enhance.batch_size,
        priority_categories: ctx.config.enhance.priority_categories.clone(),
    }
}

impl PlanCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let tree = super::load_tree(ctx)?;
        let plan = ProcessingPlan::new(plan_batches(&tree, &plan_options(ctx))?);
        print_output(&plan)?;

        let selected = match &self.export {
            Some(batch_id) => Some(plan.find_batch(batch_id)?),
            None => plan.first(),
        };
        let Some(selected) = selected else {
            return print_output(&SimpleOutput::new("Nothing needs enhancement"));
        };

        let path = ctx.config.paths.sample_batch_path(&ctx.root);
        write_json(&path, &selected.batch)?;
        info!(batch = %selected.batch.batch_id, path = %path.display(), "Wrote batch work file");

        print_output(&SimpleOutput::new(format!(
            "Wrote batch {} to {}",
            selected.batch.batch_id,
            path.display()
        )))
    }
}
