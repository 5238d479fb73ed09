//! Multi-batch command implementation.

use std::time::Duration;

use clap::Parser;

use taxon_tree::{plan_batches, EnhancementBatch};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::print_output;

/// Plan and enhance several batches in one run
#[derive(Debug, Parser)]
pub struct BatchCommand {
    /// Maximum number of batches to process (defaults to enhance.max_batches)
    pub max_batches: Option<usize>,

    /// Seconds to wait between service calls (defaults to enhance.delay_secs)
    #[arg(short, long)]
    pub delay: Option<u64>,
}

impl BatchCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let tree = super::load_tree(ctx)?;
        let batches: Vec<EnhancementBatch> = plan_batches(&tree, &super::plan::plan_options(ctx))?
            .into_iter()
            .map(|planned| planned.batch)
            .collect();

        let max_batches = self.max_batches.unwrap_or(ctx.config.enhance.max_batches);
        let delay = Duration::from_secs(self.delay.unwrap_or(ctx.config.enhance.delay_secs));

        let enhancer = super::claude_enhancer(ctx)?;
        let summary = enhancer.run_batches(&batches, max_batches, delay).await;
        print_output(&summary)
    }
}
