//! Single-batch command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};

use taxon_tree::io::read_json;
use taxon_tree::EnhancementBatch;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::print_output;

/// Enhance the nodes of one batch work file
#[derive(Debug, Parser)]
pub struct SingleCommand {
    /// Batch work file (defaults to the configured sample batch file)
    #[arg(value_hint = ValueHint::FilePath)]
    pub batch_file: Option<PathBuf>,
}

impl SingleCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let path = match &self.batch_file {
            Some(file) => ctx.resolve(file),
            None => ctx.config.paths.sample_batch_path(&ctx.root),
        };
        let batch: EnhancementBatch = read_json(&path, "batch work file")?;

        let enhancer = super::claude_enhancer(ctx)?;
        let outcome = enhancer.process_batch(&batch).await?;
        print_output(&outcome)
    }
}
