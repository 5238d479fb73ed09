//! Analyze command implementation.

use clap::Parser;
use tracing::info;

use taxon_tree::io::write_json;
use taxon_tree::{analyze_tree, LowQualityExport, QualityReport};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, SimpleOutput};

/// Score every node and export the weak ones
#[derive(Debug, Parser)]
pub struct AnalyzeCommand {
    /// Export nodes scoring below this value (defaults to the configured threshold)
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Print the report without writing the low-quality export
    #[arg(long)]
    pub no_export: bool,
}

impl AnalyzeCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let tree = super::load_tree(ctx)?;
        let report = QualityReport::new(analyze_tree(&tree));
        print_output(&report)?;

        if self.no_export {
            return Ok(());
        }

        let threshold = self
            .threshold
            .unwrap_or(ctx.config.enhance.low_quality_threshold);
        let export = LowQualityExport::from_metrics(&report.metrics, threshold);
        let path = ctx.config.paths.low_quality_path(&ctx.root);
        write_json(&path, &export)?;
        info!(path = %path.display(), nodes = export.total_low_quality, "Wrote low-quality export");

        print_output(&SimpleOutput::new(format!(
            "Exported {} nodes scoring below {threshold} to {}",
            export.total_low_quality,
            path.display()
        )))
    }
}
