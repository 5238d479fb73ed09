//! Command implementations.

mod analyze;
mod batch;
mod build;
mod cleanup;
mod normalize;
mod plan;
mod single;

pub use analyze::AnalyzeCommand;
pub use batch::BatchCommand;
pub use build::BuildCommand;
pub use cleanup::CleanupCommand;
pub use normalize::NormalizeCommand;
pub use plan::PlanCommand;
pub use single::SingleCommand;

use tracing::warn;

use taxon_common_config::ApiKeys;
use taxon_enhance::{ClaudeClient, ClaudeConfig, Enhancer, EnhancerSettings, PromptSettings};
use taxon_tree::io::read_json;
use taxon_tree::TaxonomyNode;

use crate::cli::CommandContext;
use crate::error::CliError;

/// Read the consolidated taxonomy, which must already have been built.
/// Unnamed nodes are reported but do not stop the command.
fn load_tree(ctx: &CommandContext) -> Result<TaxonomyNode, CliError> {
    let tree: TaxonomyNode = read_json(&ctx.output_path(), "consolidated taxonomy")?;
    if let Err(e) = tree.validate() {
        warn!("{e}");
    }
    Ok(tree)
}

/// An enhancer talking to the configured Claude endpoint.
fn claude_enhancer(ctx: &CommandContext) -> Result<Enhancer<ClaudeClient>, CliError> {
    let service = &ctx.config.service;
    let api_key = ApiKeys::require_anthropic()?;
    let client = ClaudeClient::new(ClaudeConfig::from_service(service, api_key))?;

    let settings = EnhancerSettings {
        prompt: PromptSettings::from(service),
        root_name: ctx.config.taxonomy.root_name.clone(),
        build: ctx.build_inputs(),
    };
    Ok(Enhancer::new(client, settings))
}
